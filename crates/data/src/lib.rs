pub mod database;
pub mod models;
pub mod repositories;

pub use database::Database;
pub use models::{BrokerSettings, BrokerSettingsPatch, NewBrokerSettings};
pub use models::{NewPosition, Position, PositionPatch};
pub use repositories::{BrokerRepository, PositionRepository};
