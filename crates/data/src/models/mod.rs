pub mod broker;
pub mod position;

pub use broker::{BrokerSettings, BrokerSettingsPatch, NewBrokerSettings};
pub use position::{NewPosition, Position, PositionPatch};
