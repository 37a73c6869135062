pub mod broker_repo;
pub mod position_repo;

pub use broker_repo::BrokerRepository;
pub use position_repo::PositionRepository;
