pub mod body;
pub mod config;
pub mod integrate;
pub mod narrow_phase;
pub mod response;
pub mod shape;
pub mod vector;
pub mod world;

pub use body::RigidBody;
pub use config::{ConfigError, WorldConfig, WorldConfigBuilder};
pub use integrate::IntegrationMethod;
pub use shape::Shape;
pub use vector::Vector3;
pub use world::World;
