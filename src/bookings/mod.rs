pub mod booking_code;
pub mod error;
pub mod handlers;
pub mod models;
pub mod queue_allocator;
pub mod repository;
pub mod service;
pub mod slot_config;

pub use error::*;
pub use handlers::*;
pub use models::*;
pub use queue_allocator::*;
pub use repository::*;
pub use service::*;
pub use slot_config::*;
