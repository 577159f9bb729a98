pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod models;
pub mod recipient_resolver;
pub mod repository;
pub mod service;

pub use dispatcher::*;
pub use error::*;
pub use handlers::*;
pub use models::*;
pub use recipient_resolver::*;
pub use repository::*;
pub use service::*;
