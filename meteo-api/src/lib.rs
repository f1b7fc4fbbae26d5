pub mod models;
pub mod protocols;
pub mod restful;

pub use models::*;
