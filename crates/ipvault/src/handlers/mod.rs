pub mod admin;
pub mod error;
pub mod events;
pub mod files;
pub mod health;
pub mod resources;

pub use error::AppError;
