pub mod address;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod id;
pub mod middleware;
pub mod server;
pub mod store;
pub mod validation;

pub use address::Address;
pub use config::Config;
pub use error::{ApiError, Result};
pub use server::{create_app, Server};
pub use store::AddressStore;
