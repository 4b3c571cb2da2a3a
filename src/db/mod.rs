mod connection;
pub mod helpers;
mod migrations;
pub mod models;
mod repositories;
mod store;

pub use connection::Database;
pub use store::SessionStore;
