pub mod config;
pub mod handlers;
pub mod models;
pub mod qr;
pub mod routes;
pub mod settlement;
pub mod state;
pub mod store;
pub mod utils;
