pub mod catalog;
pub mod error;
pub mod generation;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
