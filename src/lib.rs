// Library exports for integration tests and external use

pub mod app_data;
pub mod cli;
pub mod config;
pub mod errors;
pub mod ml;
pub mod services;
pub mod stores;
pub mod types;

pub use app_data::AppData;
