pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod types;
pub mod view;

pub use api::PortfolioApi;
pub use error::PortfolioError;
