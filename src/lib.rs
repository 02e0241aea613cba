pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::{AppConfig, CliConfig};
pub use core::AdvertisementService;
pub use domain::model::{Actor, AdStatus, Advertisement, AdvertisementPayload, User};
pub use server::{build_router, serve, AppState};
pub use utils::error::{AdError, Result};
