pub mod locks;
pub mod service;

pub use crate::domain::model::{Actor, AdStatus, Advertisement, AdvertisementFilter, User};
pub use crate::domain::ports::{AdvertisementStore, UserDirectory};
pub use crate::utils::error::Result;
pub use service::AdvertisementService;
