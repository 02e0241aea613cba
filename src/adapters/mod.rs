// Adapters layer: concrete implementations for the domain ports and the
// request throttles.

pub mod directory;
pub mod storage;
pub mod throttle;

pub use directory::StaticUserDirectory;
pub use storage::InMemoryAdvertisementStore;
pub use throttle::{Rate, RateThrottle};
