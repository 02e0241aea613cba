use crate::domain::model::{
    AdStatus, Advertisement, AdvertisementFilter, AdvertisementId, NewAdvertisement, User, UserId,
};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AdvertisementStore: Send + Sync {
    /// Matching advertisements ordered by id.
    async fn list(&self, filter: &AdvertisementFilter) -> Result<Vec<Advertisement>>;
    async fn get(&self, id: AdvertisementId) -> Result<Option<Advertisement>>;
    /// Exact count of `creator`'s advertisements in `status`.
    async fn count(&self, creator: UserId, status: AdStatus) -> Result<usize>;
    async fn insert(&self, new: NewAdvertisement) -> Result<Advertisement>;
    /// Replaces the stored record with the same id. `creator` and
    /// `created_at` are kept from the stored copy.
    async fn update(&self, ad: Advertisement) -> Result<Advertisement>;
    /// Returns false when nothing was stored under `id`.
    async fn delete(&self, id: AdvertisementId) -> Result<bool>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolves an API token to its user.
    async fn authenticate(&self, token: &str) -> Option<User>;
}
