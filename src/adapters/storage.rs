use crate::domain::model::{
    AdStatus, Advertisement, AdvertisementFilter, AdvertisementId, NewAdvertisement, UserId,
};
use crate::domain::ports::AdvertisementStore;
use crate::utils::error::{AdError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<AdvertisementId, Advertisement>,
    last_id: AdvertisementId,
}

/// Process-local advertisement table. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryAdvertisementStore {
    table: RwLock<Table>,
}

impl InMemoryAdvertisementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdvertisementStore for InMemoryAdvertisementStore {
    async fn list(&self, filter: &AdvertisementFilter) -> Result<Vec<Advertisement>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|ad| filter.matches(ad))
            .cloned()
            .collect())
    }

    async fn get(&self, id: AdvertisementId) -> Result<Option<Advertisement>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn count(&self, creator: UserId, status: AdStatus) -> Result<usize> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|ad| ad.creator.id == creator && ad.status == status)
            .count())
    }

    async fn insert(&self, new: NewAdvertisement) -> Result<Advertisement> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let ad = Advertisement {
            id: table.last_id,
            title: new.title,
            description: new.description,
            creator: new.creator,
            status: new.status,
            created_at: Utc::now(),
        };
        table.rows.insert(ad.id, ad.clone());
        tracing::debug!("Stored advertisement {} for user {}", ad.id, ad.creator.id);
        Ok(ad)
    }

    async fn update(&self, ad: Advertisement) -> Result<Advertisement> {
        let mut table = self.table.write().await;
        let stored = table
            .rows
            .get_mut(&ad.id)
            .ok_or(AdError::NotFound { id: ad.id })?;

        stored.title = ad.title;
        stored.description = ad.description;
        stored.status = ad.status;
        Ok(stored.clone())
    }

    async fn delete(&self, id: AdvertisementId) -> Result<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
