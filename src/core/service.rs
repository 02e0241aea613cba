use crate::core::locks::CreatorLocks;
use crate::domain::model::{
    Actor, AdStatus, Advertisement, AdvertisementFilter, AdvertisementId, AdvertisementPayload,
    NewAdvertisement,
};
use crate::domain::policy::{authorize, enforce_open_quota, Action};
use crate::domain::ports::AdvertisementStore;
use crate::utils::error::{AdError, Result};
use crate::utils::validation::validate_title;
use std::sync::Arc;

/// Advertisement use cases. Every write goes through `authorize` and, when it
/// targets OPEN, through the open quota, while the creator's lock is held.
pub struct AdvertisementService {
    store: Arc<dyn AdvertisementStore>,
    locks: CreatorLocks,
}

impl AdvertisementService {
    pub fn new(store: Arc<dyn AdvertisementStore>) -> Self {
        Self {
            store,
            locks: CreatorLocks::new(),
        }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        filter: &AdvertisementFilter,
    ) -> Result<Vec<Advertisement>> {
        authorize(Action::List, actor, None)?;
        self.store.list(filter).await
    }

    pub async fn retrieve(&self, actor: &Actor, id: AdvertisementId) -> Result<Advertisement> {
        let ad = self.load(id).await?;
        authorize(Action::Retrieve, actor, Some(&ad))?;
        Ok(ad)
    }

    /// Creates an advertisement owned by `actor`; status defaults to OPEN.
    pub async fn create(
        &self,
        actor: &Actor,
        payload: AdvertisementPayload,
    ) -> Result<Advertisement> {
        authorize(Action::Create, actor, None)?;
        let creator = actor.user().cloned().ok_or_else(|| {
            AdError::permission_denied("authentication is required to create advertisements")
        })?;

        let title = validate_title(payload.title.as_deref())?;
        let status = payload.status.unwrap_or_default();

        let _guard = self.locks.acquire(creator.id).await;
        if status == AdStatus::Open {
            let open_count = self.store.count(creator.id, AdStatus::Open).await?;
            enforce_open_quota(&creator, open_count)?;
        }

        let ad = self
            .store
            .insert(NewAdvertisement {
                title,
                description: payload.description.unwrap_or_default(),
                creator,
                status,
            })
            .await?;

        tracing::info!(
            "Advertisement {} created by user {} ({})",
            ad.id,
            ad.creator.id,
            ad.status
        );
        Ok(ad)
    }

    /// Full update: `title` is required, omitted optional fields keep their value.
    pub async fn update(
        &self,
        actor: &Actor,
        id: AdvertisementId,
        payload: AdvertisementPayload,
    ) -> Result<Advertisement> {
        self.write(Action::Update, actor, id, payload).await
    }

    pub async fn partial_update(
        &self,
        actor: &Actor,
        id: AdvertisementId,
        payload: AdvertisementPayload,
    ) -> Result<Advertisement> {
        self.write(Action::PartialUpdate, actor, id, payload).await
    }

    pub async fn destroy(&self, actor: &Actor, id: AdvertisementId) -> Result<()> {
        let ad = self.load(id).await?;
        authorize(Action::Destroy, actor, Some(&ad))?;

        let _guard = self.locks.acquire(ad.creator.id).await;
        if !self.store.delete(id).await? {
            return Err(AdError::NotFound { id });
        }

        tracing::info!("Advertisement {} deleted by user {}", id, ad.creator.id);
        Ok(())
    }

    async fn write(
        &self,
        action: Action,
        actor: &Actor,
        id: AdvertisementId,
        payload: AdvertisementPayload,
    ) -> Result<Advertisement> {
        let creator_id = self.load(id).await?.creator.id;
        let _guard = self.locks.acquire(creator_id).await;

        // re-read under the lock
        let current = self.load(id).await?;
        authorize(action, actor, Some(&current))?;

        let mut next = current.clone();
        match (action, payload.title.as_deref()) {
            (Action::Update, title) => next.title = validate_title(title)?,
            (_, Some(title)) => next.title = validate_title(Some(title))?,
            (_, None) => {}
        }
        if let Some(description) = payload.description {
            next.description = description;
        }
        // only a submitted OPEN status is checked, against the full open count
        if payload.status == Some(AdStatus::Open) {
            let open_count = self.store.count(current.creator.id, AdStatus::Open).await?;
            enforce_open_quota(&current.creator, open_count)?;
        }
        if let Some(status) = payload.status {
            next.status = status;
        }

        let updated = self.store.update(next).await?;
        tracing::info!(
            "Advertisement {} updated by user {} ({} -> {})",
            updated.id,
            updated.creator.id,
            current.status,
            updated.status
        );
        Ok(updated)
    }

    async fn load(&self, id: AdvertisementId) -> Result<Advertisement> {
        self.store.get(id).await?.ok_or(AdError::NotFound { id })
    }
}
