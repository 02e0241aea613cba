//! HTTP surface: the advertisement resource, its auth and throttle layers.

mod auth;
mod error;
mod extract;
mod handlers;
mod throttle;

pub use auth::auth_middleware;
pub use throttle::{throttle_middleware, Throttles};

use crate::adapters::{InMemoryAdvertisementStore, RateThrottle, StaticUserDirectory};
use crate::config::AppConfig;
use crate::core::AdvertisementService;
use crate::domain::ports::{AdvertisementStore, UserDirectory};
use crate::utils::error::Result;
use axum::{middleware, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AdvertisementService>,
    pub directory: Arc<dyn UserDirectory>,
    pub throttles: Arc<Throttles>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AdvertisementStore>,
        directory: Arc<dyn UserDirectory>,
        throttles: Throttles,
    ) -> Self {
        Self {
            service: Arc::new(AdvertisementService::new(store)),
            directory,
            throttles: Arc::new(throttles),
        }
    }

    /// In-memory store, config-declared users and configured throttles.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let directory = StaticUserDirectory::from_config(&config.users);
        if directory.is_empty() {
            tracing::warn!("No users configured; every request will be anonymous");
        } else {
            tracing::info!("Loaded {} API users", directory.len());
        }

        let throttles = Throttles {
            anon: config
                .throttle
                .anon_rate()?
                .map(|rate| RateThrottle::new("anon", rate)),
            user: config
                .throttle
                .user_rate()?
                .map(|rate| RateThrottle::new("user", rate)),
        };
        for throttle in [&throttles.anon, &throttles.user].into_iter().flatten() {
            tracing::info!("Throttle '{}' set to {}", throttle.scope(), throttle.rate());
        }

        Ok(Self::new(
            Arc::new(InMemoryAdvertisementStore::new()),
            Arc::new(directory),
            throttles,
        ))
    }
}

pub fn build_router(state: AppState) -> Router {
    let collection =
        get(handlers::list_advertisements).post(handlers::create_advertisement);
    let item = get(handlers::retrieve_advertisement)
        .put(handlers::update_advertisement)
        .patch(handlers::partial_update_advertisement)
        .delete(handlers::destroy_advertisement);

    let api = Router::new()
        .route("/api/advertisements", collection.clone())
        .route("/api/advertisements/", collection)
        .route("/api/advertisements/:id", item.clone())
        .route("/api/advertisements/:id/", item)
        // auth runs first so the throttle can key by user
        .layer(middleware::from_fn_with_state(state.clone(), throttle_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(
        listener,
        build_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
