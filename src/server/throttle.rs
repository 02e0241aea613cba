use crate::adapters::throttle::RateThrottle;
use crate::domain::model::Actor;
use crate::server::AppState;
use crate::utils::error::Result;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

/// Anonymous and per-user request ceilings. `None` disables a throttle.
#[derive(Debug, Default)]
pub struct Throttles {
    pub anon: Option<RateThrottle>,
    pub user: Option<RateThrottle>,
}

impl Throttles {
    /// The anonymous throttle only sees anonymous callers, keyed by client IP.
    /// The user throttle keys by user id, falling back to client IP.
    pub fn check(&self, actor: &Actor, client_ip: &str) -> Result<()> {
        if let (Some(throttle), Actor::Anonymous) = (&self.anon, actor) {
            throttle.check(client_ip)?;
        }
        if let Some(throttle) = &self.user {
            match actor.user() {
                Some(user) => throttle.check(&user.id.to_string())?,
                None => throttle.check(client_ip)?,
            }
        }
        Ok(())
    }
}

pub async fn throttle_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response> {
    let actor = req
        .extensions()
        .get::<Actor>()
        .cloned()
        .unwrap_or(Actor::Anonymous);
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    state.throttles.check(&actor, &client_ip)?;
    Ok(next.run(req).await)
}
