use crate::utils::error::{AdError, Result};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// `<count>/<period>` where period starts with s, m, h or d.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    pub requests: usize,
    pub window: Duration,
}

impl FromStr for Rate {
    type Err = AdError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| AdError::InvalidConfigValueError {
            field: "throttle rate".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (count, period) = s
            .split_once('/')
            .ok_or_else(|| invalid("expected <count>/<period>, e.g. 100/minute"))?;

        let requests: usize = count
            .trim()
            .parse()
            .map_err(|_| invalid("request count must be a non-negative integer"))?;

        let seconds = match period.trim().chars().next() {
            Some('s') => 1,
            Some('m') => 60,
            Some('h') => 3_600,
            Some('d') => 86_400,
            _ => return Err(invalid("period must be second, minute, hour or day")),
        };

        Ok(Rate {
            requests,
            window: Duration::from_secs(seconds),
        })
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}s", self.requests, self.window.as_secs())
    }
}

/// Sliding-window request counter keyed by caller identity.
///
/// Keys whose newest request has left the window are pruned at most once per
/// window, so idle callers do not accumulate.
#[derive(Debug)]
pub struct RateThrottle {
    scope: &'static str,
    rate: Rate,
    history: DashMap<String, VecDeque<Instant>>,
    started: Instant,
    last_prune_ms: AtomicU64,
}

impl RateThrottle {
    pub fn new(scope: &'static str, rate: Rate) -> Self {
        Self {
            scope,
            rate,
            history: DashMap::new(),
            started: Instant::now(),
            last_prune_ms: AtomicU64::new(0),
        }
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Number of callers currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.history.len()
    }

    pub fn check(&self, key: &str) -> Result<()> {
        self.check_at(key, Instant::now())
    }

    /// Records a request for `key` at `now`, or rejects it with the time until
    /// the oldest request in the window expires.
    pub fn check_at(&self, key: &str, now: Instant) -> Result<()> {
        self.prune_if_due(now);

        let mut entries = self.history.entry(key.to_string()).or_default();
        while let Some(oldest) = entries.front() {
            if now.duration_since(*oldest) >= self.rate.window {
                entries.pop_front();
            } else {
                break;
            }
        }

        if entries.len() >= self.rate.requests {
            let retry_after = entries
                .front()
                .map(|oldest| self.rate.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.rate.window);
            tracing::debug!(
                "Throttled {} request for '{}' ({} in window {:?})",
                self.scope,
                key,
                entries.len(),
                self.rate.window
            );
            return Err(AdError::Throttled { retry_after });
        }

        entries.push_back(now);
        Ok(())
    }

    /// Drops every key with no request inside the window ending at `now`.
    pub fn prune_idle(&self, now: Instant) -> usize {
        let before = self.history.len();
        let window = self.rate.window;
        self.history.retain(|_, entries| {
            entries
                .back()
                .is_some_and(|newest| now.duration_since(*newest) < window)
        });
        let removed = before.saturating_sub(self.history.len());
        if removed > 0 {
            tracing::debug!("Pruned {} idle {} throttle keys", removed, self.scope);
        }
        removed
    }

    fn prune_if_due(&self, now: Instant) {
        let now_ms = now.duration_since(self.started).as_millis() as u64;
        let last = self.last_prune_ms.load(Ordering::Relaxed);
        if now_ms.saturating_sub(last) < self.rate.window.as_millis() as u64 {
            return;
        }
        if self
            .last_prune_ms
            .compare_exchange(last, now_ms, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            self.prune_idle(now);
        }
    }
}
