use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = u64;
pub type AdvertisementId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdStatus {
    #[default]
    Open,
    Closed,
}

impl AdStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdStatus::Open => "OPEN",
            AdStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for AdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(AdStatus::Open),
            "CLOSED" => Ok(AdStatus::Closed),
            other => Err(format!("\"{}\" is not a valid status", other)),
        }
    }
}

/// A classifieds listing. `creator` is fixed at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: AdvertisementId,
    pub title: String,
    pub description: String,
    pub creator: User,
    pub status: AdStatus,
    pub created_at: DateTime<Utc>,
}

impl Advertisement {
    pub fn is_open(&self) -> bool {
        self.status == AdStatus::Open
    }
}

/// Write payload for create/update. A `creator` key in the request body is
/// not part of this type and is dropped during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvertisementPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<AdStatus>,
}

/// Validated insert, handed to the store which assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewAdvertisement {
    pub title: String,
    pub description: String,
    pub creator: User,
    pub status: AdStatus,
}

/// List query filters. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvertisementFilter {
    #[serde(default)]
    pub creator: Option<UserId>,
    #[serde(default)]
    pub status: Option<AdStatus>,
    #[serde(default)]
    pub created_at_after: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at_before: Option<DateTime<Utc>>,
}

impl AdvertisementFilter {
    pub fn matches(&self, ad: &Advertisement) -> bool {
        self.creator.map_or(true, |id| ad.creator.id == id)
            && self.status.map_or(true, |status| ad.status == status)
            && self
                .created_at_after
                .map_or(true, |after| ad.created_at >= after)
            && self
                .created_at_before
                .map_or(true, |before| ad.created_at <= before)
    }
}

/// The party behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Authenticated(User),
}

impl Actor {
    pub fn user(&self) -> Option<&User> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::Authenticated(_))
    }
}
