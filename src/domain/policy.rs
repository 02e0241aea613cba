//! Ownership and open-quota rules for advertisements.
//!
//! Both checks are pure: callers supply the actor, the record and the current
//! open count, and enforce the returned decision.

use crate::domain::model::{Actor, Advertisement, User};
use crate::utils::error::{AdError, Result};

/// Maximum number of OPEN advertisements a single user may hold.
pub const MAX_OPEN_ADVERTISEMENTS: usize = 10;

/// Whether `user` may move one more advertisement into OPEN.
pub fn can_set_open(_user: &User, current_open_count: usize) -> bool {
    current_open_count < MAX_OPEN_ADVERTISEMENTS
}

pub fn enforce_open_quota(user: &User, current_open_count: usize) -> Result<()> {
    if can_set_open(user, current_open_count) {
        Ok(())
    } else {
        Err(AdError::QuotaExceeded {
            open_count: current_open_count,
        })
    }
}

/// Whether `user` owns `record`.
pub fn can_mutate(user: &User, record: &Advertisement) -> bool {
    user.id == record.creator.id
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRequirements {
    pub requires_auth: bool,
    pub requires_ownership: bool,
}

impl Action {
    pub fn requirements(&self) -> ActionRequirements {
        match self {
            Action::List | Action::Retrieve => ActionRequirements {
                requires_auth: false,
                requires_ownership: false,
            },
            Action::Create => ActionRequirements {
                requires_auth: true,
                requires_ownership: false,
            },
            Action::Update | Action::PartialUpdate | Action::Destroy => ActionRequirements {
                requires_auth: true,
                requires_ownership: true,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Retrieve => "retrieve",
            Action::Create => "create",
            Action::Update => "update",
            Action::PartialUpdate => "partial_update",
            Action::Destroy => "destroy",
        }
    }
}

/// Checks `actor` against the requirements of `action`.
///
/// `record` is the target advertisement for actions that address one; an
/// ownership-gated action without a record is denied.
pub fn authorize(action: Action, actor: &Actor, record: Option<&Advertisement>) -> Result<()> {
    let requirements = action.requirements();

    if !requirements.requires_auth && !requirements.requires_ownership {
        return Ok(());
    }

    let user = actor.user().ok_or_else(|| {
        AdError::permission_denied(format!(
            "authentication is required to {} advertisements",
            action.name()
        ))
    })?;

    if requirements.requires_ownership {
        match record {
            Some(record) if can_mutate(user, record) => {}
            _ => {
                return Err(AdError::permission_denied(
                    "only the creator of an advertisement may modify it",
                ))
            }
        }
    }

    Ok(())
}
