use crate::config::UserConfig;
use crate::domain::model::User;
use crate::domain::ports::UserDirectory;
use async_trait::async_trait;
use std::collections::HashMap;

/// Token-to-user map built once from the config file.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    by_token: HashMap<String, User>,
}

impl StaticUserDirectory {
    pub fn new(users: impl IntoIterator<Item = (String, User)>) -> Self {
        Self {
            by_token: users.into_iter().collect(),
        }
    }

    pub fn from_config(users: &[UserConfig]) -> Self {
        Self::new(users.iter().map(|u| (u.token.clone(), u.to_user())))
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn authenticate(&self, token: &str) -> Option<User> {
        self.by_token.get(token).cloned()
    }
}
