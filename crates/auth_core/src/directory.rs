// The user directory answers one question for the login flow: does this
// username/password pair belong to someone, and if so who?

use std::collections::HashMap;

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::{AuthError, Identity};

pub trait UserDirectory: Send + Sync {
    /// Unknown usernames and wrong passwords fail identically.
    fn authenticate(&self, username: &str, password: &Secret<String>)
        -> Result<Identity, AuthError>;
}

#[derive(Deserialize, Clone)]
pub struct DirectoryUser {
    pub username: String,
    pub password: Secret<String>,
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Directory backed by a fixed list of users, usually loaded from configuration.
pub struct StaticDirectory {
    users: HashMap<String, DirectoryUser>,
}

impl StaticDirectory {
    pub fn new(users: impl IntoIterator<Item = DirectoryUser>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }
}

impl UserDirectory for StaticDirectory {
    fn authenticate(
        &self,
        username: &str,
        password: &Secret<String>,
    ) -> Result<Identity, AuthError> {
        let user = self
            .users
            .get(username)
            .filter(|user| user.password.expose_secret() == password.expose_secret())
            .ok_or(AuthError::DirectoryRejected)?;

        Ok(Identity {
            subject_id: user.user_id.clone(),
            display_name: user.display_name.clone(),
            is_admin: user.is_admin,
        })
    }
}
