use auth_core::Credential;
use chrono::{DateTime, Utc};
use unicode_segmentation::UnicodeSegmentation;

const MAX_USERNAME_GRAPHEMES: usize = 256;

#[derive(Debug)]
pub struct Username(String);

impl Username {
    pub fn parse(s: String) -> Result<Username, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let is_too_long = s.graphemes(true).count() > MAX_USERNAME_GRAPHEMES;
        let contains_control_characters = s.chars().any(char::is_control);

        if is_empty_or_whitespace || is_too_long || contains_control_characters {
            Err(format!("{:?} is not a valid username.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Credential as returned to clients on login and introspection.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenResponse {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&Credential> for TokenResponse {
    fn from(credential: &Credential) -> Self {
        Self {
            value: credential.value().to_owned(),
            expires_at: credential.expires_at(),
        }
    }
}
