use std::{path::Path, sync::Arc};

use anyhow::Context;
use auth_core::{
    Authority, AuthorityKind, DirectoryUser, OpaqueTokenAuthority, SignedClaimsAuthority,
    StaticDirectory,
};
use chrono::{Duration, Utc};
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub authority: AuthoritySettings,
    pub directory: DirectorySettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub base_url: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct AuthoritySettings {
    pub kind: AuthorityKind,
    pub hmac_secret: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub opaque_ttl_seconds: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub signed_ttl_seconds: i64,
}

impl AuthoritySettings {
    pub fn build(&self) -> Result<Arc<dyn Authority>, anyhow::Error> {
        let authority: Arc<dyn Authority> = match self.kind {
            AuthorityKind::Opaque => Arc::new(OpaqueTokenAuthority::new(ttl(
                self.opaque_ttl_seconds,
            )?)),
            AuthorityKind::Signed => Arc::new(SignedClaimsAuthority::new(
                &self.hmac_secret,
                ttl(self.signed_ttl_seconds)?,
            )),
        };
        Ok(authority)
    }
}

fn ttl(seconds: i64) -> Result<Duration, anyhow::Error> {
    anyhow::ensure!(seconds > 0, "credential lifetime must be positive, got {seconds}s");
    let ttl = Duration::try_seconds(seconds).context("credential lifetime out of range")?;
    anyhow::ensure!(
        Utc::now().checked_add_signed(ttl).is_some(),
        "credential lifetime of {seconds}s runs past the representable calendar"
    );
    Ok(ttl)
}

#[derive(serde::Deserialize, Clone)]
pub struct DirectorySettings {
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
}

impl DirectorySettings {
    pub fn build(&self) -> StaticDirectory {
        StaticDirectory::new(self.users.iter().cloned())
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let base_path = Path::new(manifest_dir);
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and
        // '__' as separator)
        // E.g. `APP_AUTHORITY__KIND=signed` would set `Settings.authority.kind`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
            Use either `local` or `production`.",
                other
            )),
        }
    }
}
