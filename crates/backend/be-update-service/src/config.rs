use omaha_protocol::Indent;

use crate::{
    error::UpdateServiceError,
    types::{ReleaseDescriptor, VersionComparison},
};

#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub release: ReleaseDescriptor,
    /// Layout of the response documents
    pub indent: Indent,
    /// Capture PostHog events for update checks. Only set once the global
    /// PostHog client is initialised.
    pub analytics: bool,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, UpdateServiceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; unset and empty values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UpdateServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let release = ReleaseDescriptor::from_lookup(&var)?;

        let indent = match var("OMAHA_PRETTY_XML") {
            Some(v) if v.eq_ignore_ascii_case("true") => Indent::Spaces(2),
            Some(v) if v.eq_ignore_ascii_case("false") => Indent::None,
            Some(v) => {
                return Err(UpdateServiceError::Config(format!(
                    "OMAHA_PRETTY_XML '{v}' must be 'true' or 'false'"
                )));
            }
            None => Indent::None,
        };

        Ok(Self {
            release,
            indent,
            analytics: false,
        })
    }

    pub fn with_analytics(mut self, enabled: bool) -> Self {
        self.analytics = enabled;
        self
    }
}

impl ReleaseDescriptor {
    pub fn from_env() -> Result<Self, UpdateServiceError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup<F>(var: F) -> Result<Self, UpdateServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ReleaseDescriptor::default();

        let server_name = var("OMAHA_SERVER_NAME").unwrap_or(defaults.server_name);
        let channel = var("OMAHA_CHANNEL").unwrap_or(defaults.channel);

        let channel_base_url = var("OMAHA_CHANNEL_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or(defaults.channel_base_url);
        if !channel_base_url.starts_with("http://") && !channel_base_url.starts_with("https://") {
            return Err(UpdateServiceError::Config(format!(
                "OMAHA_CHANNEL_BASE_URL '{channel_base_url}' must be an http(s) URL"
            )));
        }

        let version = var("OMAHA_RELEASE_VERSION").unwrap_or(defaults.version);

        let mut package = defaults.package;
        if let Some(name) = var("OMAHA_PACKAGE_NAME") {
            package.name = name;
        }
        if let Some(size) = var("OMAHA_PACKAGE_SIZE") {
            package.size = size.trim().parse().map_err(|e| {
                UpdateServiceError::Config(format!(
                    "OMAHA_PACKAGE_SIZE '{size}' is not a byte count: {e}"
                ))
            })?;
        }
        if let Some(hash) = var("OMAHA_PACKAGE_HASH") {
            package.hash = hash;
        }
        if let Some(sha256) = var("OMAHA_PACKAGE_SHA256") {
            package.sha256 = sha256;
        }

        let comparison = match var("OMAHA_VERSION_COMPARISON") {
            Some(v) => v
                .parse::<VersionComparison>()
                .map_err(UpdateServiceError::Config)?,
            None => defaults.comparison,
        };

        Ok(Self {
            server_name,
            channel,
            channel_base_url,
            version,
            package,
            app_id: var("OMAHA_APP_ID"),
            comparison,
        })
    }
}
