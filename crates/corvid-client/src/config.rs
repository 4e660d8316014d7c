//! Deployment environment configuration.

use crate::error::{Error, Result};

/// Deployment environments with well-known base URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Staging deployment.
    Staging,
    /// Production deployment.
    Production,
}

impl Environment {
    /// The base URL for this environment.
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Staging => "https://staging-api.corvid.dev",
            Environment::Production => "https://api.corvid.dev",
        }
    }
}

/// Resolve the base URL from builder inputs. An explicit URL wins over the
/// environment; one of the two must be given.
pub(crate) fn resolve_base_url(
    environment: Option<Environment>,
    base_url: Option<&str>,
) -> Result<String> {
    if let Some(base_url) = base_url {
        return Ok(base_url.to_string());
    }

    match environment {
        Some(environment) => Ok(environment.base_url().to_string()),
        None => Err(Error::Config(
            "either a `base_url` or an `environment` must be given".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_base_url_wins() {
        let url = resolve_base_url(Some(Environment::Production), Some("http://localhost:9999"));
        assert_eq!(url.unwrap(), "http://localhost:9999");
    }

    #[test]
    fn environment_resolves_to_known_url() {
        let url = resolve_base_url(Some(Environment::Staging), None);
        assert_eq!(url.unwrap(), "https://staging-api.corvid.dev");
    }

    #[test]
    fn neither_given_is_a_config_error() {
        let result = resolve_base_url(None, None);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
