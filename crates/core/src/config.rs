use crate::chunking::ChunkingConfig;
use crate::error::ConfigError;
use url::Url;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_SERVICE_KEY: &str = "SUPABASE_SERVICE_KEY";
pub const UPLOAD_PASSWORD: &str = "UPLOAD_PASSWORD";

/// Admin password used when `UPLOAD_PASSWORD` is not set.
pub const DEFAULT_UPLOAD_PASSWORD: &str = "admin123";

/// Secrets as read from the environment or the command line, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawSecrets {
    pub openai_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
    pub upload_password: Option<String>,
}

#[derive(Clone)]
pub struct Secrets {
    pub openai_api_key: String,
    pub supabase_url: Url,
    pub supabase_service_key: String,
    pub upload_password: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("supabase_url", &self.supabase_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RawSecrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            openai_api_key: lookup(OPENAI_API_KEY),
            supabase_url: lookup(SUPABASE_URL),
            supabase_service_key: lookup(SUPABASE_SERVICE_KEY),
            upload_password: lookup(UPLOAD_PASSWORD),
        }
    }
}

impl Secrets {
    /// Validates every required secret. Blank values count as missing.
    pub fn resolve(raw: RawSecrets) -> Result<Self, ConfigError> {
        let openai_api_key = required(raw.openai_api_key, OPENAI_API_KEY)?;
        let supabase_url = required(raw.supabase_url, SUPABASE_URL)?;
        let supabase_url = Url::parse(&supabase_url).map_err(|source| ConfigError::InvalidUrl {
            key: SUPABASE_URL,
            source,
        })?;
        let supabase_service_key = required(raw.supabase_service_key, SUPABASE_SERVICE_KEY)?;
        let upload_password = non_blank(raw.upload_password)
            .unwrap_or_else(|| DEFAULT_UPLOAD_PASSWORD.to_string());

        Ok(Self {
            openai_api_key,
            supabase_url,
            supabase_service_key,
            upload_password,
        })
    }
}

pub fn validate_chunking(config: ChunkingConfig) -> Result<ChunkingConfig, ConfigError> {
    config
        .validate()
        .map_err(|error| ConfigError::InvalidValue {
            key: "chunking",
            details: error.to_string(),
        })?;
    Ok(config)
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    non_blank(value).ok_or(ConfigError::Missing(key))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> RawSecrets {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        RawSecrets::from_lookup(|key| values.get(key).cloned())
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (OPENAI_API_KEY, "sk-test"),
            (SUPABASE_URL, "https://project.supabase.co"),
            (SUPABASE_SERVICE_KEY, "service"),
        ]
    }

    #[test]
    fn complete_secrets_resolve_with_default_password() {
        let secrets = Secrets::resolve(lookup(&complete())).unwrap();
        assert_eq!(secrets.openai_api_key, "sk-test");
        assert_eq!(secrets.supabase_url.host_str(), Some("project.supabase.co"));
        assert_eq!(secrets.upload_password, DEFAULT_UPLOAD_PASSWORD);
    }

    #[test]
    fn configured_password_overrides_default() {
        let mut pairs = complete();
        pairs.push((UPLOAD_PASSWORD, "hunter2"));
        let secrets = Secrets::resolve(lookup(&pairs)).unwrap();
        assert_eq!(secrets.upload_password, "hunter2");
    }

    #[test]
    fn each_missing_secret_is_named() {
        for missing in [OPENAI_API_KEY, SUPABASE_URL, SUPABASE_SERVICE_KEY] {
            let pairs: Vec<_> = complete()
                .into_iter()
                .filter(|(key, _)| *key != missing)
                .collect();
            match Secrets::resolve(lookup(&pairs)) {
                Err(ConfigError::Missing(key)) => assert_eq!(key, missing),
                other => panic!("expected missing {missing}, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let mut pairs = complete();
        pairs[0] = (OPENAI_API_KEY, "   ");
        assert!(matches!(
            Secrets::resolve(lookup(&pairs)),
            Err(ConfigError::Missing(OPENAI_API_KEY))
        ));
    }

    #[test]
    fn malformed_url_is_rejected() {
        let mut pairs = complete();
        pairs[1] = (SUPABASE_URL, "not a url");
        assert!(matches!(
            Secrets::resolve(lookup(&pairs)),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn debug_output_hides_keys() {
        let secrets = Secrets::resolve(lookup(&complete())).unwrap();
        let printed = format!("{secrets:?}");
        assert!(!printed.contains("sk-test"));
        assert!(!printed.contains("service"));
    }

    #[test]
    fn chunking_overlap_must_fit() {
        let invalid = ChunkingConfig {
            chunk_size: 100,
            overlap: 100,
        };
        assert!(matches!(
            validate_chunking(invalid),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(validate_chunking(ChunkingConfig::default()).is_ok());
    }
}
