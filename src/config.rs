use crate::basic::FetchRequest;
use crate::error::ConfigError;
use std::path::PathBuf;

pub const BUCKET_VAR: &str = "IONOS_BUCKET";
pub const FILE_KEY_VAR: &str = "IONOS_FILE_KEY";
pub const ACCESS_KEY_VAR: &str = "IONOS_ACCESS_KEY";
pub const SECRET_KEY_VAR: &str = "IONOS_SECRET_KEY";
pub const ENDPOINT_VAR: &str = "IONOS_ENDPOINT";

/// Where the fetched file lands, relative to the working directory.
pub const DEFAULT_DEST: &str = "frontend/.env.development";

/// The required connection settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub bucket: String,
    pub file_key: String,
    pub access_key: String,
    pub secret_key: String,
    pub endpoint: String,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        Ok(Self {
            bucket: require(BUCKET_VAR)?,
            file_key: require(FILE_KEY_VAR)?,
            access_key: require(ACCESS_KEY_VAR)?,
            secret_key: require(SECRET_KEY_VAR)?,
            endpoint: require(ENDPOINT_VAR)?,
        })
    }

    pub fn into_request(self, dest: impl Into<PathBuf>) -> FetchRequest {
        FetchRequest {
            bucket: self.bucket,
            key: self.file_key,
            dest: dest.into(),
            access_key: self.access_key,
            secret_key: self.secret_key,
            endpoint: self.endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (BUCKET_VAR, "configs".to_string()),
            (FILE_KEY_VAR, "dev/.env".to_string()),
            (ACCESS_KEY_VAR, "AKIA".to_string()),
            (SECRET_KEY_VAR, "secret".to_string()),
            (ENDPOINT_VAR, "https://s3.eu-central-1.ionoscloud.com".to_string()),
        ])
    }

    #[test]
    fn test_from_lookup() {
        let env = full_env();
        let config = EnvConfig::from_lookup(|name| env.get(name).cloned()).unwrap();
        assert_eq!(config.bucket, "configs");
        assert_eq!(config.file_key, "dev/.env");
        let request = config.into_request(DEFAULT_DEST);
        assert_eq!(request.key, "dev/.env");
        assert_eq!(request.dest, PathBuf::from("frontend/.env.development"));
        assert_eq!(request.endpoint, "https://s3.eu-central-1.ionoscloud.com");
    }

    #[test]
    fn test_each_missing_var_is_reported() {
        for name in [BUCKET_VAR, FILE_KEY_VAR, ACCESS_KEY_VAR, SECRET_KEY_VAR, ENDPOINT_VAR] {
            let mut env = full_env();
            env.remove(name);
            let result = EnvConfig::from_lookup(|n| env.get(n).cloned());
            assert_eq!(result, Err(ConfigError::Missing(name)));
        }
    }

    #[test]
    fn test_empty_var_is_missing() {
        let mut env = full_env();
        env.insert(SECRET_KEY_VAR, String::new());
        let result = EnvConfig::from_lookup(|n| env.get(n).cloned());
        assert_eq!(result, Err(ConfigError::Missing(SECRET_KEY_VAR)));
    }
}
