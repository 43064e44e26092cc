//! Application configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file in the working directory.

use std::path::PathBuf;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default MongoDB connection string.
pub const DEFAULT_MONGO_URI: &str = "mongodb://127.0.0.1:27017/hackmate";

/// Default directory served as the frontend static root.
pub const DEFAULT_STATIC_ROOT: &str = "public";

/// Loads a `.env` file from the working directory or its parents.
///
/// Variables already present in the environment win over the file. A
/// missing file is not an error; an unreadable one is returned so the caller
/// can log it once logging is up.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Runtime configuration shared by a service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Service name used in logs and response metadata.
    pub service_name: String,
    /// Bind address.
    pub host: String,
    /// Listen port (`PORT`).
    pub port: u16,
    /// MongoDB connection string (`MONGO_URI`).
    pub mongo_uri: String,
    /// Frontend static root (`STATIC_ROOT`).
    pub static_root: PathBuf,
}

impl AppConfig {
    /// Loads configuration for the named service from the process
    /// environment.
    pub fn load_with_service(service_name: &str) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, default = DEFAULT_PORT, "invalid PORT, using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            service_name: service_name.to_string(),
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            mongo_uri: non_empty("MONGO_URI").unwrap_or_else(|| DEFAULT_MONGO_URI.to_string()),
            static_root: non_empty("STATIC_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_ROOT)),
        }
    }

    /// Returns the `host:port` listen address.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup("api-server", lookup(&[]));
        assert_eq!(config.port, 5000);
        assert_eq!(config.mongo_uri, "mongodb://127.0.0.1:27017/hackmate");
        assert_eq!(config.static_root, PathBuf::from("public"));
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_lookup(
            "api-server",
            lookup(&[
                ("PORT", "8088"),
                ("MONGO_URI", "mongodb://db:27017/other"),
                ("STATIC_ROOT", "/srv/www"),
            ]),
        );
        assert_eq!(config.port, 8088);
        assert_eq!(config.mongo_uri, "mongodb://db:27017/other");
        assert_eq!(config.static_root, PathBuf::from("/srv/www"));
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = AppConfig::from_lookup("api-server", lookup(&[("PORT", "http")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
