use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use skilltrace_algo::artifacts::{CATALOG_FILE, PREPROCESSOR_FILE, THRESHOLD_FILE};
use skilltrace_algo::ArtifactPaths;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub file_logs: bool,
    pub log_dir: PathBuf,
    pub artifact_dir: PathBuf,
    pub preprocessor_file: String,
    pub catalog_file: String,
    pub threshold_file: String,
    pub eager_load: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8000,
            log_level: "info".to_string(),
            file_logs: false,
            log_dir: PathBuf::from("./logs"),
            artifact_dir: PathBuf::from("./artifacts"),
            preprocessor_file: PREPROCESSOR_FILE.to_string(),
            catalog_file: CATALOG_FILE.to_string(),
            threshold_file: THRESHOLD_FILE.to_string(),
            eager_load: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset, blank or unparsable values keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let flag = |key: &str| non_empty(key).as_deref().and_then(parse_bool);

        let port = non_empty("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let host = non_empty("HOST")
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(defaults.host);

        Self {
            host,
            port,
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
            file_logs: flag("ENABLE_FILE_LOGS").unwrap_or(defaults.file_logs),
            log_dir: non_empty("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            artifact_dir: non_empty("SKILLTRACE_ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),
            preprocessor_file: non_empty("SKILLTRACE_PREPROCESSOR_FILE")
                .unwrap_or(defaults.preprocessor_file),
            catalog_file: non_empty("SKILLTRACE_CATALOG_FILE").unwrap_or(defaults.catalog_file),
            threshold_file: non_empty("SKILLTRACE_THRESHOLD_FILE")
                .unwrap_or(defaults.threshold_file),
            eager_load: flag("SKILLTRACE_EAGER_LOAD").unwrap_or(defaults.eager_load),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            preprocessor: self.artifact_dir.join(&self.preprocessor_file),
            catalog: self.artifact_dir.join(&self.catalog_file),
            threshold: self.artifact_dir.join(&self.threshold_file),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_paths_join_dir_and_file_names() {
        let config = Config {
            artifact_dir: PathBuf::from("/srv/models"),
            catalog_file: "catalog-v2.json".to_string(),
            ..Config::default()
        };
        let paths = config.artifact_paths();
        assert_eq!(paths.catalog, PathBuf::from("/srv/models/catalog-v2.json"));
        assert_eq!(paths.preprocessor, PathBuf::from("/srv/models/preprocessor.json"));
        assert_eq!(paths.threshold, PathBuf::from("/srv/models/threshold.json"));
    }

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn file_logging_settings_come_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("ENABLE_FILE_LOGS", "yes"),
            ("LOG_DIR", "/var/log/skilltrace"),
            ("RUST_LOG", "debug"),
        ]));
        assert!(config.file_logs);
        assert_eq!(config.log_dir, PathBuf::from("/var/log/skilltrace"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn unset_or_garbage_values_keep_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("ENABLE_FILE_LOGS", "maybe"),
            ("LOG_DIR", "   "),
            ("PORT", "not-a-port"),
            ("SKILLTRACE_EAGER_LOAD", "on"),
        ]));
        assert!(!config.file_logs);
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
        assert_eq!(config.port, 8000);
        assert!(config.eager_load);
    }

    #[test]
    fn default_binds_all_interfaces_on_8000() {
        let addr = Config::default().bind_addr();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_unspecified());
    }
}
