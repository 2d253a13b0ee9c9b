use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_LOG_FILTER: &str = "ratjot=info";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base address of the note store, without a trailing slash.
    pub api_url: String,
    pub log_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Reads `RATJOT_API_URL`, `RATJOT_LOG` and `RUST_LOG`.
    pub fn from_env() -> Config {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = set("RATJOT_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let log_path = set("RATJOT_LOG").map(PathBuf::from).unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("ratjot")
                .join("ratjot.log")
        });

        Config {
            api_url,
            log_path,
            log_filter: set("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn falls_back_to_local_store() {
        let config = config(&[]);
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.log_filter, "ratjot=info");
        assert!(config.log_path.ends_with("ratjot/ratjot.log"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config(&[("RATJOT_API_URL", "  "), ("RUST_LOG", "")]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("RATJOT_API_URL", "https://notes.example.com/api/"),
            ("RATJOT_LOG", "/tmp/jot.log"),
            ("RUST_LOG", "debug"),
        ]);
        assert_eq!(config.api_url, "https://notes.example.com/api");
        assert_eq!(config.log_path, PathBuf::from("/tmp/jot.log"));
        assert_eq!(config.log_filter, "debug");
    }
}
