//! Config file loading.
//!
//! ```json
//! {
//!   "rpc_url": "https://eth.llamarpc.com",
//!   "multicall": { "max_concurrent_calls": 4 },
//!   "http": { "request_timeout_ms": 60000, "retry": { "max_retries": 5 } },
//!   "log": { "level": "info", "components": { "chaincall-batch": "debug" } }
//! }
//! ```
//!
//! Every section is optional. Command-line flags and `CHAINCALL_RPC_URL`
//! override values from the file.

use anyhow::{Context, Result};
use chaincall_core::MulticallConfig;
use chaincall_rpc::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::logging::LogConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub multicall: MulticallConfig,
    #[serde(default)]
    pub http: HttpClientConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl FileConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing config JSON")
    }

    /// Read `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaincall_core::Concurrency;

    #[test]
    fn empty_object_is_all_defaults() {
        assert_eq!(FileConfig::from_json("{}").unwrap(), FileConfig::default());
    }

    #[test]
    fn sections_parse() {
        let cfg = FileConfig::from_json(
            r#"{
                "rpc_url": "http://localhost:8545",
                "multicall": { "max_concurrent_calls": 4 },
                "http": { "request_timeout_ms": 1000 },
                "log": { "level": "debug", "json": true }
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert!(matches!(
            cfg.multicall.concurrency(),
            Concurrency::Limited(n) if n.get() == 4
        ));
        assert_eq!(cfg.http.request_timeout_ms, 1000);
        assert_eq!(cfg.http.retry.max_retries, 3);
        assert!(cfg.log.json);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = FileConfig::load(Some(Path::new("/nonexistent/chaincall.json"))).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(FileConfig::from_json(r#"{"multicall": {"max_concurrent_calls": "many"}}"#).is_err());
    }
}
