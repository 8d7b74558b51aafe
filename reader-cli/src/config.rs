use serde::{Deserialize, Serialize};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs::read_to_string;

use crate::Error;

const CONFIG_DIR: &str = ".reader-menu";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub posts_path: PathBuf,
    pub authenticated: bool,
    pub supports_anchored_popovers: bool,
    pub log_level: String,
    /// Make the simulated follow service fail every request.
    pub fail_follow_requests: bool,
    pub follow_latency_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            posts_path: config_dir().join("posts.json"),
            authenticated: true,
            supports_anchored_popovers: false,
            log_level: "info".to_string(),
            fail_follow_requests: false,
            follow_latency_ms: 250,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        config_dir().join("config.json")
    }

    /// An explicit path must exist; a missing default config just means defaults.
    pub async fn load(path: Option<&Path>) -> Result<Config, Error> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        match read_to_string(&path).await {
            Ok(json) => Config::from_json(&json),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                Ok(Config::default())
            }
            Err(err) => Err(Error::ReadFile(path, err)),
        }
    }

    pub fn from_json(json: &str) -> Result<Config, Error> {
        serde_json::from_str(json).map_err(Error::Config)
    }
}

fn config_dir() -> PathBuf {
    simple_home_dir::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
}
