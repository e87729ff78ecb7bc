//! Configuration module

use std::{env, path::PathBuf};

use crate::domain::Domain;

#[derive(Debug, Clone)]
pub struct Config {
    /// Root holding one artifact directory per domain
    pub model_dir: PathBuf,

    /// Server port
    pub port: u16,

    /// Debug-log every encoded row and model output
    pub log_pred: bool,

    /// Allow cross-origin requests from any origin
    pub cors_allow_any: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_dir: env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models")),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8800),

            log_pred: env::var("LOG_PRED").ok().as_deref() == Some("1"),

            cors_allow_any: env::var("CORS_ALLOW_ANY")
                .map(|v| !matches!(v.as_str(), "0" | "false"))
                .unwrap_or(true),
        }
    }

    /// Directory with `model.pt` and `meta.json` for `domain`
    pub fn artifact_dir(&self, domain: Domain) -> PathBuf {
        self.model_dir.join(domain.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_dirs() {
        let cfg = Config {
            model_dir: PathBuf::from("/srv/models"),
            port: 8800,
            log_pred: false,
            cors_allow_any: true,
        };
        assert_eq!(
            cfg.artifact_dir(Domain::Explosives),
            PathBuf::from("/srv/models/explosives")
        );
    }
}
