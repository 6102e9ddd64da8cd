//! Load and validate runtime configuration.

use anyhow::Context;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerCfg {
    pub bind: String, // e.g. "0.0.0.0:8000"
    pub max_upload_bytes: usize,
}

impl Default for ServerCfg {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CorsCfg {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsCfg {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "https://trade-conversion.vercel.app".to_string(),
                "https://tradeconversion.vercel.app".to_string(),
                "https://trade-converter-new.vercel.app".to_string(),
                "https://conversion-backend-eight.vercel.app".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ConvertCfg {
    pub input_extension: String,  // uploads must end with this, case-sensitive
    pub output_extension: String, // swapped in for the suggested download name
}

impl Default for ConvertCfg {
    fn default() -> Self {
        Self {
            input_extension: ".tlg".to_string(),
            output_extension: ".csv".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerCfg,
    pub cors: CorsCfg,
    pub convert: ConvertCfg,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&s).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Missing file -> defaults. A file that exists but is broken is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// `TLG_BIND` overrides `server.bind`.
    pub fn apply_env(&mut self) {
        self.override_bind(std::env::var("TLG_BIND").ok());
    }

    fn override_bind(&mut self, bind: Option<String>) {
        if let Some(bind) = bind {
            if !bind.trim().is_empty() {
                self.server.bind = bind.trim().to_string();
            }
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.convert.input_extension.starts_with('.') {
            anyhow::bail!(
                "convert.input_extension must start with '.', got {:?}",
                self.convert.input_extension
            );
        }
        if !self.convert.output_extension.starts_with('.') {
            anyhow::bail!(
                "convert.output_extension must start with '.', got {:?}",
                self.convert.output_extension
            );
        }
        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("server.max_upload_bytes must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let cfg = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:8000");
        assert_eq!(cfg.convert.input_extension, ".tlg");
        assert_eq!(cfg.convert.output_extension, ".csv");
        assert!(cfg
            .cors
            .allowed_origins
            .contains(&"http://localhost:3000".to_string()));
    }

    #[test]
    fn partial_yaml_overrides_only_given_keys() {
        let cfg = AppConfig::from_yaml(
            "server:\n  bind: 127.0.0.1:9000\ncors:\n  allowed_origins: [\"https://example.com\"]\n",
        )
        .unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:9000");
        assert_eq!(cfg.server.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(cfg.cors.allowed_origins, vec!["https://example.com"]);
        assert_eq!(cfg.convert.input_extension, ".tlg");
    }

    #[test]
    fn bind_override_replaces_configured_address() {
        let mut cfg = AppConfig::default();
        cfg.override_bind(Some(" 127.0.0.1:9100 ".to_string()));
        assert_eq!(cfg.server.bind, "127.0.0.1:9100");

        cfg.override_bind(Some("   ".to_string()));
        assert_eq!(cfg.server.bind, "127.0.0.1:9100");

        cfg.override_bind(None);
        assert_eq!(cfg.server.bind, "127.0.0.1:9100");
    }

    #[test]
    fn apply_env_reads_tlg_bind() {
        std::env::set_var("TLG_BIND", "127.0.0.1:9200");
        let mut cfg = AppConfig::default();
        cfg.apply_env();
        std::env::remove_var("TLG_BIND");
        assert_eq!(cfg.server.bind, "127.0.0.1:9200");
    }

    #[test]
    fn extension_without_dot_is_rejected() {
        assert!(AppConfig::from_yaml("convert:\n  input_extension: tlg\n").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_or_default(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:8000");
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.yaml");
        fs::write(&p, "server: [not, a, map]").unwrap();
        assert!(AppConfig::load_or_default(&p).is_err());
    }
}
