//! VFS configuration

use crate::types::VFS_NAME;
use crate::vfs::error::{VfsError, VfsResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where `randomness` takes its bytes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntropySource {
    /// Leave the buffer untouched; the host has no entropy source
    #[default]
    None,
    /// Fill the buffer from the thread-local generator
    ThreadRng,
}

/// Adapter configuration
///
/// Every field has a default matching the host, so an empty JSON object is a valid config.
/// Sector size, path limit and absolute prefixes are host constants and not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VfsConfig {
    /// Name the adapter registers under
    pub name: String,
    pub entropy: EntropySource,
}

impl Default for VfsConfig {
    fn default() -> Self {
        VfsConfig {
            name: VFS_NAME.to_string(),
            entropy: EntropySource::None,
        }
    }
}

impl VfsConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> VfsResult<Self> {
        let config: VfsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> VfsResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|err| {
            VfsError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> VfsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> VfsResult<()> {
        if self.name.is_empty() {
            return Err(VfsError::Config("name must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = VfsConfig::default();
        assert_eq!(config.name, "feos");
        assert_eq!(config.entropy, EntropySource::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = VfsConfig::from_json(r#"{"entropy": "thread_rng"}"#).unwrap();
        assert_eq!(config.entropy, EntropySource::ThreadRng);
        assert_eq!(config.name, "feos");

        assert_eq!(VfsConfig::from_json("{}").unwrap(), VfsConfig::default());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            VfsConfig::from_json("not json"),
            Err(VfsError::Config(_))
        ));
        assert!(matches!(
            VfsConfig::from_json(r#"{"entropy": "hardware"}"#),
            Err(VfsError::Config(_))
        ));
        assert!(matches!(
            VfsConfig::from_json(r#"{"name": ""}"#),
            Err(VfsError::Config(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_host_constants() {
        for json in [
            r#"{"sector_size": 4096}"#,
            r#"{"max_pathname": 64}"#,
            r#"{"absolute_prefixes": ["c:/"]}"#,
        ] {
            assert!(matches!(VfsConfig::from_json(json), Err(VfsError::Config(_))));
        }
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vfs.json");

        let mut config = VfsConfig::default();
        config.name = "feos-sd".to_string();
        fs::write(&path, config.to_json().unwrap()).unwrap();

        assert_eq!(VfsConfig::load(&path).unwrap(), config);
        assert!(VfsConfig::load(temp_dir.path().join("missing.json")).is_err());
    }
}
