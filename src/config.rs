//! Host configuration.
//!
//! Configuration is optional. Without a file, tools are looked up next to the
//! running executable using the built-in layout. A JSON file can move the base
//! directory, set a timeout, or override where individual tools live.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::host::ToolSpec;

/// Environment variable naming a config file to load.
pub const CONFIG_ENV: &str = "COMPARE_HOST_CONFIG";
/// Environment variable overriding `base_dir`.
pub const BASE_DIR_ENV: &str = "COMPARE_HOST_BASE_DIR";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directory the tool directories are resolved against.
    /// Defaults to the directory of the running executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Kill a hosted tool that runs longer than this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Run each tool with its own directory as the working directory.
    pub chdir_to_tool: bool,
    /// Per-tool overrides, keyed by tool id (case-insensitive).
    #[serde(
        skip_serializing_if = "HashMap::is_empty",
        deserialize_with = "tools_without_case_duplicates"
    )]
    pub tools: HashMap<String, ToolSpec>,
}

/// Tool keys are matched ignoring case, so two keys differing only in case
/// would make the lookup ambiguous.
fn tools_without_case_duplicates<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, ToolSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let tools = HashMap::<String, ToolSpec>::deserialize(deserializer)?;
    let mut seen = HashSet::new();
    let mut keys: Vec<&String> = tools.keys().collect();
    keys.sort();
    for key in keys {
        if !seen.insert(key.to_ascii_lowercase()) {
            return Err(serde::de::Error::custom(format!(
                "duplicate tool entry '{}' (tool ids ignore case)",
                key
            )));
        }
    }
    Ok(tools)
}

impl HostConfig {
    /// Parse a config from JSON text.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: HostConfig = serde_json::from_str(raw).context("Invalid host config JSON")?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid config at {}", path.display()))
    }

    /// Load the config named by `COMPARE_HOST_CONFIG` (or the defaults when
    /// unset), then apply `COMPARE_HOST_BASE_DIR`.
    pub fn load_default() -> anyhow::Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides on top of whatever was loaded.
    pub fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os(BASE_DIR_ENV).filter(|d| !d.is_empty()) {
            self.base_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The directory tool directories are resolved against.
    pub fn resolved_base_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.base_dir {
            return Ok(dir.clone());
        }
        let exe = std::env::current_exe().context("Failed to locate the running executable")?;
        exe.parent()
            .map(Path::to_path_buf)
            .with_context(|| format!("Executable has no parent directory: {}", exe.display()))
    }

    /// Look up a per-tool override by id, ignoring case.
    pub fn tool_override(&self, id: &str) -> Option<&ToolSpec> {
        self.tools
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(id))
            .map(|(_, spec)| spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = HostConfig::from_json("{}").unwrap();
        assert_eq!(config, HostConfig::default());
        assert!(config.timeout().is_none());
        assert!(!config.chdir_to_tool);
    }

    #[test]
    fn test_full_json() {
        let raw = r#"{
            "base_dir": "/opt/merge",
            "timeout_secs": 30,
            "chdir_to_tool": true,
            "tools": {
                "sqlitecompare": { "dir": "tools/sqlite", "executable": "sqlc" }
            }
        }"#;
        let config = HostConfig::from_json(raw).unwrap();

        assert_eq!(config.base_dir, Some(PathBuf::from("/opt/merge")));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.chdir_to_tool);

        let spec = config.tool_override("SQLiteCompare").unwrap();
        assert_eq!(spec.dir, PathBuf::from("tools/sqlite"));
        assert_eq!(spec.executable, "sqlc");
        assert!(config.tool_override("ReoGridCompare").is_none());
    }

    #[test]
    fn test_case_duplicate_tool_keys_are_rejected() {
        let raw = r#"{
            "tools": {
                "SQLiteCompare": { "dir": "a", "executable": "a" },
                "sqlitecompare": { "dir": "b", "executable": "b" }
            }
        }"#;
        let err = HostConfig::from_json(raw).unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate tool entry"));
    }

    #[test]
    fn test_serialized_config_loads_back() {
        let mut config = HostConfig {
            base_dir: Some(PathBuf::from("/opt/merge")),
            timeout_secs: Some(120),
            chdir_to_tool: true,
            ..HostConfig::default()
        };
        config.tools.insert(
            "ReoGridCompare".into(),
            ToolSpec {
                dir: PathBuf::from("grid"),
                executable: "reogrid".into(),
            },
        );

        let raw = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(HostConfig::from_json(&raw).unwrap(), config);

        // Unset options are left out entirely
        let raw = serde_json::to_string(&HostConfig::default()).unwrap();
        assert_eq!(raw, r#"{"chdir_to_tool":false}"#);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(HostConfig::from_json("{ not json").is_err());
        assert!(HostConfig::from_json(r#"{"timeout_secs": "soon"}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_dir": "/srv/tools"}}"#).unwrap();

        let config = HostConfig::load(file.path()).unwrap();
        assert_eq!(config.resolved_base_dir().unwrap(), PathBuf::from("/srv/tools"));
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = HostConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_default_base_dir_is_exe_dir() {
        let config = HostConfig::default();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(config.resolved_base_dir().unwrap(), exe.parent().unwrap());
    }
}
