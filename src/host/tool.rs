//! Tool identifiers and on-disk layout.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies a hosted tool.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ToolId {
    SqliteCompare,
    ReoGridCompare,
    /// A tool only known through configuration.
    Other(String),
}

impl ToolId {
    pub fn as_str(&self) -> &str {
        match self {
            ToolId::SqliteCompare => "SQLiteCompare",
            ToolId::ReoGridCompare => "ReoGridCompare",
            ToolId::Other(name) => name,
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            anyhow::bail!("Tool id cannot be empty");
        }
        if name.eq_ignore_ascii_case("SQLiteCompare") {
            Ok(ToolId::SqliteCompare)
        } else if name.eq_ignore_ascii_case("ReoGridCompare") {
            Ok(ToolId::ReoGridCompare)
        } else {
            Ok(ToolId::Other(name.to_string()))
        }
    }
}

/// Where a tool lives, relative to the host base directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool directory. Relative paths are joined onto the base directory.
    pub dir: PathBuf,
    /// Executable file name. The platform suffix is added when it has no extension.
    pub executable: String,
}

impl ToolSpec {
    /// Built-in layout: `<Name>/bin/<Name>`.
    pub fn builtin(id: &ToolId) -> Option<Self> {
        match id {
            ToolId::SqliteCompare | ToolId::ReoGridCompare => Some(Self {
                dir: Path::new(id.as_str()).join("bin"),
                executable: id.as_str().to_string(),
            }),
            ToolId::Other(_) => None,
        }
    }

    pub fn tool_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.dir)
    }

    pub fn executable_path(&self, base_dir: &Path) -> PathBuf {
        let mut file = PathBuf::from(&self.executable);
        if file.extension().is_none() && !std::env::consts::EXE_EXTENSION.is_empty() {
            file.set_extension(std::env::consts::EXE_EXTENSION);
        }
        self.tool_dir(base_dir).join(file)
    }
}
