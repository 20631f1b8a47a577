//! Execution context of a hosted tool.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing::info;

use super::tool::{ToolId, ToolSpec};
use crate::config::HostConfig;

/// A resolved, ready-to-launch tool. Built once per tool and shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    id: ToolId,
    base_dir: PathBuf,
    executable: PathBuf,
}

impl ExecutionContext {
    /// Resolve a tool against the configuration and check that its executable exists.
    pub async fn resolve(id: &ToolId, config: &HostConfig) -> anyhow::Result<Self> {
        let spec = config
            .tool_override(id.as_str())
            .cloned()
            .or_else(|| ToolSpec::builtin(id))
            .with_context(|| format!("Unknown tool '{}': no built-in layout and no config entry", id))?;

        let base = config.resolved_base_dir()?;
        let base_dir = spec.tool_dir(&base);
        let executable = spec.executable_path(&base);

        let meta = tokio::fs::metadata(&executable)
            .await
            .with_context(|| format!("{} executable not found at {}", id, executable.display()))?;
        if !meta.is_file() {
            anyhow::bail!("{} executable is not a file: {}", id, executable.display());
        }

        info!(tool = %id, path = %executable.display(), "Initialized execution context");

        Ok(Self {
            id: id.clone(),
            base_dir,
            executable,
        })
    }

    pub fn id(&self) -> &ToolId {
        &self.id
    }

    /// Directory holding the tool.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}
