//! Lazily initialized execution contexts, one per tool.
//!
//! Nothing is resolved until a tool is first used. Each tool has its own
//! once-cell, so concurrent first calls share a single initialization and
//! different tools never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::context::ExecutionContext;
use super::launcher::{self, LaunchOptions};
use super::tool::ToolId;
use crate::args::tokenize;
use crate::config::HostConfig;

type Slot = Arc<OnceCell<Arc<ExecutionContext>>>;

static GLOBAL: OnceLock<ToolRegistry> = OnceLock::new();

pub struct ToolRegistry {
    config: HostConfig,
    slots: Mutex<HashMap<ToolId, Slot>>,
}

impl ToolRegistry {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry, built from `HostConfig::load_default` on first use
    /// unless one was installed earlier.
    pub fn global() -> anyhow::Result<&'static ToolRegistry> {
        if let Some(registry) = GLOBAL.get() {
            return Ok(registry);
        }
        let config = HostConfig::load_default()?;
        Ok(GLOBAL.get_or_init(|| ToolRegistry::new(config)))
    }

    /// Install the process-wide registry. Returns false if one already exists.
    pub fn install_global(config: HostConfig) -> bool {
        GLOBAL.set(ToolRegistry::new(config)).is_ok()
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    fn slot(&self, id: &ToolId) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(id.clone()).or_default())
    }

    /// Get the tool's context, initializing it on first use.
    ///
    /// A failed initialization is not cached; the next call retries.
    pub async fn context(&self, id: &ToolId) -> anyhow::Result<Arc<ExecutionContext>> {
        let slot = self.slot(id);
        let result = slot
            .get_or_try_init(|| async {
                debug!(tool = %id, "Initializing execution context");
                ExecutionContext::resolve(id, &self.config).await.map(Arc::new)
            })
            .await
            .map(Arc::clone);
        if result.is_err() {
            self.discard_empty_slot(id, &slot);
        }
        result
    }

    /// Forget a slot whose initialization failed, unless it was replaced or
    /// filled by another caller in the meantime.
    fn discard_empty_slot(&self, id: &ToolId, slot: &Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let stale = slots
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if stale {
            slots.remove(id);
        }
    }

    #[cfg(test)]
    pub(super) fn slot_count(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_initialized(&self, id: &ToolId) -> bool {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(id).is_some_and(|slot| slot.initialized())
    }

    /// Tools with a live context, sorted by name.
    pub fn initialized(&self) -> Vec<ToolId> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<ToolId> = slots
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    /// Drop a tool's context. The next use initializes it again.
    ///
    /// Returns true if a live context was dropped.
    pub fn unload(&self, id: &ToolId) -> bool {
        let removed = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.remove(id)
        };
        let was_live = removed.is_some_and(|slot| slot.initialized());
        if was_live {
            info!(tool = %id, "Unloaded execution context");
        }
        was_live
    }

    fn launch_options(&self, ctx: &ExecutionContext) -> LaunchOptions {
        LaunchOptions {
            timeout: self.config.timeout(),
            working_dir: self
                .config
                .chdir_to_tool
                .then(|| ctx.base_dir().to_path_buf()),
        }
    }

    /// Run a tool with a raw command line and return its exit code.
    pub async fn run(&self, id: &ToolId, command_line: &str) -> anyhow::Result<i32> {
        let args = tokenize(command_line);
        let ctx = self.context(id).await?;
        let options = self.launch_options(&ctx);
        launcher::launch(&ctx, &args, &options).await
    }
}
