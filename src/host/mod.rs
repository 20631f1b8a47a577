//! Hosting of external comparison tools.
//!
//! Each tool is exposed as a function taking a raw command line and
//! returning the tool's exit code. The first call for a tool resolves its
//! executable; later calls reuse that context.

mod context;
mod launcher;
mod registry;
mod tool;


pub use context::ExecutionContext;
pub use launcher::{launch, LaunchOptions};
pub use registry::ToolRegistry;
pub use tool::{ToolId, ToolSpec};

/// Run SQLiteCompare with a raw command line.
pub async fn sqlite_compare(command_line: &str) -> anyhow::Result<i32> {
    ToolRegistry::global()?
        .run(&ToolId::SqliteCompare, command_line)
        .await
}

/// Run ReoGridCompare with a raw command line.
pub async fn reogrid_compare(command_line: &str) -> anyhow::Result<i32> {
    ToolRegistry::global()?
        .run(&ToolId::ReoGridCompare, command_line)
        .await
}
