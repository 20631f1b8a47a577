//! compare-host - runs external comparison tools from a single host process
//!
//! Each hosted tool (SQLiteCompare, ReoGridCompare) is exposed as a function
//! that takes one raw command-line string and returns the tool's exit code:
//! - `args` splits the command line into an argument vector
//! - `host` resolves each tool once, caches it, and launches it as a subprocess
//! - `config` locates the tools and sets launch options
//!
//! # Example
//!
//! ```no_run
//! use compare_host::host::sqlite_compare;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let code = sqlite_compare(r#"/t "left file.db" right.db"#).await?;
//!     std::process::exit(code);
//! }
//! ```

pub mod args;
pub mod config;
pub mod host;
pub mod utils;

// Re-export commonly used types
pub use args::{join_args, tokenize};
pub use config::HostConfig;
pub use host::{reogrid_compare, sqlite_compare, ToolId, ToolRegistry};
