//! Main entry point for compare-host.
//!
//! Runs one hosted tool with the given command line and exits with the tool's
//! exit code. Exits with 1 if the tool could not be started.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use compare_host::args::quote_arg;
use compare_host::host::{reogrid_compare, sqlite_compare};
use compare_host::utils;
use compare_host::{join_args, tokenize, HostConfig, ToolId, ToolRegistry};

#[derive(Parser, Debug)]
#[command(version, about = "Run a hosted comparison tool and return its exit code")]
struct Cli {
    /// JSON config file. Defaults to $COMPARE_HOST_CONFIG when set.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory the tool directories are resolved against.
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Kill the tool if it runs longer than this.
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Run the tool from its own directory.
    #[arg(long)]
    chdir_to_tool: bool,

    /// Pass this raw command line to the tool instead of the trailing arguments.
    #[arg(long, value_name = "COMMAND_LINE", conflicts_with = "args")]
    line: Option<String>,

    /// Tool to run (SQLiteCompare, ReoGridCompare, or a configured tool).
    #[arg(value_name = "TOOL")]
    tool: ToolId,

    /// Arguments for the tool, each passed through as one argument.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
}

impl Cli {
    fn host_config(&self) -> Result<HostConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = HostConfig::load(path)?;
                config.apply_env();
                config
            }
            None => HostConfig::load_default()?,
        };
        if let Some(dir) = &self.base_dir {
            config.base_dir = Some(dir.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = Some(secs);
        }
        config.chdir_to_tool |= self.chdir_to_tool;
        Ok(config)
    }

    /// The command line handed to the tool.
    ///
    /// Trailing arguments are re-quoted; fails if one of them would not come
    /// back out of the tokenizer as the same single argument.
    fn command_line(&self) -> Result<String> {
        if let Some(line) = &self.line {
            return Ok(line.clone());
        }

        let line = join_args(&self.args);
        if tokenize(&line) != self.args {
            match self
                .args
                .iter()
                .find(|arg| tokenize(&quote_arg(arg)) != [arg.as_str()])
            {
                Some(arg) => bail!(
                    "Argument {:?} cannot be passed through a command line unchanged; use --line to pass the raw command line",
                    arg
                ),
                None => bail!(
                    "Arguments cannot be passed through a command line unchanged; use --line to pass the raw command line"
                ),
            }
        }
        Ok(line)
    }
}

async fn run(cli: &Cli) -> Result<i32> {
    if !ToolRegistry::install_global(cli.host_config()?) {
        tracing::warn!("Tool registry already initialized, command-line options ignored");
    }

    let command_line = cli.command_line()?;
    match &cli.tool {
        ToolId::SqliteCompare => sqlite_compare(&command_line).await,
        ToolId::ReoGridCompare => reogrid_compare(&command_line).await,
        other => ToolRegistry::global()?.run(other, &command_line).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let log_guard = utils::logger::init_logging();

    let code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Failed to run {}: {:#}", cli.tool, e);
            eprintln!("compare-host: {:#}", e);
            1
        }
    };

    // process::exit skips destructors; flush the log writer first
    drop(log_guard);
    std::process::exit(code);
}
