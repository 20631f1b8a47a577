//! Subprocess launch for hosted tools.
//!
//! The tool runs as an independent child process attached to the host's
//! stdio. The host waits for it and reports its exit code.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use anyhow::Context as _;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::context::ExecutionContext;

#[derive(Clone, Debug, Default)]
pub struct LaunchOptions {
    /// Kill the child if it has not exited after this long.
    pub timeout: Option<Duration>,
    /// Working directory for the child. Inherits the host's when unset.
    pub working_dir: Option<PathBuf>,
}

/// Run the tool with the given arguments and wait for it to exit.
///
/// # Returns
/// The child's exit code. On Unix a child killed by a signal reports
/// `128 + signal`, like a shell does.
pub async fn launch(
    ctx: &ExecutionContext,
    args: &[String],
    options: &LaunchOptions,
) -> anyhow::Result<i32> {
    let mut cmd = Command::new(ctx.executable());
    cmd.args(args);
    cmd.kill_on_drop(true);
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());
    if let Some(dir) = &options.working_dir {
        cmd.current_dir(dir);
    }

    info!(
        tool = %ctx.id(),
        path = %ctx.executable().display(),
        argc = args.len(),
        "Launching hosted tool"
    );
    debug!(tool = %ctx.id(), ?args, "Hosted tool arguments");

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            error!(tool = %ctx.id(), "Failed to spawn hosted tool: {}", e);
            return Err(e)
                .with_context(|| format!("Failed to start {}", ctx.executable().display()));
        }
    };

    let status = match options.timeout {
        Some(limit) => {
            let waited = timeout(limit, child.wait()).await;
            match waited {
                Ok(status) => status,
                Err(_) => {
                    warn!(tool = %ctx.id(), ?limit, "Hosted tool timed out, killing it");
                    child
                        .kill()
                        .await
                        .with_context(|| format!("Failed to kill {}", ctx.id()))?;
                    anyhow::bail!("{} did not exit within {:?}", ctx.id(), limit);
                }
            }
        }
        None => child.wait().await,
    }
    .with_context(|| format!("Failed waiting for {}", ctx.id()))?;

    let code = exit_code(status);
    if code == 0 {
        info!(tool = %ctx.id(), "Hosted tool exited successfully");
    } else {
        warn!(tool = %ctx.id(), code, "Hosted tool exited with non-zero status");
    }
    Ok(code)
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
