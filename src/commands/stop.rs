use anyhow::{bail, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::info;

use crate::pid::PidFile;

#[cfg(unix)]
use nix::libc;
#[cfg(unix)]
use print_pricer::signals::send_signal_to_pid;
#[cfg(unix)]
use tokio::signal::unix::SignalKind;

/// Execute the stop command
///
/// This will:
/// 1. Read PID from PID file
/// 2. Send SIGTERM to the process
/// 3. Wait for graceful shutdown (with timeout)
/// 4. Optionally force kill with SIGKILL
pub async fn execute(pid_file: Option<PathBuf>, force: bool, timeout: u64) -> Result<()> {
    #[cfg(not(unix))]
    {
        let _ = (pid_file, force, timeout);
        bail!("Stop command is not supported on this platform");
    }

    #[cfg(unix)]
    {
        let pid = PidFile::read(pid_file)?;

        println!(
            "{} {}",
            "Stopping pricer".yellow(),
            format!("(PID: {})", pid).cyan()
        );
        info!("Sending SIGTERM to PID {}", pid);

        send_signal_to_pid(pid, SignalKind::terminate())?;

        println!("  Sent SIGTERM, waiting for graceful shutdown...");

        let start = Instant::now();
        let timeout_duration = Duration::from_secs(timeout);

        while start.elapsed() < timeout_duration {
            if !is_process_running(pid) {
                println!("{}", "  Pricer stopped successfully".green());
                info!("Pricer stopped successfully");
                return Ok(());
            }
            sleep(Duration::from_millis(500)).await;
        }

        if force {
            println!("{}", "  Timeout reached, force killing...".red());
            info!("Force killing PID {}", pid);
            send_signal_to_pid(pid, SignalKind::from_raw(libc::SIGKILL))?;
            sleep(Duration::from_secs(1)).await;

            if !is_process_running(pid) {
                println!("{}", "  Pricer force stopped".yellow());
                Ok(())
            } else {
                bail!("Failed to kill process even with SIGKILL");
            }
        } else {
            bail!(
                "Timeout after {} seconds. Use --force to kill immediately.",
                timeout
            );
        }
    }
}

/// Check if a process is running (Unix-specific)
#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match kill(Pid::from_raw(pid as i32), Signal::SIGCONT) {
        Ok(_) => true,
        Err(nix::errno::Errno::ESRCH) => false, // No such process
        Err(nix::errno::Errno::EPERM) => true,  // Process exists but no permission
        Err(_) => false,
    }
}
