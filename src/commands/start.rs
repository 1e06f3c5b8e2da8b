use anyhow::Result;
use colored::Colorize;
use print_pricer::{config, init_tracing, server};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{daemon, pid::PidFile};

/// Execute the start command
///
/// This will:
/// 1. Optionally daemonize first
/// 2. Load configuration
/// 3. Create PID file
/// 4. Start the server
pub async fn execute(config_path: &Path, daemon_mode: bool, pid_file: Option<PathBuf>) -> Result<()> {
    if daemon_mode {
        #[cfg(target_os = "macos")]
        {
            eprintln!("ERROR: Daemon mode is not supported on macOS.");
            eprintln!();
            eprintln!("Reason: the tokio runtime does not survive fork();");
            eprintln!("the I/O driver file descriptors become invalid in the child.");
            eprintln!();
            eprintln!("Use launchd, or run in foreground mode: ./print-pricer start");
            return Err(anyhow::anyhow!("Daemon mode not supported on macOS"));
        }

        // Plain println before the fork; the child re-initializes tracing.
        println!("Starting pricer in daemon mode...");
        println!("  Logs: ./logs/pricer.{{out,err}}.log");

        daemon::daemonize(daemon::DaemonConfig::default())?;

        // We are the daemonized child; stdout/stderr now point at the logs.
        init_tracing();
    } else {
        println!("{}", "Starting pricer in foreground mode...".green());
    }

    let cfg = config::load_config(config_path)?;

    if daemon_mode {
        info!("Starting print pricer in daemon mode");
    } else {
        info!("Starting print pricer in foreground mode");
    }

    // Create PID file to prevent multiple instances
    let _pid_file = PidFile::create(pid_file)?;

    // Start the server (blocks until shutdown)
    server::start_server(cfg, config_path.to_path_buf()).await?;

    Ok(())
}
