use anyhow::{bail, Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// PID file manager with exclusive locking
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    file: File,
}

impl PidFile {
    /// Create and lock a PID file
    ///
    /// Acquires an exclusive lock, recovers from stale PID files left by
    /// a crashed process, and writes the current process id.
    pub fn create(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(Self::default_pid_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create PID file directory: {:?}", parent))?;
        }

        // No .truncate(true): the existing PID must stay readable when the
        // lock fails, so stale processes can be detected. Truncation
        // happens after the lock via set_len(0).
        #[allow(clippy::suspicious_open_options)]
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("Failed to open PID file: {:?}", path))?;

        match file.try_lock_exclusive() {
            Ok(_) => {
                info!("Acquired PID file lock: {:?}", path);
            }
            Err(_) => match Self::read_pid_from_file(&mut file) {
                Ok(old_pid) => {
                    if Self::is_process_running(old_pid) {
                        bail!(
                            "Pricer already running (PID: {}). Use 'pricer stop' first.",
                            old_pid
                        );
                    } else {
                        warn!(
                            "Removing stale PID file (old PID: {} is not running)",
                            old_pid
                        );
                        file.lock_exclusive().with_context(|| {
                            "Failed to acquire lock even after detecting stale PID"
                        })?;
                    }
                }
                Err(e) => {
                    bail!("Failed to read PID from locked file: {}", e);
                }
            },
        }

        let pid = std::process::id();
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(file, "{}", pid)?;
        file.flush()?;

        info!("PID file created with PID: {}", pid);

        Ok(PidFile { path, file })
    }

    /// Read PID from an existing PID file (for stop/reload commands)
    pub fn read(path: Option<PathBuf>) -> Result<u32> {
        let path = path.unwrap_or_else(Self::default_pid_path);

        if !path.exists() {
            bail!("PID file not found: {:?}. Is the pricer running?", path);
        }

        let mut file =
            File::open(&path).with_context(|| format!("Failed to open PID file: {:?}", path))?;

        Self::read_pid_from_file(&mut file)
    }

    fn read_pid_from_file(file: &mut File) -> Result<u32> {
        file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        contents
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Invalid PID in file: '{}'", contents.trim()))
    }

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

    #[cfg(not(unix))]
    fn is_process_running(_pid: u32) -> bool {
        warn!("Process detection not implemented for this platform");
        false
    }

    /// Default PID file path: /var/run if writable, otherwise the current
    /// directory.
    fn default_pid_path() -> PathBuf {
        let system_path = PathBuf::from("/var/run/print-pricer.pid");
        if let Some(parent) = system_path.parent() {
            let probe = parent.join(".write_test");
            if File::create(&probe).is_ok() {
                let _ = std::fs::remove_file(&probe);
                return system_path;
            }
        }
        PathBuf::from("./print-pricer.pid")
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!("Failed to unlock PID file: {}", e);
        }

        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove PID file {:?}: {}", self.path, e);
        } else {
            info!("PID file removed: {:?}", self.path);
        }
    }
}
