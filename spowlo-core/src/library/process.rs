//! Running the download library as a subprocess.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::request::{SpotDlRequest, SpotDlResponse};

/// Maximum characters kept from each output stream.
const MAX_OUTPUT_CHARS: usize = 50_000;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Failed to start {executable}: {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Library timed out after {0:?}")]
    Timeout(Duration),
    #[error("Library exited with code {exit_code}: {message}")]
    Failed { exit_code: i32, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The external download library.
#[async_trait]
pub trait DownloadLibrary: Send + Sync {
    async fn execute(&self, request: &SpotDlRequest) -> Result<SpotDlResponse, LibraryError>;
}

/// Ask the library for its version string.
pub async fn library_version(library: &dyn DownloadLibrary) -> Result<String, LibraryError> {
    let mut request = SpotDlRequest::new();
    request.add_option("-v");
    let response = library.execute(&request).await?;
    Ok(response.output)
}

/// Runs a library executable found on `PATH` or at a configured location.
#[derive(Debug, Clone)]
pub struct ProcessLibrary {
    executable: PathBuf,
    timeout: Duration,
}

impl ProcessLibrary {
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    pub fn executable(&self) -> &PathBuf {
        &self.executable
    }
}

#[async_trait]
impl DownloadLibrary for ProcessLibrary {
    async fn execute(&self, request: &SpotDlRequest) -> Result<SpotDlResponse, LibraryError> {
        let args = request.build_args();
        info!(
            executable = %self.executable.display(),
            args = ?args,
            timeout = ?self.timeout,
            "Running library"
        );

        let mut cmd = Command::new(&self.executable);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .env("NO_COLOR", "1")
            .env("TERM", "dumb");

        let started = Instant::now();
        let child = cmd.spawn().map_err(|source| LibraryError::Spawn {
            executable: self.executable.display().to_string(),
            source,
        })?;

        // Dropping the future on timeout kills the child.
        let finished = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(timeout = ?self.timeout, "Library timed out");
                return Err(LibraryError::Timeout(self.timeout));
            }
        };

        let exit_code = finished.status.code().unwrap_or(-1);
        let elapsed = started.elapsed();
        debug!(exit_code, elapsed_ms = elapsed.as_millis() as u64, "Library finished");

        let output = truncate(String::from_utf8_lossy(&finished.stdout).trim());
        let error_output = truncate(String::from_utf8_lossy(&finished.stderr).trim());

        if exit_code != 0 {
            let message = if error_output.is_empty() {
                output
            } else {
                error_output
            };
            return Err(LibraryError::Failed { exit_code, message });
        }

        Ok(SpotDlResponse {
            output,
            error_output,
            exit_code,
            elapsed,
        })
    }
}

fn truncate(text: &str) -> String {
    if text.len() <= MAX_OUTPUT_CHARS {
        return text.to_string();
    }
    let mut end = MAX_OUTPUT_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n\n[OUTPUT TRUNCATED]", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(MAX_OUTPUT_CHARS);
        let truncated = truncate(&long);
        assert!(truncated.ends_with("[OUTPUT TRUNCATED]"));
        assert_eq!(truncate("short"), "short");
    }

    #[tokio::test]
    async fn test_missing_executable_is_spawn_error() {
        let library = ProcessLibrary::new(
            "/nonexistent/spotdl-binary-for-tests",
            Duration::from_secs(5),
        );
        let err = library_version(&library).await.unwrap_err();
        assert!(matches!(err, LibraryError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_captures_output() {
        let library = ProcessLibrary::new("sh", Duration::from_secs(10));
        let mut request = SpotDlRequest::new();
        request.add_option_value("-c", "echo 4.2.5");

        let response = library.execute(&request).await.unwrap();

        assert_eq!(response.output, "4.2.5");
        assert_eq!(response.exit_code, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_reports_stderr() {
        let library = ProcessLibrary::new("sh", Duration::from_secs(10));
        let mut request = SpotDlRequest::new();
        request.add_option_value("-c", "echo broken >&2; exit 3");

        let err = library.execute(&request).await.unwrap_err();

        match err {
            LibraryError::Failed { exit_code, message } => {
                assert_eq!(exit_code, 3);
                assert_eq!(message, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let library = ProcessLibrary::new("sh", Duration::from_millis(100));
        let mut request = SpotDlRequest::new();
        request.add_option_value("-c", "sleep 5");

        let err = library.execute(&request).await.unwrap_err();

        assert!(matches!(err, LibraryError::Timeout(_)));
    }
}
