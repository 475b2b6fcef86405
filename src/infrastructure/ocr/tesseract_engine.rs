use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;

use crate::application::ports::{OcrEngine, OcrEngineError, OcrEngineLauncher};

pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";
pub const DEFAULT_RECOGNITION_TIMEOUT: Duration = Duration::from_secs(60);

const INPUT_FILE_NAME: &str = "input.img";

/// Starts Tesseract command-line engines, each with a private scratch directory.
pub struct TesseractLauncher {
    binary: PathBuf,
    timeout: Duration,
}

impl TesseractLauncher {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

impl Default for TesseractLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_TESSERACT_BINARY, DEFAULT_RECOGNITION_TIMEOUT)
    }
}

#[async_trait]
impl OcrEngineLauncher for TesseractLauncher {
    async fn launch(&self, languages: &str) -> Result<Box<dyn OcrEngine>, OcrEngineError> {
        if languages.trim().is_empty() {
            return Err(OcrEngineError::InitializationFailed(
                "no recognition language configured".to_string(),
            ));
        }

        // Dropped (and removed) on every early return below.
        let workspace = tempfile::Builder::new()
            .prefix("nural-ocr-")
            .tempdir()
            .map_err(|e| {
                OcrEngineError::InitializationFailed(format!("failed to create workspace: {e}"))
            })?;

        let mut probe = Command::new(&self.binary);
        probe.arg("--version");
        let output = run_with_timeout(probe, self.timeout)
            .await
            .map_err(|reason| {
                OcrEngineError::InitializationFailed(format!(
                    "cannot start {}: {reason}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            return Err(OcrEngineError::InitializationFailed(format!(
                "{} exited with {}",
                self.binary.display(),
                output.status
            )));
        }

        tracing::debug!(
            binary = %self.binary.display(),
            workspace = %workspace.path().display(),
            languages,
            "Tesseract engine started"
        );

        Ok(Box::new(TesseractEngine {
            binary: self.binary.clone(),
            languages: languages.to_string(),
            timeout: self.timeout,
            workspace: Some(workspace),
        }))
    }
}

pub struct TesseractEngine {
    binary: PathBuf,
    languages: String,
    timeout: Duration,
    workspace: Option<TempDir>,
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&mut self, image: &[u8]) -> Result<String, OcrEngineError> {
        let workspace = self.workspace.as_ref().ok_or_else(|| {
            OcrEngineError::RecognitionFailed("engine already terminated".to_string())
        })?;

        let input_path = workspace.path().join(INPUT_FILE_NAME);
        tokio::fs::write(&input_path, image).await.map_err(|e| {
            OcrEngineError::RecognitionFailed(format!("failed to stage image: {e}"))
        })?;

        let mut command = Command::new(&self.binary);
        command
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages);

        let output = run_with_timeout(command, self.timeout)
            .await
            .map_err(OcrEngineError::RecognitionFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("unknown error")
                .trim()
                .to_string();
            return Err(OcrEngineError::RecognitionFailed(format!(
                "exit {}: {reason}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn terminate(&mut self) -> Result<(), OcrEngineError> {
        match self.workspace.take() {
            Some(workspace) => workspace
                .close()
                .map_err(|e| OcrEngineError::TerminationFailed(e.to_string())),
            None => Ok(()),
        }
    }
}

async fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<Output, String> {
    command.kill_on_drop(true);
    tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| format!("timed out after {}s", timeout.as_secs()))?
        .map_err(|e| e.to_string())
}
