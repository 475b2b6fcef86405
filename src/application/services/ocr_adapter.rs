use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::application::ports::{OcrEngine, OcrEngineError, OcrEngineLauncher};

pub const DEFAULT_OCR_LANGUAGES: &str = "eng";
pub const OCR_ERROR_PREFIX: &str = "[OCR Error]";

/// Text recognition over a throwaway engine: every call launches its own
/// engine and tears it down before returning.
pub struct OcrAdapter {
    launcher: Arc<dyn OcrEngineLauncher>,
    languages: String,
}

impl OcrAdapter {
    pub fn new(launcher: Arc<dyn OcrEngineLauncher>, languages: impl Into<String>) -> Self {
        Self {
            launcher,
            languages: languages.into(),
        }
    }

    pub fn with_default_languages(launcher: Arc<dyn OcrEngineLauncher>) -> Self {
        Self::new(launcher, DEFAULT_OCR_LANGUAGES)
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }

    /// Always yields text. Engine failures (and panics) come back as the
    /// `[OCR Error]` diagnostic string.
    pub async fn recognize(&self, image: &[u8]) -> String {
        self.recognize_guarded(image)
            .await
            .unwrap_or_else(|reason| ocr_error_text(&reason))
    }

    /// Like `recognize`, but keeps the failure reason apart from the text so
    /// callers never have to parse it back out of the diagnostic string.
    pub async fn recognize_guarded(&self, image: &[u8]) -> Result<String, String> {
        match AssertUnwindSafe(self.try_recognize(image))
            .catch_unwind()
            .await
        {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                tracing::error!(error = %e, languages = %self.languages, "OCR failed");
                Err(e.to_string())
            }
            Err(_) => {
                tracing::error!(languages = %self.languages, "OCR engine panicked");
                Err("recognition engine panicked".to_string())
            }
        }
    }

    #[tracing::instrument(skip(self, image), fields(bytes = image.len(), languages = %self.languages))]
    pub async fn try_recognize(&self, image: &[u8]) -> Result<String, OcrEngineError> {
        tracing::debug!(phase = "engine-initializing", "OCR phase transition");
        let engine = self.launcher.launch(&self.languages).await?;
        let mut session = EngineSession::new(engine);

        tracing::debug!(phase = "recognizing", "OCR phase transition");
        let outcome = session.recognize(image).await;

        tracing::debug!(phase = "terminating", "OCR phase transition");
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "Ignoring OCR engine termination failure");
        }
        tracing::debug!(phase = "idle", "OCR phase transition");

        let text = outcome?;
        let text = text.trim().to_string();
        tracing::info!(chars = text.len(), "OCR recognition completed");
        Ok(text)
    }
}

pub fn ocr_error_text(reason: &str) -> String {
    format!("{OCR_ERROR_PREFIX} Could not extract text: {reason}")
}

pub fn is_ocr_error_text(text: &str) -> bool {
    text.starts_with(OCR_ERROR_PREFIX)
}

/// Owns an engine for the length of one call. `close` terminates it
/// gracefully; dropping an unclosed session still drops (and so releases)
/// the engine.
struct EngineSession {
    engine: Option<Box<dyn OcrEngine>>,
}

impl EngineSession {
    fn new(engine: Box<dyn OcrEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    async fn recognize(&mut self, image: &[u8]) -> Result<String, OcrEngineError> {
        match self.engine.as_mut() {
            Some(engine) => engine.recognize(image).await,
            None => Err(OcrEngineError::RecognitionFailed(
                "engine already terminated".to_string(),
            )),
        }
    }

    async fn close(mut self) -> Result<(), OcrEngineError> {
        match self.engine.take() {
            Some(mut engine) => engine.terminate().await,
            None => Ok(()),
        }
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        if self.engine.take().is_some() {
            tracing::warn!("OCR engine released without graceful termination");
        }
    }
}
