use async_trait::async_trait;

/// A live recognition engine. One instance serves exactly one recognition pass.
#[async_trait]
pub trait OcrEngine: Send {
    async fn recognize(&mut self, image: &[u8]) -> Result<String, OcrEngineError>;

    /// Releases everything the engine acquired. Implementations must also
    /// release on drop, for paths where `terminate` is never awaited.
    async fn terminate(&mut self) -> Result<(), OcrEngineError>;
}

#[async_trait]
pub trait OcrEngineLauncher: Send + Sync {
    /// Starts a fresh engine. On failure, anything partially acquired has
    /// already been released.
    async fn launch(&self, languages: &str) -> Result<Box<dyn OcrEngine>, OcrEngineError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OcrEngineError {
    #[error("engine initialization failed: {0}")]
    InitializationFailed(String),
    #[error("recognition failed: {0}")]
    RecognitionFailed(String),
    #[error("engine termination failed: {0}")]
    TerminationFailed(String),
}
