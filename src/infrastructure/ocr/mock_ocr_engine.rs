use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::application::ports::{OcrEngine, OcrEngineError, OcrEngineLauncher};

#[derive(Debug, Clone)]
pub enum MockOcrBehavior {
    Recognize(String),
    FailLaunch(String),
    FailRecognition(String),
    FailTermination(String),
    Panic,
}

#[derive(Default)]
struct EngineCounters {
    launches: AtomicUsize,
    terminations: AtomicUsize,
    live: AtomicUsize,
}

/// Launcher whose engines follow a scripted behavior and report their
/// lifecycle through counters.
pub struct MockOcrLauncher {
    behavior: MockOcrBehavior,
    counters: Arc<EngineCounters>,
}

impl MockOcrLauncher {
    pub fn new(behavior: MockOcrBehavior) -> Self {
        Self {
            behavior,
            counters: Arc::new(EngineCounters::default()),
        }
    }

    pub fn recognizing(text: impl Into<String>) -> Self {
        Self::new(MockOcrBehavior::Recognize(text.into()))
    }

    pub fn launch_count(&self) -> usize {
        self.counters.launches.load(Ordering::SeqCst)
    }

    pub fn termination_count(&self) -> usize {
        self.counters.terminations.load(Ordering::SeqCst)
    }

    pub fn live_engines(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngineLauncher for MockOcrLauncher {
    async fn launch(&self, _languages: &str) -> Result<Box<dyn OcrEngine>, OcrEngineError> {
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        if let MockOcrBehavior::FailLaunch(reason) = &self.behavior {
            return Err(OcrEngineError::InitializationFailed(reason.clone()));
        }
        self.counters.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockOcrEngine {
            behavior: self.behavior.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct MockOcrEngine {
    behavior: MockOcrBehavior,
    counters: Arc<EngineCounters>,
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    async fn recognize(&mut self, _image: &[u8]) -> Result<String, OcrEngineError> {
        match &self.behavior {
            MockOcrBehavior::Recognize(text) | MockOcrBehavior::FailTermination(text) => {
                Ok(text.clone())
            }
            MockOcrBehavior::FailRecognition(reason) => {
                Err(OcrEngineError::RecognitionFailed(reason.clone()))
            }
            MockOcrBehavior::Panic => panic!("mock OCR engine panicked"),
            MockOcrBehavior::FailLaunch(reason) => {
                Err(OcrEngineError::InitializationFailed(reason.clone()))
            }
        }
    }

    async fn terminate(&mut self) -> Result<(), OcrEngineError> {
        self.counters.terminations.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockOcrBehavior::FailTermination(reason) => {
                Err(OcrEngineError::TerminationFailed(reason.clone()))
            }
            _ => Ok(()),
        }
    }
}

impl Drop for MockOcrEngine {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}
