use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use nural_extractor::application::ports::ExtractionError;
use nural_extractor::domain::FormatFamily;
use nural_extractor::infrastructure::text_processing::parse_on_blocking_pool;

#[tokio::test]
async fn given_fast_parser_when_parsing_on_blocking_pool_then_returns_its_result() {
    let result = parse_on_blocking_pool(FormatFamily::PlainText, Duration::from_secs(5), || {
        Ok::<_, ExtractionError>(42)
    })
    .await;

    assert_eq!(result.unwrap(), 42);
}

#[tokio::test]
async fn given_slow_parser_when_timeout_fires_then_timed_out_and_parser_still_finishes() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();

    let result = parse_on_blocking_pool(FormatFamily::Pdf, Duration::from_millis(20), move || {
        std::thread::sleep(Duration::from_millis(150));
        flag.store(true, Ordering::SeqCst);
        Ok::<_, ExtractionError>(())
    })
    .await;

    assert!(matches!(
        result,
        Err(ExtractionError::TimedOut {
            format: FormatFamily::Pdf,
            ..
        })
    ));
    assert!(!finished.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(finished.load(Ordering::SeqCst));
}
