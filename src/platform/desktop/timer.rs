use std::time::Duration;

/// Suspends the current task; the desktop shell runs on a tokio runtime.
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}
