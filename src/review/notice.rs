use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const SUCCESS_MESSAGE: &str = "Review submitted successfully!";
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Transient notice that hides itself after a fixed window.
///
/// The hide timer belongs to the notice: dropping it aborts the timer, so
/// nothing fires after the owning form is gone.
#[derive(Debug)]
pub struct NoticeTimer {
    message: &'static str,
    visible: Arc<AtomicBool>,
    timer: JoinHandle<()>,
}

impl NoticeTimer {
    /// Show `message` now and schedule it to hide after `duration`. Needs a tokio runtime.
    pub fn show(message: &'static str, duration: Duration) -> Self {
        let visible = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&visible);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            flag.store(false, Ordering::Release);
        });
        Self { message, visible, timer }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }
}

impl Drop for NoticeTimer {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
