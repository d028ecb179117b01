use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub const BANNER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerMessage {
    pub kind: BannerKind,
    pub text: String,
}

#[derive(Debug, Default)]
struct BannerState {
    generation: u64,
    current: Option<BannerMessage>,
}

/// Status line under the form. Every message clears itself after the timeout
/// unless a newer message replaced it first.
#[derive(Debug, Clone)]
pub struct Banner {
    state: Arc<Mutex<BannerState>>,
    clear_after: Duration,
}

impl Banner {
    pub fn new() -> Self {
        Self::with_timeout(BANNER_TIMEOUT)
    }

    pub fn with_timeout(clear_after: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(BannerState::default())),
            clear_after,
        }
    }

    /// Shows a message and schedules its removal. Must be called inside a tokio runtime.
    pub fn show(&self, kind: BannerKind, text: impl Into<String>) {
        let message = BannerMessage {
            kind,
            text: text.into(),
        };

        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.current = Some(message);
            state.generation
        };

        let state = Arc::clone(&self.state);
        let clear_after = self.clear_after;
        tokio::spawn(async move {
            tokio::time::sleep(clear_after).await;
            let mut state = lock(&state);
            // 期間若有新訊息則保留新訊息
            if state.generation == generation {
                state.current = None;
            }
        });
    }

    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        state.current = None;
    }

    pub fn current(&self) -> Option<BannerMessage> {
        lock(&self.state).current.clone()
    }
}

// 狀態只有兩個欄位且每次都整體覆寫，panic 後仍可安全沿用
fn lock(state: &Mutex<BannerState>) -> MutexGuard<'_, BannerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for Banner {
    fn default() -> Self {
        Self::new()
    }
}
