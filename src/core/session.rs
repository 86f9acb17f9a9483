use crate::core::{RecommendationService, SubmitOutcome, ViewState};
use crate::utils::error::{EcoError, SERVICE_FAILURE_MESSAGE};
use std::sync::Mutex;
use tokio::sync::watch;

/// Owns the query text and the visible state, and forwards valid
/// submissions to the recommendation service one at a time.
pub struct RecommendationSession<S: RecommendationService> {
    service: S,
    query: Mutex<String>,
    state: watch::Sender<ViewState>,
}

impl<S: RecommendationService> RecommendationSession<S> {
    pub fn new(service: S) -> Self {
        let (state, _) = watch::channel(ViewState::Empty);
        Self {
            service,
            query: Mutex::new(String::new()),
            state,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// 訂閱狀態變化，給畫面層使用
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn query(&self) -> String {
        self.query.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn set_query(&self, text: &str) {
        if let Ok(mut query) = self.query.lock() {
            *query = text.to_string();
        }
    }

    /// Submits `text`. While a request is in flight this is a no-op.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let mut outcome = None;

        // 檢查、切換狀態與寫入查詢字串都在 watch 的寫鎖內完成
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                outcome = Some(SubmitOutcome::Ignored);
                return false;
            }
            self.set_query(text);
            if text.trim().is_empty() {
                *state = ViewState::Error(EcoError::blank_query().user_friendly_message());
                outcome = Some(SubmitOutcome::Rejected);
                return true;
            }
            *state = ViewState::Loading;
            true
        });

        match outcome {
            Some(SubmitOutcome::Ignored) => {
                tracing::debug!("Ignoring submit of '{}' while a request is in flight", text);
                return SubmitOutcome::Ignored;
            }
            Some(other) => {
                tracing::debug!("Rejected blank query");
                return other;
            }
            None => {}
        }

        let guard = LoadingGuard::new(&self.state);
        let (state, outcome) = match self.service.fetch_alternative(text).await {
            Ok(recommendation) => (ViewState::Loaded(recommendation), SubmitOutcome::Loaded),
            Err(e) => {
                tracing::warn!("Recommendation for '{}' failed: {}", text, e);
                (ViewState::Error(e.user_friendly_message()), SubmitOutcome::Failed)
            }
        };
        guard.finish(state);
        outcome
    }
}

/// Leaves `Loading` when a submit future is dropped before the service
/// answers, so later submissions are not ignored forever.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<ViewState>,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<ViewState>) -> Self {
        Self { state, armed: true }
    }

    fn finish(mut self, next: ViewState) {
        self.armed = false;
        self.state.send_replace(next);
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Recommendation request dropped before it finished");
            self.state
                .send_replace(ViewState::Error(SERVICE_FAILURE_MESSAGE.to_string()));
        }
    }
}
