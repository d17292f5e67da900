use std::sync::{Arc, Mutex};

use exam_core::model::{ClientSession, LayoutKind, PaperId};
use services::AttemptLoopService;

pub trait UiApp: Send + Sync {
    fn attempt_loop(&self) -> Arc<AttemptLoopService>;
    fn client_session(&self) -> ClientSession;
    fn default_paper_id(&self) -> Option<PaperId>;
}

#[derive(Clone)]
pub struct AppContext {
    attempt_loop: Arc<AttemptLoopService>,
    session: ClientSession,
    default_paper_id: Option<PaperId>,
    flash: Arc<Mutex<Option<String>>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            attempt_loop: app.attempt_loop(),
            session: app.client_session(),
            default_paper_id: app.default_paper_id(),
            flash: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn attempt_loop(&self) -> Arc<AttemptLoopService> {
        Arc::clone(&self.attempt_loop)
    }

    #[must_use]
    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    #[must_use]
    pub fn layout(&self) -> LayoutKind {
        self.session.plan().layout()
    }

    #[must_use]
    pub fn default_paper_id(&self) -> Option<&PaperId> {
        self.default_paper_id.as_ref()
    }

    /// Queue a message for the next page that calls `take_flash`.
    pub fn set_flash(&self, message: impl Into<String>) {
        if let Ok(mut guard) = self.flash.lock() {
            *guard = Some(message.into());
        }
    }

    /// One-shot: returns the queued message and clears it.
    #[must_use]
    pub fn take_flash(&self) -> Option<String> {
        self.flash.lock().ok().and_then(|mut guard| guard.take())
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
