use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::{NoOpMutations, ScopeId};
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use exam_core::Countdown;
use exam_core::model::{
    ClientSession, ClientSessionDraft, Paper, PaperId, Question, QuestionId, QuestionOutcome,
    SubmissionDraft, SubmitResult,
};
use services::{ApiError, AttemptLoopService, ExamApi};

use crate::context::{AppContext, UiApp, build_app_context};
use crate::views::attempt::AttemptTestHandles;
use crate::views::{AttemptView, HomeView};

pub const PAPER_ID: &str = "mock-paper";

/// Backend stand-in: serves a fixed paper and grades every answer "A" as correct.
pub struct FakeExamApi {
    questions: Vec<(u64, &'static str)>,
    fetch_fails: bool,
    fail_submit: AtomicBool,
    submissions: Mutex<Vec<SubmissionDraft>>,
}

impl FakeExamApi {
    pub fn new(questions: Vec<(u64, &'static str)>) -> Self {
        Self {
            questions,
            fetch_fails: false,
            fail_submit: AtomicBool::new(false),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_fetch() -> Self {
        Self {
            fetch_fails: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn set_fail_submit(&self, fail: bool) {
        self.fail_submit.store(fail, Ordering::SeqCst);
    }

    pub fn submissions(&self) -> Vec<SubmissionDraft> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExamApi for FakeExamApi {
    async fn fetch_paper(&self, paper_id: &PaperId) -> Result<Paper, ApiError> {
        if self.fetch_fails {
            return Err(ApiError::NotFound);
        }
        let questions = self
            .questions
            .iter()
            .map(|(id, text)| {
                Question::new(
                    QuestionId::new(*id),
                    *text,
                    [("A", "Alpha"), ("B", "Beta"), ("C", "Gamma")],
                    4.0,
                )
                .unwrap()
            })
            .collect();
        Ok(Paper::new(
            paper_id.clone(),
            "Mock Physics",
            Some("Units and measurement".to_string()),
            questions,
        )
        .unwrap())
    }

    async fn submit_answers(&self, draft: &SubmissionDraft) -> Result<SubmitResult, ApiError> {
        self.submissions.lock().unwrap().push(draft.clone());
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ApiError::InvalidResponse("boom".to_string()));
        }
        let outcomes: Vec<_> = draft
            .answers
            .iter()
            .map(|pair| QuestionOutcome {
                question_id: pair.question_id,
                selected_answer: Some(pair.selected_answer.clone()),
                correct_answer: "A".to_string(),
                is_correct: pair.selected_answer == "A",
            })
            .collect();
        let total = u32::try_from(self.questions.len()).unwrap();
        let correct = u32::try_from(outcomes.iter().filter(|o| o.is_correct).count()).unwrap();
        let wrong = u32::try_from(outcomes.len()).unwrap() - correct;
        let total_marks = f64::from(total) * 4.0;
        let obtained = f64::from(correct) * 4.0 - f64::from(wrong);
        SubmitResult::new(
            total,
            correct,
            wrong,
            total_marks,
            obtained,
            (obtained.max(0.0) / total_marks) * 100.0,
            outcomes,
        )
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))
    }
}

struct TestApp {
    attempt_loop: Arc<AttemptLoopService>,
    session: ClientSession,
}

impl UiApp for TestApp {
    fn attempt_loop(&self) -> Arc<AttemptLoopService> {
        Arc::clone(&self.attempt_loop)
    }

    fn client_session(&self) -> ClientSession {
        self.session.clone()
    }

    fn default_paper_id(&self) -> Option<PaperId> {
        PaperId::new(PAPER_ID).ok()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Attempt(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    ctx: AppContext,
    view: ViewKind,
    attempt_handles: AttemptTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    use_context_provider(|| props.ctx.clone());
    use_context_provider(|| props.view.clone());
    use_context_provider(|| props.attempt_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Attempt(paper_id) => rsx! { AttemptView { paper_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub ctx: AppContext,
    pub api: Arc<FakeExamApi>,
    pub handles: AttemptTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn drive(&mut self) {
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..3 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    /// Run `f` inside the root scope, so callbacks may spawn tasks.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        self.dom.in_scope(ScopeId::ROOT, f)
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn signed_in_session(plan: &str) -> ClientSession {
    ClientSessionDraft {
        auth_token: Some("token".into()),
        email: Some("student@example.com".into()),
        plan_name: Some(plan.into()),
        ..ClientSessionDraft::new()
    }
    .validate_signed_in()
    .unwrap()
}

pub fn setup_view_harness(view: ViewKind, api: FakeExamApi, secs: u32) -> ViewHarness {
    setup_view_harness_with_session(view, api, secs, signed_in_session("Pro Plan"))
}

pub fn setup_view_harness_with_session(
    view: ViewKind,
    api: FakeExamApi,
    secs: u32,
    session: ClientSession,
) -> ViewHarness {
    let api = Arc::new(api);
    let exam_api: Arc<dyn ExamApi> = api.clone();
    let attempt_loop = Arc::new(
        AttemptLoopService::new(exam_api).with_duration(Countdown::from_secs(secs)),
    );
    let app: Arc<dyn UiApp> = Arc::new(TestApp {
        attempt_loop,
        session,
    });
    let ctx = build_app_context(&app);
    let handles = AttemptTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            ctx: ctx.clone(),
            view,
            attempt_handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        ctx,
        api,
        handles,
    }
}
