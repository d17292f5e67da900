use dioxus::prelude::ReadableExt;
use exam_core::model::QuestionId;
use services::SubmitTrigger;

use super::test_harness::{FakeExamApi, PAPER_ID, ViewHarness, ViewKind, setup_view_harness};
use crate::vm::AttemptIntent;

fn three_questions() -> FakeExamApi {
    FakeExamApi::new(vec![
        (101, "What is the SI unit of *force*?"),
        (102, "What is the SI unit of energy?"),
        (103, "What is the SI unit of power?"),
    ])
}

async fn loaded_attempt(api: FakeExamApi, secs: u32) -> ViewHarness {
    let mut harness = setup_view_harness(ViewKind::Attempt(PAPER_ID.to_string()), api, secs);
    harness.rebuild();
    harness.drive_async().await;
    harness
}

fn dispatch(harness: &mut ViewHarness, intent: AttemptIntent) {
    let callback = harness.handles.dispatch();
    harness.in_scope(|| callback.call(intent));
    harness.drive();
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_shows_flash_once() {
    let mut harness = setup_view_harness(ViewKind::Home, three_questions(), 60);
    harness.ctx.set_flash("Could not load the paper. Please try again.");
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Could not load the paper"), "missing flash in {html}");
    assert!(html.contains("Signed in as student@example.com"), "missing greeting in {html}");
    assert!(html.contains(PAPER_ID), "missing default paper id in {html}");
    assert_eq!(harness.ctx.take_flash(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_renders_first_question_and_palette() {
    let harness = loaded_attempt(three_questions(), 600).await;
    let html = harness.render();

    assert!(html.contains("Mock Physics"), "missing title in {html}");
    assert!(html.contains("Units and measurement"), "missing description in {html}");
    assert!(html.contains("Question 1 of 3"), "missing counter in {html}");
    assert!(html.contains("<em>force</em>"), "missing rendered text in {html}");
    assert!(html.contains("Alpha"), "missing option in {html}");
    assert!(html.contains("palette__cell--current"), "missing current cell in {html}");
    assert!(html.contains("palette__cell--not-visited"), "missing unvisited cells in {html}");
    assert!(html.contains("Marked for review"), "missing legend in {html}");
    assert!(html.contains("attempt-timer"), "missing timer in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_intents_update_counter_and_palette() {
    let mut harness = loaded_attempt(three_questions(), 600).await;

    dispatch(&mut harness, AttemptIntent::Select("B".to_string()));
    dispatch(&mut harness, AttemptIntent::SaveAndNext);
    dispatch(&mut harness, AttemptIntent::MarkForReview);

    let html = harness.render();
    assert!(html.contains("Question 3 of 3"), "missing counter in {html}");
    assert!(html.contains("palette__cell--answered"), "missing answered cell in {html}");
    assert!(html.contains("palette__cell--reviewed"), "missing reviewed cell in {html}");
    assert!(html.contains("Answered: 1 / 3"), "missing answered count in {html}");

    let vm = harness.handles.vm();
    let answer = harness.in_scope(|| {
        vm.peek()
            .as_ref()
            .and_then(|vm| vm.session().answer_for(QuestionId::new(101)).map(str::to_string))
    });
    assert_eq!(answer.as_deref(), Some("B"));
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_pause_freezes_and_blocks_submit() {
    let mut harness = loaded_attempt(three_questions(), 600).await;

    dispatch(&mut harness, AttemptIntent::TogglePause);
    let html = harness.render();
    assert!(html.contains("Resume"), "missing resume in {html}");
    assert!(html.contains("The timer is stopped"), "missing paused note in {html}");

    let submit = harness.handles.submit();
    harness.in_scope(|| submit.call(SubmitTrigger::Manual));
    harness.drive_async().await;
    assert!(harness.api.submissions().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_submit_shows_result_panel() {
    let mut harness = loaded_attempt(three_questions(), 600).await;
    dispatch(&mut harness, AttemptIntent::Select("A".to_string()));
    dispatch(&mut harness, AttemptIntent::Jump(2));
    dispatch(&mut harness, AttemptIntent::Select("C".to_string()));

    let submit = harness.handles.submit();
    harness.in_scope(|| submit.call(SubmitTrigger::Manual));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Attempt submitted"), "missing result title in {html}");
    assert!(html.contains("3 / 12"), "missing score in {html}");
    assert!(html.contains("Time taken"), "missing elapsed time in {html}");
    assert!(!html.contains("Question 1 of 3"), "question still shown in {html}");

    let submissions = harness.api.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].answers.len(), 2);
    assert_eq!(submissions[0].answers[1].question_id, QuestionId::new(103));
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_submit_failure_keeps_attempt_open() {
    let api = three_questions();
    api.set_fail_submit(true);
    let mut harness = loaded_attempt(api, 600).await;
    dispatch(&mut harness, AttemptIntent::Select("B".to_string()));

    let submit = harness.handles.submit();
    harness.in_scope(|| submit.call(SubmitTrigger::Manual));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Could not submit your answers"), "missing error in {html}");
    assert!(html.contains("Question 1 of 3"), "attempt not kept in {html}");
    assert!(html.contains("option--selected"), "answer lost in {html}");

    harness.api.set_fail_submit(false);
    harness.in_scope(|| submit.call(SubmitTrigger::Manual));
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Attempt submitted"), "retry did not finish in {html}");
    assert_eq!(harness.api.submissions().len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_empty_paper_is_terminal() {
    let harness = loaded_attempt(FakeExamApi::new(Vec::new()), 600).await;
    let html = harness.render();
    assert!(html.contains("This paper has no questions yet."), "missing empty state in {html}");
    assert!(html.contains("Back to papers"), "missing back button in {html}");
    assert!(!html.contains("attempt-timer"), "timer shown in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_fetch_failure_queues_flash() {
    let harness = loaded_attempt(FakeExamApi::failing_fetch(), 600).await;
    assert_eq!(
        harness.ctx.take_flash().as_deref(),
        Some("Could not load the paper. Please try again.")
    );
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn attempt_view_timer_auto_submits_once() {
    let mut harness = loaded_attempt(three_questions(), 2).await;
    dispatch(&mut harness, AttemptIntent::Select("A".to_string()));

    for _ in 0..40 {
        harness.drive_async().await;
        if !harness.api.submissions().is_empty() {
            break;
        }
    }
    for _ in 0..10 {
        harness.drive_async().await;
    }

    assert_eq!(harness.api.submissions().len(), 1);
    let html = harness.render();
    assert!(html.contains("Attempt submitted"), "missing result in {html}");
}
