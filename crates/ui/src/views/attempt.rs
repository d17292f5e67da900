use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use services::{AttemptProgress, PaletteState, SubmitTrigger, TickOutcome};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptIntent, AttemptVm, PaletteCellVm, ResultVm, palette_class, start_attempt};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const LEGEND: [PaletteState; 4] = [
    PaletteState::Answered,
    PaletteState::Reviewed,
    PaletteState::Visited,
    PaletteState::NotVisited,
];

/// Keyboard shortcut to intent. Digits select the n-th option in label order.
fn intent_for_key(key: &Key) -> Option<AttemptIntent> {
    match key {
        Key::ArrowLeft => Some(AttemptIntent::Previous),
        Key::ArrowRight => Some(AttemptIntent::Next),
        Key::Character(value) => match value.as_str() {
            "p" | "P" => Some(AttemptIntent::TogglePause),
            digit => digit
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=9).contains(n))
                .map(|n| AttemptIntent::SelectAt(n - 1)),
        },
        _ => None,
    }
}

#[component]
pub fn AttemptView(paper_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let attempt_loop = ctx.attempt_loop();

    let vm = use_signal(|| None::<AttemptVm>);
    let mut submit_error = use_signal(|| None::<ViewError>);
    let mut confirm_open = use_signal(|| false);

    let resource = {
        let attempt_loop = attempt_loop.clone();
        let ctx = ctx.clone();
        use_resource(move || {
            let attempt_loop = attempt_loop.clone();
            let ctx = ctx.clone();
            let paper_id = paper_id.clone();
            let mut vm = vm;
            async move {
                match start_attempt(&attempt_loop, &paper_id).await {
                    Ok(started) => {
                        vm.set(Some(started));
                        Ok::<_, ViewError>(())
                    }
                    Err(err) => {
                        if err.redirects_home() {
                            ctx.set_flash(err.message());
                            let _ = navigator.replace(Route::Home {});
                        }
                        Err(err)
                    }
                }
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let submit = {
        let attempt_loop = attempt_loop.clone();
        use_callback(move |trigger: SubmitTrigger| {
            let mut vm = vm;
            let draft = match vm.write().as_mut().map(|vm| vm.begin_submit(trigger)) {
                Some(Ok(draft)) => draft,
                Some(Err(err)) => {
                    tracing::debug!(error = %err, ?trigger, "Submit ignored");
                    return;
                }
                None => return,
            };
            confirm_open.set(false);
            submit_error.set(None);

            let attempt_loop = attempt_loop.clone();
            spawn(async move {
                let result = attempt_loop.submit(&draft).await;
                let mut guard = vm.write();
                let Some(vm_value) = guard.as_mut() else {
                    return;
                };
                match result {
                    Ok(result) => vm_value.complete_submit(result),
                    Err(err) => {
                        vm_value.fail_submit();
                        submit_error.set(Some(ViewError::from(&err)));
                    }
                }
            });
        })
    };

    let dispatch_intent = use_callback(move |intent: AttemptIntent| {
        let mut vm = vm;
        if let Some(vm_value) = vm.write().as_mut() {
            if let Err(err) = vm_value.apply(intent) {
                tracing::debug!(error = %err, "Attempt action rejected");
            }
        }
    });

    // One-second ticker. The expiring tick fires the timeout submit exactly once.
    use_future(move || async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.tick().await;
        loop {
            interval.tick().await;
            let mut vm = vm;
            let outcome = vm.write().as_mut().map(AttemptVm::tick);
            if outcome == Some(TickOutcome::Expired) {
                submit.call(SubmitTrigger::Timeout);
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<AttemptTestHandles>() {
                handles.register(dispatch_intent, submit, vm);
            }
        }
    }

    let on_key = use_callback(move |evt: KeyboardEvent| {
        if confirm_open() {
            if evt.data.key() == Key::Escape {
                confirm_open.set(false);
            }
            return;
        }
        let active = vm.read().as_ref().is_some_and(|vm| !vm.is_finished());
        if !active {
            return;
        }
        if let Some(intent) = intent_for_key(&evt.data.key()) {
            evt.prevent_default();
            dispatch_intent.call(intent);
        }
    });

    let vm_guard = vm.read();
    let title = vm_guard
        .as_ref()
        .map_or_else(|| "Mock Test".to_string(), |vm| vm.title().to_string());
    let description = vm_guard
        .as_ref()
        .and_then(|vm| vm.description().map(str::to_string));

    rsx! {
        div { class: "page attempt-page", id: "attempt-root", tabindex: "0", onkeydown: on_key,
            h2 { class: "attempt__title", "{title}" }
            if let Some(description) = description {
                p { class: "attempt__description", "{description}" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading questions..." }
                },
                ViewState::Error(ViewError::EmptyPaper) => rsx! {
                    div { class: "attempt-empty",
                        p { {ViewError::EmptyPaper.message()} }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let _ = navigator.push(Route::Home {});
                            },
                            "Back to papers"
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "attempt-error", "{err.message()}" }
                },
                ViewState::Ready(()) => match vm_guard.as_ref() {
                    None => rsx! { p { {ViewError::Unknown.message()} } },
                    Some(vm_value) => match vm_value.result() {
                        Some(result) => rsx! { ResultPanel { result } },
                        None => rsx! {
                            AttemptBody {
                                vm: vm_value.question(),
                                palette: vm_value.palette(),
                                timer_label: vm_value.timer_label(),
                                paused: vm_value.is_paused(),
                                submitting: vm_value.is_submitting(),
                                is_first: vm_value.is_first(),
                                is_last: vm_value.is_last(),
                                submit_error: submit_error(),
                                on_intent: dispatch_intent,
                                on_request_submit: move |()| confirm_open.set(true),
                            }
                            if confirm_open() {
                                ConfirmSubmit {
                                    progress: vm_value.progress(),
                                    on_confirm: move |()| submit.call(SubmitTrigger::Manual),
                                    on_cancel: move |()| confirm_open.set(false),
                                }
                            }
                        },
                    },
                },
            }
        }
    }
}

#[component]
fn AttemptBody(
    vm: crate::vm::QuestionVm,
    palette: Vec<PaletteCellVm>,
    timer_label: String,
    paused: bool,
    submitting: bool,
    is_first: bool,
    is_last: bool,
    submit_error: Option<ViewError>,
    on_intent: EventHandler<AttemptIntent>,
    on_request_submit: EventHandler<()>,
) -> Element {
    let pause_label = if paused { "Resume" } else { "Pause" };
    let timer_class = if paused {
        "attempt__timer attempt__timer--paused"
    } else {
        "attempt__timer"
    };
    let answered = palette
        .iter()
        .filter(|cell| cell.state == PaletteState::Answered)
        .count();

    rsx! {
        div { class: "attempt",
            header { class: "attempt__bar",
                span { class: "attempt__counter", "Question {vm.number} of {vm.total}" }
                span { class: "attempt__marks", "Marks: {vm.marks}" }
                span {
                    class: "{timer_class}",
                    id: "attempt-timer",
                    "{timer_label}"
                }
                button {
                    class: "btn btn-ghost",
                    id: "attempt-pause",
                    r#type: "button",
                    onclick: move |_| on_intent.call(AttemptIntent::TogglePause),
                    "{pause_label}"
                }
            }
            if paused {
                p { class: "attempt__paused", "Paused. The timer is stopped." }
            }
            section { class: "attempt__question",
                div { class: "attempt__text", dangerous_inner_html: "{vm.html}" }
                ul { class: "attempt__options",
                    for option in vm.options.iter().cloned() {
                        li { key: "{option.label}",
                            label {
                                class: "{option.class()}",
                                input {
                                    r#type: "radio",
                                    name: "answer",
                                    checked: option.selected,
                                    onchange: {
                                        let label = option.label.clone();
                                        move |_| on_intent.call(AttemptIntent::Select(label.clone()))
                                    },
                                }
                                span { class: "option__label", "{option.label}." }
                                span { class: "option__text", "{option.text}" }
                            }
                        }
                    }
                }
            }
            div { class: "attempt__actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: is_first,
                    onclick: move |_| on_intent.call(AttemptIntent::Previous),
                    "Previous"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(AttemptIntent::Clear),
                    "Clear"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(AttemptIntent::MarkForReview),
                    "Mark for review & next"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(AttemptIntent::SaveAndNext),
                    if is_last { "Save" } else { "Save & next" }
                }
            }
            aside { class: "attempt__side",
                div { class: "palette",
                    for cell in palette.iter().copied() {
                        button {
                            key: "{cell.index}",
                            class: "{cell.class()}",
                            r#type: "button",
                            title: "{cell.state.label()}",
                            onclick: move |_| on_intent.call(AttemptIntent::Jump(cell.index)),
                            "{cell.number()}"
                        }
                    }
                }
                ul { class: "legend",
                    for state in LEGEND {
                        li { key: "{state.label()}",
                            span { class: "{palette_class(state)}" }
                            " {state.label()}"
                        }
                    }
                }
                p { class: "attempt__answered", "Answered: {answered} / {palette.len()}" }
                if let Some(err) = submit_error {
                    p { class: "attempt__submit-error", role: "alert", "{err.message()}" }
                }
                button {
                    class: "btn btn-submit",
                    id: "attempt-submit",
                    r#type: "button",
                    disabled: submitting || paused,
                    onclick: move |_| on_request_submit.call(()),
                    if submitting { "Submitting..." } else { "Submit" }
                }
            }
        }
    }
}

#[component]
fn ConfirmSubmit(
    progress: AttemptProgress,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "modal-overlay",
            div {
                class: "modal",
                role: "dialog",
                aria_modal: "true",
                h3 { "Submit this attempt?" }
                p { "Answered: {progress.answered}" }
                p { "Not answered: {progress.unanswered()}" }
                if progress.reviewed > 0 {
                    p { "Marked for review: {progress.reviewed}" }
                }
                p { "You cannot change your answers after submitting." }
                div { class: "modal__actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Keep working"
                    }
                    button {
                        class: "btn btn-primary",
                        id: "attempt-confirm-submit",
                        r#type: "button",
                        onclick: move |_| on_confirm.call(()),
                        "Submit now"
                    }
                }
            }
        }
    }
}

#[component]
fn ResultPanel(result: ResultVm) -> Element {
    let navigator = use_navigator();

    rsx! {
        div { class: "result",
            h3 { class: "result__title", "Attempt submitted" }
            dl { class: "result__summary",
                dt { "Score" }
                dd { "{result.marks}" }
                dt { "Percentage" }
                dd { "{result.percentage}" }
                dt { "Correct" }
                dd { "{result.correct}" }
                dt { "Wrong" }
                dd { "{result.wrong}" }
                dt { "Not answered" }
                dd { "{result.unanswered}" }
                dt { "Questions" }
                dd { "{result.total_questions}" }
                dt { "Time taken" }
                dd { "{result.time_taken}" }
            }
            if !result.outcomes.is_empty() {
                table { class: "result__outcomes",
                    thead {
                        tr {
                            th { "Q" }
                            th { "Your answer" }
                            th { "Correct answer" }
                        }
                    }
                    tbody {
                        for (row, outcome) in result.outcomes.iter().enumerate() {
                            tr {
                                key: "{row}",
                                class: "outcome outcome--{outcome.verdict()}",
                                td {
                                    {outcome.number.map_or_else(|| "-".to_string(), |n| n.to_string())}
                                }
                                td { "{outcome.selected}" }
                                td { "{outcome.correct}" }
                            }
                        }
                    }
                }
            }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| {
                    let _ = navigator.push(Route::Home {});
                },
                "Back to papers"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct AttemptTestHandles {
    dispatch: Rc<RefCell<Option<Callback<AttemptIntent>>>>,
    submit: Rc<RefCell<Option<Callback<SubmitTrigger>>>>,
    vm: Rc<RefCell<Option<Signal<Option<AttemptVm>>>>>,
}

#[cfg(test)]
impl AttemptTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<AttemptIntent>,
        submit: Callback<SubmitTrigger>,
        vm: Signal<Option<AttemptVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.submit.borrow_mut() = Some(submit);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<AttemptIntent> {
        (*self.dispatch.borrow()).expect("attempt dispatch registered")
    }

    pub(crate) fn submit(&self) -> Callback<SubmitTrigger> {
        (*self.submit.borrow()).expect("attempt submit registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<AttemptVm>> {
        (*self.vm.borrow()).expect("attempt vm registered")
    }
}
