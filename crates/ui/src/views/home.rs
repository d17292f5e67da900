use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    // Taken once per mount so a flash shows on exactly one page.
    let flash = use_hook(|| ctx.take_flash());
    let default_paper = ctx
        .default_paper_id()
        .map(ToString::to_string)
        .unwrap_or_default();
    let mut paper_input = use_signal(move || default_paper);
    let mut input_error = use_signal(|| false);

    let greeting = ctx.session().email().map_or_else(
        || "Welcome. Enter a paper id to start a mock test.".to_string(),
        |email| format!("Signed in as {email}"),
    );
    let signed_in = ctx.session().is_signed_in();

    let start = use_callback(move |()| {
        let paper_id = paper_input.read().trim().to_string();
        if paper_id.is_empty() {
            input_error.set(true);
            return;
        }
        input_error.set(false);
        let _ = navigator.push(Route::Attempt { paper_id });
    });

    rsx! {
        div { class: "page home-page",
            h2 { "Mock Tests" }
            if let Some(message) = flash {
                p { class: "flash", role: "alert", "{message}" }
            }
            p { class: "home__greeting", "{greeting}" }
            if !signed_in {
                p { class: "home__note", "You are not signed in. Papers that need an account will not load." }
            }
            div { class: "home__start",
                label { r#for: "paper-id", "Paper id" }
                input {
                    id: "paper-id",
                    r#type: "text",
                    value: "{paper_input}",
                    oninput: move |evt| paper_input.set(evt.value()),
                    onkeydown: move |evt: KeyboardEvent| {
                        if evt.data.key() == Key::Enter {
                            start.call(());
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| start.call(()),
                    "Start attempt"
                }
            }
            if input_error() {
                p { class: "home__error", "Enter a paper id first." }
            }
        }
    }
}
