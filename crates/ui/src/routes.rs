use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use exam_core::model::LayoutKind;

use crate::context::AppContext;
use crate::views::{AttemptView, HomeView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/attempt/:paper_id", AttemptView)] Attempt { paper_id: String },
}

/// Chrome for each plan family: `(css modifier, sidebar heading)`.
#[must_use]
pub fn layout_chrome(kind: LayoutKind) -> (&'static str, &'static str) {
    match kind {
        LayoutKind::Dashboard => ("dashboard", "Dashboard"),
        LayoutKind::Pro => ("pro", "Pro Dashboard"),
        LayoutKind::Teacher => ("teacher", "Teacher Dashboard"),
        LayoutKind::Government => ("government", "Government Dashboard"),
    }
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let (modifier, heading) = layout_chrome(ctx.layout());

    rsx! {
        div { class: "app app--{modifier}",
            Sidebar { heading }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar(heading: &'static str) -> Element {
    let ctx = use_context::<AppContext>();
    let account = ctx
        .session()
        .email()
        .map_or_else(|| "Guest".to_string(), str::to_string);
    let plan = ctx.session().plan();

    rsx! {
        nav { class: "sidebar",
            h1 { "{heading}" }
            p { class: "sidebar__account", "{account} · {plan}" }
            ul {
                li { Link { to: Route::Home {}, "Papers" } }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::SubscriptionPlan;

    #[test]
    fn every_plan_gets_a_layout() {
        let free = layout_chrome(SubscriptionPlan::Free.layout());
        let standard = layout_chrome(SubscriptionPlan::Standard.layout());
        assert_eq!(free, standard);
        assert_eq!(layout_chrome(SubscriptionPlan::Pro.layout()).0, "pro");
        assert_eq!(layout_chrome(SubscriptionPlan::Teacher.layout()).0, "teacher");
        assert_eq!(
            layout_chrome(SubscriptionPlan::Government.layout()).0,
            "government"
        );
    }
}
