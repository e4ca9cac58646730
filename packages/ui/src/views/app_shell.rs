use dioxus::prelude::*;

use super::{AnnouncementForm, CourseForm, CoursesTab, LoginPrompt, NewsTab, SettingsTab};
use crate::alert::AlertHost;
use crate::hub::use_hub_data;
use crate::session::use_session;
use crate::view_state::{FormView, Screen, Tab, ViewState};

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

pub fn use_view_state() -> Signal<ViewState> {
    use_context::<Signal<ViewState>>()
}

/// Top-level screen: loading, a form, or the tabbed layout.
///
/// Must sit inside [`HubProvider`](crate::HubProvider) and
/// [`SessionProvider`](crate::SessionProvider).
#[component]
pub fn AppShell() -> Element {
    let mut view = use_signal(ViewState::new);
    use_context_provider(|| view);
    let session = use_session();
    let data = use_hub_data();

    // Losing admin rights mid-edit closes the editor.
    use_effect(move || {
        let can_manage = session.read().can_manage_content();
        if !can_manage && view.peek().form().is_open() {
            tracing::info!("closing editor after losing admin rights");
            view.write().close_form();
        }
    });

    let logged_in = session.read().logged_in;
    let loaded = data.read().courses_loaded;
    let state = view.read().clone();

    let page = match state.screen(logged_in, loaded) {
        Screen::Loading => rsx! {
            div { class: "loading-screen", "Loading..." }
        },
        Screen::Form => match state.form() {
            FormView::EditingAnnouncement(existing) => rsx! {
                AnnouncementForm { existing: existing.clone() }
            },
            FormView::EditingCourse(existing) => rsx! {
                CourseForm { existing: existing.clone() }
            },
            FormView::None => rsx! {},
        },
        Screen::LoginPrompt => rsx! {
            TabLayout { active: state.tab(), LoginPrompt {} }
        },
        Screen::Tab(tab) => rsx! {
            TabLayout {
                active: tab,
                {match tab {
                    Tab::Announcements => rsx! { NewsTab {} },
                    Tab::Courses => rsx! { CoursesTab {} },
                    Tab::Settings => rsx! { SettingsTab {} },
                }}
            }
        },
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        {page}
        AlertHost {}
    }
}

#[component]
fn TabLayout(active: Tab, children: Element) -> Element {
    let mut view = use_view_state();

    rsx! {
        div {
            class: "app-layout",
            header {
                class: "app-header",
                h1 { "{active.title()}" }
            }
            main {
                class: "app-main fade-in",
                {children}
            }
            nav {
                class: "tab-bar",
                for tab in Tab::ALL {
                    button {
                        key: "{tab.title()}",
                        class: if tab == active { "tab-button active" } else { "tab-button" },
                        onclick: move |_| view.write().select_tab(tab),
                        "{tab.title()}"
                    }
                }
            }
        }
    }
}
