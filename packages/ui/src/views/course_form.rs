use chrono::Utc;
use dioxus::prelude::*;
use store::{Course, CourseDraft};

use super::{use_view_state, FormFrame};
use crate::alert::{raise_alert, use_alerts, AlertLevel};
use crate::format::{default_schedule, parse_schedule_input, schedule_input_value};
use crate::hub::use_hub;

/// Full-screen editor for a new or existing course.
#[component]
pub fn CourseForm(existing: Option<Course>) -> Element {
    let hub = use_hub();
    let mut view = use_view_state();
    let mut alerts = use_alerts();

    let initial = match existing.as_ref() {
        Some(course) => CourseDraft::from_course(course),
        None => CourseDraft {
            name: String::new(),
            description: String::new(),
            scheduled_at: default_schedule(Utc::now()),
        },
    };
    let initial_schedule = schedule_input_value(initial.scheduled_at);
    let mut draft = use_signal(|| initial);
    let mut schedule = use_signal(|| initial_schedule);
    let mut saving = use_signal(|| false);
    let existing_id = existing.as_ref().map(|c| c.id.clone());

    let save = move |_: ()| {
        if saving() {
            return;
        }
        let hub = hub.clone();
        let existing_id = existing_id.clone();
        let current = draft();
        saving.set(true);
        spawn(async move {
            match hub.save_course(existing_id.as_deref(), &current).await {
                Ok(()) => view.write().close_form(),
                Err(e) => raise_alert(&mut alerts, AlertLevel::Error, &format!("Save failed: {e}")),
            }
            saving.set(false);
        });
    };

    let current = draft();
    let schedule_valid = parse_schedule_input(&schedule()).is_some();
    let can_save = current.is_complete() && schedule_valid && !saving();
    let save_label = match (existing.is_some(), saving()) {
        (_, true) => "Saving...",
        (true, false) => "Update",
        (false, false) => "Create",
    };

    rsx! {
        FormFrame {
            save_label: save_label,
            can_save: can_save,
            on_save: save,

            div {
                class: "form-row",
                label { class: "field-label", "Course" }
                input {
                    class: "field-input strong",
                    placeholder: "Course name",
                    value: "{current.name}",
                    oninput: move |evt: FormEvent| draft.write().name = evt.value(),
                }
            }

            div {
                class: "form-row",
                label { class: "field-label", "Starts" }
                input {
                    class: if schedule_valid { "field-input" } else { "field-input invalid" },
                    r#type: "datetime-local",
                    value: "{schedule}",
                    oninput: move |evt: FormEvent| {
                        let value = evt.value();
                        if let Some(at) = parse_schedule_input(&value) {
                            draft.write().scheduled_at = at;
                        }
                        schedule.set(value);
                    },
                }
            }

            div {
                class: "form-row",
                label { class: "field-label", "Details" }
                textarea {
                    class: "field-input",
                    rows: 8,
                    placeholder: "What to expect and what to bring",
                    value: "{current.description}",
                    oninput: move |evt: FormEvent| draft.write().description = evt.value(),
                }
            }
        }
    }
}
