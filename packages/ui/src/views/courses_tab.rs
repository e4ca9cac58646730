use dioxus::prelude::*;
use store::Course;

use super::{use_view_state, ConfirmDialog, DialogField};
use crate::alert::{raise_alert, use_alerts, AlertLevel};
use crate::format::{format_timestamp, member_label};
use crate::hub::{use_hub, use_hub_data};
use crate::session::use_session;

/// Pending confirmation on the courses tab.
#[derive(Clone, Debug, PartialEq)]
enum CourseDialog {
    Enroll(Course),
    /// Take `phone` off the course: a member cancelling, or an admin removing them.
    Unenroll { course: Course, phone: String },
    Delete(String),
}

#[component]
pub fn CoursesTab() -> Element {
    let hub = use_hub();
    let data = use_hub_data();
    let session = use_session();
    let mut view = use_view_state();
    let mut alerts = use_alerts();
    let mut dialog = use_signal(|| Option::<CourseDialog>::None);

    let courses = data.read().courses.clone();
    let current = session.read().clone();
    let phone = current.current_phone().unwrap_or_default().to_string();

    let confirm = move |_: ()| {
        let Some(pending) = dialog.take() else {
            return;
        };
        let hub = hub.clone();
        let own_phone = session.peek().current_phone().map(str::to_string);
        spawn(async move {
            let result = match &pending {
                CourseDialog::Enroll(course) => match own_phone {
                    Some(phone) => hub.enroll(&course.id, &phone).await,
                    None => return,
                },
                CourseDialog::Unenroll { course, phone } => hub.cancel_enrollment(&course.id, phone).await,
                CourseDialog::Delete(id) => hub.delete_course(id).await,
            };
            if let Err(e) = result {
                raise_alert(&mut alerts, AlertLevel::Error, &format!("Request failed: {e}"));
            }
        });
    };

    let pending = dialog.read().clone();

    rsx! {
        div {
            class: "tab-page",
            section {
                h2 { class: "section-title", "Open for enrollment" }

                if current.can_manage_content() {
                    button {
                        class: "btn-add",
                        onclick: move |_| view.write().new_course(),
                        "+ Add course"
                    }
                }

                if courses.is_empty() {
                    p { class: "empty-hint", "No courses are scheduled." }
                }

                div {
                    class: "card-list",
                    for course in courses {
                        CourseCard {
                            key: "{course.id}",
                            course: course.clone(),
                            on_request: move |request: CourseDialog| dialog.set(Some(request)),
                        }
                    }
                }
            }

            {match pending {
                Some(CourseDialog::Enroll(course)) => rsx! {
                    ConfirmDialog {
                        title: "Confirm enrollment",
                        confirm_label: "Enroll",
                        on_confirm: confirm,
                        on_cancel: move |_| dialog.set(None),
                        DialogField { label: "Course", value: course.name.clone() }
                        DialogField { label: "Phone", value: phone.clone(), emphasis: true }
                        DialogField { label: "Starts", value: format_timestamp(course.scheduled_at) }
                    }
                },
                Some(CourseDialog::Unenroll { course, phone }) => rsx! {
                    ConfirmDialog {
                        title: "Remove from course",
                        message: "The member will be taken off this course's list.",
                        confirm_label: "Remove",
                        danger: true,
                        on_confirm: confirm,
                        on_cancel: move |_| dialog.set(None),
                        DialogField { label: "Course", value: course.name.clone() }
                        DialogField {
                            label: "Member",
                            value: member_label(&data.read().directory, &phone),
                            emphasis: true,
                        }
                    }
                },
                Some(CourseDialog::Delete(_)) => rsx! {
                    ConfirmDialog {
                        title: "Delete this course?",
                        message: "The course and all of its enrollments will be removed.",
                        confirm_label: "Delete",
                        danger: true,
                        on_confirm: confirm,
                        on_cancel: move |_| dialog.set(None),
                    }
                },
                None => rsx! {},
            }}
        }
    }
}

#[component]
fn CourseCard(course: Course, on_request: EventHandler<CourseDialog>) -> Element {
    let data = use_hub_data();
    let session = use_session();
    let mut view = use_view_state();

    let current = session.read().clone();
    let phone = current.current_phone().map(str::to_string);
    let enrolled = phone.as_deref().is_some_and(|p| course.is_enrolled(p));
    let scheduled = format_timestamp(course.scheduled_at);
    let roster: Vec<(String, String)> = if current.can_manage_content() {
        let data = data.read();
        course
            .enrolled
            .iter()
            .map(|p| (p.to_string(), member_label(&data.directory, p)))
            .collect()
    } else {
        Vec::new()
    };

    let edit_target = course.clone();
    let delete_id = course.id.clone();
    let enroll_target = course.clone();
    let roster_course = course.clone();

    rsx! {
        article {
            class: "card",
            header {
                class: "card-header",
                div {
                    p { class: "card-meta", "{course.name}" }
                    p { class: "card-title accent", "{scheduled}" }
                }
                div {
                    class: "card-actions",
                    if current.can_manage_content() {
                        button {
                            class: "icon-btn",
                            title: "Edit",
                            onclick: move |_| view.write().edit_course(edit_target.clone()),
                            "\u{270E}"
                        }
                        button {
                            class: "icon-btn danger",
                            title: "Delete",
                            onclick: move |_| on_request.call(CourseDialog::Delete(delete_id.clone())),
                            "\u{1F5D1}"
                        }
                    }
                    if enrolled {
                        button {
                            class: "btn btn-muted",
                            onclick: {
                                let course = enroll_target.clone();
                                let phone = phone.clone().unwrap_or_default();
                                move |_| on_request.call(CourseDialog::Unenroll {
                                    course: course.clone(),
                                    phone: phone.clone(),
                                })
                            },
                            "Enrolled \u{2713}"
                        }
                    } else {
                        button {
                            class: "btn btn-soft",
                            disabled: phone.is_none(),
                            onclick: move |_| on_request.call(CourseDialog::Enroll(enroll_target.clone())),
                            "Enroll"
                        }
                    }
                }
            }

            div {
                class: "card-body",
                p { class: "card-text", "{course.description}" }
            }

            if current.can_manage_content() {
                div {
                    class: "card-roster",
                    h4 { class: "field-label", "Enrolled ({roster.len()})" }
                    if roster.is_empty() {
                        p { class: "empty-hint", "Nobody has enrolled yet." }
                    }
                    for (member, label) in roster {
                        div {
                            key: "{member}",
                            class: "roster-row",
                            span { "{label}" }
                            button {
                                class: "icon-btn danger",
                                title: "Remove",
                                onclick: {
                                    let course = roster_course.clone();
                                    move |_| on_request.call(CourseDialog::Unenroll {
                                        course: course.clone(),
                                        phone: member.clone(),
                                    })
                                },
                                "\u{2715}"
                            }
                        }
                    }
                }
            }
        }
    }
}
