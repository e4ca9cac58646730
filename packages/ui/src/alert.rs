use std::collections::VecDeque;

use dioxus::prelude::*;

use crate::views::ModalOverlay;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

/// Blocking messages, shown one at a time until acknowledged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Alerts {
    queue: VecDeque<Alert>,
}

impl Alerts {
    pub fn push(&mut self, level: AlertLevel, message: &str) {
        self.queue.push_back(Alert {
            level,
            message: message.to_string(),
        });
    }

    pub fn current(&self) -> Option<&Alert> {
        self.queue.front()
    }

    pub fn dismiss(&mut self) {
        self.queue.pop_front();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

pub fn use_alerts() -> Signal<Alerts> {
    use_context::<Signal<Alerts>>()
}

pub fn raise_alert(alerts: &mut Signal<Alerts>, level: AlertLevel, message: &str) {
    alerts.write().push(level, message);
}

/// Renders the oldest pending alert, if any.
#[component]
pub fn AlertHost() -> Element {
    let mut alerts = use_alerts();
    let current = alerts.read().current().cloned();

    let Some(alert) = current else {
        return rsx! {};
    };
    let class = match alert.level {
        AlertLevel::Info => "alert-card",
        AlertLevel::Success => "alert-card alert-success",
        AlertLevel::Error => "alert-card alert-error",
    };

    rsx! {
        ModalOverlay {
            on_close: move |_| alerts.write().dismiss(),
            dismissable: false,
            div {
                class: "{class}",
                p { class: "alert-message", "{alert.message}" }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| alerts.write().dismiss(),
                    "OK"
                }
            }
        }
    }
}
