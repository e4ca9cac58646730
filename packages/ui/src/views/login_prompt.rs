use std::time::Duration;

use dioxus::prelude::*;

use crate::alert::{raise_alert, use_alerts, AlertLevel};
use crate::hub::{use_config, use_hub};
use crate::login::{LoginFlow, LoginOutcome, LoginStep};
use crate::session::{log_in, use_session};

async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Phone, code and (for new members) name entry.
///
/// Shown in place of any tab that needs a login. Logging in updates the
/// session, which makes the parent swap this prompt for the tab.
#[component]
pub fn LoginPrompt() -> Element {
    let hub = use_hub();
    let config = use_config();
    let mut session = use_session();
    let mut alerts = use_alerts();
    let mut flow = use_signal(LoginFlow::new);
    let mut busy = use_signal(|| false);

    let send_delay = config.login.send_code_delay();
    let demo_code = config.login.demo_code.clone();

    let send_code = {
        let demo_code = demo_code.clone();
        move |_: MouseEvent| {
            if busy() || !flow.read().can_request_code() {
                return;
            }
            let demo_code = demo_code.clone();
            busy.set(true);
            spawn(async move {
                sleep(send_delay).await;
                let sent = flow.write().request_code();
                busy.set(false);
                match sent {
                    Ok(()) => raise_alert(
                        &mut alerts,
                        AlertLevel::Info,
                        &format!("Verification code sent (demo: {demo_code})"),
                    ),
                    Err(e) => raise_alert(&mut alerts, AlertLevel::Error, &e.to_string()),
                }
            });
        }
    };

    let verify = {
        let hub = hub.clone();
        move |_: MouseEvent| {
            if busy() {
                return;
            }
            let hub = hub.clone();
            let accepted = demo_code.clone();
            busy.set(true);
            spawn(async move {
                let mut next = flow();
                let result = next.verify(&hub, &accepted).await;
                flow.set(next);
                busy.set(false);
                match result {
                    Ok(LoginOutcome::LoggedIn { phone, entry }) => log_in(&mut session, &phone, &entry),
                    Ok(LoginOutcome::NeedsName) => {}
                    Err(e) => raise_alert(&mut alerts, AlertLevel::Error, &e.to_string()),
                }
            });
        }
    };

    let register = move |_: MouseEvent| {
        if busy() || !flow.read().can_register() {
            return;
        }
        let hub = hub.clone();
        busy.set(true);
        spawn(async move {
            let mut next = flow();
            let result = next.register(&hub).await;
            flow.set(next);
            busy.set(false);
            match result {
                Ok(LoginOutcome::LoggedIn { phone, entry }) => log_in(&mut session, &phone, &entry),
                Ok(LoginOutcome::NeedsName) => {}
                Err(e) => raise_alert(&mut alerts, AlertLevel::Error, &e.to_string()),
            }
        });
    };

    let step = flow.read().step();
    let phone = flow.read().phone().to_string();
    let code = flow.read().code().to_string();
    let name = flow.read().name().to_string();

    rsx! {
        div {
            class: "login-prompt",
            div {
                class: "login-badge",
                if step == LoginStep::Name { "\u{1F464}" } else { "\u{1F512}" }
            }

            {match step {
                LoginStep::Phone => rsx! {
                    h2 { class: "login-title", "Log in with your phone" }
                    p { class: "login-hint", "Courses and settings are for members." }
                    input {
                        class: "field-input",
                        r#type: "tel",
                        inputmode: "numeric",
                        placeholder: "Phone number",
                        value: "{phone}",
                        oninput: move |evt: FormEvent| flow.write().set_phone(&evt.value()),
                    }
                    button {
                        class: "btn btn-primary btn-block",
                        disabled: busy() || !flow.read().can_request_code(),
                        onclick: send_code,
                        if busy() { "Sending..." } else { "Send code" }
                    }
                },
                LoginStep::Otp => rsx! {
                    h2 { class: "login-title", "Enter the code" }
                    p { class: "login-hint", "Sent to {phone}" }
                    input {
                        class: "field-input code-input",
                        inputmode: "numeric",
                        maxlength: 4,
                        placeholder: "----",
                        value: "{code}",
                        oninput: move |evt: FormEvent| flow.write().set_code(&evt.value()),
                    }
                    button {
                        class: "btn btn-primary btn-block",
                        disabled: busy(),
                        onclick: verify,
                        if busy() { "Checking..." } else { "Verify" }
                    }
                    button {
                        class: "btn btn-link",
                        disabled: busy(),
                        onclick: move |_| flow.write().back(),
                        "Use a different number"
                    }
                },
                LoginStep::Name => rsx! {
                    h2 { class: "login-title", "Welcome!" }
                    p { class: "login-hint", "Choose the name other members will see." }
                    input {
                        class: "field-input",
                        placeholder: "Display name",
                        value: "{name}",
                        oninput: move |evt: FormEvent| flow.write().set_name(&evt.value()),
                    }
                    button {
                        class: "btn btn-primary btn-block",
                        disabled: busy() || !flow.read().can_register(),
                        onclick: register,
                        if busy() { "Saving..." } else { "Join" }
                    }
                },
                LoginStep::LoggedIn => rsx! {},
            }}
        }
    }
}
