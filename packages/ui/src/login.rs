//! # Phone verification login flow
//!
//! ```text
//! Phone ──request_code──▶ Otp ──verify (known phone)──▶ LoggedIn
//!   ▲                      │ └─verify (new phone)──▶ Name ──register──▶ LoggedIn
//!   └────────back──────────┘
//! ```
//!
//! The one-time code is a demo stand-in: no code is delivered and a single
//! configured value is accepted. A wrong code, a failed lookup or a failed
//! registration leaves the flow on the step it was on, so the user can
//! simply submit again.
//!
//! [`LoginFlow`] holds no store handle. The async steps borrow a [`Hub`] for
//! the one request they make.

use api::{ApiError, Hub};
use store::{DirectoryEntry, DocumentStore};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginStep {
    Phone,
    Otp,
    Name,
    LoggedIn,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Please enter your phone number")]
    MissingPhone,
    #[error("The verification code is incorrect")]
    WrongCode,
    #[error("Please enter a display name")]
    MissingName,
    #[error("Login failed, please try again later")]
    Lookup(#[source] ApiError),
    #[error("Registration failed")]
    Registration(#[source] ApiError),
    #[error("Cannot do that from the {0:?} step")]
    WrongStep(LoginStep),
}

/// Result of a successful verify or register.
#[derive(Clone, Debug, PartialEq)]
pub enum LoginOutcome {
    /// New phone: ask for a display name next.
    NeedsName,
    LoggedIn { phone: String, entry: DirectoryEntry },
}

/// State of the login prompt.
#[derive(Clone, Debug, PartialEq)]
pub struct LoginFlow {
    step: LoginStep,
    phone: String,
    code: String,
    name: String,
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginFlow {
    pub fn new() -> Self {
        Self {
            step: LoginStep::Phone,
            phone: String::new(),
            code: String::new(),
            name: String::new(),
        }
    }

    pub fn step(&self) -> LoginStep {
        self.step
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keep only the digits of the typed phone number.
    pub fn set_phone(&mut self, input: &str) {
        self.phone = input.chars().filter(char::is_ascii_digit).collect();
    }

    pub fn set_code(&mut self, input: &str) {
        self.code = input.trim().to_string();
    }

    pub fn set_name(&mut self, input: &str) {
        self.name = input.to_string();
    }

    pub fn can_request_code(&self) -> bool {
        self.step == LoginStep::Phone && !self.phone.is_empty()
    }

    pub fn can_register(&self) -> bool {
        self.step == LoginStep::Name && !self.name.trim().is_empty()
    }

    fn expect_step(&self, expected: LoginStep) -> Result<(), LoginError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(LoginError::WrongStep(self.step))
        }
    }

    /// Move to code entry. The caller waits out the simulated send delay first.
    pub fn request_code(&mut self) -> Result<(), LoginError> {
        self.expect_step(LoginStep::Phone)?;
        if self.phone.is_empty() {
            return Err(LoginError::MissingPhone);
        }
        self.code.clear();
        self.step = LoginStep::Otp;
        tracing::info!(phone = %self.phone, "verification code requested");
        Ok(())
    }

    /// Back to phone entry, discarding the typed code.
    pub fn back(&mut self) {
        if self.step == LoginStep::Otp {
            self.code.clear();
            self.step = LoginStep::Phone;
        }
    }

    /// Check the typed code and look the phone up in the directory.
    pub async fn verify<S: DocumentStore>(
        &mut self,
        hub: &Hub<S>,
        accepted_code: &str,
    ) -> Result<LoginOutcome, LoginError> {
        self.expect_step(LoginStep::Otp)?;
        if self.code != accepted_code {
            tracing::debug!(phone = %self.phone, "wrong verification code");
            return Err(LoginError::WrongCode);
        }

        match hub.lookup_user(&self.phone).await {
            Ok(Some(entry)) => {
                self.step = LoginStep::LoggedIn;
                tracing::info!(phone = %self.phone, "existing user logged in");
                Ok(LoginOutcome::LoggedIn {
                    phone: self.phone.clone(),
                    entry,
                })
            }
            Ok(None) => {
                self.step = LoginStep::Name;
                Ok(LoginOutcome::NeedsName)
            }
            Err(e) => Err(LoginError::Lookup(e)),
        }
    }

    /// Register the new phone under the typed name.
    pub async fn register<S: DocumentStore>(
        &mut self,
        hub: &Hub<S>,
    ) -> Result<LoginOutcome, LoginError> {
        self.expect_step(LoginStep::Name)?;
        if self.name.trim().is_empty() {
            return Err(LoginError::MissingName);
        }

        let entry = hub
            .register_user(&self.phone, &self.name)
            .await
            .map_err(LoginError::Registration)?;
        self.step = LoginStep::LoggedIn;
        Ok(LoginOutcome::LoggedIn {
            phone: self.phone.clone(),
            entry,
        })
    }
}
