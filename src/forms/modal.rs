//! Modal state for the profile screen and the wizard confirmation.

use tracing::{info, warn};

use super::signup::EMAIL;
use super::{FieldDescriptor, FieldErrors, Toast, Validator};
use crate::api::auth::{ChangeEmailRequest, SendOtpRequest};
use crate::api::AuthApi;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modal {
    open: bool,
}

impl Modal {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// Two-stage email change: request an OTP for the new address, then confirm.
#[derive(Debug, Clone, Default)]
pub struct ChangeEmailModal {
    pub modal: Modal,
    pub email: String,
    pub otp: String,
    loading: bool,
    otp_sent: bool,
}

impl ChangeEmailModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.email.clear();
        self.otp.clear();
        self.otp_sent = false;
        self.modal.open();
    }

    pub fn close(&mut self) {
        self.modal.close();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn otp_sent(&self) -> bool {
        self.otp_sent
    }

    fn email_field() -> FieldDescriptor {
        FieldDescriptor::new("email", "Email")
            .required("email_required")
            .rule(Validator::Matches(EMAIL.clone(), "invalid_email"))
    }

    pub fn validate_email(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Err(err) = Self::email_field().check(&self.email) {
            errors.insert("email", err.message);
        }
        errors.into_result()
    }

    /// Sends an OTP to the new address. The loading flag is held for the call.
    pub async fn send_otp<A: AuthApi + ?Sized>(&mut self, api: &A) -> Result<Toast, FieldErrors> {
        self.validate_email()?;
        self.loading = true;
        let result = api
            .send_otp(&SendOtpRequest::for_email(self.email.trim()))
            .await;
        self.loading = false;
        Ok(match result {
            Ok(_) => {
                self.otp_sent = true;
                info!(email = %self.email.trim(), "change-email OTP sent");
                Toast::success("otp_sent_successfully")
            }
            Err(err) => {
                warn!(error = %err, "change-email OTP failed");
                Toast::error("otp_send_error")
            }
        })
    }

    /// Confirms the change with the received OTP and closes on success.
    pub async fn confirm<A: AuthApi + ?Sized>(&mut self, api: &A) -> Result<Toast, FieldErrors> {
        self.validate_email()?;
        if self.otp.trim().is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert("otp", "otp_required");
            return Err(errors);
        }
        self.loading = true;
        let result = api
            .change_email(&ChangeEmailRequest {
                email: self.email.trim().to_string(),
                otp: self.otp.trim().to_string(),
            })
            .await;
        self.loading = false;
        Ok(match result {
            Ok(_) => {
                self.close();
                Toast::success("email_changed_successfully")
            }
            Err(err) => {
                warn!(error = %err, "email change rejected");
                match err.body().and_then(|body| body.message.clone()) {
                    Some(message) => Toast::error_text(message),
                    None => Toast::error("email_change_error"),
                }
            }
        })
    }
}
