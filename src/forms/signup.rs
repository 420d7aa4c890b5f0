//! Sign-up form: validation, password strength feedback and the
//! check-mobile / send-OTP submission chain.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::{
    value_map, FieldDescriptor, FieldErrors, FormDescriptor, FormFlow, Toast, Validator,
};
use crate::api::auth::{CheckMobileRequest, SendOtpRequest};
use crate::api::{ApiError, AuthApi};
use crate::errors::ClientError;
use crate::utils::persistence::LocalStore;

pub const SIGN_UP_PATH_MARKER: &str = "sign-up";
pub const OTP_VERIFICATION_ROUTE: &str = "/otp-verification";
pub const DEFAULT_MOBILE_CONFLICT: &str = "Mobile number already exists";

pub const PASSWORD_SYMBOLS: &str = "@$!%*#?&";

pub(crate) static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static DIGITS_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("digits pattern compiles"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub company_name: String,
    pub password: String,
    pub confirm_password: String,
    pub country_code: String,
}

impl SignUpValues {
    pub fn with_country_code(country_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            ..Self::default()
        }
    }

    fn to_map(&self) -> BTreeMap<String, String> {
        value_map([
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("email", self.email.as_str()),
            ("mobile", self.mobile.as_str()),
            ("company_name", self.company_name.as_str()),
            ("password", self.password.as_str()),
            ("confirm_password", self.confirm_password.as_str()),
            ("country_code", self.country_code.as_str()),
        ])
    }

    /// Overwrites the non-secret fields with a persisted snapshot.
    pub fn prefill(&mut self, snapshot: &SignUpSnapshot) {
        self.first_name = snapshot.first_name.clone();
        self.last_name = snapshot.last_name.clone();
        self.email = snapshot.email.clone();
        self.mobile = snapshot.mobile.clone();
        self.company_name = snapshot.company_name.clone();
        if !snapshot.country_code.is_empty() {
            self.country_code = snapshot.country_code.clone();
        }
    }
}

/// What survives between visits to the sign-up screen. Passwords are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpSnapshot {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub country_code: String,
}

impl From<&SignUpValues> for SignUpSnapshot {
    fn from(values: &SignUpValues) -> Self {
        Self {
            first_name: values.first_name.clone(),
            last_name: values.last_name.clone(),
            email: values.email.clone(),
            mobile: values.mobile.clone(),
            company_name: values.company_name.clone(),
            country_code: values.country_code.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Acceptable,
    Strong,
}

impl PasswordStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "weak",
            PasswordStrength::Acceptable => "acceptable",
            PasswordStrength::Strong => "strong",
        }
    }
}

fn is_password_symbol(ch: char) -> bool {
    PASSWORD_SYMBOLS.contains(ch)
}

/// Feedback shown while typing; it never blocks submission on its own.
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.chars().count() < 8 {
        return PasswordStrength::Weak;
    }
    let classes = [
        password.chars().any(|ch| ch.is_ascii_alphabetic()),
        password.chars().any(|ch| ch.is_ascii_digit()),
        password.chars().any(is_password_symbol),
    ]
    .into_iter()
    .filter(|present| *present)
    .count();
    match classes {
        3 => PasswordStrength::Strong,
        2 => PasswordStrength::Acceptable,
        _ => PasswordStrength::Weak,
    }
}

fn password_rules(value: &str) -> Result<(), String> {
    let starts_ok = value
        .chars()
        .next()
        .map(|ch| ch.is_ascii_alphanumeric() || is_password_symbol(ch))
        .unwrap_or(false);
    if starts_ok
        && value.chars().any(|ch| ch.is_ascii_alphabetic())
        && value.chars().any(|ch| ch.is_ascii_digit())
        && value.chars().any(is_password_symbol)
    {
        Ok(())
    } else {
        Err("password_requirements".into())
    }
}

pub struct SignUpForm {
    descriptor: FormDescriptor,
}

impl SignUpForm {
    pub fn new() -> Self {
        let name = |key, label, required| {
            FieldDescriptor::new(key, label)
                .required(required)
                .rule(Validator::MinChars(2, "name_min_length"))
                .rule(Validator::MaxChars(20, "name_max_length"))
        };
        let descriptor = FormDescriptor::new(
            "sign_up",
            vec![
                name("first_name", "First name", "first_name_required"),
                name("last_name", "Last name", "last_name_required"),
                FieldDescriptor::new("email", "Email")
                    .required("email_required")
                    .rule(Validator::Matches(EMAIL.clone(), "invalid_email")),
                FieldDescriptor::new("mobile", "Mobile")
                    .required("phone_number_required")
                    .rule(Validator::Matches(DIGITS_ONLY.clone(), "phone_number_format"))
                    .rule(Validator::MinChars(7, "phone_number_min_length"))
                    .rule(Validator::MaxChars(12, "phone_number_max_length")),
                FieldDescriptor::new("company_name", "Organization")
                    .required("organization_name_required")
                    .rule(Validator::MinChars(5, "organization_name_min_length"))
                    .rule(Validator::MaxChars(40, "organization_name_max_length")),
                FieldDescriptor::new("password", "Password")
                    .required("password_required")
                    .rule(Validator::MinChars(8, "password_min_length"))
                    .rule(Validator::custom(password_rules)),
                FieldDescriptor::new("confirm_password", "Confirm password")
                    .required("confirm_password_required"),
            ],
        );
        Self { descriptor }
    }
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FormFlow for SignUpForm {
    type Output = SignUpValues;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn cross_check(&self, values: &BTreeMap<String, String>, errors: &mut FieldErrors) {
        let confirm = values.get("confirm_password").map(String::as_str).unwrap_or("");
        let password = values.get("password").map(String::as_str).unwrap_or("");
        if !confirm.trim().is_empty() && confirm != password {
            errors.insert("confirm_password", "passwords_must_match");
        }
    }

    fn commit(&self, mut values: BTreeMap<String, String>) -> SignUpValues {
        let mut take = |key: &str| values.remove(key).unwrap_or_default();
        SignUpValues {
            first_name: take("first_name"),
            last_name: take("last_name"),
            email: take("email"),
            mobile: take("mobile"),
            company_name: take("company_name"),
            password: take("password"),
            confirm_password: take("confirm_password"),
            country_code: take("country_code"),
        }
    }
}

pub fn validate_sign_up(values: &SignUpValues) -> Result<(), FieldErrors> {
    SignUpForm::new().validate(&values.to_map())
}

/// The submit button is enabled only for a valid form with terms accepted.
pub fn can_submit(values: &SignUpValues, terms_accepted: bool) -> bool {
    terms_accepted && validate_sign_up(values).is_ok()
}

#[derive(Debug, Error)]
pub enum SignUpError {
    #[error("sign-up form is invalid: {0}")]
    Invalid(FieldErrors),
    #[error("terms and privacy policy must be accepted")]
    TermsNotAccepted,
    #[error("could not persist sign-up progress: {0}")]
    Storage(#[from] ClientError),
    #[error("mobile number rejected: {0}")]
    MobileConflict(String),
    #[error("mobile validation failed: {0}")]
    MobileCheckFailed(ApiError),
    #[error("email is already registered")]
    EmailAlreadyRegistered,
    #[error("OTP dispatch failed: {0}")]
    OtpSendFailed(ApiError),
}

impl SignUpError {
    pub fn toast(&self) -> Toast {
        match self {
            SignUpError::Invalid(_) => Toast::error("form_invalid"),
            SignUpError::TermsNotAccepted => Toast::error("accept_terms_required"),
            SignUpError::Storage(_) => Toast::error("something_went_wrong"),
            SignUpError::MobileConflict(message) => Toast::error_text(message.clone()),
            SignUpError::MobileCheckFailed(_) => Toast::error("mobile_validation_error"),
            SignUpError::EmailAlreadyRegistered => Toast::error("email_is_already_registered"),
            SignUpError::OtpSendFailed(_) => Toast::error("otp_send_error"),
        }
    }

    fn from_mobile_check(err: ApiError) -> Self {
        match err.status() {
            Some(400 | 409) => {
                let message = err
                    .body()
                    .and_then(|body| body.message.clone())
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_MOBILE_CONFLICT.to_string());
                SignUpError::MobileConflict(message)
            }
            _ => SignUpError::MobileCheckFailed(err),
        }
    }

    fn from_otp_dispatch(err: ApiError) -> Self {
        match err.status() {
            Some(412) => SignUpError::EmailAlreadyRegistered,
            _ => SignUpError::OtpSendFailed(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub toast: Toast,
    pub navigate_to: &'static str,
}

/// Drives one sign-up screen against an [`AuthApi`] and the local store.
pub struct SignUpFlow<'a, A: AuthApi + ?Sized> {
    api: &'a A,
    store: &'a LocalStore,
    language: String,
}

impl<'a, A: AuthApi + ?Sized> SignUpFlow<'a, A> {
    pub fn new(api: &'a A, store: &'a LocalStore, language: impl Into<String>) -> Self {
        let language = language.into();
        Self {
            api,
            store,
            language: if language.trim().is_empty() {
                "en".into()
            } else {
                language
            },
        }
    }

    /// Values to show when the screen mounts, pre-filled from a saved snapshot.
    pub fn resume(&self, default_country_code: &str) -> Result<SignUpValues, ClientError> {
        let mut values = SignUpValues::with_country_code(default_country_code);
        if let Some(snapshot) = self.store.user::<SignUpSnapshot>()? {
            values.prefill(&snapshot);
        }
        Ok(values)
    }

    pub async fn submit(
        &self,
        values: &SignUpValues,
        terms_accepted: bool,
    ) -> Result<SignUpOutcome, SignUpError> {
        validate_sign_up(values).map_err(SignUpError::Invalid)?;
        if !terms_accepted {
            return Err(SignUpError::TermsNotAccepted);
        }

        self.store.set_user(&SignUpSnapshot::from(values))?;
        self.store.set_path(SIGN_UP_PATH_MARKER)?;

        let check = CheckMobileRequest {
            email: values.email.clone(),
            password: values.password.clone(),
            country_code: values.country_code.clone(),
            mobile: values.mobile.clone(),
            lang: self.language.clone(),
        };
        if let Err(err) = self.api.check_mobile(&check).await {
            warn!(error = %err, "mobile check rejected sign-up");
            return Err(SignUpError::from_mobile_check(err));
        }

        let otp = SendOtpRequest::for_sign_up(
            values.email.clone(),
            values.first_name.clone(),
            format!("{}{}", values.country_code, values.mobile),
        );
        if let Err(err) = self.api.send_otp(&otp).await {
            warn!(error = %err, "OTP dispatch failed");
            return Err(SignUpError::from_otp_dispatch(err));
        }

        info!(email = %values.email, "sign-up OTP sent");
        Ok(SignUpOutcome {
            toast: Toast::success("otp_sent_successfully"),
            navigate_to: OTP_VERIFICATION_ROUTE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_values() -> SignUpValues {
        SignUpValues {
            first_name: "Amani".into(),
            last_name: "Kabila".into(),
            email: "amani@example.cd".into(),
            mobile: "812345678".into(),
            company_name: "Kivu Builders".into(),
            password: "Passw0rd!".into(),
            confirm_password: "Passw0rd!".into(),
            country_code: "+243".into(),
        }
    }

    #[test]
    fn strength_classes() {
        assert_eq!(password_strength("abc"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefgh"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefg1"), PasswordStrength::Acceptable);
        assert_eq!(password_strength("abcdefg!"), PasswordStrength::Acceptable);
        assert_eq!(password_strength("1234567!"), PasswordStrength::Acceptable);
        assert_eq!(password_strength("abcdef1!"), PasswordStrength::Strong);
        assert_eq!(password_strength("ab1!"), PasswordStrength::Weak);
    }

    #[test]
    fn valid_form_passes() {
        assert!(validate_sign_up(&valid_values()).is_ok());
        assert!(can_submit(&valid_values(), true));
        assert!(!can_submit(&valid_values(), false));
    }

    #[test]
    fn each_field_reports_one_key() {
        let values = SignUpValues {
            first_name: "A".into(),
            last_name: String::new(),
            email: "not-an-email".into(),
            mobile: "12ab".into(),
            company_name: "Kivu".into(),
            password: "password1".into(),
            confirm_password: "different".into(),
            country_code: "+243".into(),
        };
        let errors = validate_sign_up(&values).unwrap_err();
        assert_eq!(errors.get("first_name"), Some("name_min_length"));
        assert_eq!(errors.get("last_name"), Some("last_name_required"));
        assert_eq!(errors.get("email"), Some("invalid_email"));
        assert_eq!(errors.get("mobile"), Some("phone_number_format"));
        assert_eq!(errors.get("company_name"), Some("organization_name_min_length"));
        assert_eq!(errors.get("password"), Some("password_requirements"));
        assert_eq!(errors.get("confirm_password"), Some("passwords_must_match"));
    }

    #[test]
    fn mobile_and_password_bounds() {
        let mut values = valid_values();
        values.mobile = "123456".into();
        assert_eq!(
            validate_sign_up(&values).unwrap_err().get("mobile"),
            Some("phone_number_min_length")
        );
        values.mobile = "1234567890123".into();
        assert_eq!(
            validate_sign_up(&values).unwrap_err().get("mobile"),
            Some("phone_number_max_length")
        );

        let mut values = valid_values();
        values.password = "Pa1!".into();
        values.confirm_password = "Pa1!".into();
        assert_eq!(
            validate_sign_up(&values).unwrap_err().get("password"),
            Some("password_min_length")
        );
        values.password = " Passw0rd!".into();
        values.confirm_password = values.password.clone();
        assert_eq!(
            validate_sign_up(&values).unwrap_err().get("password"),
            Some("password_requirements")
        );
    }

    #[test]
    fn snapshot_drops_passwords() {
        let snapshot = SignUpSnapshot::from(&valid_values());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("confirm_password").is_none());
        assert_eq!(json["country_code"], "+243");
    }

    #[test]
    fn mobile_conflict_uses_server_message_or_default() {
        let err = SignUpError::from_mobile_check(ApiError::rejected(409, "Taken"));
        assert_eq!(err.toast(), Toast::error_text("Taken"));
        let err = SignUpError::from_mobile_check(ApiError::Status {
            status: 400,
            body: Default::default(),
        });
        assert_eq!(err.toast(), Toast::error_text(DEFAULT_MOBILE_CONFLICT));
        let err = SignUpError::from_mobile_check(ApiError::rejected(500, "boom"));
        assert_eq!(err.toast(), Toast::error("mobile_validation_error"));
    }
}
