use std::fmt;

use thiserror::Error;

use crate::api::ApiError;
use crate::forms::FieldErrors;

/// Translation keys surfaced when contract submission fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractErrorKey {
    AmountValidationFailed,
    ValidationError,
    AlreadyExists,
    AmountInvalid,
    DateInvalid,
    RequiredFieldsMissing,
    FileUploadError,
    SaveError,
    CreationFailed,
    UpdateFailed,
}

const ALL_KEYS: [ContractErrorKey; 10] = [
    ContractErrorKey::AmountValidationFailed,
    ContractErrorKey::ValidationError,
    ContractErrorKey::AlreadyExists,
    ContractErrorKey::AmountInvalid,
    ContractErrorKey::DateInvalid,
    ContractErrorKey::RequiredFieldsMissing,
    ContractErrorKey::FileUploadError,
    ContractErrorKey::SaveError,
    ContractErrorKey::CreationFailed,
    ContractErrorKey::UpdateFailed,
];

impl ContractErrorKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractErrorKey::AmountValidationFailed => "contract_amount_validation_failed",
            ContractErrorKey::ValidationError => "contract_validation_error",
            ContractErrorKey::AlreadyExists => "contract_already_exists",
            ContractErrorKey::AmountInvalid => "contract_amount_invalid",
            ContractErrorKey::DateInvalid => "contract_date_invalid",
            ContractErrorKey::RequiredFieldsMissing => "required_fields_missing",
            ContractErrorKey::FileUploadError => "file_upload_error",
            ContractErrorKey::SaveError => "contract_save_error",
            ContractErrorKey::CreationFailed => "contract_creation_failed",
            ContractErrorKey::UpdateFailed => "contract_update_failed",
        }
    }

    /// Structured server code, when the API sends one. Codes are the key
    /// names themselves, matched case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        ALL_KEYS
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(code))
    }

    /// Maps a free-form server message to a key. The first matching rule wins.
    pub fn classify(message: &str) -> Self {
        let text = message.to_lowercase();
        let has = |needle: &str| text.contains(needle);

        if (has("contract amount") && has("exceed") && has("budget"))
            || (has("total amount") && has("exceed") && has("budget"))
            || (has("amount") && (has("exceed") || has("budget")))
        {
            return ContractErrorKey::AmountValidationFailed;
        }
        if has("validation") || has("invalid") {
            return ContractErrorKey::ValidationError;
        }
        if has("already exists") || has("duplicate") {
            return ContractErrorKey::AlreadyExists;
        }
        // Unreachable in practice: both conditions are caught above.
        if has("amount") && (has("invalid") || has("exceed")) {
            return ContractErrorKey::AmountInvalid;
        }
        if has("date") && (has("invalid") || has("past")) {
            return ContractErrorKey::DateInvalid;
        }
        if has("required") || has("missing") {
            return ContractErrorKey::RequiredFieldsMissing;
        }
        if has("file") || has("upload") {
            return ContractErrorKey::FileUploadError;
        }
        if has("reference") {
            return ContractErrorKey::AlreadyExists;
        }
        ContractErrorKey::SaveError
    }
}

impl fmt::Display for ContractErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_contract_error(message: &str) -> ContractErrorKey {
    ContractErrorKey::classify(message)
}

/// Key for a failed create/update call.
///
/// A structured `code` wins. On 422 the message comes from `message`, then
/// `error`, then `"Validation failed"`, and edit mode always reports
/// `contract_update_failed`. Other failures classify `message` when present.
pub fn submission_error_key(err: &ApiError, edit_mode: bool) -> ContractErrorKey {
    let body = err.body();
    if let Some(key) = body
        .and_then(|body| body.code.as_deref())
        .and_then(ContractErrorKey::from_code)
    {
        return key;
    }

    if err.status() == Some(422) {
        if edit_mode {
            return ContractErrorKey::UpdateFailed;
        }
        let message = body
            .and_then(|body| body.message.as_deref().or(body.error.as_deref()))
            .unwrap_or("Validation failed");
        return classify_contract_error(message);
    }

    match body.and_then(|body| body.message.as_deref()) {
        Some(message) => classify_contract_error(message),
        None => ContractErrorKey::CreationFailed,
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("contract info is invalid: {0}")]
    Invalid(FieldErrors),
    #[error("submission is only possible from the review step")]
    NotOnReview,
    #[error("a submission is already in flight")]
    SubmissionPending,
    #[error("date of signing `{0}` is not DD-MM-YYYY or YYYY-MM-DD")]
    InvalidSigningDate(String),
    #[error("contract submission failed ({key}): {source}")]
    Rejected {
        key: ContractErrorKey,
        #[source]
        source: ApiError,
    },
    #[error("unexpected create-contract response: {0}")]
    UnexpectedResponse(ApiError),
}

impl WizardError {
    /// Translation key a UI shows for this failure.
    pub fn message_key(&self) -> &'static str {
        match self {
            WizardError::Invalid(_) => "form_invalid",
            WizardError::NotOnReview | WizardError::SubmissionPending => "contract_save_error",
            WizardError::InvalidSigningDate(_) => "contract_date_invalid",
            WizardError::Rejected { key, .. } => key.as_str(),
            WizardError::UnexpectedResponse(_) => "contract_save_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorBody;

    #[test]
    fn classification_order() {
        let cases = [
            ("Contract amount exceeds project budget", "contract_amount_validation_failed"),
            ("Total amount would EXCEED the budget", "contract_amount_validation_failed"),
            ("amount over budget", "contract_amount_validation_failed"),
            ("Validation error on field", "contract_validation_error"),
            ("Invalid amount", "contract_validation_error"),
            ("Contract already exists", "contract_already_exists"),
            ("Duplicate entry", "contract_already_exists"),
            ("Date is in the past", "contract_date_invalid"),
            ("Signed by is required", "required_fields_missing"),
            ("Missing place", "required_fields_missing"),
            ("Upload failed", "file_upload_error"),
            ("File too large", "file_upload_error"),
            ("Reference taken", "contract_already_exists"),
            ("Something broke", "contract_save_error"),
            ("", "contract_save_error"),
        ];
        for (message, expected) in cases {
            assert_eq!(classify_contract_error(message).as_str(), expected, "{message}");
        }
    }

    #[test]
    fn unprocessable_uses_message_then_error_then_default() {
        let err = ApiError::rejected(422, "Contract amount exceeds budget");
        assert_eq!(
            submission_error_key(&err, false),
            ContractErrorKey::AmountValidationFailed
        );

        let err = ApiError::Status {
            status: 422,
            body: ErrorBody {
                error: Some("Duplicate reference".into()),
                ..Default::default()
            },
        };
        assert_eq!(submission_error_key(&err, false), ContractErrorKey::AlreadyExists);

        let err = ApiError::Status {
            status: 422,
            body: ErrorBody::default(),
        };
        assert_eq!(submission_error_key(&err, false), ContractErrorKey::ValidationError);
    }

    #[test]
    fn edit_mode_unprocessable_is_update_failure() {
        let err = ApiError::rejected(422, "Contract amount exceeds budget");
        assert_eq!(submission_error_key(&err, true), ContractErrorKey::UpdateFailed);
    }

    #[test]
    fn other_statuses() {
        let err = ApiError::rejected(500, "Upload storage offline");
        assert_eq!(submission_error_key(&err, false), ContractErrorKey::FileUploadError);
        let err = ApiError::Status {
            status: 500,
            body: ErrorBody::default(),
        };
        assert_eq!(submission_error_key(&err, false), ContractErrorKey::CreationFailed);
        assert_eq!(
            submission_error_key(&ApiError::Unauthenticated, true),
            ContractErrorKey::CreationFailed
        );
    }

    #[test]
    fn structured_code_wins() {
        let err = ApiError::Status {
            status: 422,
            body: ErrorBody {
                message: Some("Contract amount exceeds budget".into()),
                code: Some("CONTRACT_DATE_INVALID".into()),
                ..Default::default()
            },
        };
        assert_eq!(submission_error_key(&err, true), ContractErrorKey::DateInvalid);
        assert_eq!(ContractErrorKey::from_code("4221"), None);
    }
}
