#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use exotrack_core::api::auth::{
    ChangeEmailRequest, ChangePasswordRequest, CheckMobileRequest, ForgotPasswordRequest,
    OtpVerificationRequest, ResetPasswordRequest, SendOtpRequest, SignInRequest, SignUpRequest,
};
use exotrack_core::api::{
    ApiError, ApiResponse, ApiResult, AuthApi, ContractApi, ErrorBody, MultipartPayload,
};
use exotrack_core::utils::persistence::LocalStore;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_store() -> LocalStore {
    let temp = TempDir::new().expect("create temp dir");
    let store = LocalStore::in_dir(temp.path());
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    store
}

/// Scripted outcome of one fake endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Value),
    Reject(u16, Value),
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Ok(json!({ "status": 200, "message": "ok", "data": {} }))
    }

    pub fn data(data: Value) -> Self {
        Reply::Ok(json!({ "status": 200, "message": "ok", "data": data }))
    }

    pub fn reject(status: u16, message: &str) -> Self {
        Reply::Reject(status, json!({ "message": message }))
    }

    fn into_result(self) -> ApiResult<ApiResponse> {
        match self {
            Reply::Ok(body) => Ok(ApiResponse::new(200, body)),
            Reply::Reject(status, body) => Err(ApiError::Status {
                status,
                body: ErrorBody::from_value(&body),
            }),
        }
    }
}

pub struct FakeAuth {
    pub check_mobile: Reply,
    pub send_otp: Reply,
    pub change_email: Reply,
    pub calls: Mutex<Vec<&'static str>>,
    pub checks: Mutex<Vec<CheckMobileRequest>>,
    pub otps: Mutex<Vec<SendOtpRequest>>,
    pub email_changes: Mutex<Vec<ChangeEmailRequest>>,
}

impl Default for FakeAuth {
    fn default() -> Self {
        Self {
            check_mobile: Reply::ok(),
            send_otp: Reply::ok(),
            change_email: Reply::ok(),
            calls: Mutex::new(Vec::new()),
            checks: Mutex::new(Vec::new()),
            otps: Mutex::new(Vec::new()),
            email_changes: Mutex::new(Vec::new()),
        }
    }
}

impl FakeAuth {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl AuthApi for FakeAuth {
    async fn check_mobile(&self, request: &CheckMobileRequest) -> ApiResult<ApiResponse> {
        self.record("check_mobile");
        self.checks.lock().unwrap().push(request.clone());
        self.check_mobile.clone().into_result()
    }

    async fn send_otp(&self, request: &SendOtpRequest) -> ApiResult<ApiResponse> {
        self.record("send_otp");
        self.otps.lock().unwrap().push(request.clone());
        self.send_otp.clone().into_result()
    }

    async fn sign_up(&self, _request: &SignUpRequest) -> ApiResult<ApiResponse> {
        self.record("sign_up");
        Reply::ok().into_result()
    }

    async fn otp_verification(&self, _request: &OtpVerificationRequest) -> ApiResult<ApiResponse> {
        self.record("otp_verification");
        Reply::ok().into_result()
    }

    async fn sign_in(&self, _request: &SignInRequest) -> ApiResult<ApiResponse> {
        self.record("sign_in");
        Reply::ok().into_result()
    }

    async fn forgot_password(&self, _request: &ForgotPasswordRequest) -> ApiResult<ApiResponse> {
        self.record("forgot_password");
        Reply::ok().into_result()
    }

    async fn reset_password(&self, _request: &ResetPasswordRequest) -> ApiResult<ApiResponse> {
        self.record("reset_password");
        Reply::ok().into_result()
    }

    async fn get_profile(&self) -> ApiResult<ApiResponse> {
        self.record("get_profile");
        Reply::ok().into_result()
    }

    async fn edit_profile(&self, _payload: MultipartPayload) -> ApiResult<ApiResponse> {
        self.record("edit_profile");
        Reply::ok().into_result()
    }

    async fn change_email(&self, request: &ChangeEmailRequest) -> ApiResult<ApiResponse> {
        self.record("change_email");
        self.email_changes.lock().unwrap().push(request.clone());
        self.change_email.clone().into_result()
    }

    async fn log_out_user(&self) -> ApiResult<ApiResponse> {
        self.record("log_out_user");
        Reply::ok().into_result()
    }

    async fn change_password(&self, _request: &ChangePasswordRequest) -> ApiResult<ApiResponse> {
        self.record("change_password");
        Reply::ok().into_result()
    }

    async fn upload_profile_picture(&self, _payload: MultipartPayload) -> ApiResult<ApiResponse> {
        self.record("upload_profile_picture");
        Reply::ok().into_result()
    }

    async fn notification_list(&self) -> ApiResult<ApiResponse> {
        self.record("notification_list");
        Reply::ok().into_result()
    }
}

pub struct FakeContracts {
    pub project: Reply,
    pub contract: Reply,
    pub create: Reply,
    pub calls: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<MultipartPayload>>,
}

impl Default for FakeContracts {
    fn default() -> Self {
        Self {
            project: Reply::data(project_json()),
            contract: Reply::Ok(json!({ "status": 200, "data": contract_json() })),
            create: Reply::data(json!({ "id": 77 })),
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

impl FakeContracts {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_submission(&self) -> Option<MultipartPayload> {
        self.submitted.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ContractApi for FakeContracts {
    async fn project_details(&self, project_id: &str) -> ApiResult<ApiResponse> {
        self.calls.lock().unwrap().push(format!("project:{project_id}"));
        self.project.clone().into_result()
    }

    async fn contract_details(&self, contract_id: &str) -> ApiResult<ApiResponse> {
        self.calls.lock().unwrap().push(format!("contract:{contract_id}"));
        self.contract.clone().into_result()
    }

    async fn create_contract(&self, payload: MultipartPayload) -> ApiResult<ApiResponse> {
        self.calls.lock().unwrap().push("create".to_string());
        self.submitted.lock().unwrap().push(payload);
        self.create.clone().into_result()
    }
}

pub fn project_json() -> Value {
    json!({
        "name": "Goma Bridge",
        "reference": "PRJ-2024-01",
        "amount": "250000.00",
        "currency": "CDF",
        "begin_date": "2024-01-15",
        "end_date": "2024-12-31T00:00:00.000Z",
        "description": "Bridge rehabilitation",
        "documents": { "id": 11, "original_name": "plan.pdf" },
        "address": [
            { "country": "DR Congo", "providence": "North Kivu", "city": "Goma" },
            { "country": "DR Congo", "city": "Sake", "municipality": "Masisi" },
        ],
    })
}

pub fn contract_json() -> Value {
    json!({
        "project_id": 42,
        "signed_by": "Jane Doe",
        "position": "Director",
        "currency": "USD",
        "amount": "1500.00",
        "organization": "Kivu Builders",
        "place": "Goma",
        "date_of_signing": "05-03-2024",
        "documents": [
            { "id": 3, "original_name": "signed.pdf" },
            { "id": 8, "original_name": "annex.pdf" },
        ],
        "reference": "CT-001",
        "name": null,
    })
}
