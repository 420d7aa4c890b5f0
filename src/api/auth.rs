//! Authentication and profile endpoints.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use super::{routes, ApiClient, ApiResponse, ApiResult, MultipartPayload};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckMobileRequest {
    pub email: String,
    pub password: String,
    pub country_code: String,
    pub mobile: String,
    pub lang: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SendOtpRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
}

impl SendOtpRequest {
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            is_login: None,
            mobile: None,
        }
    }

    /// OTP request issued by the sign-up form; `mobile` already carries the
    /// country code prefix.
    pub fn for_sign_up(
        email: impl Into<String>,
        first_name: impl Into<String>,
        mobile: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: Some(first_name.into()),
            is_login: Some("no".into()),
            mobile: Some(mobile.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country_code: String,
    pub mobile: String,
    pub company_name: String,
    pub password: String,
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OtpVerificationRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChangeEmailRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Account lifecycle calls. Each method performs exactly one request.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn check_mobile(&self, request: &CheckMobileRequest) -> ApiResult<ApiResponse>;
    async fn send_otp(&self, request: &SendOtpRequest) -> ApiResult<ApiResponse>;
    async fn sign_up(&self, request: &SignUpRequest) -> ApiResult<ApiResponse>;
    async fn otp_verification(&self, request: &OtpVerificationRequest) -> ApiResult<ApiResponse>;
    async fn sign_in(&self, request: &SignInRequest) -> ApiResult<ApiResponse>;
    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<ApiResponse>;
    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<ApiResponse>;
    async fn get_profile(&self) -> ApiResult<ApiResponse>;
    async fn edit_profile(&self, payload: MultipartPayload) -> ApiResult<ApiResponse>;
    async fn change_email(&self, request: &ChangeEmailRequest) -> ApiResult<ApiResponse>;
    async fn log_out_user(&self) -> ApiResult<ApiResponse>;
    async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<ApiResponse>;
    async fn upload_profile_picture(&self, payload: MultipartPayload) -> ApiResult<ApiResponse>;
    async fn notification_list(&self) -> ApiResult<ApiResponse>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn check_mobile(&self, request: &CheckMobileRequest) -> ApiResult<ApiResponse> {
        debug!(mobile = %request.mobile, "checking mobile availability");
        self.send(self.guest(Method::POST, routes::CHECK_MOBILE).json(request))
            .await
    }

    async fn send_otp(&self, request: &SendOtpRequest) -> ApiResult<ApiResponse> {
        debug!(email = %request.email, "requesting OTP");
        self.send(self.guest(Method::POST, routes::SEND_OTP).json(request))
            .await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> ApiResult<ApiResponse> {
        self.send(self.guest(Method::POST, routes::SIGN_UP).json(request))
            .await
    }

    async fn otp_verification(&self, request: &OtpVerificationRequest) -> ApiResult<ApiResponse> {
        self.send(self.guest(Method::POST, routes::VERIFY_OTP).json(request))
            .await
    }

    async fn sign_in(&self, request: &SignInRequest) -> ApiResult<ApiResponse> {
        self.send(self.guest(Method::POST, routes::LOGIN).json(request))
            .await
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<ApiResponse> {
        self.send(self.guest(Method::POST, routes::FORGOT_PASSWORD).json(request))
            .await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<ApiResponse> {
        self.send(self.guest(Method::POST, routes::RESET_PASSWORD).json(request))
            .await
    }

    async fn get_profile(&self) -> ApiResult<ApiResponse> {
        self.send(self.authorized(Method::GET, routes::USER_PROFILE)?)
            .await
    }

    async fn edit_profile(&self, payload: MultipartPayload) -> ApiResult<ApiResponse> {
        let form = payload.into_form()?;
        self.send(self.authorized(Method::PUT, routes::EDIT_PROFILE)?.multipart(form))
            .await
    }

    async fn change_email(&self, request: &ChangeEmailRequest) -> ApiResult<ApiResponse> {
        self.send(self.authorized(Method::PUT, routes::CHANGE_EMAIL)?.json(request))
            .await
    }

    async fn log_out_user(&self) -> ApiResult<ApiResponse> {
        self.send(self.authorized(Method::GET, routes::LOGOUT_USER)?)
            .await
    }

    async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<ApiResponse> {
        self.send(self.authorized(Method::PUT, routes::CHANGE_PASSWORD)?.json(request))
            .await
    }

    async fn upload_profile_picture(&self, payload: MultipartPayload) -> ApiResult<ApiResponse> {
        let form = payload.into_form()?;
        self.send(self.authorized(Method::POST, routes::UPLOAD_FILE)?.multipart(form))
            .await
    }

    async fn notification_list(&self) -> ApiResult<ApiResponse> {
        self.send(self.authorized(Method::POST, routes::NOTIFICATION_LIST)?)
            .await
    }
}
