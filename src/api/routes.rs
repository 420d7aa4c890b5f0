//! Fixed route table, relative to the configured base URL.

pub const CHECK_MOBILE: &str = "/auth/check-mobile";
pub const SEND_OTP: &str = "/auth/send-otp";
pub const SIGN_UP: &str = "/auth/sign-up";
pub const VERIFY_OTP: &str = "/auth/verify-otp";
pub const LOGIN: &str = "/auth/login";
pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
pub const RESET_PASSWORD: &str = "/auth/reset-password";
pub const USER_PROFILE: &str = "/user/profile";
pub const EDIT_PROFILE: &str = "/user/profile/edit";
pub const CHANGE_EMAIL: &str = "/user/change-email";
pub const LOGOUT_USER: &str = "/user/logout";
pub const CHANGE_PASSWORD: &str = "/user/change-password";
pub const UPLOAD_FILE: &str = "/user/upload-file";
pub const NOTIFICATION_LIST: &str = "/notification/list";

pub const PROJECT_DETAILS: &str = "/project/details";
pub const CONTRACT_CREATE: &str = "/contract/create";
pub const CONTRACT_DETAILS: &str = "/contract/details";

pub fn project_details(project_id: &str) -> String {
    format!("{}/{}", PROJECT_DETAILS, project_id)
}
