mod common;

use common::{FakeAuth, Reply};
use exotrack_core::forms::modal::ChangeEmailModal;
use exotrack_core::forms::Toast;

#[tokio::test]
async fn otp_then_confirm_closes_modal() {
    let api = FakeAuth::default();
    let mut modal = ChangeEmailModal::new();
    modal.open();
    modal.email = "new@example.cd".into();

    let toast = modal.send_otp(&api).await.unwrap();
    assert_eq!(toast, Toast::success("otp_sent_successfully"));
    assert!(modal.otp_sent());
    assert!(!modal.is_loading());

    modal.otp = "123456".into();
    let toast = modal.confirm(&api).await.unwrap();
    assert_eq!(toast, Toast::success("email_changed_successfully"));
    assert!(!modal.modal.is_open());
    assert_eq!(api.calls(), vec!["send_otp", "change_email"]);

    let request = api.email_changes.lock().unwrap()[0].clone();
    assert_eq!(request.email, "new@example.cd");
    assert_eq!(request.otp, "123456");
}

#[tokio::test]
async fn invalid_email_never_reaches_the_api() {
    let api = FakeAuth::default();
    let mut modal = ChangeEmailModal::new();
    modal.open();
    modal.email = "broken".into();

    let errors = modal.send_otp(&api).await.unwrap_err();
    assert_eq!(errors.get("email"), Some("invalid_email"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn rejected_change_keeps_modal_open() {
    let api = FakeAuth {
        change_email: Reply::reject(400, "Invalid OTP"),
        ..Default::default()
    };
    let mut modal = ChangeEmailModal::new();
    modal.open();
    modal.email = "new@example.cd".into();

    let errors = modal.confirm(&api).await.unwrap_err();
    assert_eq!(errors.get("otp"), Some("otp_required"));

    modal.otp = "000000".into();
    let toast = modal.confirm(&api).await.unwrap();
    assert_eq!(toast, Toast::error_text("Invalid OTP"));
    assert!(modal.modal.is_open());
}
