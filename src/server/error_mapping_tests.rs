use super::*;
use crate::ordering::OrderingError;

#[test]
fn test_nested_errors_delegate() {
    let err = BlockError::Ordering(OrderingError::InvalidPosition {
        position: 9,
        len: 2,
    });
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.error_code_and_tip().0, "INVALID_POSITION");

    let err = AuthError::User(UserError::UserNotFound("x".to_string()));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_taxonomy() {
    assert_eq!(AuthError::MissingToken.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(UserError::NotOwner.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        StreamError::StreamNotFound("s".to_string()).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        StreamError::SlugTaken("s".to_string()).status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        BlockError::InvalidBlock("bad".to_string()).status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        DbError::Poisoned.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_critical_transfer_code() {
    let err = UserError::TransferCritical("disk full".to_string());
    let (code, tip) = err.error_code_and_tip();
    assert!(code.starts_with("CRITICAL_"));
    assert!(tip.is_some());
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
