use super::*;

#[test]
fn error_codes_are_stable() {
    assert_eq!(BoardError::NotFound("x".into()).error_code(), "E_NOT_FOUND");
    assert_eq!(BoardError::Validation("x".into()).error_code(), "E_VALIDATION");
    assert_eq!(BoardError::Persistence("x".into()).error_code(), "E_PERSISTENCE");

    let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert_eq!(BoardError::from(parse).error_code(), "E_PARSE");
}

#[test]
fn only_persistence_is_retryable() {
    assert!(BoardError::Persistence("offline".into()).retryable());
    assert!(!BoardError::NotFound("x".into()).retryable());
    assert!(!BoardError::Validation("x".into()).retryable());
}

#[test]
fn element_not_found_mentions_id() {
    let id = uuid::Uuid::nil();
    let err = BoardError::element_not_found(id);
    assert!(err.to_string().contains(&id.to_string()));
}
