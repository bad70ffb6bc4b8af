use super::error::{ErrorCode, HubError, JournalError};
use super::logging;
use crate::domain::SubscriptionHandle;

#[test]
fn logging_init_accepts_levels() {
    // Should not panic
    logging::init("info");
    logging::init("debug");
    logging::init("warn");
}

#[test]
fn test_parse_level() {
    assert_eq!(logging::parse_level("error"), tracing::Level::ERROR);
    assert_eq!(logging::parse_level("WARNING"), tracing::Level::WARN);
    assert_eq!(logging::parse_level(" trace "), tracing::Level::TRACE);
    assert_eq!(logging::parse_level("nonsense"), tracing::Level::INFO);
}

#[test]
fn test_error_codes() {
    let handle = SubscriptionHandle::generate();
    assert_eq!(HubError::NotFound(handle).code(), ErrorCode::NotFound);
    assert_eq!(HubError::AlreadySubscribed(handle).code(), ErrorCode::Conflict);
    assert_eq!(HubError::EmptyMessage.code(), ErrorCode::Invalid);
    assert_eq!(ErrorCode::NotFound.to_string(), "not_found");
}

#[test]
fn test_internal_errors_hide_detail() {
    let parse_err = serde_json::from_str::<u64>("nope").unwrap_err();
    let err = HubError::Storage(JournalError::Encode(parse_err));
    assert_eq!(err.code(), ErrorCode::Internal);
    assert_eq!(err.public_message(), "internal error");

    let handle = SubscriptionHandle::generate();
    let err = HubError::NotFound(handle);
    assert!(err.public_message().contains(&handle.to_string()));
}
