use super::*;
use crate::state::test_helpers::{TEST_FREE_KEY, TEST_PAID_KEY, test_config};

#[test]
fn missing_key_is_rejected() {
    let config = test_config();
    assert_eq!(authenticate(&config, None), Err(AuthError::MissingKey));
    assert_eq!(authenticate(&config, Some("")), Err(AuthError::MissingKey));
}

#[test]
fn unknown_key_is_rejected() {
    let config = test_config();
    assert_eq!(authenticate(&config, Some("who-dis")), Err(AuthError::InvalidKey));
}

#[test]
fn free_and_paid_keys_are_accepted() {
    let config = test_config();
    assert_eq!(authenticate(&config, Some(TEST_FREE_KEY)), Ok(()));
    assert_eq!(authenticate(&config, Some(TEST_PAID_KEY)), Ok(()));
}

#[test]
fn disabled_free_tier_leaves_only_paid_keys() {
    let mut config = test_config();
    config.free_key = String::new();

    assert_eq!(authenticate(&config, Some(TEST_FREE_KEY)), Err(AuthError::InvalidKey));
    assert_eq!(authenticate(&config, Some(TEST_PAID_KEY)), Ok(()));
}

#[test]
fn paid_key_resolves_to_paid_policy() {
    let config = test_config();
    assert_eq!(resolve_tier(&config, Some(TEST_PAID_KEY)), &config.paid_limit);
}

#[test]
fn non_paid_keys_resolve_to_free_policy() {
    let config = test_config();
    assert_eq!(resolve_tier(&config, Some(TEST_FREE_KEY)), &config.free_limit);
    assert_eq!(resolve_tier(&config, Some("who-dis")), &config.free_limit);
}

#[test]
fn absent_key_resolves_to_free_policy() {
    let config = test_config();
    assert_eq!(resolve_tier(&config, None), &config.free_limit);
}

#[test]
fn tier_resolution_trims_whitespace() {
    let config = test_config();
    let padded = format!("  {TEST_PAID_KEY} ");
    assert_eq!(resolve_tier(&config, Some(&padded)), &config.paid_limit);
}
