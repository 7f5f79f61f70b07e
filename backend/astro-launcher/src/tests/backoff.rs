use crate::supervisor::BackoffState;

use astro_config::RegistrationConfig;

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::eq;

#[test]
fn given_default_config_when_created_then_starts_at_two_seconds() {
    let backoff = BackoffState::from_config(&RegistrationConfig::default());

    assert_that!(backoff.interval_secs(), eq(2));
    assert_that!(backoff.interval(), eq(Duration::from_secs(2)));
}

#[test]
fn given_repeated_increases_then_interval_never_decreases() {
    let mut backoff = BackoffState::new(2, 1);
    let mut previous = backoff.interval_secs();

    for _ in 0..10 {
        backoff.increase();
        assert!(backoff.interval_secs() >= previous);
        previous = backoff.interval_secs();
    }

    assert_that!(backoff.interval_secs(), eq(12));
}

#[test]
fn given_huge_interval_when_increased_then_saturates() {
    let mut backoff = BackoffState::new(u64::MAX - 1, 5);

    backoff.increase();
    backoff.increase();

    assert_that!(backoff.interval_secs(), eq(u64::MAX));
}

#[test]
fn given_zero_step_when_increased_then_interval_unchanged() {
    let mut backoff = BackoffState::new(3, 0);

    backoff.increase();

    assert_that!(backoff.interval_secs(), eq(3));
}
