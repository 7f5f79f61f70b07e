use crate::LauncherError;

use astro_api::ApiError;
use astro_config::ConfigError;

use std::path::PathBuf;
use std::panic::Location;

use error_location::ErrorLocation;

#[test]
fn given_unavailable_directory_then_error_is_transient() {
    let err = LauncherError::from(ApiError::api_error(
        "ServiceUnavailable".to_string(),
        "down".to_string(),
    ));

    assert!(err.is_transient());
}

#[test]
fn given_rejected_authentication_then_not_transient() {
    let err = LauncherError::from(ApiError::api_error(
        "NotAuthorized".to_string(),
        "bad ticket".to_string(),
    ));

    assert!(!err.is_transient());
}

#[test]
fn given_missing_executable_then_not_transient_with_path_hint() {
    let err = LauncherError::ExecutableNotFound {
        path: PathBuf::from("AstroServer.exe"),
        location: ErrorLocation::from(Location::caller()),
    };

    assert!(!err.is_transient());
    assert!(err.recovery_hint().contains("--path"));
}

#[test]
fn given_startup_exit_then_message_carries_elapsed_and_backoff() {
    let err = LauncherError::ServerExitedBeforeRegistration {
        exit_code: Some(1),
        elapsed_secs: 12.5,
        backoff_secs: 4,
        location: ErrorLocation::from(Location::caller()),
    };

    let message = err.to_string();

    assert!(message.contains("12.5s"));
    assert!(message.contains("backoff 4s"));
}

#[test]
fn given_config_error_then_converts_with_config_hint() {
    let err = LauncherError::from(ConfigError::config("bad value"));

    assert!(matches!(err, LauncherError::Config { .. }));
    assert!(err.recovery_hint().contains("Launcher.toml"));
}

#[test]
fn given_io_error_then_converts() {
    let err = LauncherError::from(std::io::Error::other("disk gone"));

    assert!(matches!(err, LauncherError::Io { .. }));
}
