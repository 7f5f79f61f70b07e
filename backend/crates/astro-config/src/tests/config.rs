use crate::Config;
use crate::tests::{EnvGuard, setup_server_dir, write_config};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok};
use log::LevelFilter;
use serial_test::serial;

// =========================================================================
// Load Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_defaults_used() {
    let temp = setup_server_dir();

    let config = Config::load(temp.path()).unwrap();

    assert_that!(config.server.executable.as_str(), eq("AstroServer.exe"));
    assert_eq!(config.server.arguments, vec!["-log".to_string()]);
    assert_that!(config.server.settle_secs, eq(3));
    assert_that!(config.registration.initial_backoff_secs, eq(2));
    assert_that!(config.registration.backoff_step_secs, eq(1));
    assert!(config.update.enabled);
    assert!(config.network.check_url.is_none());
    assert_that!(config.watchdog.poll_interval_ms, eq(500));
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_partial_toml_when_load_then_missing_fields_defaulted() {
    let temp = setup_server_dir();
    write_config(
        temp.path(),
        r#"
[server]
executable = "AstroServer-Win64-Shipping.exe"

[registration]
initial_backoff_secs = 5
"#,
    );

    let config = Config::load(temp.path()).unwrap();

    assert_that!(
        config.server.executable.as_str(),
        eq("AstroServer-Win64-Shipping.exe")
    );
    assert_that!(config.server.settle_secs, eq(3));
    assert_that!(config.registration.initial_backoff_secs, eq(5));
    assert!(config.registration.backoff_on_idle);
}

#[test]
#[serial]
fn given_malformed_toml_when_load_then_error_names_file() {
    let temp = setup_server_dir();
    write_config(temp.path(), "[server\nexecutable = ");

    let result = Config::load(temp.path());

    assert_that!(result, err(anything()));
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Launcher.toml"), "got: {message}");
}

#[test]
#[serial]
fn given_unknown_log_level_when_load_then_falls_back_to_info() {
    let temp = setup_server_dir();
    write_config(temp.path(), "[logging]\nlevel = \"chatty\"\n");

    let config = Config::load(temp.path()).unwrap();

    assert_that!(*config.logging.level, eq(LevelFilter::Info));
    assert_that!(config.logging.level.directive().as_str(), eq("info"));
}

// =========================================================================
// Environment Override Tests
// =========================================================================

#[test]
#[serial]
fn given_env_overrides_when_load_then_env_wins_over_file() {
    let temp = setup_server_dir();
    write_config(temp.path(), "[update]\nenabled = true\n");
    let _update = EnvGuard::set("ASTRO_UPDATE_ENABLED", "false");
    let _settle = EnvGuard::set("ASTRO_SETTLE_SECS", "0");
    let _level = EnvGuard::set("ASTRO_LOG_LEVEL", "debug");

    let config = Config::load(temp.path()).unwrap();

    assert!(!config.update.enabled);
    assert_that!(config.server.settle_secs, eq(0));
    assert_that!(*config.logging.level, eq(LevelFilter::Debug));
}

#[test]
#[serial]
fn given_unparseable_env_number_when_load_then_value_kept() {
    let temp = setup_server_dir();
    let _interval = EnvGuard::set("ASTRO_WATCHDOG_INTERVAL_MS", "soon");

    let config = Config::load(temp.path()).unwrap();

    assert_that!(config.watchdog.poll_interval_ms, eq(500));
}

#[test]
#[serial]
fn given_empty_check_url_env_when_load_then_direct_probe_used() {
    let temp = setup_server_dir();
    write_config(
        temp.path(),
        "[network]\ncheck_url = \"https://check.example.com/api\"\n",
    );
    let _url = EnvGuard::set("ASTRO_NETWORK_CHECK_URL", "");

    let config = Config::load(temp.path()).unwrap();

    assert!(config.network.check_url.is_none());
}

// =========================================================================
// Validation Tests
// =========================================================================

#[test]
#[serial]
fn given_watchdog_interval_too_small_when_validate_then_error() {
    let temp = setup_server_dir();
    let _interval = EnvGuard::set("ASTRO_WATCHDOG_INTERVAL_MS", "10");

    let config = Config::load(temp.path()).unwrap();

    assert_that!(config.validate(), err(anything()));
}

#[test]
#[serial]
fn given_non_http_directory_url_when_validate_then_error() {
    let temp = setup_server_dir();
    let _url = EnvGuard::set("ASTRO_DIRECTORY_URL", "ftp://directory.example.com");

    let config = Config::load(temp.path()).unwrap();

    assert_that!(config.validate(), err(anything()));
}

#[test]
#[serial]
fn given_absolute_log_dir_when_validate_then_error() {
    let temp = setup_server_dir();
    write_config(temp.path(), "[logging]\ndir = \"/var/log/astro\"\n");

    let config = Config::load(temp.path()).unwrap();

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_server_dir_when_log_dir_then_joined() {
    let config = Config::default();

    let dir = config.log_dir(std::path::Path::new("/srv/astro"));

    assert_eq!(dir, std::path::PathBuf::from("/srv/astro/logs"));
}
