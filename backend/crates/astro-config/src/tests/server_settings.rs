use crate::tests::{setup_server_dir, write_server_ini};
use crate::{ConfigError, ServerSettings};

use std::net::{IpAddr, Ipv4Addr};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err};

const SETTINGS: &str = "[/Script/Astro.AstroServerSettings]\n\
PublicIP=203.0.113.7\n\
ServerGuid=8d9f0c3e2f6a4b0c9a1e\n\
ConsolePort=1234\n\
ServerName=Test Base\n";

#[test]
fn given_both_files_when_load_then_settings_read() {
    let temp = setup_server_dir();
    write_server_ini(temp.path(), SETTINGS, Some("[URL]\nPort=8777\n"));

    let settings = ServerSettings::load(temp.path()).unwrap();

    assert_that!(
        settings.public_ip,
        eq(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)))
    );
    assert_that!(settings.port, eq(8777));
    assert_that!(settings.console_port, eq(1234));
    assert_that!(settings.server_guid.as_str(), eq("8d9f0c3e2f6a4b0c9a1e"));
    assert_that!(settings.server_name.as_deref(), eq(Some("Test Base")));
    assert_that!(settings.address_key().as_str(), eq("203.0.113.7:8777"));
}

#[test]
fn given_no_engine_ini_when_load_then_default_port() {
    let temp = setup_server_dir();
    write_server_ini(temp.path(), SETTINGS, None);

    let settings = ServerSettings::load(temp.path()).unwrap();

    assert_that!(settings.port, eq(7777));
}

#[test]
fn given_no_settings_file_when_load_then_io_error() {
    let temp = setup_server_dir();

    let result = ServerSettings::load(temp.path());

    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn given_missing_guid_when_load_then_missing_setting_error() {
    let temp = setup_server_dir();
    write_server_ini(
        temp.path(),
        "[/Script/Astro.AstroServerSettings]\nPublicIP=203.0.113.7\nConsolePort=1234\nServerGuid=\n",
        None,
    );

    let result = ServerSettings::load(temp.path());

    match result {
        Err(ConfigError::MissingSetting { key, .. }) => assert_eq!(key, "ServerGuid"),
        other => panic!("expected MissingSetting, got {other:?}"),
    }
}

#[test]
fn given_hostname_public_ip_when_load_then_error() {
    let temp = setup_server_dir();
    write_server_ini(
        temp.path(),
        "[/Script/Astro.AstroServerSettings]\nPublicIP=myhost.example.com\nConsolePort=1234\nServerGuid=abc\n",
        None,
    );

    assert_that!(ServerSettings::load(temp.path()), err(anything()));
}

#[test]
fn given_console_port_equal_to_game_port_when_load_then_error() {
    let temp = setup_server_dir();
    write_server_ini(
        temp.path(),
        "[/Script/Astro.AstroServerSettings]\nPublicIP=203.0.113.7\nConsolePort=7777\nServerGuid=abc\n",
        None,
    );

    assert_that!(ServerSettings::load(temp.path()), err(anything()));
}

#[test]
fn given_out_of_range_port_when_load_then_error() {
    let temp = setup_server_dir();
    write_server_ini(temp.path(), SETTINGS, Some("[URL]\nPort=70000\n"));

    assert_that!(ServerSettings::load(temp.path()), err(anything()));
}
