//! Configuration file and driver selection tests

use crate::helpers::*;
use ncs::prelude::*;
use ncs::DriverKind;
use std::io::Write;

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_mock_from_config_file() {
    init_tracing();
    let file = write_config(
        r#"
        driver = "mock"

        [mock]
        device_count = 2
        io_timeout_ms = 20
        "#,
    );

    let ncs = Ncs::builder().config_file(file.path()).unwrap().build().unwrap();
    assert_eq!(ncs.driver().name(), "mock");
    assert!(ncs.device(1).is_ok());
    assert_eq!(
        ncs.device(2).unwrap_err().status(),
        Some(Status::DeviceNotFound)
    );
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = NcsConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_malformed_config_file() {
    let file = write_config("driver = [");
    let err = NcsConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}

#[test]
fn test_config_roundtrip_through_file() {
    let mut config = NcsConfig::mock(test_config().device_count(3));
    config.mock.temperature = 60.5;
    let file = write_config(&config.to_toml_string().unwrap());

    let loaded = NcsConfig::load(file.path()).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.driver, DriverKind::Mock);
}

/// The native driver fails cleanly when libmvnc is not where it is configured.
#[cfg(feature = "mvnc")]
#[test]
fn test_native_driver_missing_library() {
    if std::env::var_os(ncs::MVNC_LIBRARY_ENV).is_some() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let mut config = NcsConfig::default();
    config.mvnc = ncs::MvncConfig::with_library_path(dir.path().join("libmvnc.so"));

    let err = Ncs::from_config(&config).unwrap_err();
    assert!(matches!(err, Error::Library(_)), "{err}");
}
