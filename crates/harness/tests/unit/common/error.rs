//! Error Unit Tests.
//!
//! Verifies error messages and conversions from underlying errors.

use std::io;
use std::path::PathBuf;

use vsim_harness::common::HarnessError;

#[test]
fn image_errors_name_the_line() {
    let err = HarnessError::ImageSyntax {
        line: 7,
        token: "zz".into(),
    };
    assert_eq!(err.to_string(), "line 7: malformed hex token `zz'");

    let err = HarnessError::ImageOutOfRange {
        line: 3,
        addr: 0x1000,
        size: 4096,
    };
    assert_eq!(
        err.to_string(),
        "line 3: word at 0x1000 is outside memory of 4096 bytes"
    );
}

#[test]
fn program_image_error_names_the_path() {
    let err = HarnessError::ProgramImage {
        path: PathBuf::from("missing.hex"),
        source: io::Error::new(io::ErrorKind::NotFound, "not found"),
    };
    assert!(err.to_string().starts_with("invalid program path `missing.hex'"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn config_file_error_names_the_path() {
    let err = HarnessError::ConfigFile {
        path: PathBuf::from("harness.json"),
        source: io::Error::new(io::ErrorKind::NotFound, "not found"),
    };
    assert_eq!(err.to_string(), "reading config `harness.json': not found");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn vtype_errors_show_raw_value() {
    let err = HarnessError::UnsupportedSew {
        vsew: 3,
        vtype: 0x18,
    };
    assert_eq!(err.to_string(), "unsupported SEW encoding 3 in vtype 0x18");

    let err = HarnessError::ReservedLmul { vlmul: 4, vtype: 4 };
    assert_eq!(err.to_string(), "reserved LMUL encoding 4 in vtype 0x4");
}

#[test]
fn io_errors_convert() {
    let err: HarnessError = io::Error::other("disk full").into();
    assert!(matches!(err, HarnessError::Io(_)));
    assert_eq!(err.to_string(), "I/O error: disk full");
}

#[test]
fn json_errors_convert() {
    let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: HarnessError = parse.into();
    assert!(matches!(err, HarnessError::ConfigParse(_)));
}
