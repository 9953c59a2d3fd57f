//! # Configuration Tests
//!
//! Tests for configuration defaults, JSON deserialization, and validation.

use rstest::rstest;
use std::fs;
use tempfile::tempdir;
use vsim_harness::common::HarnessError;
use vsim_harness::config::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.general.stall_cycles, 1000);
    assert_eq!(config.general.end_pc, None);
    assert_eq!(config.general.max_cycles, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_memory_config_defaults() {
    let memory = MemoryConfig::default();
    assert_eq!(memory.size, 16 * 1024 * 1024);
    assert_eq!(memory.latency, 1);
    assert_eq!(memory.instr_width, 32);
    assert_eq!(memory.data_width, 32);
    assert_eq!(memory.mmio_addr, None);
    assert!(memory.program.is_none());
    assert!(memory.dump.is_none());
}

#[test]
fn test_trace_and_extension_defaults() {
    let trace = TraceConfig::default();
    assert_eq!(trace.begin_cycles, 0);
    assert_eq!(trace.end_cycles, 0);
    assert!(!trace.waveform);
    assert!(trace.commit_log.is_none());

    let ext = ExtensionConfig::default();
    assert!(!ext.float);
    assert!(!ext.vector);
    assert_eq!(ext.vreg_width, 128);
}

#[test]
fn test_empty_json_is_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.memory.size, MemoryConfig::default().size);
    assert_eq!(config.general.stall_cycles, 1000);
}

#[test]
fn test_partial_sections_keep_defaults() {
    let config = Config::from_json(
        r#"{
            "general": { "end_pc": 256 },
            "memory": { "latency": 4, "dump": { "path": "out.hex", "start": 0, "end": 64 } },
            "trace": { "commit_log": "commit.log" }
        }"#,
    )
    .unwrap();
    assert_eq!(config.general.end_pc, Some(0x100));
    assert_eq!(config.general.stall_cycles, 1000);
    assert_eq!(config.memory.latency, 4);
    assert_eq!(config.memory.data_width, 32);
    let dump = config.memory.dump.unwrap();
    assert_eq!(dump.end, 64);
    assert_eq!(
        config.trace.commit_log.as_deref(),
        Some(std::path::Path::new("commit.log"))
    );
}

#[test]
fn test_malformed_json_is_parse_error() {
    assert!(matches!(
        Config::from_json("{ \"memory\": "),
        Err(HarnessError::ConfigParse(_))
    ));
    assert!(matches!(
        Config::from_json(r#"{ "memory": { "latency": "fast" } }"#),
        Err(HarnessError::ConfigParse(_))
    ));
}

#[rstest]
#[case(r#"{ "memory": { "latency": 0 } }"#)]
#[case(r#"{ "memory": { "instr_width": 0 } }"#)]
#[case(r#"{ "memory": { "data_width": 12 } }"#)]
#[case(r#"{ "memory": { "size": 0 } }"#)]
#[case(r#"{ "memory": { "size": 1024, "dump": { "path": "d", "start": 0, "end": 2048 } } }"#)]
#[case(r#"{ "memory": { "dump": { "path": "d", "start": 64, "end": 32 } } }"#)]
#[case(r#"{ "extensions": { "vector": true, "vreg_width": 100 } }"#)]
fn test_invalid_config_rejected(#[case] json: &str) {
    assert!(matches!(
        Config::from_json(json),
        Err(HarnessError::InvalidConfig(_))
    ));
}

#[test]
fn test_vreg_width_ignored_without_vector() {
    assert!(Config::from_json(r#"{ "extensions": { "vreg_width": 100 } }"#).is_ok());
}

#[test]
fn test_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("harness.json");
    fs::write(&path, r#"{ "memory": { "mmio_addr": 4096 } }"#).unwrap();
    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.memory.mmio_addr, Some(0x1000));
}

#[test]
fn test_from_file_missing_reports_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    match Config::from_file(&missing) {
        Err(HarnessError::ConfigFile { path, source }) => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected ConfigFile error, got {other:?}"),
    }
}

#[test]
fn test_dump_partial_word_past_end_rejected() {
    let json = r#"{ "memory": { "size": 64, "dump": { "path": "d", "start": 62, "end": 64 } } }"#;
    assert!(matches!(
        Config::from_json(json),
        Err(HarnessError::InvalidConfig(_))
    ));
}
