//! sentryedge.toml 통합 설정 테스트
//!
//! - sentryedge.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use sentryedge_core::config::SentryEdgeConfig;
use sentryedge_core::error::{ConfigError, SentryEdgeError};

// =============================================================================
// sentryedge.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../sentryedge.toml.example");
    let config = SentryEdgeConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
    assert_eq!(config.server.bind, "0.0.0.0:8787");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../sentryedge.toml.example");
    let config = SentryEdgeConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_has_expected_sections() {
    let content = include_str!("../../../sentryedge.toml.example");
    let config = SentryEdgeConfig::parse(content).expect("should parse");

    assert_eq!(config.normalizer.max_unwrap_depth, 5);
    assert_eq!(config.storage.backend, "jsonl");
    assert_eq!(config.storage.path, "/var/lib/sentryedge/logs.jsonl");
    assert_eq!(config.server.max_page_size, 1000);
    assert!(config.metrics.enabled);
    assert_eq!(config.metrics.port, 9100);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_only_server_section() {
    let toml = r#"
[server]
bind = "127.0.0.1:9000"
cors_allow_origin = "https://logs.example.com"
"#;
    let config = SentryEdgeConfig::parse(toml).expect("should parse");
    assert_eq!(config.server.bind, "127.0.0.1:9000");
    assert_eq!(config.server.cors_allow_origin, "https://logs.example.com");
    // 나머지는 기본값
    assert_eq!(config.server.default_page_size, 20);
    assert_eq!(config.storage.backend, "memory");
}

#[test]
fn unknown_fields_are_ignored() {
    let toml = r#"
[general]
log_level = "warn"
legacy_option = true
"#;
    let config = SentryEdgeConfig::parse(toml).expect("unknown fields should be ignored");
    assert_eq!(config.general.log_level, "warn");
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_overrides_take_precedence_over_file() {
    let mut config = SentryEdgeConfig::parse("[storage]\nbackend = \"memory\"\n").unwrap();

    // SAFETY: serial 테스트로 실행되어 다른 스레드가 환경변수를 읽지 않습니다.
    unsafe {
        std::env::set_var("SENTRYEDGE_STORAGE_BACKEND", "jsonl");
        std::env::set_var("SENTRYEDGE_NORMALIZER_MAX_UNWRAP_DEPTH", "8");
    }
    config.apply_env_overrides();
    unsafe {
        std::env::remove_var("SENTRYEDGE_STORAGE_BACKEND");
        std::env::remove_var("SENTRYEDGE_NORMALIZER_MAX_UNWRAP_DEPTH");
    }

    assert_eq!(config.storage.backend, "jsonl");
    assert_eq!(config.normalizer.max_unwrap_depth, 8);
}

#[test]
#[serial_test::serial]
fn invalid_env_number_keeps_file_value() {
    let mut config = SentryEdgeConfig::parse("[server]\nmax_page_size = 500\n").unwrap();

    // SAFETY: serial 테스트로 실행되어 다른 스레드가 환경변수를 읽지 않습니다.
    unsafe { std::env::set_var("SENTRYEDGE_SERVER_MAX_PAGE_SIZE", "lots") };
    config.apply_env_overrides();
    unsafe { std::env::remove_var("SENTRYEDGE_SERVER_MAX_PAGE_SIZE") };

    assert_eq!(config.server.max_page_size, 500);
}

// =============================================================================
// 에러 테스트
// =============================================================================

#[test]
fn empty_file_uses_defaults() {
    let config = SentryEdgeConfig::parse("").expect("empty config should parse");
    config.validate().expect("defaults should validate");
}

#[test]
fn wrong_type_is_parse_error() {
    let toml = r#"
[server]
max_body_bytes = "large"
"#;
    let err = SentryEdgeConfig::parse(toml).unwrap_err();
    assert!(matches!(
        err,
        SentryEdgeError::Config(ConfigError::ParseFailed { .. })
    ));
}
