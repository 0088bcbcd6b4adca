//! 설정 관리: sentryedge.toml 파싱 및 런타임 설정
//!
//! [`SentryEdgeConfig`]는 모든 컴포넌트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SENTRYEDGE_SERVER_BIND=0.0.0.0:8787` 형식)
//! 3. 설정 파일 (`sentryedge.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), sentryedge_core::error::SentryEdgeError> {
//! use sentryedge_core::config::SentryEdgeConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = SentryEdgeConfig::load("sentryedge.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = SentryEdgeConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, SentryEdgeError};

/// `raw` 언랩 깊이 상한 (설정 가능한 최댓값)
pub const MAX_UNWRAP_DEPTH_LIMIT: usize = 32;

/// SentryEdge 통합 설정
///
/// `sentryedge.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 컴포넌트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentryEdgeConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// HTTP 수집 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 정규화 엔진 설정
    #[serde(default)]
    pub normalizer: NormalizerSection,
    /// 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl SentryEdgeConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SentryEdgeError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SentryEdgeError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SentryEdgeError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SentryEdgeError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, SentryEdgeError> {
        toml::from_str(toml_str).map_err(|e| {
            SentryEdgeError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SENTRYEDGE_{SECTION}_{FIELD}`
    /// 예: `SENTRYEDGE_STORAGE_BACKEND=jsonl`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SENTRYEDGE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SENTRYEDGE_GENERAL_LOG_FORMAT");

        // Server
        override_string(&mut self.server.bind, "SENTRYEDGE_SERVER_BIND");
        override_usize(
            &mut self.server.max_body_bytes,
            "SENTRYEDGE_SERVER_MAX_BODY_BYTES",
        );
        override_string(
            &mut self.server.cors_allow_origin,
            "SENTRYEDGE_SERVER_CORS_ALLOW_ORIGIN",
        );
        override_usize(
            &mut self.server.default_page_size,
            "SENTRYEDGE_SERVER_DEFAULT_PAGE_SIZE",
        );
        override_usize(
            &mut self.server.max_page_size,
            "SENTRYEDGE_SERVER_MAX_PAGE_SIZE",
        );

        // Normalizer
        override_usize(
            &mut self.normalizer.max_unwrap_depth,
            "SENTRYEDGE_NORMALIZER_MAX_UNWRAP_DEPTH",
        );

        // Storage
        override_string(&mut self.storage.backend, "SENTRYEDGE_STORAGE_BACKEND");
        override_string(&mut self.storage.path, "SENTRYEDGE_STORAGE_PATH");

        // Metrics
        override_bool(&mut self.metrics.enabled, "SENTRYEDGE_METRICS_ENABLED");
        override_string(
            &mut self.metrics.listen_addr,
            "SENTRYEDGE_METRICS_LISTEN_ADDR",
        );
        override_u16(&mut self.metrics.port, "SENTRYEDGE_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), SentryEdgeError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.server.bind.trim().is_empty() {
            return Err(invalid("server.bind", "must not be empty".to_owned()));
        }

        if self.server.max_body_bytes == 0 {
            return Err(invalid(
                "server.max_body_bytes",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.server.default_page_size == 0 || self.server.max_page_size == 0 {
            return Err(invalid(
                "server.default_page_size",
                "page sizes must be greater than 0".to_owned(),
            ));
        }

        if self.server.default_page_size > self.server.max_page_size {
            return Err(invalid(
                "server.default_page_size",
                format!("must not exceed max_page_size ({})", self.server.max_page_size),
            ));
        }

        // 언랩 깊이 검증: 0이면 `raw` 문자열을 전혀 풀지 않아 의미가 없음
        if self.normalizer.max_unwrap_depth == 0
            || self.normalizer.max_unwrap_depth > MAX_UNWRAP_DEPTH_LIMIT
        {
            return Err(invalid(
                "normalizer.max_unwrap_depth",
                format!("must be 1-{MAX_UNWRAP_DEPTH_LIMIT}"),
            ));
        }

        // storage backend 검증
        let valid_backends = ["memory", "jsonl"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            return Err(invalid(
                "storage.backend",
                format!("must be one of: {}", valid_backends.join(", ")),
            ));
        }

        if self.storage.backend == "jsonl" && self.storage.path.trim().is_empty() {
            return Err(invalid(
                "storage.path",
                "path must not be empty when backend is jsonl".to_owned(),
            ));
        }

        if self.metrics.enabled && self.metrics.endpoint != "/metrics" {
            return Err(invalid(
                "metrics.endpoint",
                "only '/metrics' is supported".to_owned(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> SentryEdgeError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// HTTP 수집 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인드 주소
    pub bind: String,
    /// 요청 본문 최대 크기 (바이트)
    pub max_body_bytes: usize,
    /// `Access-Control-Allow-Origin` 값
    pub cors_allow_origin: String,
    /// `GET /logs` 기본 페이지 크기
    pub default_page_size: usize,
    /// `GET /logs` 최대 페이지 크기
    pub max_page_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8787".to_owned(),
            max_body_bytes: 1024 * 1024, // 1MB
            cors_allow_origin: "*".to_owned(),
            default_page_size: 20,
            max_page_size: 1000,
        }
    }
}

/// 정규화 엔진 설정 섹션
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerSection {
    /// 중첩 `raw` 문자열 언랩 최대 깊이
    pub max_unwrap_depth: usize,
}

impl Default for NormalizerSection {
    fn default() -> Self {
        Self {
            max_unwrap_depth: 5,
        }
    }
}

/// 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 백엔드 (memory, jsonl)
    pub backend: String,
    /// jsonl 백엔드 파일 경로
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_owned(),
            path: "/var/lib/sentryedge/logs.jsonl".to_owned(),
        }
    }
}

/// Prometheus 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 리스너 주소
    pub listen_addr: String,
    /// 리스너 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9100,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}
