//! 형식별 파서 레지스트리
//!
//! [`ParserRegistry`]는 우선순위 순서로 등록된 [`ParserRule`] 목록을 순회하며,
//! 첫 번째로 매칭된 규칙의 추출기로 [`ParsedLog`]를 만듭니다.
//! 어떤 규칙도 매칭되지 않으면 [`SeverityClassifier`]에 위임합니다.
//!
//! # 기본 규칙 (우선순위 순)
//! `apache`, `syslog`, `nginx`, `docker-json`, `cloudflare-logpush`, `kubernetes-json`,
//! `json`, `keyvalue`, `windows-eventlog`, `postgresql`, `mysql`, `aws-cloudwatch`, `pfsense`
//!
//! 순서는 의미를 가집니다. 더 일반적인 규칙이 앞에 있으면 뒤의 구체적인 규칙이
//! 가려질 수 있으며 (`apache` → `nginx`, `json` → `aws-cloudwatch`), 이 동작은 그대로 유지합니다.
//!
//! # 사용 예시
//! ```ignore
//! use sentryedge_normalizer::parser::ParserRegistry;
//!
//! let registry = ParserRegistry::with_defaults()?;
//! let parsed = registry.parse_line(r#"{"service":"api","level":"WARN","message":"slow"}"#);
//! assert_eq!(parsed.format, "json");
//! assert_eq!(parsed.level, "warn");
//! ```

pub mod access;
pub mod cloudflare;
pub mod container;
pub mod database;
pub mod json;
pub mod keyvalue;
pub mod syslog;
pub mod windows;

pub use access::AccessLogRule;
pub use cloudflare::CloudflareRule;
pub use container::{DockerJsonRule, KubernetesJsonRule};
pub use database::{MysqlRule, PostgresRule};
pub use json::{CloudWatchRule, GenericJsonRule};
pub use keyvalue::KeyValueRule;
pub use syslog::{PfSenseRule, SyslogRule};
pub use windows::WindowsEventRule;

use regex::Captures;
use serde::Serialize;
use tracing::{debug, warn};

use crate::classifier::SeverityClassifier;
use crate::error::NormalizeError;

/// 타임스탬프 확정 전의 부분 레코드
///
/// 규칙 추출기 또는 분류기가 생성합니다. `timestamp`는 아직 정규화되지 않은 후보입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLog {
    /// 레코드를 만든 규칙 이름
    pub format: String,
    /// 서비스 이름
    pub service: String,
    /// 심각도 (소문자)
    pub level: String,
    /// 메시지
    pub message: String,
    /// 타임스탬프 후보 (정규화 전)
    pub timestamp: Option<String>,
}

impl ParsedLog {
    /// 새 부분 레코드를 생성합니다. `level`은 소문자로 변환됩니다.
    pub fn new(format: &str, service: &str, level: &str, message: impl Into<String>) -> Self {
        Self {
            format: format.to_owned(),
            service: service.to_owned(),
            level: level.trim().to_lowercase(),
            message: message.into(),
            timestamp: None,
        }
    }

    /// 타임스탬프 후보를 설정합니다.
    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// 형식 규칙
///
/// 매처는 라인 모양만 검사하고, 추출기는 매칭된 라인을 다시 해석해 필드를 만듭니다.
/// 추출기 실패는 레지스트리가 처리하므로 규칙은 에러를 그대로 반환하면 됩니다.
pub trait ParserRule: Send + Sync {
    /// 규칙 이름
    fn name(&self) -> &str;

    /// 추출에 실패했을 때 사용할 서비스 이름
    fn default_service(&self) -> &str {
        self.name()
    }

    /// 라인이 이 규칙의 모양인지 검사합니다.
    fn matches(&self, line: &str) -> bool;

    /// 매칭된 라인에서 필드를 추출합니다.
    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError>;
}

/// 파서 레지스트리
pub struct ParserRegistry {
    /// 등록된 규칙 목록 (순서대로 시도)
    rules: Vec<Box<dyn ParserRule>>,
    classifier: SeverityClassifier,
}

impl ParserRegistry {
    /// 규칙이 없는 레지스트리를 생성합니다. 모든 라인이 분류기로 위임됩니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            rules: Vec::new(),
            classifier: SeverityClassifier::new()?,
        })
    }

    /// 기본 13개 규칙을 우선순위 순서로 등록한 레지스트리를 생성합니다.
    pub fn with_defaults() -> Result<Self, NormalizeError> {
        Ok(Self::new()?
            .register(Box::new(AccessLogRule::apache()?))
            .register(Box::new(SyslogRule::new()?))
            .register(Box::new(AccessLogRule::nginx()?))
            .register(Box::new(DockerJsonRule::new()?))
            .register(Box::new(CloudflareRule::new()?))
            .register(Box::new(KubernetesJsonRule::new()?))
            .register(Box::new(GenericJsonRule::new()?))
            .register(Box::new(KeyValueRule::new()?))
            .register(Box::new(WindowsEventRule::new()?))
            .register(Box::new(PostgresRule::new()?))
            .register(Box::new(MysqlRule::new()?))
            .register(Box::new(CloudWatchRule::new()?))
            .register(Box::new(PfSenseRule::new()?)))
    }

    /// 규칙을 등록합니다. 등록 순서대로 시도됩니다.
    pub fn register(mut self, rule: Box<dyn ParserRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// 라인을 해석합니다. 항상 레코드를 반환합니다.
    ///
    /// 첫 번째로 매칭된 규칙만 시도하며, 그 추출기가 실패하면 다음 규칙으로
    /// 넘어가지 않고 해당 규칙의 기본 서비스로 최소 레코드를 만듭니다.
    pub fn parse_line(&self, line: &str) -> ParsedLog {
        let Some(rule) = self.rules.iter().find(|rule| rule.matches(line)) else {
            debug!("no format rule matched, using severity classifier");
            return self.classifier.classify(line);
        };

        match rule.extract(line) {
            Ok(parsed) => {
                debug!(format = rule.name(), "format rule matched");
                parsed
            }
            Err(e) => {
                warn!(
                    format = rule.name(),
                    error = %e,
                    "extractor failed, degrading to minimal record"
                );
                ParsedLog::new(rule.name(), rule.default_service(), "info", line)
            }
        }
    }

    /// 특정 규칙으로 직접 추출합니다. 매처는 검사하지 않습니다.
    pub fn parse_with(&self, name: &str, line: &str) -> Result<ParsedLog, NormalizeError> {
        self.rules
            .iter()
            .find(|rule| rule.name() == name)
            .ok_or_else(|| NormalizeError::UnsupportedFormat(name.to_owned()))?
            .extract(line)
    }

    /// 등록된 규칙 이름 목록을 우선순위 순서로 반환합니다.
    pub fn registered_formats(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// 라인에 매칭되는 첫 번째 규칙 이름을 반환합니다.
    pub fn detect(&self, line: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(line))
            .map(|rule| rule.name())
    }
}

/// 이름 있는 캡처 그룹 값을 가져옵니다.
pub(crate) fn group<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str())
}

/// 이름 있는 캡처 그룹 값을 요구합니다.
pub(crate) fn required<'t>(
    caps: &Captures<'t>,
    name: &str,
    format: &str,
) -> Result<&'t str, NormalizeError> {
    group(caps, name).ok_or_else(|| NormalizeError::parse(format, format!("missing {name}")))
}
