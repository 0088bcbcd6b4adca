//! 컨테이너 런타임 로그 규칙 (Docker json-file / Kubernetes)
//!
//! ```text
//! {"log":"listening on :8080\n","stream":"stdout","time":"2024-01-15T12:00:00.123Z"}
//! {"log":"GET /healthz","level":"debug","kubernetes":{"container_name":"api","pod_name":"api-7d9"}}
//! ```

use regex::Regex;
use serde_json::{Map, Value};

use super::json::{parse_object, text_field};
use super::{ParsedLog, ParserRule};
use crate::error::NormalizeError;

const DOCKER_PATTERN: &str = r#"^\{.*"log":.*\}$"#;
const KUBERNETES_PATTERN: &str = r#"^\{.*"kubernetes":.*\}$"#;

/// `log` 필드를 공백 제거 후 메시지로 사용합니다. 비어 있으면 원본 라인.
fn log_message(obj: &Map<String, Value>, line: &str) -> String {
    text_field(obj, "log")
        .map(|log| log.trim().to_owned())
        .filter(|log| !log.is_empty())
        .unwrap_or_else(|| line.to_owned())
}

/// `docker-json` 규칙
///
/// 서비스 이름은 `stream` (stdout/stderr), 없으면 `docker`입니다.
pub struct DockerJsonRule {
    pattern: Regex,
}

impl DockerJsonRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(DOCKER_PATTERN)?,
        })
    }
}

impl ParserRule for DockerJsonRule {
    fn name(&self) -> &str {
        "docker-json"
    }

    fn default_service(&self) -> &str {
        "docker"
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let obj = parse_object(line, "docker-json")?;
        let service = text_field(&obj, "stream").unwrap_or_else(|| "docker".to_owned());

        Ok(
            ParsedLog::new("docker-json", &service, "info", log_message(&obj, line))
                .with_timestamp(text_field(&obj, "time")),
        )
    }
}

/// `kubernetes-json` 규칙
///
/// 서비스 이름은 `kubernetes.container_name`, 없으면 `kubernetes`입니다.
pub struct KubernetesJsonRule {
    pattern: Regex,
}

impl KubernetesJsonRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(KUBERNETES_PATTERN)?,
        })
    }
}

impl ParserRule for KubernetesJsonRule {
    fn name(&self) -> &str {
        "kubernetes-json"
    }

    fn default_service(&self) -> &str {
        "kubernetes"
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let obj = parse_object(line, "kubernetes-json")?;
        let service = obj
            .get("kubernetes")
            .and_then(Value::as_object)
            .and_then(|k8s| text_field(k8s, "container_name"))
            .unwrap_or_else(|| "kubernetes".to_owned());
        let level = text_field(&obj, "level").unwrap_or_else(|| "info".to_owned());

        Ok(
            ParsedLog::new("kubernetes-json", &service, &level, log_message(&obj, line))
                .with_timestamp(first_time(&obj)),
        )
    }
}

fn first_time(obj: &Map<String, Value>) -> Option<String> {
    text_field(obj, "time").or_else(|| text_field(obj, "timestamp"))
}
