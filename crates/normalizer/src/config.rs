//! 정규화 엔진 설정
//!
//! [`NormalizerConfig`]는 core의 [`NormalizerSection`](sentryedge_core::config::NormalizerSection)을
//! 기반으로 엔진 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use sentryedge_core::config::SentryEdgeConfig;
//! use sentryedge_normalizer::config::NormalizerConfig;
//!
//! let core_config = SentryEdgeConfig::default();
//! let config = NormalizerConfig::from_core(&core_config.normalizer);
//! ```

use serde::{Deserialize, Serialize};

use sentryedge_core::config::{MAX_UNWRAP_DEPTH_LIMIT, NormalizerSection};

use crate::error::NormalizeError;

/// 기본 `raw` 언랩 깊이
pub const DEFAULT_MAX_UNWRAP_DEPTH: usize = 5;

/// 정규화 엔진 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// 중첩된 `raw` 래퍼를 벗기는 최대 횟수
    ///
    /// 한도에 도달하면 남은 값을 그대로 라인으로 사용합니다.
    pub max_unwrap_depth: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_unwrap_depth: DEFAULT_MAX_UNWRAP_DEPTH,
        }
    }
}

impl NormalizerConfig {
    /// core의 `[normalizer]` 섹션에서 엔진 설정을 생성합니다.
    pub fn from_core(core: &NormalizerSection) -> Self {
        Self {
            max_unwrap_depth: core.max_unwrap_depth,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), NormalizeError> {
        if self.max_unwrap_depth == 0 || self.max_unwrap_depth > MAX_UNWRAP_DEPTH_LIMIT {
            return Err(NormalizeError::Config {
                field: "max_unwrap_depth".to_owned(),
                reason: format!("must be 1-{}", MAX_UNWRAP_DEPTH_LIMIT),
            });
        }
        Ok(())
    }
}

/// 엔진 설정 빌더
#[derive(Default)]
pub struct NormalizerConfigBuilder {
    config: NormalizerConfig,
}

impl NormalizerConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// `raw` 언랩 최대 깊이를 설정합니다.
    pub fn max_unwrap_depth(mut self, depth: usize) -> Self {
        self.config.max_unwrap_depth = depth;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    pub fn build(self) -> Result<NormalizerConfig, NormalizeError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = NormalizerConfig::default();
        assert_eq!(config.max_unwrap_depth, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_core_copies_depth() {
        let section = NormalizerSection {
            max_unwrap_depth: 9,
        };
        let config = NormalizerConfig::from_core(&section);
        assert_eq!(config.max_unwrap_depth, 9);
    }

    #[test]
    fn zero_depth_rejected() {
        let result = NormalizerConfigBuilder::new().max_unwrap_depth(0).build();
        assert!(matches!(result, Err(NormalizeError::Config { .. })));
    }

    #[test]
    fn depth_above_limit_rejected() {
        let result = NormalizerConfigBuilder::new()
            .max_unwrap_depth(MAX_UNWRAP_DEPTH_LIMIT + 1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_sets_depth() {
        let config = NormalizerConfigBuilder::new()
            .max_unwrap_depth(2)
            .build()
            .unwrap();
        assert_eq!(config.max_unwrap_depth, 2);
    }
}
