//! 로깅 설정 관리
//!
//! 로그 필터와 출력 형식을 환경 변수에서 읽습니다.

use serde::{Deserialize, Serialize};

const DEFAULT_LOG_LEVEL: &str = "info";

/// 로깅 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` 지시어 (예: `info`, `shared=debug,actix_web=info`)
    pub filter: String,

    /// 로그 대상(target) 출력 여부
    pub with_target: bool,

    /// ANSI 색상 사용 여부
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_LEVEL.to_string(),
            with_target: true,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// 환경 변수에서 설정 로드
    ///
    /// `RUST_LOG`가 있으면 그대로 쓰고, 없으면 `LOG_LEVEL`, 둘 다 없으면 `info`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RUST_LOG") {
            if !val.trim().is_empty() {
                config.filter = val;
            }
        } else if let Ok(val) = std::env::var("LOG_LEVEL") {
            if !val.trim().is_empty() {
                config.filter = val.to_lowercase();
            }
        }

        if let Ok(val) = std::env::var("LOG_WITH_TARGET") {
            config.with_target = val.to_lowercase() == "true";
        }

        if let Ok(val) = std::env::var("LOG_ANSI") {
            config.ansi = val.to_lowercase() == "true";
        }

        config
    }
}
