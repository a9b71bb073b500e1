//! 로깅 초기화
//!
//! `tracing-subscriber`의 fmt 레이어와 `EnvFilter`로 구조화된 로그를 출력합니다.
//!
//! # 사용 예시
//! ```rust,no_run
//! use shared::logging::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::from_env()).ok();
//! tracing::info!("서버 시작");
//! ```

pub mod config;

pub use config::LoggingConfig;

use crate::tool::error::AppError;
use tracing_subscriber::EnvFilter;

/// 전역 구독자를 설치합니다.
///
/// 이미 설치되어 있으면 `AppError::Configuration`을 반환하며, 기존 구독자는 그대로 유지됩니다.
pub fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .try_init()
        .map_err(|e| AppError::Configuration(format!("로깅 초기화 실패: {e}")))
}
