//! Application Error Management System
//!
//! 학생 명부 서비스의 모든 에러를 체계적으로 관리합니다.
//! 저장소/인코딩 에러를 공통 에러 타입으로 모으고, 심각도에 따른 로깅을 지원합니다.

use crate::tool::cp949::Cp949Error;
use thiserror::Error;
use tracing::{error, info, warn};

/// 공통 애플리케이션 에러 정의
///
/// 저장소, 코덱, 설정 계층에서 발생할 수 있는 에러를 정의합니다.
/// HTTP 계층은 각 변형을 적절한 상태 코드로 변환합니다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    // 입력값 검증 에러
    #[error("입력값 오류: {0}")]
    InvalidInput(String),

    #[error("인코딩 불가 문자: {0}")]
    Encoding(String),

    // 데이터베이스 관련 에러
    #[error("데이터베이스 연결 실패: {0}")]
    DatabaseConnection(String),

    #[error("데이터베이스 쿼리 실패: {0}")]
    DatabaseQuery(String),

    #[error("중복된 데이터: {0}")]
    DuplicateEntry(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    // 시스템 에러
    #[error("내부 서버 에러: {0}")]
    InternalError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// 에러의 심각도를 반환합니다.
    ///
    /// # Returns
    /// * `ErrorSeverity` - 에러의 심각도 레벨
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical: 시스템 장애
            AppError::DatabaseConnection(_) | AppError::Configuration(_) => {
                ErrorSeverity::Critical
            }

            // High: 저장소 작업 실패
            AppError::DatabaseQuery(_) | AppError::InternalError(_) => ErrorSeverity::High,

            // Medium: 사용자 입력 오류
            AppError::InvalidInput(_) | AppError::Encoding(_) | AppError::DuplicateEntry(_) => {
                ErrorSeverity::Medium
            }

            // Low: 조회 실패
            AppError::NotFound(_) => ErrorSeverity::Low,
        }
    }

    /// 에러를 로깅합니다.
    ///
    /// 심각도에 따라 적절한 로깅 레벨을 사용합니다.
    pub fn log(&self, context: &str) {
        let error_msg = self.to_string();

        match self.severity() {
            ErrorSeverity::Critical => {
                error!("[CRITICAL] {} - {}", context, error_msg);
            }
            ErrorSeverity::High => {
                error!("[HIGH] {} - {}", context, error_msg);
            }
            ErrorSeverity::Medium => {
                warn!("[MEDIUM] {} - {}", context, error_msg);
            }
            ErrorSeverity::Low => {
                info!("[LOW] {} - {}", context, error_msg);
            }
        }
    }

    /// 호출자가 재시도할 수 있는 에러인지 확인합니다.
    ///
    /// 동시 생성으로 ID가 충돌한 경우 다시 생성하면 성공할 수 있습니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::DuplicateEntry(_))
    }
}

/// 에러 심각도 레벨
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorSeverity {
    Critical, // 시스템 장애
    High,     // 저장소 작업 실패
    Medium,   // 사용자 입력 오류
    Low,      // 일반적인 경고
}

// SqlxError conversion
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Database record not found".to_string()),
            // SQLSTATE 23000은 NOT NULL, 외래 키 위반도 포함하므로 고유 키 위반만 중복으로 분류
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    AppError::DuplicateEntry(db_err.to_string())
                } else {
                    AppError::DatabaseQuery(db_err.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => {
                AppError::DatabaseConnection("Database connection pool timeout".to_string())
            }
            sqlx::Error::PoolClosed => {
                AppError::DatabaseConnection("Database pool is closed".to_string())
            }
            sqlx::Error::Io(e) => AppError::DatabaseConnection(format!("I/O: {e}")),
            sqlx::Error::Tls(e) => AppError::DatabaseConnection(format!("TLS: {e}")),
            sqlx::Error::Configuration(_) => {
                AppError::Configuration("Database configuration error".to_string())
            }
            _ => AppError::DatabaseQuery(err.to_string()),
        }
    }
}

// 코덱 에러 변환
//
// 표현할 수 없는 문자는 호출자의 입력 문제이고,
// 깨진 바이트는 저장소에 이미 들어있는 데이터 문제입니다.
impl From<Cp949Error> for AppError {
    fn from(err: Cp949Error) -> Self {
        match err {
            Cp949Error::Unmappable { .. } => AppError::Encoding(err.to_string()),
            Cp949Error::Malformed { .. } => AppError::DatabaseQuery(err.to_string()),
        }
    }
}

/// 에러 처리 헬퍼 함수들
pub mod helpers {
    use super::*;

    /// 문자열 길이 검증 헬퍼 함수
    ///
    /// 길이는 바이트가 아닌 문자 단위로 계산합니다.
    ///
    /// # Arguments
    /// * `value` - 검증할 문자열
    /// * `field_name` - 필드 이름
    /// * `max_chars` - 최대 문자 수
    ///
    /// # Returns
    /// * `Result<(), AppError>` - 검증 결과
    pub fn validate_length(value: &str, field_name: &str, max_chars: usize) -> Result<(), AppError> {
        let len = value.chars().count();
        if len > max_chars {
            return Err(AppError::InvalidInput(format!(
                "{field_name} too long ({len} > {max_chars})"
            )));
        }

        Ok(())
    }

    /// 필수 문자열 검증 헬퍼 함수
    ///
    /// 공백만 있는 값도 누락으로 취급합니다.
    pub fn validate_required(
        value: &str,
        field_name: &str,
        max_chars: usize,
    ) -> Result<(), AppError> {
        if value.trim().is_empty() {
            return Err(AppError::InvalidInput(format!("Missing field: {field_name}")));
        }

        validate_length(value, field_name, max_chars)
    }

    /// 선택 문자열 검증 헬퍼 함수
    pub fn validate_optional(
        value: Option<&str>,
        field_name: &str,
        max_chars: usize,
    ) -> Result<(), AppError> {
        match value {
            Some(v) => validate_length(v, field_name, max_chars),
            None => Ok(()),
        }
    }
}
