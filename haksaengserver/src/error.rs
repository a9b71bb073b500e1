//! HTTP 에러 응답
//!
//! `AppError`를 상태 코드와 `{"detail": ...}` 본문으로 변환합니다.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use shared::tool::error::AppError;
use std::fmt;

/// 에러 응답 본문
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// API 경계 에러
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 대상 학생이 없을 때의 응답
    pub fn student_not_found() -> Self {
        Self(AppError::NotFound("Student not found".to_string()))
    }

    fn detail(&self) -> String {
        match &self.0 {
            AppError::NotFound(_) => "Student not found".to_string(),
            AppError::InvalidInput(msg)
            | AppError::Encoding(msg)
            | AppError::DuplicateEntry(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::Encoding(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateEntry(_) => StatusCode::CONFLICT,
            AppError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseQuery(_)
            | AppError::InternalError(_)
            | AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.0.log("API 요청");
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.detail(),
        })
    }
}
