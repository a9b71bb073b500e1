//! 학생 REST API 핸들러
//!
//! `/students`와 `/haksaeng` 두 경로에 같은 핸들러를 등록합니다.

use crate::error::{ApiError, ErrorBody};
use actix_web::{error, web, HttpRequest, HttpResponse, Scope};
use serde::{Deserialize, Serialize};
use shared::model::{HaksaengCreate, HaksaengUpdate};
use shared::service::HaksaengService;
use std::fmt;

/// 목록 조회 기본 행 수
pub const DEFAULT_LIST_LIMIT: u64 = 100;

/// 목록 조회 파라미터
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub name: Option<String>,
}

fn default_limit() -> u64 {
    DEFAULT_LIST_LIMIT
}

/// 다음 ID 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct NextIdResponse {
    pub next_id: String,
}

/// 삭제 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 다음 학생 ID 조회
pub async fn get_next_id(
    service: web::Data<HaksaengService>,
) -> Result<HttpResponse, ApiError> {
    let next_id = service.next_student_id().await?;
    Ok(HttpResponse::Ok().json(NextIdResponse { next_id }))
}

/// 학생 통계 조회
pub async fn get_stats(service: web::Data<HaksaengService>) -> Result<HttpResponse, ApiError> {
    let stats = service.get_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// 학생 목록 조회
pub async fn list_students(
    params: web::Query<ListParams>,
    service: web::Data<HaksaengService>,
) -> Result<HttpResponse, ApiError> {
    let ListParams { skip, limit, name } = params.into_inner();
    let students = service.list_students(skip, limit, name).await?;
    Ok(HttpResponse::Ok().json(students))
}

/// 학생 단건 조회
pub async fn get_student(
    id: web::Path<String>,
    service: web::Data<HaksaengService>,
) -> Result<HttpResponse, ApiError> {
    match service.get_student(&id).await? {
        Some(student) => Ok(HttpResponse::Ok().json(student)),
        None => Err(ApiError::student_not_found()),
    }
}

/// 학생 생성
pub async fn create_student(
    body: web::Json<HaksaengCreate>,
    service: web::Data<HaksaengService>,
) -> Result<HttpResponse, ApiError> {
    let created = service.create_student(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

/// 학생 수정
pub async fn update_student(
    id: web::Path<String>,
    body: web::Json<HaksaengUpdate>,
    service: web::Data<HaksaengService>,
) -> Result<HttpResponse, ApiError> {
    match service.update_student(&id, body.into_inner()).await? {
        Some(updated) => Ok(HttpResponse::Ok().json(updated)),
        None => Err(ApiError::student_not_found()),
    }
}

/// 학생 삭제
pub async fn delete_student(
    id: web::Path<String>,
    service: web::Data<HaksaengService>,
) -> Result<HttpResponse, ApiError> {
    match service.delete_student(&id).await? {
        Some(_) => Ok(HttpResponse::Ok().json(MessageResponse {
            message: "Successfully deleted".to_string(),
        })),
        None => Err(ApiError::student_not_found()),
    }
}

/// 요청 본문과 쿼리 파싱 실패를 `{"detail"}` 형식의 400으로 변환
fn bad_request<E>(err: E, _req: &HttpRequest) -> error::Error
where
    E: fmt::Debug + fmt::Display + 'static,
{
    let detail = err.to_string();
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorBody { detail }))
        .into()
}

// 고정 경로는 `/{id}`보다 먼저 등록
fn haksaeng_scope(path: &str) -> Scope {
    web::scope(path)
        .route("/next-id", web::get().to(get_next_id))
        .route("/stats", web::get().to(get_stats))
        .route("", web::get().to(list_students))
        .route("", web::post().to(create_student))
        .route("/{id}", web::get().to(get_student))
        .route("/{id}", web::put().to(update_student))
        .route("/{id}", web::delete().to(delete_student))
}

/// 학생 API 경로 설정
pub fn configure_haksaeng_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| bad_request(err, req)))
        .app_data(web::QueryConfig::default().error_handler(|err, req| bad_request(err, req)))
        .service(haksaeng_scope("/students"))
        .service(haksaeng_scope("/haksaeng"));
}
