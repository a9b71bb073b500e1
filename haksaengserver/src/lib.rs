//! 학생 명부 REST API 서버
//!
//! `shared`의 생명주기 서비스를 HTTP 경로에 연결합니다.

pub mod api;
pub mod config;
pub mod error;

pub use api::configure_haksaeng_routes;
pub use config::ServerConfig;
pub use error::ApiError;
