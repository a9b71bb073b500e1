//! 학생 명부 공유 라이브러리
//!
//! 도메인 모델, CP949 변환, 저장소, 생명주기 서비스, 설정과 로깅을 제공합니다.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod tool;
