//! 데이터베이스 서비스 모듈
//!
//! HJ_HAKSAENG 테이블과의 모든 상호작용을 처리합니다.
//! 저장소 trait 하나와 두 가지 구현체(MySQL, 메모리)로 구성됩니다.

pub mod haksaeng_repository;
pub mod memory_haksaeng_repository;
pub mod mysql_haksaeng_repository;

pub use haksaeng_repository::{EncodedFields, HaksaengRepository};
pub use memory_haksaeng_repository::MemoryHaksaengRepository;
pub use mysql_haksaeng_repository::MySqlHaksaengRepository;
