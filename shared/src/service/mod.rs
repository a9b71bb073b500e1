pub mod db;
pub mod haksaeng_service;

// Re-export all from each module namespace
pub use db::*;
pub use haksaeng_service::HaksaengService;
