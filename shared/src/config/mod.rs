pub mod db;

pub use db::{health_check, load_env_file, DbConfig, DbConnection};
