//! 서버 설정
//!
//! 바인딩 주소와 CORS 허용 출처를 환경 변수에서 읽습니다.

use shared::tool::error::AppError;
use std::env;
use tracing::warn;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "https://gongbubang.vercel.app",
];

/// REST 서버 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드
    ///
    /// `SERVER_HOST`, `SERVER_PORT`, `CORS_ORIGINS`(쉼표 구분)를 읽습니다.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Ok(host) = env::var("SERVER_HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            config.port = port.parse().map_err(|_| {
                AppError::Configuration(format!("SERVER_PORT는 숫자여야 함: {port}"))
            })?;
        }
        if let Ok(origins) = env::var("CORS_ORIGINS") {
            let parsed = parse_origins(&origins);
            if parsed.is_empty() {
                warn!("CORS_ORIGINS가 비어 있어 기본 출처를 사용합니다.");
            } else {
                config.cors_origins = parsed;
            }
        }

        Ok(config)
    }

    /// `host:port` 형식의 바인딩 주소
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
