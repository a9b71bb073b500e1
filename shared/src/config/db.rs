//! Database Configuration
//!
//! 학생 명부 저장소 연결 설정입니다.
//! 접속 정보는 기본 상수를 사용하고, 비밀번호만 환경 변수(`DB_PASSWORD`)에서 읽습니다.
//! 설정 구조체는 시작 시점에 한 번 만들어 연결 풀 생성에 주입합니다.

use crate::tool::error::AppError;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

// 기본값 상수
const DEFAULT_DB_HOST: &str = "127.0.0.1";
const DEFAULT_DB_PORT: u16 = 3306;
const DEFAULT_DB_USER: &str = "prowiz";
const DEFAULT_DB_NAME: &str = "institute";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// 연결 풀 타입 별칭
pub type DbConnection = MySqlPool;

/// 데이터베이스 설정 구조체
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
    pub password: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

// 비밀번호는 출력하지 않음
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("password", &"***")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// .env 파일을 로드합니다.
///
/// 현재 디렉토리, 상위 디렉토리(서브패키지에서 실행되는 경우) 순서로 찾습니다.
pub fn load_env_file() {
    let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let candidates = [
        Some(current_dir.join(".env")),
        current_dir.parent().map(|p| p.join(".env")),
    ];

    for path in candidates.into_iter().flatten() {
        if path.exists() {
            dotenv::from_path(&path).ok();
            info!("환경 파일 로드: {:?}", path);
            return;
        }
    }

    dotenv::dotenv().ok();
    warn!(".env 파일을 찾을 수 없어서 환경 변수를 직접 사용합니다.");
}

impl DbConfig {
    /// 비밀번호를 받아 기본 접속 정보로 설정을 만듭니다.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            user: DEFAULT_DB_USER.to_string(),
            database: DEFAULT_DB_NAME.to_string(),
            password: password.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// 환경 변수에서 설정을 읽습니다.
    ///
    /// `DB_PASSWORD`는 필수입니다. `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_NAME`,
    /// `DB_MAX_CONNECTIONS`가 있으면 기본값 대신 사용합니다.
    ///
    /// # Returns
    /// * `Result<Self, AppError>` - 설정 또는 설정 에러
    pub fn from_env() -> Result<Self, AppError> {
        let password = env::var("DB_PASSWORD").map_err(|_| {
            error!("DB_PASSWORD 환경변수가 필요합니다.");
            AppError::Configuration("DB_PASSWORD is not set".to_string())
        })?;

        let mut config = Self::new(password);

        if let Ok(host) = env::var("DB_HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("DB_PORT") {
            config.port = port
                .parse()
                .map_err(|_| AppError::Configuration(format!("DB_PORT는 숫자여야 함: {port}")))?;
        }
        if let Ok(user) = env::var("DB_USER") {
            config.user = user;
        }
        if let Ok(database) = env::var("DB_NAME") {
            config.database = database;
        }
        if let Ok(max) = env::var("DB_MAX_CONNECTIONS") {
            match max.parse() {
                Ok(max) => config.max_connections = max,
                Err(_) => warn!("DB_MAX_CONNECTIONS 값이 잘못되어 기본값을 사용합니다: {}", max),
            }
        }

        Ok(config)
    }

    /// sqlx 접속 옵션
    ///
    /// URL 문자열을 만들지 않으므로 비밀번호에 특수문자가 있어도 인코딩이 필요 없습니다.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }

    /// 연결 풀을 생성합니다.
    ///
    /// # Returns
    /// * `Result<DbConnection, AppError>` - 연결 풀 또는 연결 에러
    pub async fn connect(&self) -> Result<DbConnection, AppError> {
        info!(
            "데이터베이스 연결 시도: {}:{}@{}:{}/{}",
            self.user, "***", self.host, self.port, self.database
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect_with(self.connect_options())
            .await
            .map_err(|e| {
                let err = match AppError::from(e) {
                    AppError::DatabaseQuery(msg) => AppError::DatabaseConnection(msg),
                    other => other,
                };
                err.log("데이터베이스 연결");
                err
            })?;

        info!("연결 풀 생성 완료: {}:{}", self.host, self.port);
        Ok(pool)
    }
}

/// 데이터베이스 연결 상태를 확인합니다.
pub async fn health_check(pool: &DbConnection) -> Result<bool, AppError> {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => {
            info!("데이터베이스 연결 상태 양호");
            Ok(true)
        }
        Err(e) => {
            error!("데이터베이스 연결 실패: {}", e);
            Err(AppError::DatabaseConnection(e.to_string()))
        }
    }
}
