//! 학생 명부 REST API 서버 진입점
//!
//! `haksaengserver [start|memory]`
//! - `start` (기본): MySQL 저장소에 연결해서 서버를 시작합니다.
//! - `memory`: 메모리 저장소로 서버를 시작합니다 (개발용, 재시작 시 데이터 소멸).

use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath, TrailingSlash};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use haksaengserver::{configure_haksaeng_routes, ServerConfig};
use shared::config::{health_check, load_env_file, DbConfig};
use shared::logging::{init_logging, LoggingConfig};
use shared::service::{
    HaksaengRepository, HaksaengService, MemoryHaksaengRepository, MySqlHaksaengRepository,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// MySQL 저장소 준비, 연결 실패 시 즉시 종료
async fn mysql_repository() -> Result<Arc<dyn HaksaengRepository>> {
    let db_config = DbConfig::from_env().context("데이터베이스 설정 로드 실패")?;
    info!("데이터베이스 설정: {:?}", db_config);

    let pool = db_config.connect().await.map_err(|e| {
        error!("데이터베이스 연결 실패로 서버를 시작하지 않습니다.");
        e
    })?;
    health_check(&pool).await?;

    Ok(Arc::new(MySqlHaksaengRepository::new(pool)))
}

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

async fn run_server(repository: Arc<dyn HaksaengRepository>) -> Result<()> {
    let server_config = ServerConfig::from_env()?;
    let service = web::Data::new(HaksaengService::new(repository));
    let origins = server_config.cors_origins.clone();
    let addr = server_config.bind_address();

    info!("학생 명부 서버 시작: http://{}", addr);
    info!("CORS 허용 출처: {:?}", origins);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(Logger::default())
            .wrap(cors(&origins))
            .configure(configure_haksaeng_routes)
    })
    .bind(&addr)
    .with_context(|| format!("서버 바인딩 실패: {addr}"))?
    .run()
    .await
    .context("서버 실행 실패")?;

    info!("학생 명부 서버 종료");
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    load_env_file();
    init_logging(&LoggingConfig::from_env())?;

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("start");

    let repository: Arc<dyn HaksaengRepository> = match command {
        "start" => mysql_repository().await?,
        "memory" => {
            warn!("메모리 저장소로 실행합니다. 데이터는 보존되지 않습니다.");
            Arc::new(MemoryHaksaengRepository::new())
        }
        other => {
            error!("알 수 없는 명령: {}", other);
            println!("사용법: haksaengserver [start|memory]");
            std::process::exit(2);
        }
    };

    run_server(repository).await
}
