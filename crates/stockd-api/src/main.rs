//! 주식 시세 캐시 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다. Alpha Vantage에서 일별 시세를
//! 수집하여 PostgreSQL에 캐싱하고 기간별 조회 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use stockd_api::routes::create_api_router;
use stockd_api::state::AppState;
use stockd_core::config::{AppConfig, CorsConfig};
use stockd_core::logging::init_logging_from_env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    init_logging_from_env()?;

    info!("Starting stockd API server...");

    // 설정 로드 (DATABASE_URL 누락은 여기서 치명적)
    let config = AppConfig::from_env()?;

    // 데이터베이스 연결
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;
    info!("Connected to PostgreSQL");

    stockd_api::repository::PriceRepository::init_schema(&pool).await?;

    // AppState 생성 (API 키 없으면 provider는 None)
    let state = Arc::new(AppState::new(&config, pool));
    if state.provider.is_none() {
        warn!("ALPHA_VANTAGE_API_KEY not set, refresh requests will fail until configured");
    }

    let app = create_router(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "API server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors_layer(cors))
}

/// CORS 미들웨어 구성.
///
/// 설정에 origin 목록이 있으면 해당 origin만 허용합니다. 비어 있으면
/// 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origins.is_empty() {
        warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
        AllowOrigin::any()
    } else {
        let origins: Vec<_> = config
            .allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        if origins.is_empty() {
            warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
            AllowOrigin::any()
        } else {
            info!("CORS configured with {} allowed origins", origins.len());
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
