//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다. 이 시스템의
//! 공유 자원은 데이터베이스 풀과 (설정된 경우) 업스트림 클라이언트
//! 둘뿐이며, 요청 간 다른 가변 상태는 없습니다.

use sqlx::PgPool;

use stockd_core::config::AppConfig;

use crate::provider::AlphaVantageClient;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀 (PostgreSQL)
    pub pool: PgPool,

    /// Alpha Vantage 클라이언트.
    ///
    /// API 키가 설정되지 않았으면 `None`이며, refresh 요청은 요청 단위
    /// 에러로 실패합니다. 조회 요청은 로컬에 데이터가 있는 한 계속
    /// 동작합니다.
    pub provider: Option<AlphaVantageClient>,
}

impl AppState {
    /// 설정과 연결 풀로 상태 생성.
    pub fn new(config: &AppConfig, pool: PgPool) -> Self {
        Self {
            pool,
            provider: AlphaVantageClient::from_config(&config.provider),
        }
    }
}
