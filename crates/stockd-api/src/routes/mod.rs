//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `GET /health` - 헬스 체크 (liveness)
//! - `GET /api/stocks/{symbol}` - 캐시된 시세 조회
//! - `POST /api/stocks/{symbol}/refresh` - 강제 수집

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod stocks;

pub use health::{health_router, HealthResponse};
pub use stocks::{stocks_router, RefreshResponse, StockDataPoint};

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new().merge(health_router()).merge(stocks_router())
}
