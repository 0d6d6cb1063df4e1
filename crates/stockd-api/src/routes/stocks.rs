//! 주식 시세 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /api/stocks/{symbol}?range=week|month|6month|year` - 캐시된 시세 조회 (최신순)
//! - `POST /api/stocks/{symbol}/refresh` - 업스트림에서 강제 수집

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use stockd_core::types::TimeRange;

use crate::error::{ApiError, ApiResult};
use crate::repository::{PriceRecord, PriceRepository};
use crate::services::refresh_symbol;
use crate::state::AppState;

// ==================== 요청/응답 타입 ====================

/// 시세 조회 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// 조회 기간 토큰 (`week` | `month` | `6month` | `year`)
    pub range: Option<String>,
}

/// 하루치 시세 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDataPoint {
    /// 거래일 (`YYYY-MM-DD`)
    pub date: NaiveDate,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: i64,
}

impl From<PriceRecord> for StockDataPoint {
    fn from(record: PriceRecord) -> Self {
        Self {
            date: record.date,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        }
    }
}

/// 강제 수집 응답.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// 결과 메시지
    pub message: String,
    /// 새로 기록된 레코드 수
    pub new_records: usize,
}

// ==================== Handler ====================

/// 캐시된 시세 조회.
///
/// GET /api/stocks/{symbol}?range=...
///
/// range 토큰 검증은 데이터 접근보다 먼저 수행되므로 잘못된 토큰은
/// 데이터베이스를 건드리지 않고 400으로 거절됩니다. 심볼에 저장된
/// 행이 없으면 응답 전에 정확히 한 번의 수집 패스를 실행합니다.
/// 따라서 새 심볼의 첫 요청은 지연이 크고 업스트림 가용성에
/// 의존합니다.
pub async fn get_stock_data(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<StockDataPoint>>> {
    let symbol = symbol.trim().to_string();
    if symbol.is_empty() {
        return Err(ApiError::MissingSymbol);
    }

    let range: TimeRange = match query.range {
        None => return Err(ApiError::MissingRange),
        Some(token) => token
            .parse()
            .map_err(|_| ApiError::InvalidRange(token.clone()))?,
    };

    // 로컬에 데이터가 없으면 먼저 한 번 수집
    let count = PriceRepository::count_for_symbol(&state.pool, &symbol).await?;
    if count == 0 {
        info!(symbol = %symbol, "No local rows, fetching initial data");
        refresh_symbol(&state, &symbol).await?;
    }

    let records = PriceRepository::fetch_range(&state.pool, &symbol, range).await?;
    let data: Vec<StockDataPoint> = records.into_iter().map(StockDataPoint::from).collect();

    info!(symbol = %symbol, range = %range, rows = data.len(), "Stock data served");
    Ok(Json(data))
}

/// 강제 수집.
///
/// POST /api/stocks/{symbol}/refresh
pub async fn refresh_stock_data(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<RefreshResponse>> {
    let symbol = symbol.trim().to_string();
    if symbol.is_empty() {
        return Err(ApiError::MissingSymbol);
    }

    let new_records = refresh_symbol(&state, &symbol).await?;

    Ok(Json(RefreshResponse {
        message: "Stock data refreshed".to_string(),
        new_records,
    }))
}

/// 주식 시세 라우터 생성.
pub fn stocks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stocks/{symbol}", get(get_stock_data))
        .route("/api/stocks/{symbol}/refresh", post(refresh_stock_data))
}
