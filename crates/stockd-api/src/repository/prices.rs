//! 일별 시세 Repository.
//!
//! `daily_prices` 테이블의 생성, 조회, upsert를 담당합니다.
//! 테이블은 (date, symbol) 복합 키로 심볼당 날짜별 최대 한 행을
//! 보장합니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;

use stockd_core::types::{DailyBar, TimeRange};

/// 저장된 하루치 시세 행.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PriceRecord {
    /// 거래일
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

/// 일별 시세 Repository.
pub struct PriceRepository;

impl PriceRepository {
    /// 테이블이 없으면 생성.
    ///
    /// 시작 시 한 번 호출됩니다.
    pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS daily_prices (
                date DATE NOT NULL,
                symbol TEXT NOT NULL,
                open NUMERIC NOT NULL,
                high NUMERIC NOT NULL,
                low NUMERIC NOT NULL,
                close NUMERIC NOT NULL,
                volume BIGINT NOT NULL,
                last_updated TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (date, symbol)
            )
            "#,
        )
        .execute(pool)
        .await?;

        debug!("daily_prices schema ensured");
        Ok(())
    }

    /// 심볼의 저장된 행 수 조회.
    ///
    /// 0이면 읽기 전에 한 번의 자동 수집이 수행됩니다.
    pub async fn count_for_symbol(pool: &PgPool, symbol: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM daily_prices WHERE symbol = $1")
            .bind(symbol)
            .fetch_one(pool)
            .await
    }

    /// 심볼의 최신 저장 날짜 (watermark) 조회.
    ///
    /// 행이 없으면 `None`을 반환합니다. 이 값보다 큰 날짜만 새로
    /// 기록 대상이 됩니다.
    pub async fn latest_date(
        pool: &PgPool,
        symbol: &str,
    ) -> Result<Option<NaiveDate>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<NaiveDate>>(
            "SELECT MAX(date) FROM daily_prices WHERE symbol = $1",
        )
        .bind(symbol)
        .fetch_one(pool)
        .await
    }

    /// 하루치 시세 upsert.
    ///
    /// (date, symbol) 충돌 시 키 외의 모든 필드를 덮어쓰고
    /// `last_updated`를 갱신합니다. 같은 페이로드로 재실행해도 같은
    /// 최종 상태에 수렴합니다.
    pub async fn upsert(
        pool: &PgPool,
        symbol: &str,
        date: NaiveDate,
        bar: &DailyBar,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO daily_prices (date, symbol, open, high, low, close, volume)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (date, symbol) DO UPDATE SET
                open = EXCLUDED.open,
                high = EXCLUDED.high,
                low = EXCLUDED.low,
                close = EXCLUDED.close,
                volume = EXCLUDED.volume,
                last_updated = now()
            "#,
        )
        .bind(date)
        .bind(symbol)
        .bind(bar.open)
        .bind(bar.high)
        .bind(bar.low)
        .bind(bar.close)
        .bind(bar.volume)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// 기간별 시세 조회 (최신순).
    ///
    /// `week`/`month`는 최근 N개 행, `6month`/`year`는 현재 날짜 기준
    /// 달력 구간입니다. 모든 결과는 날짜 내림차순입니다.
    pub async fn fetch_range(
        pool: &PgPool,
        symbol: &str,
        range: TimeRange,
    ) -> Result<Vec<PriceRecord>, sqlx::Error> {
        let records = match range {
            TimeRange::Week | TimeRange::Month => {
                sqlx::query_as::<_, PriceRecord>(
                    r#"
                    SELECT date, open, high, low, close, volume
                    FROM daily_prices
                    WHERE symbol = $1
                    ORDER BY date DESC
                    LIMIT $2
                    "#,
                )
                .bind(symbol)
                .bind(range.row_limit().unwrap_or(i64::MAX))
                .fetch_all(pool)
                .await?
            }
            TimeRange::SixMonth => {
                sqlx::query_as::<_, PriceRecord>(
                    r#"
                    SELECT date, open, high, low, close, volume
                    FROM daily_prices
                    WHERE symbol = $1
                      AND date >= CURRENT_DATE - INTERVAL '6 months'
                    ORDER BY date DESC
                    "#,
                )
                .bind(symbol)
                .fetch_all(pool)
                .await?
            }
            TimeRange::Year => {
                sqlx::query_as::<_, PriceRecord>(
                    r#"
                    SELECT date, open, high, low, close, volume
                    FROM daily_prices
                    WHERE symbol = $1
                      AND date >= CURRENT_DATE - INTERVAL '1 year'
                    ORDER BY date DESC
                    "#,
                )
                .bind(symbol)
                .fetch_all(pool)
                .await?
            }
        };

        debug!(
            symbol = symbol,
            range = %range,
            rows = records.len(),
            "Fetched stored prices"
        );

        Ok(records)
    }
}
