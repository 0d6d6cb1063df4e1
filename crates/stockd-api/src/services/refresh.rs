//! 시세 수집/조정 서비스.
//!
//! 업스트림에서 일별 시세를 가져와 저장된 watermark(심볼의 최신 저장
//! 날짜)보다 새로운 날짜만 upsert합니다. 배치 전체를 묶는 트랜잭션은
//! 없으며 각 날짜의 쓰기는 독립 단위입니다. 쓰기가 멱등 upsert이므로
//! 중간에 중단되어도 재실행하면 같은 최종 상태에 수렴합니다.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{info, warn};

use stockd_core::types::DailyBar;

use crate::error::{ApiError, ApiResult};
use crate::provider::{parse_series, OutputSize};
use crate::repository::PriceRepository;
use crate::state::AppState;

/// watermark보다 새로운 날짜만 선별.
///
/// watermark가 없으면(저장된 행이 없으면) 전체를 반환합니다.
/// 경계 날짜(watermark와 같은 날짜)는 포함하지 않습니다.
pub fn select_new(
    bars: BTreeMap<NaiveDate, DailyBar>,
    watermark: Option<NaiveDate>,
) -> Vec<(NaiveDate, DailyBar)> {
    bars.into_iter()
        .filter(|(date, _)| watermark.map_or(true, |latest| *date > latest))
        .collect()
}

/// 한 심볼에 대한 수집/조정 패스 실행.
///
/// 성공적으로 기록된 레코드 수를 반환합니다. 어떤 날짜가 기록되거나
/// 건너뛰어졌는지는 로그로만 남깁니다.
///
/// # Errors
///
/// - 제공자 API 키 미설정 → [`ApiError::MissingApiKey`] (시도 없이 실패)
/// - 재시도 소진 후 업스트림 실패 → [`ApiError::Provider`]
/// - watermark 조회 실패 → [`ApiError::Database`] (watermark 없이 수집하지 않음)
///
/// 날짜 단위의 필드 파싱 실패나 쓰기 실패는 치명적이지 않으며 해당
/// 날짜만 건너뜁니다.
pub async fn refresh_symbol(state: &AppState, symbol: &str) -> ApiResult<usize> {
    let provider = state.provider.as_ref().ok_or(ApiError::MissingApiKey)?;

    let response = provider.fetch_daily(symbol, OutputSize::Compact).await?;
    let bars = parse_series(&response);

    let watermark = PriceRepository::latest_date(&state.pool, symbol).await?;
    let candidates = select_new(bars, watermark);

    let mut new_records = 0usize;
    for (date, bar) in &candidates {
        match PriceRepository::upsert(&state.pool, symbol, *date, bar).await {
            Ok(()) => new_records += 1,
            Err(e) => {
                warn!(symbol = symbol, date = %date, error = %e, "Failed to insert data, skipping date");
            }
        }
    }

    info!(
        symbol = symbol,
        watermark = ?watermark,
        candidates = candidates.len(),
        new_records = new_records,
        "Refresh pass completed"
    );

    Ok(new_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(close: rust_decimal::Decimal) -> DailyBar {
        DailyBar {
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_select_new_without_watermark_keeps_all() {
        let mut bars = BTreeMap::new();
        bars.insert(date(2024, 3, 14), bar(dec!(1.0)));
        bars.insert(date(2024, 3, 15), bar(dec!(2.0)));

        let selected = select_new(bars, None);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_select_new_strictly_after_watermark() {
        let mut bars = BTreeMap::new();
        bars.insert(date(2024, 3, 13), bar(dec!(1.0)));
        bars.insert(date(2024, 3, 14), bar(dec!(2.0)));
        bars.insert(date(2024, 3, 15), bar(dec!(3.0)));

        // watermark와 같은 날짜는 제외, 더 큰 날짜만 포함
        let selected = select_new(bars, Some(date(2024, 3, 14)));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].0, date(2024, 3, 15));
    }

    #[test]
    fn test_select_new_everything_stale_yields_empty() {
        let mut bars = BTreeMap::new();
        bars.insert(date(2024, 3, 14), bar(dec!(1.0)));

        let selected = select_new(bars, Some(date(2024, 3, 20)));
        assert!(selected.is_empty());
    }

    #[test]
    fn test_select_new_preserves_date_order() {
        let mut bars = BTreeMap::new();
        bars.insert(date(2024, 3, 15), bar(dec!(3.0)));
        bars.insert(date(2024, 3, 13), bar(dec!(1.0)));
        bars.insert(date(2024, 3, 14), bar(dec!(2.0)));

        let selected = select_new(bars, None);
        let dates: Vec<NaiveDate> = selected.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            dates,
            vec![date(2024, 3, 13), date(2024, 3, 14), date(2024, 3, 15)]
        );
    }
}
