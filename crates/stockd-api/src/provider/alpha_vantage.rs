//! Alpha Vantage API 클라이언트.
//!
//! Alpha Vantage `TIME_SERIES_DAILY` 엔드포인트에서 일별 주식 시세를
//! 수집합니다. 응답은 날짜 문자열을 키로 하고 다섯 개의 문자열 인코딩
//! 필드를 값으로 하는 중첩 JSON이며, 문자열 → 타입 변환의 모든 잡음은
//! 이 모듈 경계 안에서 처리합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use stockd_api::provider::{AlphaVantageClient, OutputSize};
//!
//! let client = AlphaVantageClient::from_config(&config.provider)
//!     .expect("API key not configured");
//! let response = client.fetch_daily("AAPL", OutputSize::Compact).await?;
//! let bars = parse_series(&response);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use stockd_core::config::ProviderConfig;
use stockd_core::types::{parse_trading_date, DailyBar};

use super::retry::{retry_with_backoff, RetryExhausted, RetryPolicy};

/// 단일 시도의 실패 사유.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// 네트워크 오류 또는 응답 본문 디코드 실패
    #[error("failed to get stock data: {0}")]
    Network(#[from] reqwest::Error),

    /// 비정상 HTTP 상태
    #[error("API error: {0}")]
    Status(reqwest::StatusCode),
}

/// 재시도 소진 후의 업스트림 호출 실패.
///
/// 마지막 시도의 에러와 수행된 시도 횟수를 함께 담습니다.
#[derive(Debug, Error)]
#[error("failed to fetch stock data (attempt {attempts}): {source}")]
pub struct ProviderError {
    /// 수행된 시도 횟수
    pub attempts: u32,
    #[source]
    pub source: AttemptError,
}

impl From<RetryExhausted<AttemptError>> for ProviderError {
    fn from(e: RetryExhausted<AttemptError>) -> Self {
        Self {
            attempts: e.attempts,
            source: e.last_error,
        }
    }
}

/// 요청할 데이터 크기.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSize {
    /// 최근 ~100 거래일
    Compact,
    /// 전체 히스토리
    Full,
}

impl OutputSize {
    /// 쿼리 파라미터 값.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

// ==================== 응답 타입 ====================

/// `TIME_SERIES_DAILY` 응답 문서.
///
/// 요청 한도 초과 시 Alpha Vantage는 HTTP 200과 함께 `"Note"` 필드만
/// 담긴 본문을 반환하므로 두 필드 모두 누락을 허용합니다. 그 경우
/// 시리즈는 비어 있게 디코드되어 새 레코드 0건으로 이어집니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeSeriesResponse {
    /// 메타데이터
    #[serde(rename = "Meta Data")]
    pub meta_data: Option<MetaData>,
    /// 날짜 문자열 → 문자열 인코딩 OHLCV
    #[serde(rename = "Time Series (Daily)", default)]
    pub series: HashMap<String, RawDailyBar>,
}

/// 응답 메타데이터.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaData {
    #[serde(rename = "1. Information")]
    pub information: Option<String>,
    #[serde(rename = "2. Symbol")]
    pub symbol: Option<String>,
}

/// 문자열 인코딩 상태의 하루치 시세.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDailyBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

impl RawDailyBar {
    /// 문자열 필드를 타입 값으로 변환.
    ///
    /// # Errors
    ///
    /// 파싱에 실패한 첫 필드의 이름을 반환합니다.
    pub fn to_bar(&self) -> Result<DailyBar, &'static str> {
        let open = Decimal::from_str(&self.open).map_err(|_| "open")?;
        let high = Decimal::from_str(&self.high).map_err(|_| "high")?;
        let low = Decimal::from_str(&self.low).map_err(|_| "low")?;
        let close = Decimal::from_str(&self.close).map_err(|_| "close")?;
        let volume = self.volume.parse::<i64>().map_err(|_| "volume")?;
        Ok(DailyBar {
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

// ==================== 파서 ====================

/// 제공자 응답을 날짜 → OHLCV 매핑으로 변환.
///
/// 필드 하나라도 파싱에 실패한 날짜는 경고 로그와 함께 통째로 건너뛰고
/// 나머지 날짜는 계속 처리합니다. 날짜 기반 필터링은 호출자
/// (reconciliation) 몫입니다.
pub fn parse_series(response: &TimeSeriesResponse) -> BTreeMap<NaiveDate, DailyBar> {
    let mut bars = BTreeMap::new();

    for (date_str, raw) in &response.series {
        let date = match parse_trading_date(date_str) {
            Ok(date) => date,
            Err(e) => {
                warn!(date = %date_str, error = %e, "Skipping entry with unparsable date");
                continue;
            }
        };

        match raw.to_bar() {
            Ok(bar) => {
                bars.insert(date, bar);
            }
            Err(field) => {
                warn!(date = %date_str, field = field, "Failed to parse field, skipping date");
            }
        }
    }

    bars
}

// ==================== 클라이언트 ====================

/// Alpha Vantage API 클라이언트.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl AlphaVantageClient {
    /// 클라이언트 생성.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            retry,
        }
    }

    /// 설정에서 클라이언트 생성.
    ///
    /// API 키가 설정되지 않았으면 `None`을 반환합니다. 키 부재는 시작을
    /// 막지 않고 refresh 요청 시점의 요청 단위 에러로 처리됩니다.
    pub fn from_config(config: &ProviderConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let retry = RetryPolicy {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_secs(config.backoff_secs),
        };
        Some(Self::new(api_key, config.base_url.clone(), retry))
    }

    /// 일별 시세 조회.
    ///
    /// 네트워크 오류, 비정상 상태 코드, 본문 디코드 실패 시 선형 백오프로
    /// 재시도하며, 모든 시도가 소진되면 마지막 실패를 감싼
    /// [`ProviderError`]를 반환합니다. 성공 시 원본 응답을 그대로
    /// 디코드하여 반환하고 캐싱하지 않습니다.
    pub async fn fetch_daily(
        &self,
        symbol: &str,
        output_size: OutputSize,
    ) -> Result<TimeSeriesResponse, ProviderError> {
        let response = retry_with_backoff(&self.retry, |attempt| {
            let client = self.client.clone();
            let url = self.base_url.clone();
            let params = [
                ("function", "TIME_SERIES_DAILY".to_string()),
                ("symbol", symbol.to_string()),
                ("apikey", self.api_key.clone()),
                ("outputsize", output_size.as_str().to_string()),
            ];

            async move {
                debug!(symbol = %params[1].1, attempt = attempt, "Requesting daily series");
                let resp = client.get(&url).query(&params).send().await?;
                if !resp.status().is_success() {
                    return Err(AttemptError::Status(resp.status()));
                }
                let body = resp.json::<TimeSeriesResponse>().await?;
                Ok(body)
            }
        })
        .await?;

        debug!(
            symbol = symbol,
            entries = response.series.len(),
            "Daily series fetched"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_payload() -> &'static str {
        r#"{
            "Meta Data": {
                "1. Information": "Daily Prices (open, high, low, close) and Volumes",
                "2. Symbol": "AAPL"
            },
            "Time Series (Daily)": {
                "2024-03-15": {
                    "1. open": "171.17",
                    "2. high": "172.62",
                    "3. low": "170.29",
                    "4. close": "172.62",
                    "5. volume": "121664700"
                },
                "2024-03-14": {
                    "1. open": "172.91",
                    "2. high": "174.30",
                    "3. low": "172.05",
                    "4. close": "173.00",
                    "5. volume": "72571600"
                }
            }
        }"#
    }

    #[test]
    fn test_decode_time_series_response() {
        let response: TimeSeriesResponse = serde_json::from_str(sample_payload()).unwrap();
        assert_eq!(
            response.meta_data.unwrap().symbol.as_deref(),
            Some("AAPL")
        );
        assert_eq!(response.series.len(), 2);
        assert_eq!(response.series["2024-03-15"].open, "171.17");
    }

    #[test]
    fn test_decode_rate_limit_note_as_empty_series() {
        // 한도 초과 시 200 OK와 함께 Note만 내려옴
        let body = r#"{"Note": "Thank you for using Alpha Vantage!"}"#;
        let response: TimeSeriesResponse = serde_json::from_str(body).unwrap();
        assert!(response.meta_data.is_none());
        assert!(response.series.is_empty());
        assert!(parse_series(&response).is_empty());
    }

    #[test]
    fn test_parse_series_converts_all_good_entries() {
        let response: TimeSeriesResponse = serde_json::from_str(sample_payload()).unwrap();
        let bars = parse_series(&response);
        assert_eq!(bars.len(), 2);

        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let bar = &bars[&date];
        assert_eq!(bar.open, dec!(171.17));
        assert_eq!(bar.close, dec!(172.62));
        assert_eq!(bar.volume, 121_664_700);
    }

    #[test]
    fn test_parse_series_skips_bad_volume_without_aborting() {
        // 네 날짜 중 하나의 volume이 숫자가 아니면 그 날짜만 빠져야 함
        let body = r#"{
            "Time Series (Daily)": {
                "2024-03-12": {"1. open": "1.0", "2. high": "1.1", "3. low": "0.9", "4. close": "1.0", "5. volume": "100"},
                "2024-03-13": {"1. open": "1.0", "2. high": "1.1", "3. low": "0.9", "4. close": "1.0", "5. volume": "N/A"},
                "2024-03-14": {"1. open": "1.0", "2. high": "1.1", "3. low": "0.9", "4. close": "1.0", "5. volume": "300"},
                "2024-03-15": {"1. open": "1.0", "2. high": "1.1", "3. low": "0.9", "4. close": "1.0", "5. volume": "400"}
            }
        }"#;
        let response: TimeSeriesResponse = serde_json::from_str(body).unwrap();
        let bars = parse_series(&response);

        assert_eq!(bars.len(), 3);
        let bad = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        assert!(!bars.contains_key(&bad));
    }

    #[test]
    fn test_parse_series_skips_bad_price_and_bad_date() {
        let body = r#"{
            "Time Series (Daily)": {
                "2024-03-14": {"1. open": "oops", "2. high": "1.1", "3. low": "0.9", "4. close": "1.0", "5. volume": "100"},
                "not-a-date": {"1. open": "1.0", "2. high": "1.1", "3. low": "0.9", "4. close": "1.0", "5. volume": "200"},
                "2024-03-15": {"1. open": "1.0", "2. high": "1.1", "3. low": "0.9", "4. close": "1.0", "5. volume": "300"}
            }
        }"#;
        let response: TimeSeriesResponse = serde_json::from_str(body).unwrap();
        let bars = parse_series(&response);

        assert_eq!(bars.len(), 1);
        let good = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert!(bars.contains_key(&good));
    }

    #[test]
    fn test_to_bar_reports_failing_field() {
        let raw = RawDailyBar {
            open: "1.0".to_string(),
            high: "1.1".to_string(),
            low: "0.9".to_string(),
            close: "abc".to_string(),
            volume: "100".to_string(),
        };
        assert_eq!(raw.to_bar().unwrap_err(), "close");
    }

    #[test]
    fn test_output_size_as_str() {
        assert_eq!(OutputSize::Compact.as_str(), "compact");
        assert_eq!(OutputSize::Full.as_str(), "full");
    }
}
