//! 공유 도메인 타입.
//!
//! 서비스 전반에서 사용되는 시세 데이터 타입과 조회 기간 정의입니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 하루치 OHLCV 바.
///
/// 제공자 응답의 문자열 필드를 파싱한 결과입니다. 가격은 금융 정밀도를
/// 위해 [`Decimal`]을 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBar {
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

/// 저장된 시세의 조회 기간.
///
/// `week`/`month`는 최근 N개 행 기준이며, `6month`/`year`는
/// 현재 날짜 기준 달력 구간으로 필터링합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    /// 최근 7개 행
    Week,
    /// 최근 30개 행
    Month,
    /// 최근 6개월 (달력 기준, 행 수 제한 없음)
    SixMonth,
    /// 최근 1년 (달력 기준, 행 수 제한 없음)
    Year,
}

impl TimeRange {
    /// 행 수 제한 기반 기간이면 제한 값을 반환합니다.
    pub fn row_limit(&self) -> Option<i64> {
        match self {
            TimeRange::Week => Some(7),
            TimeRange::Month => Some(30),
            TimeRange::SixMonth | TimeRange::Year => None,
        }
    }

    /// 쿼리 파라미터 토큰 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::SixMonth => "6month",
            TimeRange::Year => "year",
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "6month" => Ok(TimeRange::SixMonth),
            "year" => Ok(TimeRange::Year),
            _ => Err(format!("Invalid time range: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 날짜 문자열(`YYYY-MM-DD`) 파싱.
///
/// 제공자 응답의 날짜 키와 DB의 DATE 컬럼 표현이 같은 형식을 공유합니다.
pub fn parse_trading_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
}
