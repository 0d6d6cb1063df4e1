//! 업스트림 시세 제공자 연동.
//!
//! - [`alpha_vantage`]: Alpha Vantage 클라이언트와 응답 파서
//! - [`retry`]: 선형 백오프 재시도 헬퍼

pub mod alpha_vantage;
pub mod retry;

pub use alpha_vantage::{
    parse_series, AlphaVantageClient, AttemptError, OutputSize, ProviderError, RawDailyBar,
    TimeSeriesResponse,
};
pub use retry::{retry_with_backoff, RetryExhausted, RetryPolicy};
