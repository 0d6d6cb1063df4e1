//! API 에러 타입.
//!
//! 요청 단위 에러를 한 타입으로 모으고 HTTP 상태 코드로 변환합니다.
//! 에러 응답 본문은 구조화된 envelope 없이 일반 텍스트입니다.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::provider::ProviderError;

/// 요청 처리 중 발생하는 에러.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 심볼 누락 또는 공백
    #[error("Symbol is required")]
    MissingSymbol,

    /// range 파라미터 누락
    #[error("Range parameter is required")]
    MissingRange,

    /// 알 수 없는 range 토큰
    #[error("Invalid time range specified: {0}")]
    InvalidRange(String),

    /// 제공자 API 키 미설정. 시작은 막지 않고 refresh 시점에만 발생.
    #[error("Missing API key configuration")]
    MissingApiKey,

    /// 재시도 소진 후의 업스트림 실패
    #[error("Failed to fetch stock data: {0}")]
    Provider(#[from] ProviderError),

    /// 데이터베이스 실패
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// 변형별 HTTP 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingSymbol | ApiError::MissingRange | ApiError::InvalidRange(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MissingApiKey | ApiError::Provider(_) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_string();

        if status.is_server_error() {
            error!(status = %status, error = %body, "Request failed");
        }

        (status, body).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_input_errors_are_400() {
        assert_eq!(ApiError::MissingSymbol.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingRange.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidRange("decade".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_config_and_upstream_errors_are_500() {
        assert_eq!(
            ApiError::MissingApiKey.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_range_message_names_token() {
        let message = ApiError::InvalidRange("decade".to_string()).to_string();
        assert!(message.contains("decade"));
    }
}
