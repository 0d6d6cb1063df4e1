//! 설정 에러 타입.

use thiserror::Error;

/// 설정 로드 에러.
///
/// 시작 시 환경 변수를 읽는 과정에서 발생하는 에러입니다.
/// `DATABASE_URL` 누락은 프로세스 시작 자체를 중단시킵니다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 필수 환경 변수 누락
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    /// 환경 변수 값이 유효하지 않음
    #[error("Invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}
