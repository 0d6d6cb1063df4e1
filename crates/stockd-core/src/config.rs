//! 설정 관리.
//!
//! 애플리케이션 설정을 환경 변수에서 한 번 로드하여 명시적 구조체로
//! 보관합니다. 다른 컴포넌트는 프로세스 환경을 직접 읽지 않고
//! [`AppConfig`]를 전달받아 사용합니다.
//!
//! # 환경 변수
//!
//! - `API_HOST` / `API_PORT`: 서버 바인딩 주소 (기본: `0.0.0.0:8080`)
//! - `DATABASE_URL`: PostgreSQL DSN (필수, 없으면 시작 실패)
//! - `ALPHA_VANTAGE_API_KEY`: 시세 제공자 API 키 (선택, 없으면 refresh 요청이 실패)
//! - `ALPHA_VANTAGE_BASE_URL`: 제공자 엔드포인트 (테스트용 오버라이드)
//! - `CORS_ORIGINS`: 허용 origin 목록 (쉼표 구분, 없으면 모두 허용)

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 시세 제공자 설정
    pub provider: ProviderConfig,
    /// CORS 설정
    pub cors: CorsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 문자열
    pub url: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// 연결 문자열로 설정 생성 (풀 설정은 기본값).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

/// 시세 제공자 (Alpha Vantage) 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// API 키. 시작 시에는 선택이며, 없으면 refresh 요청 시점에
    /// 요청 단위 에러로 처리됩니다.
    pub api_key: Option<String>,
    /// API 엔드포인트
    pub base_url: String,
    /// 업스트림 호출 최대 시도 횟수
    pub max_attempts: u32,
    /// 선형 백오프 단위 (초). n번째 실패 후 `n * backoff_secs` 대기.
    pub backoff_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.alphavantage.co/query".to_string(),
            max_attempts: 3,
            backoff_secs: 1,
        }
    }
}

/// CORS 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CorsConfig {
    /// 허용할 origin 목록. 비어 있으면 모든 origin 허용 (개발 모드).
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// 쉼표로 구분된 origin 목록 파싱.
    pub fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl AppConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # Errors
    ///
    /// `DATABASE_URL`이 없으면 [`ConfigError::MissingVar`]를,
    /// `API_PORT`가 숫자가 아니면 [`ConfigError::InvalidVar`]를 반환합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("API_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: "API_PORT",
                value: raw.clone(),
            })?,
            Err(_) => 8080,
        };

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let mut provider = ProviderConfig {
            api_key: std::env::var("ALPHA_VANTAGE_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            ..Default::default()
        };
        if let Ok(base_url) = std::env::var("ALPHA_VANTAGE_BASE_URL") {
            if !base_url.is_empty() {
                provider.base_url = base_url;
            }
        }

        let allowed_origins = std::env::var("CORS_ORIGINS")
            .map(|raw| CorsConfig::parse_origins(&raw))
            .unwrap_or_default();

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig::new(database_url),
            provider,
            cors: CorsConfig { allowed_origins },
        })
    }
}
