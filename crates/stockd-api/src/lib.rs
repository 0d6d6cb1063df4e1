//! 주식 시세 캐시 REST API.
//!
//! Alpha Vantage의 일별 시세를 PostgreSQL 테이블에 캐싱하고 두 개의
//! 엔드포인트로 노출합니다: 기간별 조회와 강제 수집.
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`provider`]: Alpha Vantage 클라이언트, 응답 파서, 재시도 헬퍼
//! - [`repository`]: daily_prices 테이블 접근
//! - [`services`]: 수집/조정(reconciliation) 로직
//! - [`error`]: 요청 단위 에러와 HTTP 상태 매핑

pub mod error;
pub mod provider;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_api_router;
pub use state::AppState;
