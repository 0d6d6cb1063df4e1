//! # Stockd Core
//!
//! 주식 시세 캐시 서비스의 핵심 타입을 제공합니다.
//!
//! 이 크레이트는 서비스 전반에서 사용되는 기본 구성 요소를 제공합니다:
//! - 설정 관리 (환경 변수 → 명시적 설정 구조체)
//! - 로깅 인프라
//! - 공유 도메인 타입 (일별 OHLCV 바, 조회 기간)

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
