//! 라우트 핸들러 뒤의 서비스 로직.

pub mod refresh;

pub use refresh::refresh_symbol;
