//! 데이터베이스 Repository.

pub mod prices;

pub use prices::{PriceRecord, PriceRepository};
