// Core Domain
// 比較エンジンが扱う値・行・差分の型と、設定・エラー定義

pub mod config;
pub mod error;
pub mod mismatch;
pub mod row;
pub mod schema;
pub mod schema_diff;
