// Services Layer
// 比較エンジンとレポート出力

pub mod data_comparator;
pub mod report_sink;
pub mod schema_comparator;
