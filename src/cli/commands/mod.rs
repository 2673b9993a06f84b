// コマンドハンドラー層
// 各比較モードの実装

pub mod data_compare;
pub mod schema_compare;
