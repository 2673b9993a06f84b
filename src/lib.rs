// dbcompareライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（対話入力の受付とモードの実行）
// - core: コアドメイン（接続設定、行と値、不一致、スキーマ差分、エラー）
// - adapters: データベースへのアクセスを抽象化
// - services: データ比較・スキーマ比較・レポート出力

pub mod cli;
pub mod core;
pub mod adapters;
pub mod services;
