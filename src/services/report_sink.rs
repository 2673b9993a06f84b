// レポート出力サービス
//
// 比較結果をテキストファイルへ書き出します。
// - データ比較: 切り詰めてから書き込み（パス未指定時はタイムスタンプから生成）
// - スキーマ比較: テーブルごとに追記
// 各行は書き込み時にフラッシュされるため、途中で失敗しても書き込み済みの行は残ります。

use crate::core::error::IoError;
use chrono::{DateTime, TimeZone};
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

/// レポートの書き込み先
pub trait ReportSink {
    /// テキストを書き込む（改行は呼び出し側が含める）
    fn write(&mut self, text: &str) -> Result<(), IoError>;
}

/// メモリ上にレポートを蓄積する
impl ReportSink for Vec<String> {
    fn write(&mut self, text: &str) -> Result<(), IoError> {
        self.push(text.to_string());
        Ok(())
    }
}

/// レポートファイル
///
/// ドロップ時にも閉じられるため、途中でエラー終了してもハンドルは解放されます。
#[derive(Debug)]
pub struct ReportFile {
    path: PathBuf,
    writer: LineWriter<File>,
}

impl ReportFile {
    /// ファイルを作成（既存の内容は切り詰め）
    pub fn create(path: impl AsRef<Path>) -> Result<Self, IoError> {
        Self::open_with(path.as_ref(), OpenOptions::new().write(true).create(true).truncate(true))
    }

    /// ファイルを追記モードで開く（存在しなければ作成）
    pub fn append(path: impl AsRef<Path>) -> Result<Self, IoError> {
        Self::open_with(path.as_ref(), OpenOptions::new().append(true).create(true))
    }

    fn open_with(path: &Path, options: &OpenOptions) -> Result<Self, IoError> {
        let file = options.open(path).map_err(|e| IoError::FileOpen {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: LineWriter::new(file),
        })
    }

    /// ファイルパス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 残りのバッファをフラッシュして閉じる
    pub fn close(mut self) -> Result<(), IoError> {
        self.writer.flush().map_err(|e| self.write_error(e))
    }

    fn write_error(&self, e: std::io::Error) -> IoError {
        IoError::FileWrite {
            path: self.path.display().to_string(),
            cause: e.to_string(),
        }
    }
}

impl ReportSink for ReportFile {
    fn write(&mut self, text: &str) -> Result<(), IoError> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|e| self.write_error(e))
    }
}

/// データ比較結果のデフォルトファイル名を生成
///
/// 形式: `comparison_results_YYYYMMDD_HHMMSS.txt`
pub fn synthesize_report_path<Tz: TimeZone>(now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    PathBuf::from(format!(
        "comparison_results_{}.txt",
        now.format("%Y%m%d_%H%M%S")
    ))
}
