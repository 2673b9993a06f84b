// データ比較コマンドハンドラー
//
// 1カラムの値をキーで突き合わせて比較し、不一致をファイルに書き出します。
// 出力パスが未指定の場合はタイムスタンプからファイル名を生成します。
// 不一致が0件でもファイルは作成されます。

use crate::adapters::database::Connection;
use crate::services::data_comparator::{DataComparator, DataComparisonSummary, DataComparisonTarget};
use crate::services::report_sink::{synthesize_report_path, ReportFile};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// データ比較コマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct DataCompareCommand {
    /// 比較対象
    pub target: DataComparisonTarget,
    /// 出力ファイルパス（Noneの場合は自動生成）
    pub output_path: Option<PathBuf>,
}

/// データ比較コマンドハンドラー
#[derive(Debug, Default)]
pub struct DataCompareCommandHandler {}

impl DataCompareCommandHandler {
    /// 新しいDataCompareCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// データ比較を実行
    ///
    /// # Arguments
    ///
    /// * `command` - データ比較コマンドのパラメータ
    /// * `source` - DB1
    /// * `target` - DB2
    ///
    /// # Returns
    ///
    /// 成功時は不一致件数と出力ファイルパスのサマリー
    pub async fn execute(
        &self,
        command: &DataCompareCommand,
        source: &Connection,
        target: &Connection,
    ) -> Result<String> {
        let output_path = command
            .output_path
            .clone()
            .unwrap_or_else(|| synthesize_report_path(&Local::now()));

        let mut report_file = ReportFile::create(&output_path)?;

        let comparator = DataComparator::new(source, target);
        let summary = comparator
            .compare(&command.target, &mut report_file)
            .await
            .with_context(|| {
                format!(
                    "Data comparison of {}.{} aborted",
                    command.target.table, command.target.value_column
                )
            })?;

        report_file.close()?;

        Ok(self.format_summary(&summary, &output_path))
    }

    /// 比較結果のサマリーをフォーマット
    pub fn format_summary(&self, summary: &DataComparisonSummary, output_path: &Path) -> String {
        format!(
            "Total mismatches: {}\nResults saved to: {}",
            summary.mismatches,
            output_path.display()
        )
    }
}
