// スキーマ比較コマンドハンドラー
//
// 全テーブルまたは単一テーブルのカラム定義を比較します。
// - 結果はテーブルごとにコンソールへ表示（常に）
// - 出力パスが指定された場合はファイルへ追記

use crate::adapters::database::Connection;
use crate::core::schema_diff::TableSchemaReport;
use crate::services::report_sink::{ReportFile, ReportSink};
use crate::services::schema_comparator::SchemaComparator;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// 比較範囲
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaScope {
    /// 両DBのテーブル名の和集合すべて
    AllTables,
    /// 指定した1テーブル
    Table(String),
}

/// スキーマ比較コマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct SchemaCompareCommand {
    /// 比較範囲
    pub scope: SchemaScope,
    /// 出力ファイルパス（Noneの場合はコンソールのみ）
    pub output_path: Option<PathBuf>,
}

/// スキーマ比較コマンドハンドラー
#[derive(Debug, Default)]
pub struct SchemaCompareCommandHandler {}

impl SchemaCompareCommandHandler {
    /// 新しいSchemaCompareCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// スキーマ比較を実行
    ///
    /// # Arguments
    ///
    /// * `command` - スキーマ比較コマンドのパラメータ
    /// * `source` - DB1
    /// * `target` - DB2
    /// * `console` - 比較結果の表示先
    ///
    /// # Returns
    ///
    /// 成功時は比較結果のサマリー
    pub async fn execute(
        &self,
        command: &SchemaCompareCommand,
        source: &Connection,
        target: &Connection,
        console: &mut dyn Write,
    ) -> Result<String> {
        // 比較を始める前に出力先を開き、開けない場合は何も比較しない
        let mut report_file = command
            .output_path
            .as_ref()
            .map(ReportFile::append)
            .transpose()?;

        let comparator = SchemaComparator::new(source, target);
        let (tables, with_header) = match &command.scope {
            SchemaScope::AllTables => (
                comparator
                    .table_union()
                    .await
                    .with_context(|| "Failed to list tables")?,
                true,
            ),
            SchemaScope::Table(table) => (vec![table.clone()], false),
        };
        debug!(count = tables.len(), "Comparing table schemas");

        let mut differing = 0;
        for table in &tables {
            let report = comparator
                .compare_table(table)
                .await
                .with_context(|| format!("Failed to compare schema of table '{}'", table))?;

            if !report.is_match() {
                differing += 1;
            }

            if let Some(file) = report_file.as_mut() {
                file.write(&report.render(with_header))?;
            }

            console
                .write_all(self.format_for_console(&report, with_header).as_bytes())
                .with_context(|| "Failed to write to console")?;
        }

        let saved_to = match report_file {
            Some(file) => {
                let path = file.path().to_path_buf();
                file.close()?;
                Some(path)
            }
            None => None,
        };

        Ok(self.format_summary(tables.len(), differing, saved_to.as_ref()))
    }

    /// コンソール用に色付けしたレポート
    fn format_for_console(&self, report: &TableSchemaReport, with_header: bool) -> String {
        let mut output = String::new();
        if with_header {
            output.push_str(&format!("\n{}\n", format!("Table: {}", report.table).bold()));
        }
        if report.is_match() {
            output.push_str(&format!("{}\n", "Schemas match.".green()));
        } else {
            output.push_str(&format!("{}\n", "Schema differences found:".yellow()));
            for diff in &report.diffs {
                output.push_str(&format!("  - {}\n", diff.description()));
            }
        }
        output
    }

    /// 比較結果のサマリーをフォーマット
    pub fn format_summary(
        &self,
        table_count: usize,
        differing: usize,
        saved_to: Option<&PathBuf>,
    ) -> String {
        let mut output = format!(
            "\nCompared {} table(s): {} with differences.",
            table_count, differing
        );
        if let Some(path) = saved_to {
            output.push_str(&format!("\nReport appended to: {}", path.display()));
        }
        output
    }
}
