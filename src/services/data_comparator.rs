// データ比較サービス
//
// 1つのテーブル・値カラム・キーカラムの組について、DB1の全行をキー昇順に読み出し、
// キーごとにDB2を参照して値を比較します。
// - DB2に行がない: Missing
// - 値が緩い等価性で異なる: ValueDiffers
// DB2にのみ存在するキーは報告しません。

use crate::adapters::database::Connection;
use crate::adapters::sql_quote;
use crate::core::mismatch::Mismatch;
use crate::core::row::{Row, Value};
use crate::services::report_sink::ReportSink;
use anyhow::{Context, Result};
use futures::TryStreamExt;
use tracing::{debug, info, warn};

/// 比較対象（テーブル・値カラム・キーカラム）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataComparisonTarget {
    /// テーブル名
    pub table: String,
    /// 比較する値カラム
    pub value_column: String,
    /// 行を対応付けるキーカラム（両DBで一意であること）
    pub key_column: String,
}

/// データ比較の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataComparisonSummary {
    /// 比較したDB1の行数
    pub rows_compared: usize,
    /// 検出した不一致の数（レポートに書いた行数と一致）
    pub mismatches: usize,
}

/// データ比較サービス
#[derive(Debug)]
pub struct DataComparator<'a> {
    source: &'a Connection,
    target: &'a Connection,
}

impl<'a> DataComparator<'a> {
    /// 新しいDataComparatorを作成
    pub fn new(source: &'a Connection, target: &'a Connection) -> Self {
        Self { source, target }
    }

    /// DB1でキー昇順に全行を取得するSQL
    ///
    /// キーと値は文字列にキャストして取得します。
    /// 並び順はテーブル修飾した元のキー列で決めるため、数値キーは数値順になります。
    pub fn source_query(&self, target: &DataComparisonTarget) -> String {
        let dialect = self.source.dialect();
        let key = self.source.quote(&target.key_column);
        let value = self.source.quote(&target.value_column);
        let table = self.source.quote(&target.table);
        format!(
            "SELECT {key_text} AS {key}, {value_text} AS {value} FROM {table} ORDER BY {table}.{key} ASC",
            key_text = sql_quote::cast_to_text(dialect, &key),
            value_text = sql_quote::cast_to_text(dialect, &value),
        )
    }

    /// DB2でキーを指定して1行を取得するSQL
    ///
    /// パラメータにはDB1から取得した文字列のキーを渡します。
    pub fn lookup_query(&self, target: &DataComparisonTarget) -> String {
        let dialect = self.target.dialect();
        let key = self.target.quote(&target.key_column);
        let value = self.target.quote(&target.value_column);
        let table = self.target.quote(&target.table);
        format!(
            "SELECT {key_text} AS {key}, {value_text} AS {value} FROM {table} WHERE {condition}",
            key_text = sql_quote::cast_to_text(dialect, &key),
            value_text = sql_quote::cast_to_text(dialect, &value),
            condition = sql_quote::text_key_condition(dialect, &key, 1),
        )
    }

    /// データを比較し、不一致を検出するたびにレポートへ書き込む
    ///
    /// クエリが1つでも失敗した場合は比較全体を中断します。
    /// それまでに書き込んだ行はレポートに残ります。
    pub async fn compare(
        &self,
        target: &DataComparisonTarget,
        sink: &mut dyn ReportSink,
    ) -> Result<DataComparisonSummary> {
        let source_sql = self.source_query(target);
        let lookup_sql = self.lookup_query(target);
        debug!(
            source_dialect = %self.source.dialect(),
            target_dialect = %self.target.dialect(),
            %source_sql,
            %lookup_sql,
            "Starting data comparison"
        );

        let mut summary = DataComparisonSummary::default();
        let mut rows = self.source.fetch_rows(&source_sql);

        while let Some(source_row) = rows
            .try_next()
            .await
            .context("Failed to read rows from DB1")?
        {
            let key = column_value(&source_row, &target.key_column, 0);
            let source_value = column_value(&source_row, &target.value_column, 1);
            if key.is_null() {
                // NULLキーはDB2側で一致しないため Missing として報告される
                warn!(table = %target.table, "Row with NULL key in DB1");
            }

            let target_row = self
                .target
                .query_one(&lookup_sql, std::slice::from_ref(&key))
                .await
                .with_context(|| format!("Failed to look up key {} in DB2", key))?;

            summary.rows_compared += 1;

            if let Some(mismatch) = classify(key, source_value, target_row.as_ref(), target) {
                debug!(key = %mismatch.key(), missing = mismatch.is_missing(), "Mismatch found");
                sink.write(&format!("{}\n", mismatch))?;
                summary.mismatches += 1;
            }
        }

        info!(
            table = %target.table,
            rows = summary.rows_compared,
            mismatches = summary.mismatches,
            "Data comparison finished"
        );
        Ok(summary)
    }
}

/// 1行分の比較結果を分類
///
/// 一致した場合は `None` を返します。
pub fn classify(
    key: Value,
    source_value: Value,
    target_row: Option<&Row>,
    target: &DataComparisonTarget,
) -> Option<Mismatch> {
    let Some(target_row) = target_row else {
        return Some(Mismatch::Missing { key });
    };

    let target_value = column_value(target_row, &target.value_column, 1);
    if source_value.loose_eq(&target_value) {
        None
    } else {
        Some(Mismatch::ValueDiffers {
            key,
            source: source_value,
            target: target_value,
        })
    }
}

/// 列名で値を取り出す（見つからなければSELECT句の位置で取り出す）
fn column_value(row: &Row, name: &str, position: usize) -> Value {
    row.get(name)
        .or_else(|| row.get_index(position).map(|(_, v)| v))
        .cloned()
        .unwrap_or(Value::Null)
}
