// スキーマ比較サービス
//
// 2つのデータベースで同名テーブルのカラム定義（名前と宣言型）を比較します。
// カラム名・テーブル名はアルファベット順に並べ、結果を再現可能にしています。

use crate::adapters::database::Connection;
use crate::core::error::DatabaseError;
use crate::core::schema::ColumnDescriptor;
use crate::core::schema_diff::{SchemaDiff, TableSchemaReport};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// スキーマ比較サービス
#[derive(Debug)]
pub struct SchemaComparator<'a> {
    source: &'a Connection,
    target: &'a Connection,
}

impl<'a> SchemaComparator<'a> {
    /// 新しいSchemaComparatorを作成
    ///
    /// # Arguments
    ///
    /// * `source` - DB1
    /// * `target` - DB2
    pub fn new(source: &'a Connection, target: &'a Connection) -> Self {
        Self { source, target }
    }

    /// 1テーブルのカラム定義を比較
    pub async fn compare_table(&self, table: &str) -> Result<TableSchemaReport, DatabaseError> {
        let source_columns = self.source.columns(table).await?;
        let target_columns = self.target.columns(table).await?;
        debug!(
            table,
            source = source_columns.len(),
            target = target_columns.len(),
            "Fetched column descriptors"
        );

        Ok(TableSchemaReport {
            table: table.to_string(),
            diffs: diff_columns(&source_columns, &target_columns),
        })
    }

    /// 両方のデータベースに存在するテーブル名の和集合
    pub async fn table_union(&self) -> Result<Vec<String>, DatabaseError> {
        let source_tables = self.source.table_names().await?;
        let target_tables = self.target.table_names().await?;
        Ok(union_table_names(&source_tables, &target_tables))
    }
}

/// カラム定義の差分を検出
///
/// 宣言型は文字列の完全一致で比較します。
pub fn diff_columns(source: &[ColumnDescriptor], target: &[ColumnDescriptor]) -> Vec<SchemaDiff> {
    let source_map: BTreeMap<&str, &ColumnDescriptor> =
        source.iter().map(|c| (c.name.as_str(), c)).collect();
    let target_map: BTreeMap<&str, &ColumnDescriptor> =
        target.iter().map(|c| (c.name.as_str(), c)).collect();

    let names: BTreeSet<&str> = source_map.keys().chain(target_map.keys()).copied().collect();

    names
        .into_iter()
        .filter_map(|name| match (source_map.get(name), target_map.get(name)) {
            (Some(s), None) => Some(SchemaDiff::missing_in_target(s)),
            (None, Some(t)) => Some(SchemaDiff::missing_in_source(t)),
            (Some(s), Some(t)) if s.declared_type != t.declared_type => {
                Some(SchemaDiff::type_mismatch(s, t))
            }
            _ => None,
        })
        .collect()
}

/// テーブル名の和集合（アルファベット順、重複なし）
pub fn union_table_names(source: &[String], target: &[String]) -> Vec<String> {
    source
        .iter()
        .chain(target.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
