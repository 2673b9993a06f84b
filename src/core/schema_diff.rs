// スキーマ差分ドメインモデル
//
// 2つのデータベース間で同名テーブルのカラム定義を比較した結果を表現します。

use crate::core::schema::ColumnDescriptor;

/// カラム差分の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDiffKind {
    /// DB1に存在しない（DB2のみ）
    MissingInSource,
    /// DB2に存在しない（DB1のみ）
    MissingInTarget,
    /// 両方に存在するが宣言型が異なる
    TypeMismatch,
}

/// カラム差分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDiff {
    /// カラム名
    pub column_name: String,
    /// 差分の種類
    pub kind: SchemaDiffKind,
    /// 詳細（欠落時は存在する側の宣言型、型不一致時は両方の宣言型）
    pub detail: String,
}

impl SchemaDiff {
    /// DB1のみに存在するカラム
    pub fn missing_in_target(column: &ColumnDescriptor) -> Self {
        Self {
            column_name: column.name.clone(),
            kind: SchemaDiffKind::MissingInTarget,
            detail: column.declared_type.clone(),
        }
    }

    /// DB2のみに存在するカラム
    pub fn missing_in_source(column: &ColumnDescriptor) -> Self {
        Self {
            column_name: column.name.clone(),
            kind: SchemaDiffKind::MissingInSource,
            detail: column.declared_type.clone(),
        }
    }

    /// 宣言型の不一致
    pub fn type_mismatch(source: &ColumnDescriptor, target: &ColumnDescriptor) -> Self {
        Self {
            column_name: source.name.clone(),
            kind: SchemaDiffKind::TypeMismatch,
            detail: format!(
                "DB1={}, DB2={}",
                source.declared_type, target.declared_type
            ),
        }
    }

    /// レポート用の説明文
    pub fn description(&self) -> String {
        match self.kind {
            SchemaDiffKind::MissingInSource => {
                format!("Column '{}' missing in DB1", self.column_name)
            }
            SchemaDiffKind::MissingInTarget => {
                format!("Column '{}' missing in DB2", self.column_name)
            }
            SchemaDiffKind::TypeMismatch => {
                format!("Column '{}' type mismatch: {}", self.column_name, self.detail)
            }
        }
    }
}

/// 1テーブル分のスキーマ比較結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchemaReport {
    /// テーブル名
    pub table: String,
    /// カラム差分（カラム名のアルファベット順）
    pub diffs: Vec<SchemaDiff>,
}

impl TableSchemaReport {
    /// 差分がないかどうか
    pub fn is_match(&self) -> bool {
        self.diffs.is_empty()
    }

    /// レポートファイル用のテキストを生成
    ///
    /// `with_header` が真の場合は `Table: <name>` 見出しを先頭に付けます（全テーブルモード）。
    pub fn render(&self, with_header: bool) -> String {
        let mut out = String::new();
        if with_header {
            out.push_str(&format!("\nTable: {}\n", self.table));
        }
        if self.is_match() {
            out.push_str("Schemas match.\n");
        } else {
            out.push_str("Schema differences found:\n");
            for diff in &self.diffs {
                out.push_str(&format!("  - {}\n", diff.description()));
            }
        }
        out
    }
}
