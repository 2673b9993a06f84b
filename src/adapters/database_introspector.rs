// データベースイントロスペクター
//
// データベースからスキーマ情報を取得するための抽象化レイヤー。
// 各方言固有のINFORMATION_SCHEMA/PRAGMAクエリを実装します。

use crate::adapters::sql_quote::quote_identifier_sqlite;
use crate::core::config::Dialect;
use crate::core::schema::ColumnDescriptor;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{AnyPool, Row};

/// データベーススキーマ取得インターフェース
///
/// 各データベース方言固有のイントロスペクション処理を抽象化します。
#[async_trait]
pub trait DatabaseIntrospector: Send + Sync {
    /// テーブル名一覧を取得
    async fn get_table_names(&self, pool: &AnyPool) -> Result<Vec<String>>;

    /// カラム定義を取得（宣言型はDBが返す文字列そのまま）
    async fn get_columns(&self, pool: &AnyPool, table_name: &str)
        -> Result<Vec<ColumnDescriptor>>;
}

/// PostgreSQL用イントロスペクター
pub struct PostgresIntrospector;

/// MySQL用イントロスペクター
pub struct MySqlIntrospector;

/// SQLite用イントロスペクター
pub struct SqliteIntrospector;

/// 方言に応じたイントロスペクターを作成
pub fn create_introspector(dialect: Dialect) -> Box<dyn DatabaseIntrospector> {
    match dialect {
        Dialect::PostgreSQL => Box::new(PostgresIntrospector),
        Dialect::MySQL => Box::new(MySqlIntrospector),
        Dialect::SQLite => Box::new(SqliteIntrospector),
    }
}

// =============================================================================
// PostgreSQL イントロスペクター実装
// =============================================================================

#[async_trait]
impl DatabaseIntrospector for PostgresIntrospector {
    async fn get_table_names(&self, pool: &AnyPool) -> Result<Vec<String>> {
        let sql = r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = 'public'
                AND table_type = 'BASE TABLE'
            ORDER BY table_name
        "#;

        let rows = sqlx::query(sql).fetch_all(pool).await?;
        let table_names = rows
            .iter()
            .map(|row| row.try_get::<String, _>(0))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(table_names)
    }

    async fn get_columns(
        &self,
        pool: &AnyPool,
        table_name: &str,
    ) -> Result<Vec<ColumnDescriptor>> {
        // information_schema.columns.data_type は長さを含まないため format_type を使う
        let sql = r#"
            SELECT
                a.attname::text,
                pg_catalog.format_type(a.atttypid, a.atttypmod)
            FROM pg_catalog.pg_attribute a
            JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
            JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
            WHERE c.relname = $1
                AND n.nspname = 'public'
                AND a.attnum > 0
                AND NOT a.attisdropped
            ORDER BY a.attnum
        "#;

        let rows = sqlx::query(sql).bind(table_name).fetch_all(pool).await?;

        let columns = rows
            .iter()
            .map(|row| {
                Ok(ColumnDescriptor::new(
                    row.try_get::<String, _>(0)?,
                    row.try_get::<String, _>(1)?,
                ))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(columns)
    }
}

// =============================================================================
// MySQL イントロスペクター実装
// =============================================================================

#[async_trait]
impl DatabaseIntrospector for MySqlIntrospector {
    async fn get_table_names(&self, pool: &AnyPool) -> Result<Vec<String>> {
        let sql = r#"
            SELECT table_name
            FROM information_schema.tables
            WHERE table_schema = DATABASE()
                AND table_type = 'BASE TABLE'
            ORDER BY table_name
        "#;

        let rows = sqlx::query(sql).fetch_all(pool).await?;
        let table_names = rows
            .iter()
            .map(|row| row.try_get::<String, _>(0))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(table_names)
    }

    async fn get_columns(
        &self,
        pool: &AnyPool,
        table_name: &str,
    ) -> Result<Vec<ColumnDescriptor>> {
        // COLUMN_TYPE は長さ・精度を含む完全な型（例: varchar(10)）
        let sql = r#"
            SELECT
                column_name,
                column_type
            FROM information_schema.columns
            WHERE table_name = ? AND table_schema = DATABASE()
            ORDER BY ordinal_position
        "#;

        let rows = sqlx::query(sql).bind(table_name).fetch_all(pool).await?;

        let columns = rows
            .iter()
            .map(|row| {
                Ok(ColumnDescriptor::new(
                    row.try_get::<String, _>(0)?,
                    row.try_get::<String, _>(1)?,
                ))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(columns)
    }
}

// =============================================================================
// SQLite イントロスペクター実装
// =============================================================================

#[async_trait]
impl DatabaseIntrospector for SqliteIntrospector {
    async fn get_table_names(&self, pool: &AnyPool) -> Result<Vec<String>> {
        let sql = r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table'
                AND name NOT LIKE 'sqlite_%'
            ORDER BY name
        "#;

        let rows = sqlx::query(sql).fetch_all(pool).await?;
        let table_names = rows
            .iter()
            .map(|row| row.try_get::<String, _>(0))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(table_names)
    }

    async fn get_columns(
        &self,
        pool: &AnyPool,
        table_name: &str,
    ) -> Result<Vec<ColumnDescriptor>> {
        let quoted_name = quote_identifier_sqlite(table_name);
        let sql = format!("PRAGMA table_info({})", quoted_name);
        let rows = sqlx::query(&sql).fetch_all(pool).await?;

        // 型指定のないカラムは空文字列が返る
        let columns = rows
            .iter()
            .map(|row| {
                Ok(ColumnDescriptor::new(
                    row.try_get::<String, _>(1)?,
                    row.try_get::<String, _>(2)?,
                ))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(columns)
    }
}
