// データベース接続アダプター
//
// SQLxのAnyドライバーを使用したデータベース接続の管理を行います。
// PostgreSQL、MySQL、SQLiteに対応した統一されたインターフェースを提供し、
// クエリ結果を方言に依存しない Row / Value に変換します。

use crate::adapters::connection_string::build_connection_string;
use crate::adapters::database_introspector::{create_introspector, DatabaseIntrospector};
use crate::adapters::sql_quote;
use crate::core::config::{DatabaseConfig, Dialect};
use crate::core::error::DatabaseError;
use crate::core::row::{Row, Value};
use crate::core::schema::ColumnDescriptor;
use futures::stream::BoxStream;
use futures::StreamExt;
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::pool::PoolOptions;
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Column, Row as _};
use std::time::Duration;
use tracing::debug;

/// データベース接続サービス
///
/// 接続の確立と接続確認を行います。
#[derive(Debug, Clone)]
pub struct DatabaseConnectionService {
    // 将来的な拡張のためのフィールドを予約
}

impl DatabaseConnectionService {
    /// 新しいDatabaseConnectionServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// データベース接続文字列を構築
    pub fn build_connection_string(&self, dialect: Dialect, config: &DatabaseConfig) -> String {
        build_connection_string(dialect, config)
    }

    /// データベースに接続
    ///
    /// 接続後に `SELECT 1` で疎通を確認します。失敗した場合はリトライせず
    /// `DatabaseError::Connection` を返します。
    ///
    /// # Arguments
    ///
    /// * `dialect` - データベース方言
    /// * `config` - データベース設定
    pub async fn open(
        &self,
        dialect: Dialect,
        config: &DatabaseConfig,
    ) -> Result<Connection, DatabaseError> {
        config.validate().map_err(|e| DatabaseError::Connection {
            message: "Invalid connection settings".to_string(),
            cause: e.to_string(),
        })?;

        sqlx::any::install_default_drivers();

        let connection_string = self.build_connection_string(dialect, config);
        debug!(%dialect, host = %config.host, database = %config.database, "Opening connection");

        let pool = self
            .create_pool_options_with_timeout(config.timeout)
            .connect(&connection_string)
            .await
            .map_err(|e| DatabaseError::Connection {
                message: format!(
                    "Failed to connect to {} database '{}'",
                    dialect, config.database
                ),
                cause: e.to_string(),
            })?;

        self.test_connection(&pool).await?;

        Ok(Connection {
            pool,
            dialect,
            introspector: create_introspector(dialect),
        })
    }

    /// 接続テストを実行
    pub async fn test_connection(&self, pool: &AnyPool) -> Result<(), DatabaseError> {
        // シンプルなクエリで接続をテスト
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Connection {
                message: "Database connection test failed".to_string(),
                cause: e.to_string(),
            })
    }

    /// タイムアウト付きのプールオプションを作成
    ///
    /// 比較処理は逐次実行のため、接続は1本に固定します。
    /// 同じ接続上で参照用のプリペアドステートメントが再利用されます。
    pub fn create_pool_options_with_timeout(&self, timeout_secs: Option<u64>) -> PoolOptions<Any> {
        let timeout = timeout_secs.unwrap_or(30);
        PoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(timeout))
    }
}

impl Default for DatabaseConnectionService {
    fn default() -> Self {
        Self::new()
    }
}

/// 比較対象データベースへの接続
///
/// 対話セッションが排他的に所有し、セッション終了時に閉じられます。
pub struct Connection {
    pool: AnyPool,
    dialect: Dialect,
    introspector: Box<dyn DatabaseIntrospector>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// データベース方言
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// 方言に応じて識別子をクォート
    pub fn quote(&self, identifier: &str) -> String {
        sql_quote::quote_identifier(self.dialect, identifier)
    }

    /// 方言に応じたバインドプレースホルダー（1始まり）
    pub fn placeholder(&self, index: usize) -> String {
        sql_quote::placeholder(self.dialect, index)
    }

    /// 読み取りクエリを実行し、全行を返す
    pub async fn query_all(&self, sql: &str) -> Result<Vec<Row>, DatabaseError> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::query(e.to_string(), sql))?;

        rows.iter()
            .map(|row| convert_row(row).map_err(|e| DatabaseError::query(e.to_string(), sql)))
            .collect()
    }

    /// 読み取りクエリを実行し、行を逐次返すストリームを作成
    ///
    /// ストリームは再開できません。やり直す場合はクエリを再発行します。
    pub fn fetch_rows<'a>(&'a self, sql: &'a str) -> BoxStream<'a, Result<Row, DatabaseError>> {
        sqlx::query(sql)
            .fetch(&self.pool)
            .map(move |result| {
                result
                    .and_then(|row| convert_row(&row))
                    .map_err(|e| DatabaseError::query(e.to_string(), sql))
            })
            .boxed()
    }

    /// パラメータ付きクエリを実行し、最初の1行を返す
    pub async fn query_one(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<Row>, DatabaseError> {
        let query = params
            .iter()
            .fold(sqlx::query(sql), |query, param| bind_value(query, param));

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::query(e.to_string(), sql))?;

        row.as_ref()
            .map(convert_row)
            .transpose()
            .map_err(|e| DatabaseError::query(e.to_string(), sql))
    }

    /// テーブル名一覧を取得
    pub async fn table_names(&self) -> Result<Vec<String>, DatabaseError> {
        self.introspector
            .get_table_names(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query {
                message: format!("Failed to list tables: {:#}", e),
                sql: None,
            })
    }

    /// テーブルのカラム定義を取得
    pub async fn columns(&self, table_name: &str) -> Result<Vec<ColumnDescriptor>, DatabaseError> {
        self.introspector
            .get_columns(&self.pool, table_name)
            .await
            .map_err(|e| DatabaseError::Query {
                message: format!("Failed to get columns of '{}': {:#}", table_name, e),
                sql: None,
            })
    }

    /// 接続を閉じる
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Value をクエリにバインド
fn bind_value<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    value: &Value,
) -> Query<'q, Any, AnyArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.clone()),
        Value::Bytes(b) => query.bind(b.clone()),
    }
}

/// AnyRow を列順を保った Row に変換
fn convert_row(row: &AnyRow) -> Result<Row, sqlx::Error> {
    let mut out = Row::new();
    for column in row.columns() {
        let value = decode_value(row, column.ordinal())?;
        out.insert(column.name(), value);
    }
    Ok(out)
}

/// 1列の値を取り出す
///
/// Anyドライバーは宣言型に互換な Rust 型でしか取り出せないため、
/// 文字列・整数・浮動小数点・真偽値・バイト列の順に試します。
fn decode_value(row: &AnyRow, index: usize) -> Result<Value, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::Text));
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::Int));
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return Ok(v.map_or(Value::Null, |i| Value::Int(i64::from(i))));
    }
    if let Ok(v) = row.try_get::<Option<i16>, _>(index) {
        return Ok(v.map_or(Value::Null, |i| Value::Int(i64::from(i))));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::Float));
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(index) {
        return Ok(v.map_or(Value::Null, |f| Value::Float(f64::from(f))));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::Bool));
    }
    row.try_get::<Option<Vec<u8>>, _>(index)
        .map(|v| v.map_or(Value::Null, Value::Bytes))
}
