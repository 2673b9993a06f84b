// 接続設定
//
// 比較対象となる2つのデータベースそれぞれの接続設定を表現します。
// 値はすべて対話プロンプトから入力されます。

use anyhow::{anyhow, Result};
use std::str::FromStr;

/// データベース方言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    PostgreSQL,
    MySQL,
    SQLite,
}

impl Dialect {
    /// デフォルトのポート番号（SQLiteはポートを使用しない）
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Dialect::PostgreSQL => Some(5432),
            Dialect::MySQL => Some(3306),
            Dialect::SQLite => None,
        }
    }

    /// ネットワーク接続を必要とするかどうか
    pub fn is_networked(&self) -> bool {
        !matches!(self, Dialect::SQLite)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::PostgreSQL => write!(f, "postgresql"),
            Dialect::MySQL => write!(f, "mysql"),
            Dialect::SQLite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Dialect {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSQL),
            "mysql" | "mariadb" => Ok(Dialect::MySQL),
            "sqlite" => Ok(Dialect::SQLite),
            other => Err(anyhow!(
                "Unsupported database dialect: {}. Please specify one of: postgresql, mysql, sqlite.",
                other
            )),
        }
    }
}

/// データベース接続設定
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// ホスト名（SQLiteの場合は不要）
    pub host: String,

    /// ポート番号（未指定の場合は方言のデフォルト）
    pub port: Option<u16>,

    /// データベース名（SQLiteの場合はファイルパス）
    pub database: String,

    /// ユーザー名
    pub user: Option<String>,

    /// パスワード
    pub password: Option<String>,

    /// 接続タイムアウト（秒）
    pub timeout: Option<u64>,
}

fn default_host() -> String {
    "localhost".to_string()
}

impl DatabaseConfig {
    /// 方言を考慮した実際のポート番号
    pub fn port_or_default(&self, dialect: Dialect) -> u16 {
        self.port.or(dialect.default_port()).unwrap_or(0)
    }

    /// Validate database configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(anyhow!("Database name is not specified"));
        }

        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            database: String::new(),
            user: None,
            password: None,
            timeout: None,
        }
    }
}
