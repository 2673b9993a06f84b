// 接続文字列ビルダー
//
// DatabaseConfig と Dialect から接続文字列を生成する。

use crate::core::config::{DatabaseConfig, Dialect};
use urlencoding::encode;

/// 接続文字列を生成
///
/// ユーザー名とパスワードはパーセントエンコードされます。
/// SQLiteのファイルパスも区切りごとにエンコードされ、sqlx側でデコードされて元のパスに戻ります。
pub fn build_connection_string(dialect: Dialect, config: &DatabaseConfig) -> String {
    match dialect {
        Dialect::PostgreSQL => {
            let user = config.user.as_deref().unwrap_or("postgres");
            format!(
                "postgresql://{}@{}:{}/{}",
                auth(user, config.password.as_deref()),
                config.host,
                config.port_or_default(dialect),
                config.database
            )
        }
        Dialect::MySQL => {
            let user = config.user.as_deref().unwrap_or("root");
            format!(
                "mysql://{}@{}:{}/{}",
                auth(user, config.password.as_deref()),
                config.host,
                config.port_or_default(dialect),
                config.database
            )
        }
        // ファイルが存在しない場合は作成せずエラーにする
        Dialect::SQLite => format!("sqlite://{}?mode=ro", encode_path(&config.database)),
    }
}

/// パス区切りを残して各要素をエンコード
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode)
        .collect::<Vec<_>>()
        .join("/")
}

fn auth(user: &str, password: Option<&str>) -> String {
    let encoded_user = encode(user);
    match password {
        Some(password) if !password.is_empty() => {
            format!("{}:{}", encoded_user, encode(password))
        }
        _ => encoded_user.into_owned(),
    }
}
