// SQL識別子クォートユーティリティ
//
// 各データベース方言用の識別子クォートとバインドプレースホルダーを提供します。
// ユーザーが入力したテーブル名・カラム名は必ずここを通してSQLに埋め込みます。

use crate::core::config::Dialect;

/// PostgreSQL用識別子クォート（ダブルクォート）
///
/// 識別子内のダブルクォートは二重にエスケープします。
///
/// # Examples
/// ```
/// use dbcompare::adapters::sql_quote::quote_identifier_postgres;
/// assert_eq!(quote_identifier_postgres("users"), r#""users""#);
/// assert_eq!(quote_identifier_postgres(r#"table"name"#), r#""table""name""#);
/// ```
pub fn quote_identifier_postgres(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// MySQL用識別子クォート（バッククォート）
///
/// 識別子内のバッククォートは二重にエスケープします。
///
/// # Examples
/// ```
/// use dbcompare::adapters::sql_quote::quote_identifier_mysql;
/// assert_eq!(quote_identifier_mysql("users"), "`users`");
/// assert_eq!(quote_identifier_mysql("table`name"), "`table``name`");
/// ```
pub fn quote_identifier_mysql(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// SQLite用識別子クォート（ダブルクォート）
pub fn quote_identifier_sqlite(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 方言に応じた識別子クォート
pub fn quote_identifier(dialect: Dialect, name: &str) -> String {
    match dialect {
        Dialect::PostgreSQL => quote_identifier_postgres(name),
        Dialect::MySQL => quote_identifier_mysql(name),
        Dialect::SQLite => quote_identifier_sqlite(name),
    }
}

/// 方言に応じたバインドプレースホルダー（`index` は1始まり）
///
/// Anyドライバーはプレースホルダーを変換しないため、方言ごとに書き分けます。
pub fn placeholder(dialect: Dialect, index: usize) -> String {
    match dialect {
        Dialect::PostgreSQL => format!("${}", index),
        Dialect::MySQL | Dialect::SQLite => "?".to_string(),
    }
}

/// 式を文字列型にキャスト
///
/// Anyドライバーが扱えない型（NUMERIC, DATE, CHAR(n) など）も文字列として取り出せます。
pub fn cast_to_text(dialect: Dialect, expr: &str) -> String {
    match dialect {
        Dialect::MySQL => format!("CAST({} AS CHAR)", expr),
        Dialect::PostgreSQL | Dialect::SQLite => format!("CAST({} AS TEXT)", expr),
    }
}

/// クォート済みのキー列と文字列パラメータを比較する条件式
///
/// PostgreSQLは文字列パラメータを列の型へ暗黙変換しないため、列側を文字列にキャストします。
/// MySQLとSQLiteはパラメータが列の型に合わせて変換されるので、列をそのまま比較します。
pub fn text_key_condition(dialect: Dialect, column: &str, index: usize) -> String {
    let param = placeholder(dialect, index);
    match dialect {
        Dialect::PostgreSQL => format!("{} = {}", cast_to_text(dialect, column), param),
        Dialect::MySQL | Dialect::SQLite => format!("{} = {}", column, param),
    }
}
