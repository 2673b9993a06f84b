// 行と値のドメインモデル
//
// クエリ結果の1行を「列名 → 値」の順序付きマップとして表現します。
// 値の比較は「文字列へ変換してから完全一致」という緩い等価性で行います。

use indexmap::IndexMap;
use std::fmt;

/// 列の値
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// NULLかどうか
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// 比較用の文字列表現
    ///
    /// - NULL は空文字列
    /// - 真偽値は `1` / `0`
    /// - 浮動小数点は最短表現（`10.0` は `10`）
    /// - バイト列はUTF-8として解釈（不正なシーケンスは置換文字）
    pub fn to_loose_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => u8::from(*b).to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }

    /// 緩い等価性による比較
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.to_loose_string() == other.to_loose_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_loose_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// クエリ結果の1行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    /// 空の行を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 列を追加（同名の列は上書き、位置は維持）
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// 列名で値を取得
    ///
    /// 完全一致がなければ大文字小文字を無視して探します。
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).or_else(|| {
            self.fields
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    }

    /// 位置で値を取得
    pub fn get_index(&self, index: usize) -> Option<(&str, &Value)> {
        self.fields
            .get_index(index)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// 列名一覧（取得順）
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
