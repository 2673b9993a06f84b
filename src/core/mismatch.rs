// データ不一致のドメインモデル
//
// データ比較で検出された1件の不一致を表現します。
// 一度作成されたら変更されません。

use crate::core::row::Value;
use std::fmt;

/// データ不一致
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    /// DB2にキーが存在しない
    Missing {
        /// キー値
        key: Value,
    },

    /// 両方に存在するが値が異なる
    ValueDiffers {
        /// キー値
        key: Value,
        /// DB1の値
        source: Value,
        /// DB2の値
        target: Value,
    },
}

impl Mismatch {
    /// キー値を取得
    pub fn key(&self) -> &Value {
        match self {
            Mismatch::Missing { key } | Mismatch::ValueDiffers { key, .. } => key,
        }
    }

    /// DB2に存在しない不一致かどうか
    pub fn is_missing(&self) -> bool {
        matches!(self, Mismatch::Missing { .. })
    }
}

/// レポートファイルの1行（改行なし）
impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Missing { key } => write!(f, "Missing in DB2 at {}", key),
            Mismatch::ValueDiffers {
                key,
                source,
                target,
            } => write!(f, "Mismatch at {}: DB1='{}' vs DB2='{}'", key, source, target),
        }
    }
}
