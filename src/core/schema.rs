// テーブル構造のドメインモデル
//
// スキーマ比較で使用するカラム定義を表現します。

/// カラム定義
///
/// データベースから取得したカラム名と宣言型の組。
/// 宣言型はデータベースが返す文字列をそのまま保持します（例: `VARCHAR(10)`）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// カラム名
    pub name: String,
    /// 宣言型
    pub declared_type: String,
}

impl ColumnDescriptor {
    /// 新しいカラム定義を作成
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }
}
