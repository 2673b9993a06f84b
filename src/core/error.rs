// エラー型定義
//
// アプリケーション全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、DatabaseError, IoError, SessionError, RetryPrompt を定義し、
// 最上位でエラー種別から終了コードへの対応付けを行います。

use thiserror::Error;

/// 不正なメニュー選択・入力終了・出力ファイルエラーの終了コード
pub const EXIT_FAILURE: i32 = 1;

/// データベース接続エラーの終了コード
pub const EXIT_CONNECTION: i32 = 2;

/// クエリ実行エラーの終了コード
pub const EXIT_QUERY: i32 = 3;

/// データベースエラー
///
/// データベース操作時に発生するエラーを表現します。
/// いずれも致命的で、リトライは行いません。
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connection error
    #[error("Database connection error: {message} (cause: {cause})")]
    Connection {
        /// エラーメッセージ
        message: String,
        /// エラー原因
        cause: String,
    },

    /// Query execution error
    #[error("Query execution error: {message}")]
    Query {
        /// エラーメッセージ
        message: String,
        /// 失敗したSQL
        sql: Option<String>,
    },
}

impl DatabaseError {
    /// クエリエラーを作成
    pub fn query(message: impl Into<String>, sql: &str) -> Self {
        DatabaseError::Query {
            message: message.into(),
            sql: Some(sql.to_string()),
        }
    }

    /// 接続エラーかどうか
    pub fn is_connection(&self) -> bool {
        matches!(self, DatabaseError::Connection { .. })
    }

    /// クエリエラーかどうか
    pub fn is_query(&self) -> bool {
        matches!(self, DatabaseError::Query { .. })
    }

    /// 失敗したSQLを取得
    pub fn sql(&self) -> Option<&str> {
        match self {
            DatabaseError::Query { sql, .. } => sql.as_deref(),
            DatabaseError::Connection { .. } => None,
        }
    }
}

/// I/Oエラー
///
/// レポートファイル操作時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum IoError {
    /// File open error
    #[error("Failed to open output file: {path} (cause: {cause})")]
    FileOpen {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },

    /// File write error
    #[error("Failed to write file: {path} (cause: {cause})")]
    FileWrite {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },
}

impl IoError {
    /// ファイルオープンエラーかどうか
    pub fn is_file_open(&self) -> bool {
        matches!(self, IoError::FileOpen { .. })
    }
}

/// 対話セッションのエラー
#[derive(Debug, Error)]
pub enum SessionError {
    /// Invalid menu choice
    #[error("Invalid choice: '{choice}'. Please select 1, 2 or 3.")]
    InvalidChoice {
        /// 入力された選択肢
        choice: String,
    },

    /// Standard input closed before all fields were entered
    #[error("Input closed while waiting for '{field}'")]
    InputClosed {
        /// 入力待ちだった項目
        field: String,
    },

    /// Terminal read/write error
    #[error("Failed to access terminal: {cause}")]
    Terminal {
        /// エラー原因
        cause: String,
    },
}

impl SessionError {
    /// 不正な選択エラーかどうか
    pub fn is_invalid_choice(&self) -> bool {
        matches!(self, SessionError::InvalidChoice { .. })
    }

    /// 入力終了エラーかどうか
    pub fn is_input_closed(&self) -> bool {
        matches!(self, SessionError::InputClosed { .. })
    }
}

/// 必須項目が空のときに再入力を求めるシグナル
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("This field is required. Please enter a value.")]
pub struct RetryPrompt;

/// エラーチェーンから終了コードを決定
///
/// チェーン内で最初に見つかった既知のエラー種別で判定します。
/// 未知のエラーは `EXIT_FAILURE` になります。
pub fn exit_code(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(db_error) = cause.downcast_ref::<DatabaseError>() {
            return match db_error {
                DatabaseError::Connection { .. } => EXIT_CONNECTION,
                DatabaseError::Query { .. } => EXIT_QUERY,
            };
        }
        if cause.downcast_ref::<IoError>().is_some()
            || cause.downcast_ref::<SessionError>().is_some()
        {
            return EXIT_FAILURE;
        }
    }
    EXIT_FAILURE
}
