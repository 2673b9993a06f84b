/// 対話セッションのテスト
///
/// 標準入力の代わりにスクリプト化した入力を与え、
/// 接続からモード実行までの流れを確認します。

#[cfg(test)]
mod session_tests {
    use dbcompare::cli::prompt::Prompter;
    use dbcompare::cli::session::Session;
    use dbcompare::core::error::{exit_code, EXIT_CONNECTION, EXIT_FAILURE};
    use sqlx::sqlite::SqlitePoolOptions;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;

    async fn create_sqlite_db(dir: &Path, name: &str, statements: &[&str]) -> String {
        let path = dir.join(name);
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = SqlitePoolOptions::new().connect(&url).await.unwrap();
        for sql in statements {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }
        pool.close().await;
        path.to_string_lossy().to_string()
    }

    async fn setup(dir: &Path) -> (String, String) {
        let db1 = create_sqlite_db(
            dir,
            "db1.sqlite",
            &[
                "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT)",
                "INSERT INTO users VALUES (1, 'a@example.com')",
                "INSERT INTO users VALUES (2, 'b@example.com')",
            ],
        )
        .await;
        let db2 = create_sqlite_db(
            dir,
            "db2.sqlite",
            &[
                "CREATE TABLE users (id INTEGER PRIMARY KEY, email VARCHAR(50))",
                "INSERT INTO users VALUES (1, 'a@example.com')",
            ],
        )
        .await;
        (db1, db2)
    }

    /// スクリプト入力でセッションを実行し、結果と画面出力を返す
    async fn run_session(script: String) -> (anyhow::Result<String>, String) {
        colored::control::set_override(false);
        let prompter = Prompter::new(Cursor::new(script.into_bytes()), Vec::new());
        let mut session = Session::new(prompter);
        let result = session.run().await;
        let screen = String::from_utf8(session.into_prompter().into_output()).unwrap();
        (result, screen)
    }

    /// データ比較モードの一連の流れ
    #[tokio::test]
    async fn test_data_mode_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let (db1, db2) = setup(temp_dir.path()).await;
        let output = temp_dir.path().join("data.txt");

        // 空のテーブル名は再入力を求められる
        let script = format!(
            "sqlite\n{}\nsqlite\n{}\n3\n\nusers\nemail\nid\n{}\n",
            db1,
            db2,
            output.display()
        );
        let (result, screen) = run_session(script).await;

        let summary = result.unwrap();
        assert!(summary.contains("Total mismatches: 1"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "Missing in DB2 at 2\n");
        assert!(screen.contains("This field is required. Please enter a value."));
    }

    /// 単一テーブルのスキーマ比較は画面に結果を表示する
    #[tokio::test]
    async fn test_single_table_schema_mode() {
        let temp_dir = TempDir::new().unwrap();
        let (db1, db2) = setup(temp_dir.path()).await;

        let script = format!("sqlite\n{}\nsqlite\n{}\n2\nusers\n\n", db1, db2);
        let (result, screen) = run_session(script).await;

        assert!(result.is_ok());
        assert!(screen.contains("Column 'email' type mismatch: DB1=TEXT, DB2=VARCHAR(50)"));
    }

    /// 不正な方言名は再入力を求められる
    #[tokio::test]
    async fn test_unknown_dialect_is_asked_again() {
        let temp_dir = TempDir::new().unwrap();
        let (db1, db2) = setup(temp_dir.path()).await;

        let script = format!("oracle\nsqlite\n{}\nsqlite\n{}\n1\n\n", db1, db2);
        let (result, screen) = run_session(script).await;

        assert!(result.is_ok());
        assert!(screen.contains("Unsupported database dialect: oracle"));
        assert!(screen.contains("Table: users"));
    }

    /// メニュー以外の選択は終了コード1で終了する
    #[tokio::test]
    async fn test_invalid_choice_exits_with_failure() {
        let temp_dir = TempDir::new().unwrap();
        let (db1, db2) = setup(temp_dir.path()).await;

        let script = format!("sqlite\n{}\nsqlite\n{}\n9\n", db1, db2);
        let (result, _) = run_session(script).await;

        let err = result.unwrap_err();
        assert_eq!(exit_code(&err), EXIT_FAILURE);
        assert!(err.to_string().contains("Invalid choice: '9'"));
    }

    /// 入力が途中で終わった場合は終了コード1
    #[tokio::test]
    async fn test_closed_input_exits_with_failure() {
        let (result, _) = run_session("sqlite\n".to_string()).await;

        let err = result.unwrap_err();
        assert_eq!(exit_code(&err), EXIT_FAILURE);
        assert!(format!("{:#}", err).contains("Input closed"));
    }

    /// 存在しないデータベースへの接続は終了コード2
    #[tokio::test]
    async fn test_connection_failure_exits_with_connection_code() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.sqlite");

        let script = format!("sqlite\n{}\n", missing.display());
        let (result, _) = run_session(script).await;

        let err = result.unwrap_err();
        assert_eq!(exit_code(&err), EXIT_CONNECTION);
        assert!(format!("{:#}", err).contains("Failed to connect to DB1"));
    }
}
