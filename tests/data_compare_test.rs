/// データ比較の統合テスト
///
/// 一時ディレクトリに作成したSQLiteデータベース2つを比較し、
/// 不一致の検出とレポートファイルの出力を確認します。

#[cfg(test)]
mod data_compare_tests {
    use chrono::Local;
    use dbcompare::adapters::database::{Connection, DatabaseConnectionService};
    use dbcompare::cli::commands::data_compare::{DataCompareCommand, DataCompareCommandHandler};
    use dbcompare::core::config::{DatabaseConfig, Dialect};
    use dbcompare::core::error::{exit_code, EXIT_QUERY};
    use dbcompare::services::data_comparator::{DataComparator, DataComparisonTarget};
    use dbcompare::services::report_sink::synthesize_report_path;
    use regex::Regex;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// SQLiteデータベースファイルを作成してSQLを実行
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

    async fn open(path: &str) -> Connection {
        let config = DatabaseConfig {
            database: path.to_string(),
            ..Default::default()
        };
        DatabaseConnectionService::new()
            .open(Dialect::SQLite, &config)
            .await
            .unwrap()
    }

    /// users(id, email) を持つDB1/DB2を作成
    async fn setup_users(dir: &Path) -> (Connection, Connection) {
        let db1 = create_sqlite_db(
            dir,
            "db1.sqlite",
            &[
                "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT)",
                "INSERT INTO users VALUES (3, 'c@example.com')",
                "INSERT INTO users VALUES (1, 'a@example.com')",
                "INSERT INTO users VALUES (2, 'b@example.com')",
                "INSERT INTO users VALUES (4, NULL)",
            ],
        )
        .await;
        let db2 = create_sqlite_db(
            dir,
            "db2.sqlite",
            &[
                "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT)",
                "INSERT INTO users VALUES (1, 'a@example.com')",
                "INSERT INTO users VALUES (2, 'B@example.com')",
                "INSERT INTO users VALUES (4, NULL)",
                "INSERT INTO users VALUES (5, 'e@example.com')",
            ],
        )
        .await;
        (open(&db1).await, open(&db2).await)
    }

    fn users_target() -> DataComparisonTarget {
        DataComparisonTarget {
            table: "users".to_string(),
            value_column: "email".to_string(),
            key_column: "id".to_string(),
        }
    }

    /// 不一致の集合がちょうどDB2欠落と値相違になり、DB2のみのキーは報告されない
    #[tokio::test]
    async fn test_reports_exact_mismatch_set_in_key_order() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = setup_users(temp_dir.path()).await;
        let output = temp_dir.path().join("result.txt");

        let command = DataCompareCommand {
            target: users_target(),
            output_path: Some(output.clone()),
        };
        let summary = DataCompareCommandHandler::new()
            .execute(&command, &source, &target)
            .await
            .unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(
            content,
            "Mismatch at 2: DB1='b@example.com' vs DB2='B@example.com'\n\
             Missing in DB2 at 3\n"
        );
        assert!(!content.contains("at 5"));
        assert!(summary.contains("Total mismatches: 2"));
        assert!(summary.contains(&format!("Results saved to: {}", output.display())));
    }

    /// 不一致の件数とレポートの行数が一致する
    #[tokio::test]
    async fn test_mismatch_count_matches_report_lines() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = setup_users(temp_dir.path()).await;

        let mut lines: Vec<String> = Vec::new();
        let summary = DataComparator::new(&source, &target)
            .compare(&users_target(), &mut lines)
            .await
            .unwrap();

        assert_eq!(summary.rows_compared, 4);
        assert_eq!(summary.mismatches, lines.len());
        assert!(lines.iter().all(|line| line.ends_with('\n')));
    }

    /// 不一致が0件でもファイルは作成される
    #[tokio::test]
    async fn test_zero_mismatches_still_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let statements = [
            "CREATE TABLE items (code TEXT PRIMARY KEY, qty INTEGER)",
            "INSERT INTO items VALUES ('a', 1)",
            "INSERT INTO items VALUES ('b', 2)",
        ];
        let db1 = create_sqlite_db(temp_dir.path(), "db1.sqlite", &statements).await;
        let db2 = create_sqlite_db(temp_dir.path(), "db2.sqlite", &statements).await;
        let (source, target) = (open(&db1).await, open(&db2).await);

        let output = temp_dir.path().join("items.txt");
        let command = DataCompareCommand {
            target: DataComparisonTarget {
                table: "items".to_string(),
                value_column: "qty".to_string(),
                key_column: "code".to_string(),
            },
            output_path: Some(output.clone()),
        };
        let summary = DataCompareCommandHandler::new()
            .execute(&command, &source, &target)
            .await
            .unwrap();

        assert!(output.exists());
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
        assert!(summary.starts_with("Total mismatches: 0"));
    }

    /// 型が異なっても文字列表現が同じなら一致とみなす
    #[tokio::test]
    async fn test_loose_equality_between_integer_and_text() {
        let temp_dir = TempDir::new().unwrap();
        let db1 = create_sqlite_db(
            temp_dir.path(),
            "db1.sqlite",
            &[
                "CREATE TABLE scores (id INTEGER PRIMARY KEY, score INTEGER)",
                "INSERT INTO scores VALUES (1, 10)",
                "INSERT INTO scores VALUES (2, 20)",
            ],
        )
        .await;
        let db2 = create_sqlite_db(
            temp_dir.path(),
            "db2.sqlite",
            &[
                "CREATE TABLE scores (id INTEGER PRIMARY KEY, score TEXT)",
                "INSERT INTO scores VALUES (1, '10')",
                "INSERT INTO scores VALUES (2, '21')",
            ],
        )
        .await;
        let (source, target) = (open(&db1).await, open(&db2).await);

        let mut lines: Vec<String> = Vec::new();
        DataComparator::new(&source, &target)
            .compare(
                &DataComparisonTarget {
                    table: "scores".to_string(),
                    value_column: "score".to_string(),
                    key_column: "id".to_string(),
                },
                &mut lines,
            )
            .await
            .unwrap();

        assert_eq!(lines, vec!["Mismatch at 2: DB1='20' vs DB2='21'\n".to_string()]);
    }

    /// キーと値は文字列にキャストして取得し、並び順は元のキー列で決める
    #[tokio::test]
    async fn test_generated_sql_casts_key_and_value_to_text() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = setup_users(temp_dir.path()).await;
        let comparator = DataComparator::new(&source, &target);

        assert_eq!(
            comparator.source_query(&users_target()),
            r#"SELECT CAST("id" AS TEXT) AS "id", CAST("email" AS TEXT) AS "email" FROM "users" ORDER BY "users"."id" ASC"#
        );
        assert_eq!(
            comparator.lookup_query(&users_target()),
            r#"SELECT CAST("id" AS TEXT) AS "id", CAST("email" AS TEXT) AS "email" FROM "users" WHERE "id" = ?"#
        );
    }

    /// 数値キーは数値順に処理され、数値型の値も比較できる
    #[tokio::test]
    async fn test_numeric_key_order_and_numeric_values() {
        let temp_dir = TempDir::new().unwrap();
        let db1 = create_sqlite_db(
            temp_dir.path(),
            "db1.sqlite",
            &[
                "CREATE TABLE prices (id INTEGER PRIMARY KEY, price NUMERIC(5,2))",
                "INSERT INTO prices VALUES (10, 4.5)",
                "INSERT INTO prices VALUES (2, 1.25)",
                "INSERT INTO prices VALUES (9, 3)",
            ],
        )
        .await;
        let db2 = create_sqlite_db(
            temp_dir.path(),
            "db2.sqlite",
            &[
                "CREATE TABLE prices (id INTEGER PRIMARY KEY, price NUMERIC(5,2))",
                "INSERT INTO prices VALUES (2, 1.25)",
                "INSERT INTO prices VALUES (9, 3.5)",
                "INSERT INTO prices VALUES (10, 4.75)",
            ],
        )
        .await;
        let (source, target) = (open(&db1).await, open(&db2).await);

        let mut lines: Vec<String> = Vec::new();
        let summary = DataComparator::new(&source, &target)
            .compare(
                &DataComparisonTarget {
                    table: "prices".to_string(),
                    value_column: "price".to_string(),
                    key_column: "id".to_string(),
                },
                &mut lines,
            )
            .await
            .unwrap();

        assert_eq!(summary.rows_compared, 3);
        assert_eq!(
            lines,
            vec![
                "Mismatch at 9: DB1='3' vs DB2='3.5'\n".to_string(),
                "Mismatch at 10: DB1='4.5' vs DB2='4.75'\n".to_string(),
            ]
        );
    }

    /// NULLキーの行はDB2の同じNULLキー行と対応付けられず、欠落として報告される
    #[tokio::test]
    async fn test_null_key_is_reported_as_missing() {
        let temp_dir = TempDir::new().unwrap();
        let statements = [
            "CREATE TABLE tags (name TEXT, color TEXT)",
            "INSERT INTO tags VALUES (NULL, 'red')",
            "INSERT INTO tags VALUES ('blue', 'blue')",
        ];
        let db1 = create_sqlite_db(temp_dir.path(), "db1.sqlite", &statements).await;
        let db2 = create_sqlite_db(temp_dir.path(), "db2.sqlite", &statements).await;
        let (source, target) = (open(&db1).await, open(&db2).await);

        let mut lines: Vec<String> = Vec::new();
        let summary = DataComparator::new(&source, &target)
            .compare(
                &DataComparisonTarget {
                    table: "tags".to_string(),
                    value_column: "color".to_string(),
                    key_column: "name".to_string(),
                },
                &mut lines,
            )
            .await
            .unwrap();

        assert_eq!(summary.rows_compared, 2);
        assert_eq!(lines, vec!["Missing in DB2 at \n".to_string()]);
    }

    /// 存在しないカラムはクエリエラーとして比較全体を中断する
    #[tokio::test]
    async fn test_unknown_column_aborts_with_query_error() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = setup_users(temp_dir.path()).await;

        let mut lines: Vec<String> = Vec::new();
        let err = DataComparator::new(&source, &target)
            .compare(
                &DataComparisonTarget {
                    table: "users".to_string(),
                    value_column: "nickname".to_string(),
                    key_column: "id".to_string(),
                },
                &mut lines,
            )
            .await
            .unwrap_err();

        assert_eq!(exit_code(&err), EXIT_QUERY);
        assert!(lines.is_empty());
    }

    /// 出力先を開けない場合は比較を行わない
    #[tokio::test]
    async fn test_unwritable_output_path_fails_before_comparing() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = setup_users(temp_dir.path()).await;

        let command = DataCompareCommand {
            target: users_target(),
            output_path: Some(temp_dir.path().join("missing_dir").join("out.txt")),
        };
        let err = DataCompareCommandHandler::new()
            .execute(&command, &source, &target)
            .await
            .unwrap_err();

        assert_eq!(exit_code(&err), 1);
        assert!(format!("{:#}", err).contains("Failed to open output file"));
    }

    /// 自動生成されるファイル名の形式
    #[test]
    fn test_synthesized_report_name_format() {
        let path = synthesize_report_path(&Local::now());
        let re = Regex::new(r"^comparison_results_\d{8}_\d{6}\.txt$").unwrap();
        assert!(re.is_match(&path.to_string_lossy()));
    }
}
