// 対話セッション
//
// DB1・DB2の接続情報を順に入力して接続し、メニューで選んだモードを実行します。
// 接続はセッションが所有し、モード終了後に閉じます。

use crate::adapters::database::{Connection, DatabaseConnectionService};
use crate::cli::commands::data_compare::{DataCompareCommand, DataCompareCommandHandler};
use crate::cli::commands::schema_compare::{
    SchemaCompareCommand, SchemaCompareCommandHandler, SchemaScope,
};
use crate::cli::prompt::Prompter;
use crate::core::config::{DatabaseConfig, Dialect};
use crate::core::error::SessionError;
use crate::services::data_comparator::DataComparisonTarget;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

const MENU: &str = "\
Select comparison mode:
  1) Compare schemas of all tables
  2) Compare schema of a single table
  3) Compare column data of a table";

/// 比較モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 全テーブルのスキーマ比較
    SchemaAllTables,
    /// 単一テーブルのスキーマ比較
    SchemaSingleTable,
    /// データ比較
    Data,
}

/// メニューの選択を解釈
pub fn parse_choice(choice: &str) -> Result<Mode, SessionError> {
    match choice.trim() {
        "1" => Ok(Mode::SchemaAllTables),
        "2" => Ok(Mode::SchemaSingleTable),
        "3" => Ok(Mode::Data),
        other => Err(SessionError::InvalidChoice {
            choice: other.to_string(),
        }),
    }
}

/// 対話セッション
pub struct Session<R, W> {
    prompter: Prompter<R, W>,
    service: DatabaseConnectionService,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// 新しいSessionを作成
    pub fn new(prompter: Prompter<R, W>) -> Self {
        Self {
            prompter,
            service: DatabaseConnectionService::new(),
        }
    }

    /// Prompterを取り出す
    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    /// セッションを実行
    ///
    /// # Returns
    ///
    /// 成功時は選択したモードのサマリー
    pub async fn run(&mut self) -> Result<String> {
        let source = self.connect("DB1").await?;
        let target = self.connect("DB2").await?;

        let result = self.run_mode(&source, &target).await;

        source.close().await;
        target.close().await;
        result
    }

    /// 接続情報を入力して接続
    async fn connect(&mut self, label: &str) -> Result<Connection> {
        let (dialect, config) = self.ask_database(label)?;
        debug!(label, %dialect, database = %config.database, "Opening connection");

        let connection = self
            .service
            .open(dialect, &config)
            .await
            .with_context(|| format!("Failed to connect to {}", label))?;
        info!(label, %dialect, "Connected");
        Ok(connection)
    }

    fn ask_database(&mut self, label: &str) -> Result<(Dialect, DatabaseConfig), SessionError> {
        self.prompter
            .say(&format!("\n{}", format!("{} connection", label).bold()))?;

        let dialect = self.ask_dialect(label)?;
        let mut config = DatabaseConfig::default();

        if dialect.is_networked() {
            config.host = self
                .prompter
                .ask_with_default(&format!("{} host", label), &config.host)?;
            config.port = self.ask_port(label, dialect)?;
            config.database = self.prompter.ask(&format!("{} database name", label))?;
            config.user = self.prompter.ask_optional(&format!("{} user", label))?;
            config.password = self.prompter.ask_secret(&format!("{} password", label))?;
        } else {
            config.database = self.prompter.ask(&format!("{} database file", label))?;
        }

        Ok((dialect, config))
    }

    fn ask_dialect(&mut self, label: &str) -> Result<Dialect, SessionError> {
        loop {
            let input = self
                .prompter
                .ask(&format!("{} type (postgresql/mysql/sqlite)", label))?;
            match input.parse::<Dialect>() {
                Ok(dialect) => return Ok(dialect),
                Err(e) => self.prompter.say(&e.to_string())?,
            }
        }
    }

    fn ask_port(&mut self, label: &str, dialect: Dialect) -> Result<Option<u16>, SessionError> {
        let field = match dialect.default_port() {
            Some(port) => format!("{} port [{}]", label, port),
            None => format!("{} port", label),
        };
        loop {
            let Some(input) = self.prompter.ask_optional(&field)? else {
                return Ok(None);
            };
            match input.parse::<u16>() {
                Ok(port) => return Ok(Some(port)),
                Err(_) => self
                    .prompter
                    .say(&format!("Invalid port number: {}", input))?,
            }
        }
    }

    async fn run_mode(&mut self, source: &Connection, target: &Connection) -> Result<String> {
        self.prompter.say(&format!("\n{}", MENU))?;
        let mode = parse_choice(&self.prompter.ask("Choice")?)?;
        debug!(?mode, "Mode selected");

        match mode {
            Mode::SchemaAllTables => {
                let command = SchemaCompareCommand {
                    scope: SchemaScope::AllTables,
                    output_path: self.ask_output_path()?,
                };
                self.run_schema(&command, source, target).await
            }
            Mode::SchemaSingleTable => {
                let table = self.prompter.ask("Table name")?;
                let command = SchemaCompareCommand {
                    scope: SchemaScope::Table(table),
                    output_path: self.ask_output_path()?,
                };
                self.run_schema(&command, source, target).await
            }
            Mode::Data => {
                let target_spec = DataComparisonTarget {
                    table: self.prompter.ask("Table name")?,
                    value_column: self.prompter.ask("Column to compare")?,
                    key_column: self.prompter.ask("Key column")?,
                };
                let command = DataCompareCommand {
                    target: target_spec,
                    output_path: self.ask_output_path()?,
                };
                DataCompareCommandHandler::new()
                    .execute(&command, source, target)
                    .await
            }
        }
    }

    async fn run_schema(
        &mut self,
        command: &SchemaCompareCommand,
        source: &Connection,
        target: &Connection,
    ) -> Result<String> {
        SchemaCompareCommandHandler::new()
            .execute(command, source, target, self.prompter.output())
            .await
    }

    fn ask_output_path(&mut self) -> Result<Option<PathBuf>, SessionError> {
        Ok(self
            .prompter
            .ask_optional("Output file (optional)")?
            .map(PathBuf::from))
    }
}
