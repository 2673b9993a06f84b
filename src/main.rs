use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dbcompare::cli::prompt::Prompter;
use dbcompare::cli::session::Session;
use dbcompare::cli::Cli;
use dbcompare::core::error::exit_code;
use std::io::{self, IsTerminal};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // 引数は --help / --version のみ
    let _cli = Cli::parse();

    // ログはstderrへ（RUST_LOG未設定時はwarn）
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let result = run();

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(exit_code(&e));
        }
    }
}

/// 対話セッションを実行する
fn run() -> Result<String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let stdin = io::stdin();
    let hide_secrets = stdin.is_terminal();
    let prompter = Prompter::new(stdin.lock(), io::stdout()).with_hidden_secrets(hide_secrets);

    let mut session = Session::new(prompter);
    runtime.block_on(session.run())
}
