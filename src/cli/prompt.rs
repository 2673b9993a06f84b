// 対話プロンプト
//
// 入力の検証（純粋関数）と、標準入出力を使った再入力ループを分離しています。

use crate::core::error::{RetryPrompt, SessionError};
use std::io::{BufRead, Write};

/// 入力値を検証
///
/// 前後の空白を取り除き、必須項目が空の場合は `RetryPrompt` を返します。
pub fn validate_input(input: &str, required: bool) -> Result<String, RetryPrompt> {
    let value = input.trim();
    if required && value.is_empty() {
        return Err(RetryPrompt);
    }
    Ok(value.to_string())
}

/// 対話入力
pub struct Prompter<R, W> {
    input: R,
    output: W,
    /// パスワードをエコーなしで読むかどうか（端末接続時のみ有効）
    hide_secrets: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// 新しいPrompterを作成
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            hide_secrets: false,
        }
    }

    /// パスワード入力をエコーなしにする
    pub fn with_hidden_secrets(mut self, hide: bool) -> Self {
        self.hide_secrets = hide;
        self
    }

    /// 出力先（コンソール）
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// 出力先を取り出す
    pub fn into_output(self) -> W {
        self.output
    }

    /// メッセージを表示
    pub fn say(&mut self, text: &str) -> Result<(), SessionError> {
        writeln!(self.output, "{}", text).map_err(terminal_error)
    }

    /// 必須項目を入力（空の場合は再入力）
    pub fn ask(&mut self, label: &str) -> Result<String, SessionError> {
        loop {
            let line = self.read_field(label)?;
            match validate_input(&line, true) {
                Ok(value) => return Ok(value),
                Err(retry) => self.say(&retry.to_string())?,
            }
        }
    }

    /// 任意項目を入力（空の場合はNone）
    pub fn ask_optional(&mut self, label: &str) -> Result<Option<String>, SessionError> {
        let line = self.read_field(label)?;
        // 必須でなければ検証は失敗しない
        let value = validate_input(&line, false).unwrap_or_default();
        Ok(Some(value).filter(|v| !v.is_empty()))
    }

    /// デフォルト値付きで入力（空の場合はデフォルト）
    pub fn ask_with_default(&mut self, label: &str, default: &str) -> Result<String, SessionError> {
        let value = self.ask_optional(&format!("{} [{}]", label, default))?;
        Ok(value.unwrap_or_else(|| default.to_string()))
    }

    /// パスワード等の秘密情報を入力（任意項目）
    ///
    /// 前後の空白は値の一部として扱い、改行のみ取り除きます。
    pub fn ask_secret(&mut self, label: &str) -> Result<Option<String>, SessionError> {
        let raw = if self.hide_secrets {
            self.write_label(label)?;
            rpassword::read_password().map_err(terminal_error)?
        } else {
            self.read_field(label)?
        };
        let value = raw.trim_end_matches(['\r', '\n']).to_string();
        Ok(Some(value).filter(|v| !v.is_empty()))
    }

    fn write_label(&mut self, label: &str) -> Result<(), SessionError> {
        write!(self.output, "{}: ", label).map_err(terminal_error)?;
        self.output.flush().map_err(terminal_error)
    }

    /// 1行読み込む（入力が閉じられている場合はエラー）
    fn read_field(&mut self, label: &str) -> Result<String, SessionError> {
        self.write_label(label)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(terminal_error)?;
        if read == 0 {
            return Err(SessionError::InputClosed {
                field: label.to_string(),
            });
        }
        Ok(line)
    }
}

fn terminal_error(e: std::io::Error) -> SessionError {
    SessionError::Terminal {
        cause: e.to_string(),
    }
}
