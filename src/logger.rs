//! ユーザー向けログ出力
//!
//! プラグイン操作の進捗・結果を人間向けに表示する。
//! 診断用の詳細ログは `tracing` 側に出す。

use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// ログ出力先
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// 標準エラー出力へのロガー
pub struct ConsoleLogger {
    use_color: bool,
}

impl ConsoleLogger {
    /// TTY と `NO_COLOR` から色付けを判定して作成
    pub fn new() -> Self {
        Self::with_color(std::io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err())
    }

    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    fn line(&self, level: Level, message: &str) -> String {
        let glyph = level.glyph();
        if !self.use_color {
            return format!("{} {}", glyph, message);
        }
        let glyph = match level {
            Level::Info => glyph.blue().to_string(),
            Level::Success => glyph.green().to_string(),
            Level::Warn => glyph.yellow().to_string(),
            Level::Error => glyph.red().to_string(),
        };
        format!("{} {}", glyph, message)
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for ConsoleLogger {
    fn info(&self, message: &str) {
        eprintln!("{}", self.line(Level::Info, message));
    }

    fn success(&self, message: &str) {
        eprintln!("{}", self.line(Level::Success, message));
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", self.line(Level::Warn, message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", self.line(Level::Error, message));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

impl Level {
    fn glyph(self) -> &'static str {
        match self {
            Level::Info => "i",
            Level::Success => "✓",
            Level::Warn => "!",
            Level::Error => "✗",
        }
    }
}
