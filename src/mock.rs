//! テスト用モック

use crate::error::{PpmError, Result};
use crate::event::{EventSink, PluginEvent};
use crate::executor::{ExecRequest, ProcessResult, ProcessRunner};
use crate::logger::Logger;
use crate::registry::PluginRegistry;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// 出力内容を記録するロガー
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self, level: &str) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }

    fn push(&self, level: &'static str, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn success(&self, message: &str) {
        self.push("success", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }
}

/// 発行されたイベントと、その時点の出来事を記録するシンク
#[derive(Default, Clone)]
pub struct RecordingSink {
    journal: Journal,
}

impl RecordingSink {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }

    pub fn events(&self) -> Vec<PluginEvent> {
        self.journal
            .lines()
            .into_iter()
            .filter_map(|line| match line {
                JournalLine::Event(event) => Some(event),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &PluginEvent) {
        self.journal.push(JournalLine::Event(event.clone()));
    }
}

/// レジストリ操作・イベント発行・プロセス実行の順序記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalLine {
    Register(String),
    Unregister(String),
    Spawn(Vec<String>),
    Event(PluginEvent),
}

#[derive(Default, Clone)]
pub struct Journal {
    lines: Arc<Mutex<Vec<JournalLine>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: JournalLine) {
        self.lines.lock().unwrap().push(line);
    }

    pub fn lines(&self) -> Vec<JournalLine> {
        self.lines.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.lines()
            .iter()
            .filter(|l| matches!(l, JournalLine::Spawn(_)))
            .count()
    }
}

/// 操作を記録するレジストリ
pub struct JournalRegistry {
    names: Vec<String>,
    journal: Journal,
}

impl JournalRegistry {
    pub fn new(journal: Journal, names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            journal,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl PluginRegistry for JournalRegistry {
    fn has_plugin(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn register_plugin(&mut self, name: &str) {
        self.journal.push(JournalLine::Register(name.to_string()));
        if !self.has_plugin(name) {
            self.names.push(name.to_string());
        }
    }

    fn unregister_plugin(&mut self, name: &str) {
        self.journal.push(JournalLine::Unregister(name.to_string()));
        self.names.retain(|n| n != name);
    }
}

/// 決められた結果を返すプロセス実行
pub struct ScriptedRunner {
    outcome: ScriptedOutcome,
    journal: Journal,
}

enum ScriptedOutcome {
    Exit(i32, String),
    LaunchFailure,
}

impl ScriptedRunner {
    pub fn exit(journal: Journal, exit_code: i32, output: &str) -> Self {
        Self {
            outcome: ScriptedOutcome::Exit(exit_code, output.to_string()),
            journal,
        }
    }

    pub fn launch_failure(journal: Journal) -> Self {
        Self {
            outcome: ScriptedOutcome::LaunchFailure,
            journal,
        }
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run<'a>(
        &'a self,
        request: &'a ExecRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessResult>> + Send + 'a>> {
        Box::pin(async move {
            self.journal.push(JournalLine::Spawn(request.args()));
            match &self.outcome {
                ScriptedOutcome::Exit(exit_code, output) => Ok(ProcessResult {
                    exit_code: *exit_code,
                    output: output.clone(),
                }),
                ScriptedOutcome::LaunchFailure => Err(PpmError::Launch {
                    program: "npm".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
                }),
            }
        })
    }
}
