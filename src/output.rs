use crate::event::{EventSink, NotificationBody, PluginEvent};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// 操作結果の1行サマリ
pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    pub fn format(event: &PluginEvent, use_color: bool) -> Self {
        let paint = |glyph: &str, ok: bool| match (use_color, ok) {
            (false, _) => glyph.to_string(),
            (true, true) => glyph.green().to_string(),
            (true, false) => glyph.red().to_string(),
        };

        match event {
            PluginEvent::Outcome(outcome) => {
                let notification = outcome.notification();
                let message = match &notification.body {
                    NotificationBody::List(names) if names.is_empty() => notification.title.clone(),
                    NotificationBody::List(names) => {
                        format!("{}: {}", notification.title, names.join(", "))
                    }
                    // 詳細はロガーが出力済み
                    NotificationBody::Message(_) => notification.title.clone(),
                };
                Self {
                    prefix: paint(if outcome.is_success() { "✓" } else { "✗" }, outcome.is_success()),
                    message,
                }
            }
            PluginEvent::Failed(failed) => Self {
                prefix: paint("✗", false),
                message: format!("Aborted: {}", failed.message),
            },
        }
    }

    pub fn line(&self) -> String {
        format!("{} {}", self.prefix, self.message)
    }
}

/// 人間向けに結果を表示するシンク
pub struct ConsoleSink {
    use_color: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_color: std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: &PluginEvent) {
        println!("{}", CommandSummary::format(event, self.use_color).line());
    }
}

/// 1イベント1行の JSON を出力するシンク
pub struct JsonSink;

impl JsonSink {
    pub fn render(event: &PluginEvent) -> serde_json::Result<String> {
        serde_json::to_string(event)
    }
}

impl EventSink for JsonSink {
    fn emit(&self, event: &PluginEvent) {
        match Self::render(event) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Failed to serialize event: {}", e),
        }
    }
}
