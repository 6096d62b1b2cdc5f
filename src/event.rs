//! 操作結果の通知
//!
//! install / uninstall / update は呼び出しごとに必ず1つの [`Outcome`] を生成する。
//! パッケージマネージャ自体が起動できなかった場合のみ [`PluginEvent::Failed`] になる。

use serde::Serialize;

/// 操作種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Install,
    Uninstall,
    Update,
}

impl Operation {
    /// パッケージマネージャに渡すサブコマンド名
    pub fn command(&self) -> &'static str {
        match self {
            Operation::Install => "install",
            Operation::Uninstall => "uninstall",
            Operation::Update => "update",
        }
    }

    /// 通知タイトル等に使う表示名
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Install => "Install",
            Operation::Uninstall => "Uninstall",
            Operation::Update => "Update",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command())
    }
}

/// 通知本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NotificationBody {
    /// 対象パッケージ名の一覧
    List(Vec<String>),
    /// エラーメッセージ
    Message(String),
}

impl NotificationBody {
    #[cfg(test)]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            NotificationBody::List(names) => Some(names),
            NotificationBody::Message(_) => None,
        }
    }

    #[cfg(test)]
    pub fn as_message(&self) -> Option<&str> {
        match self {
            NotificationBody::List(_) => None,
            NotificationBody::Message(message) => Some(message),
        }
    }
}

/// タイトルと本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: NotificationBody,
}

/// 操作ごとの成功・失敗
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Outcome {
    InstallSuccess(Notification),
    InstallFailed(Notification),
    UninstallSuccess(Notification),
    UninstallFailed(Notification),
    UpdateSuccess(Notification),
    UpdateFailed(Notification),
}

impl Outcome {
    /// 成功通知を作成
    pub fn success(operation: Operation, names: Vec<String>) -> Self {
        let notification = Notification {
            title: format!("{} succeeded", operation.label()),
            body: NotificationBody::List(names),
        };
        match operation {
            Operation::Install => Outcome::InstallSuccess(notification),
            Operation::Uninstall => Outcome::UninstallSuccess(notification),
            Operation::Update => Outcome::UpdateSuccess(notification),
        }
    }

    /// 失敗通知を作成
    pub fn failed(operation: Operation, message: impl Into<String>) -> Self {
        let notification = Notification {
            title: format!("{} failed", operation.label()),
            body: NotificationBody::Message(message.into()),
        };
        match operation {
            Operation::Install => Outcome::InstallFailed(notification),
            Operation::Uninstall => Outcome::UninstallFailed(notification),
            Operation::Update => Outcome::UpdateFailed(notification),
        }
    }

    /// イベント名（`installSuccess` など）
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::InstallSuccess(_) => "installSuccess",
            Outcome::InstallFailed(_) => "installFailed",
            Outcome::UninstallSuccess(_) => "uninstallSuccess",
            Outcome::UninstallFailed(_) => "uninstallFailed",
            Outcome::UpdateSuccess(_) => "updateSuccess",
            Outcome::UpdateFailed(_) => "updateFailed",
        }
    }

    #[cfg(test)]
    pub fn operation(&self) -> Operation {
        match self {
            Outcome::InstallSuccess(_) | Outcome::InstallFailed(_) => Operation::Install,
            Outcome::UninstallSuccess(_) | Outcome::UninstallFailed(_) => Operation::Uninstall,
            Outcome::UpdateSuccess(_) | Outcome::UpdateFailed(_) => Operation::Update,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::InstallSuccess(_) | Outcome::UninstallSuccess(_) | Outcome::UpdateSuccess(_)
        )
    }

    pub fn notification(&self) -> &Notification {
        match self {
            Outcome::InstallSuccess(n)
            | Outcome::InstallFailed(n)
            | Outcome::UninstallSuccess(n)
            | Outcome::UninstallFailed(n)
            | Outcome::UpdateSuccess(n)
            | Outcome::UpdateFailed(n) => n,
        }
    }
}

/// シンクに流れるイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PluginEvent {
    Outcome(Outcome),
    /// パッケージマネージャの起動失敗など、結果を生成できなかった場合
    Failed(FailedEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEvent {
    /// 常に "failed"
    pub event: &'static str,
    pub message: String,
}

impl PluginEvent {
    pub fn failed(message: impl Into<String>) -> Self {
        PluginEvent::Failed(FailedEvent {
            event: "failed",
            message: message.into(),
        })
    }
}

/// イベント通知先
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &PluginEvent);
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
