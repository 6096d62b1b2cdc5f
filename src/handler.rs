//! プラグイン操作のユースケース
//!
//! 入力の解決 → パッケージマネージャ実行（1回） → 結果の反映 → 通知、を1つの流れにまとめる。
//! 通知は呼び出しごとにちょうど1回発行され、戻り値としても返す。

use crate::error::Result;
use crate::event::{EventSink, Operation, Outcome, PluginEvent};
use crate::executor::{ExecRequest, ProcessRunner};
use crate::logger::Logger;
use crate::plan::plan;
use crate::plugin_name::NameResolver;
use crate::reconcile::reconcile;
use crate::registry::PluginRegistry;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// 呼び出しごとのオプション
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub proxy: Option<String>,
    /// 子プロセスに追加する環境変数
    pub env: BTreeMap<String, String>,
}

impl CallOptions {
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }
}

/// プラグインのインストール・アンインストール・更新
pub struct PluginHandler {
    resolver: NameResolver,
    runner: Box<dyn ProcessRunner>,
    logger: Arc<dyn Logger>,
    sink: Arc<dyn EventSink>,
    /// npm の作業ディレクトリ
    working_dir: PathBuf,
    /// `--registry=` に渡すURL
    registry_url: Option<String>,
}

impl PluginHandler {
    pub fn new(
        resolver: NameResolver,
        runner: Box<dyn ProcessRunner>,
        logger: Arc<dyn Logger>,
        sink: Arc<dyn EventSink>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            runner,
            logger,
            sink,
            working_dir: working_dir.into(),
            registry_url: None,
        }
    }

    pub fn with_registry_url(mut self, registry_url: Option<String>) -> Self {
        self.registry_url = registry_url;
        self
    }

    /// インストール
    ///
    /// 既にレジストリにあるものはスキップし、成功通知に含める。
    pub async fn install<S: AsRef<str>>(
        &self,
        plugins: &[S],
        registry: &mut dyn PluginRegistry,
        options: &CallOptions,
    ) -> Result<Outcome> {
        self.execute(Operation::Install, plugins, registry, options).await
    }

    /// アンインストール
    pub async fn uninstall<S: AsRef<str>>(
        &self,
        plugins: &[S],
        registry: &mut dyn PluginRegistry,
    ) -> Result<Outcome> {
        self.execute(Operation::Uninstall, plugins, registry, &CallOptions::default())
            .await
    }

    /// 更新（レジストリは変更しない）
    pub async fn update<S: AsRef<str>>(
        &self,
        plugins: &[S],
        registry: &mut dyn PluginRegistry,
        options: &CallOptions,
    ) -> Result<Outcome> {
        self.execute(Operation::Update, plugins, registry, options).await
    }

    /// 共通処理
    ///
    /// # Errors
    /// - パッケージマネージャを起動できなかった場合（`failed` イベント発行済み、レジストリ未変更）
    async fn execute<S: AsRef<str>>(
        &self,
        operation: Operation,
        plugins: &[S],
        registry: &mut dyn PluginRegistry,
        options: &CallOptions,
    ) -> Result<Outcome> {
        let batch = plan(operation, plugins, &self.resolver, registry, self.logger.as_ref());

        let result = if batch.is_empty() {
            None
        } else {
            self.logger.info(&format!(
                "Running npm {} {}",
                operation.command(),
                batch.package_names.join(" ")
            ));
            let request = ExecRequest::new(operation, batch.specifiers.clone(), &self.working_dir)
                .with_registry(self.registry_url.clone())
                .with_proxy(options.proxy.clone())
                .with_env(options.env.clone());

            match self.runner.run(&request).await {
                Ok(result) => Some(result),
                Err(e) => {
                    let message = e.to_string();
                    self.logger.error(&message);
                    if e.is_launch_failure() {
                        self.logger.error("Is npm installed and on PATH?");
                    }
                    self.sink.emit(&PluginEvent::failed(message));
                    return Err(e);
                }
            }
        };

        let outcome = reconcile(&batch, result.as_ref(), registry, self.logger.as_ref());
        tracing::debug!(event = outcome.name(), "operation finished");
        self.sink.emit(&PluginEvent::Outcome(outcome.clone()));
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "handler_test.rs"]
mod tests;
