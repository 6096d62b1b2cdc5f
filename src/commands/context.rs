//! コマンド共通の実行環境
//!
//! ベースディレクトリ・設定・レジストリ・ハンドラを組み立て、
//! 実行後にレジストリを保存する。

use crate::cli::GlobalArgs;
use crate::config::BaseDir;
use crate::error::Result as PpmResult;
use crate::event::{EventSink, Outcome};
use crate::executor::{NpmRunner, Passthrough};
use crate::handler::{CallOptions, PluginHandler};
use crate::logger::{ConsoleLogger, Logger};
use crate::output::{ConsoleSink, JsonSink};
use crate::plugin_name::NameResolver;
use crate::registry::ConfigRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct CommandContext {
    pub handler: PluginHandler,
    pub registry: ConfigRegistry,
    default_proxy: Option<String>,
}

impl CommandContext {
    /// 設定を読み込み、npm を実行できる状態にする
    pub fn prepare(global: &GlobalArgs) -> Result<Self, String> {
        let base = BaseDir::resolve(global.base_dir.clone()).map_err(|e| e.to_string())?;
        let registry = ConfigRegistry::load(base.clone()).map_err(|e| e.to_string())?;
        base.ensure_package_json()
            .map_err(|e| format!("Failed to prepare {}: {}", base.path().display(), e))?;

        let config = registry.config();
        let registry_url = global
            .registry
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| config.effective_registry());
        let program = global.npm.clone().unwrap_or_else(|| config.effective_npm());
        let default_proxy = config.proxy.clone();

        let resolver =
            NameResolver::from_current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
        let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new());
        let sink: Arc<dyn EventSink> = if global.json {
            Arc::new(JsonSink)
        } else {
            Arc::new(ConsoleSink::new())
        };

        tracing::debug!(base = %base.path().display(), %program, ?registry_url, "command context ready");

        // --json では stdout をイベント行だけにする
        let passthrough = if global.json {
            Passthrough::Stderr
        } else {
            Passthrough::Mirror
        };

        let handler = PluginHandler::new(
            resolver,
            Box::new(NpmRunner::new(program).passthrough(passthrough)),
            logger,
            sink,
            base.path(),
        )
        .with_registry_url(registry_url);

        Ok(Self {
            handler,
            registry,
            default_proxy,
        })
    }

    /// 呼び出しオプション（`--proxy` 未指定なら config の proxy）
    pub fn call_options(&self, proxy: Option<String>, env: Vec<(String, String)>) -> CallOptions {
        CallOptions::default()
            .with_proxy(proxy.or_else(|| self.default_proxy.clone()))
            .with_env(env.into_iter().collect::<BTreeMap<_, _>>())
    }

    /// レジストリを保存し、結果を終了ステータスに変換する
    pub fn finish(mut self, result: PpmResult<Outcome>) -> Result<(), String> {
        let outcome = result.map_err(|e| e.to_string())?;
        self.registry
            .save()
            .map_err(|e| format!("Failed to save plugin registry: {}", e))?;

        if outcome.is_success() {
            Ok(())
        } else {
            Err(outcome.notification().title.clone())
        }
    }
}
