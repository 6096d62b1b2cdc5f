//! 実行結果の反映
//!
//! バッチと実行結果から通知を1つ決め、成功時のみレジストリを更新する。
//! レジストリの更新は必ず通知の生成より前に完了する。

use crate::event::{Operation, Outcome};
use crate::executor::ProcessResult;
use crate::logger::Logger;
use crate::plan::OperationBatch;
use crate::registry::PluginRegistry;

/// 有効な入力が1つも無かったときのメッセージ
pub const NO_VALID_PLUGIN: &str = "no valid plugin name or path";

/// 結果を反映して通知を返す
///
/// `result` はバッチが空でなく、パッケージマネージャを実行した場合のみ `Some`。
pub fn reconcile(
    batch: &OperationBatch,
    result: Option<&ProcessResult>,
    registry: &mut dyn PluginRegistry,
    logger: &dyn Logger,
) -> Outcome {
    let operation = batch.operation;

    let Some(result) = result else {
        if batch.already_installed.is_empty() {
            let message = format!("{} failed: {}", operation.label(), NO_VALID_PLUGIN);
            logger.error(&message);
            return Outcome::failed(operation, message);
        }
        // すべてインストール済み
        logger.success(&format!("{} succeeded", operation.label()));
        return Outcome::success(operation, batch.already_installed.clone());
    };

    if !result.success() {
        let message = format!(
            "{} failed with exit code {}, output:\n{}",
            operation.label(),
            result.exit_code,
            result.output
        );
        logger.error(&message);
        return Outcome::failed(operation, message);
    }

    match operation {
        Operation::Install => {
            for name in &batch.package_names {
                registry.register_plugin(name);
            }
        }
        Operation::Uninstall => {
            for name in &batch.package_names {
                registry.unregister_plugin(name);
            }
        }
        // npm がディスク上のファイルを更新済み。レジストリは変わらない
        Operation::Update => {}
    }

    let mut body = batch.package_names.clone();
    if operation == Operation::Install {
        body.extend(batch.already_installed.iter().cloned());
    }
    logger.success(&format!("{} succeeded", operation.label()));
    Outcome::success(operation, body)
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
