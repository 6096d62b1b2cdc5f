//! バッチ計画
//!
//! 入力をすべて解決し、解決失敗・インストール済みを除外した上で
//! パッケージ名の重複を取り除く（最初の出現位置を維持）。

use crate::event::Operation;
use crate::logger::Logger;
use crate::plugin_name::NameResolver;
use crate::registry::PluginRegistry;
use std::collections::HashSet;

/// 1回の操作で対象とするパッケージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationBatch {
    pub operation: Operation,
    /// パッケージマネージャに渡す指定子（`package_names` と同じ並び）
    pub specifiers: Vec<String>,
    pub package_names: Vec<String>,
    /// インストール時のみ：既にレジストリにあったもの
    pub already_installed: Vec<String>,
}

impl OperationBatch {
    fn new(operation: Operation) -> Self {
        Self {
            operation,
            specifiers: Vec::new(),
            package_names: Vec::new(),
            already_installed: Vec::new(),
        }
    }

    /// 実行すべきパッケージが無い
    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
    }
}

/// 入力からバッチを組み立てる
///
/// - install: 解決済みの指定子（パス・バージョン付き）を渡す
/// - uninstall / update: npm は `package.json` の名前で扱うためパッケージ名を渡す
pub fn plan<S: AsRef<str>>(
    operation: Operation,
    raw_identifiers: &[S],
    resolver: &NameResolver,
    registry: &dyn PluginRegistry,
    logger: &dyn Logger,
) -> OperationBatch {
    let mut batch = OperationBatch::new(operation);
    let mut seen: HashSet<String> = HashSet::new();

    for raw in raw_identifiers {
        let resolved = resolver.resolve(raw.as_ref(), logger);
        if !resolved.success {
            // 解決失敗は resolver 側でログ済み
            continue;
        }

        if operation == Operation::Install && registry.has_plugin(&resolved.package_name) {
            if !batch.already_installed.contains(&resolved.package_name) {
                logger.success(&format!("Already installed: {}", resolved.package_name));
                batch.already_installed.push(resolved.package_name);
            }
            continue;
        }

        if !seen.insert(resolved.package_name.clone()) {
            tracing::debug!(package = %resolved.package_name, "duplicate plugin skipped");
            continue;
        }

        let specifier = match operation {
            Operation::Install => resolved.full_specifier,
            Operation::Uninstall | Operation::Update => resolved.package_name.clone(),
        };
        batch.specifiers.push(specifier);
        batch.package_names.push(resolved.package_name);
    }

    batch
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
