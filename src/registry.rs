//! プラグインレジストリ
//!
//! 読み込み済みプラグインの集合。ここでは登録・解除・存在確認のみを扱い、
//! プラグインコードの読み込み自体は行わない。

use crate::config::{BaseDir, PpmConfig};
use crate::error::Result;

/// レジストリ操作を抽象化するトレイト
pub trait PluginRegistry {
    fn has_plugin(&self, name: &str) -> bool;
    fn register_plugin(&mut self, name: &str);
    fn unregister_plugin(&mut self, name: &str);
}

/// `config.json` の `picgoPlugins` を保存先とするレジストリ
///
/// 変更はメモリ上で行い、[`ConfigRegistry::save`] で書き戻す。
pub struct ConfigRegistry {
    base: BaseDir,
    config: PpmConfig,
    dirty: bool,
}

impl ConfigRegistry {
    pub fn new(base: BaseDir, config: PpmConfig) -> Self {
        Self {
            base,
            config,
            dirty: false,
        }
    }

    /// ベースディレクトリから読み込む
    pub fn load(base: BaseDir) -> Result<Self> {
        let config = base.load_config()?;
        Ok(Self::new(base, config))
    }

    pub fn config(&self) -> &PpmConfig {
        &self.config
    }

    /// 登録済みプラグイン名（名前順）と有効フラグ
    pub fn plugins(&self) -> impl Iterator<Item = (&str, bool)> {
        self.config
            .picgo_plugins
            .iter()
            .map(|(name, enabled)| (name.as_str(), *enabled))
    }

    /// 未保存の変更があれば書き戻す
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.base.save_config(&self.config)?;
        self.dirty = false;
        Ok(())
    }
}

impl PluginRegistry for ConfigRegistry {
    fn has_plugin(&self, name: &str) -> bool {
        self.config.picgo_plugins.contains_key(name)
    }

    fn register_plugin(&mut self, name: &str) {
        self.config.picgo_plugins.insert(name.to_string(), true);
        self.dirty = true;
    }

    fn unregister_plugin(&mut self, name: &str) {
        if self.config.picgo_plugins.remove(name).is_some() {
            self.dirty = true;
        }
    }
}

/// メモリ上のレジストリ（登録順を保持）
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryRegistry {
    names: Vec<String>,
}

#[cfg(test)]
impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugins<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for name in names {
            registry.register_plugin(&name.into());
        }
        registry
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
impl PluginRegistry for MemoryRegistry {
    fn has_plugin(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn register_plugin(&mut self, name: &str) {
        if !self.has_plugin(name) {
            self.names.push(name.to_string());
        }
    }

    fn unregister_plugin(&mut self, name: &str) {
        self.names.retain(|n| n != name);
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
