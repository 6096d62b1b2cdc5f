//! 設定ファイルとベースディレクトリ
//!
//! `<base>/config.json` にレジストリURL・プロキシ・登録済みプラグインを保存する。
//! npm はベースディレクトリをカレントディレクトリとして実行されるため、
//! `package.json` が無ければ最小構成で作成する。

use crate::env::{EnvVar, NPM_VAR, REGISTRY_VAR};
use crate::error::{PpmError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 設定ファイル名
const CONFIG_FILE: &str = "config.json";
/// npm のパッケージ記述子
const PACKAGE_FILE: &str = "package.json";
/// デフォルトのパッケージマネージャ
pub const DEFAULT_NPM: &str = "npm";

/// `config.json` のスキーマ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PpmConfig {
    /// npm レジストリURL（`--registry=` として渡す）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    /// デフォルトのプロキシ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    /// パッケージマネージャの実行ファイル
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm_path: Option<String>,

    /// 登録済みプラグイン（パッケージ名 → 有効フラグ）
    #[serde(default)]
    pub picgo_plugins: BTreeMap<String, bool>,
}

impl PpmConfig {
    /// 有効なレジストリURL（`$PPM_REGISTRY` > config）
    pub fn effective_registry(&self) -> Option<String> {
        EnvVar::get(REGISTRY_VAR).or_else(|| non_blank(self.registry.as_deref()))
    }

    /// 有効なパッケージマネージャ（`$PPM_NPM` > config > "npm"）
    pub fn effective_npm(&self) -> String {
        EnvVar::get(NPM_VAR)
            .or_else(|| non_blank(self.npm_path.as_deref()))
            .unwrap_or_else(|| DEFAULT_NPM.to_string())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// ベースディレクトリ（npm の作業ディレクトリ兼設定の保存先）
#[derive(Debug, Clone)]
pub struct BaseDir {
    root: PathBuf,
}

impl BaseDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 明示指定 > 環境変数 > `$HOME/.picgo` の順で解決する
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        explicit
            .or_else(EnvVar::default_base_dir)
            .map(Self::new)
            .ok_or_else(|| {
                PpmError::Config(
                    "Cannot determine base directory: set --base-dir, PPM_HOME or HOME".to_string(),
                )
            })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn package_path(&self) -> PathBuf {
        self.root.join(PACKAGE_FILE)
    }

    /// 設定を読み込む（ファイルが無ければデフォルト）
    pub fn load_config(&self) -> Result<PpmConfig> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(PpmConfig::default());
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(PpmConfig::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            PpmError::Config(format!("{} is not valid JSON: {}", path.display(), e))
        })
    }

    /// 設定を保存する（アトミック書き込み）
    pub fn save_config(&self, config: &PpmConfig) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.root, &self.config_path(), json.as_bytes())
    }

    /// ディレクトリと最小構成の `package.json` を用意する
    ///
    /// 既存の `package.json` には触れない。
    pub fn ensure_package_json(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.package_path();
        if path.exists() {
            return Ok(());
        }
        let manifest = serde_json::json!({
            "name": "picgo-plugins",
            "description": "picgo-plugins",
            "repository": "https://github.com/PicGo/PicGo-Core",
            "license": "MIT"
        });
        let json = serde_json::to_string_pretty(&manifest)?;
        write_atomic(&self.root, &path, json.as_bytes())
    }
}

/// 同一ディレクトリの一時ファイルに書いてから置き換える
fn write_atomic(dir: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(content)?;
    temp_file.flush()?;

    match temp_file.persist(target) {
        Ok(_) => Ok(()),
        Err(e) => {
            // Windows では既存ファイルがあると失敗することがある
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                let _ = fs::remove_file(target);
                e.file.persist(target).map_err(|e| e.error)?;
                Ok(())
            } else {
                Err(e.error.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
