//! プラグイン名の解決
//!
//! ユーザー入力（素の名前・スコープ付き名前・`picgo-plugin-` 付き名前・ローカルパス）を
//! npm に渡す指定子と、レジストリで使う正規パッケージ名に変換する。
//!
//! ## 対応フォーマット
//!
//! | 入力 | 指定子 | パッケージ名 |
//! |---|---|---|
//! | `foo` | `picgo-plugin-foo` | `picgo-plugin-foo` |
//! | `foo@1.0.0` | `picgo-plugin-foo@1.0.0` | `picgo-plugin-foo` |
//! | `picgo-plugin-foo@beta` | そのまま | `picgo-plugin-foo` |
//! | `@scope/foo` | `@scope/picgo-plugin-foo` | `@scope/picgo-plugin-foo` |
//! | `@scope/picgo-plugin-foo` | そのまま | `@scope/picgo-plugin-foo` |
//! | `./path/to/plugin` | 絶対パス | `package.json` の `name` |

use crate::error::{PpmError, Result};
use crate::logger::Logger;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// プラグインパッケージ名の接頭辞
pub const PLUGIN_PREFIX: &str = "picgo-plugin-";

/// パッケージ記述子ファイル名
const DESCRIPTOR_FILE: &str = "package.json";

/// 名前解決の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlugin {
    pub success: bool,
    /// npm に渡す指定子（パス・バージョン付きの場合あり）
    pub full_specifier: String,
    /// レジストリのキー
    pub package_name: String,
}

impl ResolvedPlugin {
    fn resolved(full_specifier: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            success: true,
            full_specifier: full_specifier.into(),
            package_name: package_name.into(),
        }
    }

    fn failed() -> Self {
        Self {
            success: false,
            full_specifier: String::new(),
            package_name: String::new(),
        }
    }
}

/// 入力の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PluginNameKind {
    /// picgo-plugin-xxx
    Normal,
    /// @scope/picgo-plugin-xxx
    Scope,
    /// xxx
    Simple,
    /// @scope/xxx
    ScopedSimple,
    /// ローカルディレクトリ
    Path,
}

/// `package.json` のうち必要な部分
#[derive(Debug, Deserialize)]
struct PackageDescriptor {
    #[serde(default)]
    name: Option<String>,
}

fn scope_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@[^/]+/picgo-plugin-").unwrap())
}

fn normal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(picgo-plugin-[a-z0-9._~-]+)(@[^\s@]+)?$").unwrap())
}

fn scope_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(@[a-z0-9][a-z0-9._~-]*/picgo-plugin-[a-z0-9._~-]+)(@[^\s@]+)?$").unwrap()
    })
}

fn simple_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-z0-9][a-z0-9._~-]*)(@[^\s@]+)?$").unwrap())
}

fn scoped_simple_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(@[a-z0-9][a-z0-9._~-]*)/([a-z0-9][a-z0-9._~-]*)(@[^\s@]+)?$").unwrap()
    })
}

/// 正規パッケージ名か（バージョン無しの `picgo-plugin-` 付き名前）
pub fn is_canonical_name(name: &str) -> bool {
    let captures = normal_re()
        .captures(name)
        .or_else(|| scope_re().captures(name));
    matches!(captures, Some(c) if c.get(2).is_none())
}

/// 名前解決器
///
/// 相対パスは `cwd` を基準に解決する。
#[derive(Debug, Clone)]
pub struct NameResolver {
    cwd: PathBuf,
}

impl NameResolver {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// プロセスのカレントディレクトリを基準にする
    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// 入力を解決する
    ///
    /// 失敗時は警告を1回だけ出力し、`success: false` を返す。
    pub fn resolve(&self, raw: &str, logger: &dyn Logger) -> ResolvedPlugin {
        match self.try_resolve(raw) {
            Ok(resolved) => resolved,
            Err(e) => {
                logger.warn(&e.to_string());
                ResolvedPlugin::failed()
            }
        }
    }

    fn try_resolve(&self, raw: &str) -> Result<ResolvedPlugin> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(PpmError::InvalidPluginName("empty plugin name".to_string()));
        }

        match self.classify(input) {
            PluginNameKind::Normal => resolve_prefixed(input, normal_re()),
            PluginNameKind::Scope => resolve_prefixed(input, scope_re()),
            PluginNameKind::Simple => {
                let captures = simple_re()
                    .captures(input)
                    .ok_or_else(|| PpmError::InvalidPluginName(input.to_string()))?;
                let package_name = format!("{}{}", PLUGIN_PREFIX, &captures[1]);
                let version = captures.get(2).map_or("", |m| m.as_str());
                Ok(ResolvedPlugin::resolved(
                    format!("{}{}", package_name, version),
                    package_name,
                ))
            }
            PluginNameKind::ScopedSimple => {
                let captures = scoped_simple_re()
                    .captures(input)
                    .ok_or_else(|| PpmError::InvalidPluginName(input.to_string()))?;
                let package_name = format!("{}/{}{}", &captures[1], PLUGIN_PREFIX, &captures[2]);
                let version = captures.get(3).map_or("", |m| m.as_str());
                Ok(ResolvedPlugin::resolved(
                    format!("{}{}", package_name, version),
                    package_name,
                ))
            }
            PluginNameKind::Path => self.resolve_path(input),
        }
    }

    fn classify(&self, input: &str) -> PluginNameKind {
        if scope_prefix_re().is_match(input) {
            PluginNameKind::Scope
        } else if input.starts_with(PLUGIN_PREFIX) {
            PluginNameKind::Normal
        } else if self.is_simple_name(input) {
            PluginNameKind::Simple
        } else if scoped_simple_re().is_match(input) && !self.absolute(input).exists() {
            PluginNameKind::ScopedSimple
        } else {
            PluginNameKind::Path
        }
    }

    /// パス区切りを含まず、同名のパスも存在しない
    fn is_simple_name(&self, input: &str) -> bool {
        !Path::new(input).is_absolute()
            && !input.contains('/')
            && !input.contains('\\')
            && !self.cwd.join(input).exists()
    }

    fn absolute(&self, input: &str) -> PathBuf {
        let path = Path::new(input);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    fn resolve_path(&self, input: &str) -> Result<ResolvedPlugin> {
        let dir = self.absolute(input);
        if !dir.exists() {
            return Err(PpmError::PluginNotFound(input.to_string()));
        }

        let descriptor_path = dir.join(DESCRIPTOR_FILE);
        let package_name = read_descriptor_name(&descriptor_path)?;
        Ok(ResolvedPlugin::resolved(
            unix_style_path(&dir),
            package_name,
        ))
    }
}

/// 接頭辞付きの入力：指定子はそのまま、パッケージ名はバージョンを除去
fn resolve_prefixed(input: &str, re: &Regex) -> Result<ResolvedPlugin> {
    let captures = re
        .captures(input)
        .ok_or_else(|| PpmError::InvalidPluginName(input.to_string()))?;
    Ok(ResolvedPlugin::resolved(input, &captures[1]))
}

/// `package.json` の `name` を読む
fn read_descriptor_name(path: &Path) -> Result<String> {
    let invalid = |reason: String| PpmError::InvalidDescriptor {
        path: path.to_path_buf(),
        reason,
    };

    if !path.is_file() {
        return Err(invalid("package.json not found".to_string()));
    }
    let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let descriptor: PackageDescriptor =
        serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

    let name = descriptor
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| invalid("the name field is empty".to_string()))?;

    if !is_canonical_name(&name) {
        return Err(invalid(format!(
            "the name field is '{}', it needs the prefix {}",
            name, PLUGIN_PREFIX
        )));
    }
    Ok(name)
}

/// npm にはスラッシュ区切りで渡す
fn unix_style_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

#[cfg(test)]
#[path = "plugin_name_test.rs"]
mod tests;

#[cfg(test)]
#[path = "plugin_name_proptests.rs"]
mod proptests;
