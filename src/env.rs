use std::path::PathBuf;

/// ベースディレクトリを上書きする環境変数
pub const HOME_VAR: &str = "PPM_HOME";
/// npm レジストリURLを上書きする環境変数
pub const REGISTRY_VAR: &str = "PPM_REGISTRY";
/// パッケージマネージャ実行ファイルを上書きする環境変数
pub const NPM_VAR: &str = "PPM_NPM";

/// 環境変数ユーティリティ
pub struct EnvVar;

impl EnvVar {
    /// 環境変数を取得（空文字列・空白のみはNoneとして扱う）
    pub fn get(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// パスとして環境変数を取得
    pub fn get_path(key: &str) -> Option<PathBuf> {
        Self::get(key).map(PathBuf::from)
    }

    /// デフォルトのベースディレクトリ（`$PPM_HOME` → `$HOME/.picgo`）
    pub fn default_base_dir() -> Option<PathBuf> {
        Self::get_path(HOME_VAR).or_else(|| {
            Self::get("HOME")
                .or_else(|| Self::get("USERPROFILE"))
                .map(|home| PathBuf::from(home).join(".picgo"))
        })
    }
}

/// `KEY=VALUE` 形式の文字列を分解する
pub fn parse_env_pair(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Expected KEY=VALUE, got '{}'", input)),
    }
}
