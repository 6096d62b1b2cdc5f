//! パッケージマネージャの実行
//!
//! npm を子プロセスとして起動し、stdout / stderr を親プロセスへ流しつつ
//! 到着順に1つのバッファへ蓄積する。終了コードに関わらず結果を返し、
//! 起動自体に失敗した場合のみ `PpmError::Launch` を返す。

use crate::error::{PpmError, Result};
use crate::event::Operation;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const OUTPUT_CHANNEL_CAPACITY: usize = 128;
const OUTPUT_BUFFER_SIZE: usize = 4096;

/// シグナル終了など、終了コードが得られなかった場合の値
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// 子プロセスの実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: i32,
    /// stdout と stderr を到着順に連結したもの
    pub output: String,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// 1回の実行に必要な情報
#[derive(Debug, Clone)]
pub struct ExecRequest {
    pub operation: Operation,
    pub specifiers: Vec<String>,
    pub working_dir: PathBuf,
    pub registry: Option<String>,
    pub proxy: Option<String>,
    /// 親プロセスの環境変数に上書きマージされる
    pub extra_env: BTreeMap<String, String>,
}

impl ExecRequest {
    pub fn new(operation: Operation, specifiers: Vec<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            operation,
            specifiers,
            working_dir: working_dir.into(),
            registry: None,
            proxy: None,
            extra_env: BTreeMap::new(),
        }
    }

    pub fn with_registry(mut self, registry: Option<String>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_env(mut self, extra_env: BTreeMap<String, String>) -> Self {
        self.extra_env = extra_env;
        self
    }

    /// `<command> <specifier>... --color=always --save [--registry=] [--proxy=]`
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.specifiers.len() + 5);
        args.push(self.operation.command().to_string());
        args.extend(self.specifiers.iter().cloned());
        args.push("--color=always".to_string());
        args.push("--save".to_string());
        if let Some(registry) = non_empty(self.registry.as_deref()) {
            args.push(format!("--registry={}", registry));
        }
        if let Some(proxy) = non_empty(self.proxy.as_deref()) {
            args.push(format!("--proxy={}", proxy));
        }
        args
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// パッケージマネージャ実行を抽象化するトレイト
///
/// テスト時はスクリプト化した実装を注入する。
pub trait ProcessRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        request: &'a ExecRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessResult>> + Send + 'a>>;
}

/// 親プロセス側の出力先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentStream {
    Stdout,
    Stderr,
}

impl ParentStream {
    fn writer(self) -> Box<dyn AsyncWrite + Unpin + Send> {
        match self {
            ParentStream::Stdout => Box::new(tokio::io::stdout()),
            ParentStream::Stderr => Box::new(tokio::io::stderr()),
        }
    }
}

/// 子プロセス出力の転送方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passthrough {
    /// stdout は stdout へ、stderr は stderr へ
    Mirror,
    /// 両方とも親の stderr へ（親の stdout を機械可読出力に使う場合）
    Stderr,
    /// 転送しない
    #[cfg(test)]
    Off,
}

impl Passthrough {
    /// (子の stdout の転送先, 子の stderr の転送先)
    pub fn targets(self) -> (Option<ParentStream>, Option<ParentStream>) {
        match self {
            Passthrough::Mirror => (Some(ParentStream::Stdout), Some(ParentStream::Stderr)),
            Passthrough::Stderr => (Some(ParentStream::Stderr), Some(ParentStream::Stderr)),
            #[cfg(test)]
            Passthrough::Off => (None, None),
        }
    }
}

/// 本番用の npm 実行
pub struct NpmRunner {
    program: String,
    passthrough: Passthrough,
}

impl NpmRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            passthrough: Passthrough::Mirror,
        }
    }

    pub fn passthrough(mut self, passthrough: Passthrough) -> Self {
        self.passthrough = passthrough;
        self
    }

    fn command(&self, request: &ExecRequest) -> Command {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let program = resolve_program(&self.program, std::env::var_os("PATH"), &cwd);
        tracing::debug!(program = %program.display(), "resolved package manager");

        let mut cmd = Command::new(program);
        cmd.args(request.args())
            .current_dir(&request.working_dir)
            .envs(&request.extra_env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    async fn execute(&self, request: &ExecRequest) -> Result<ProcessResult> {
        tracing::debug!(
            program = %self.program,
            args = ?request.args(),
            cwd = %request.working_dir.display(),
            "spawning package manager"
        );

        let mut child = self.command(request).spawn().map_err(|source| PpmError::Launch {
            program: self.program.clone(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (tx, mut rx) = mpsc::channel::<Vec<u8>>(OUTPUT_CHANNEL_CAPACITY);
        let (stdout_target, stderr_target) = self.passthrough.targets();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = stdout {
            let sink = stdout_target.map(ParentStream::writer);
            readers.push(tokio::spawn(stream_chunks(stdout, sink, tx.clone(), "stdout")));
        }
        if let Some(stderr) = stderr {
            let sink = stderr_target.map(ParentStream::writer);
            readers.push(tokio::spawn(stream_chunks(stderr, sink, tx.clone(), "stderr")));
        }
        drop(tx);

        // 唯一の書き込み手
        let mut combined = Vec::new();
        while let Some(chunk) = rx.recv().await {
            combined.extend_from_slice(&chunk);
        }
        join_readers(readers).await;

        let status = child.wait().await?;
        let exit_code = status.code().unwrap_or(UNKNOWN_EXIT_CODE);
        tracing::debug!(exit_code, output_len = combined.len(), "package manager exited");

        Ok(ProcessResult {
            exit_code,
            output: String::from_utf8_lossy(&combined).into_owned(),
        })
    }
}

/// 実行ファイルを PATH から解決する
///
/// Windows の `npm` は `npm.cmd` なので、PATHEXT を考慮して探す必要がある。
/// 見つからなければそのまま返し、起動エラーは spawn 側で報告する。
fn resolve_program(program: &str, search_path: Option<OsString>, cwd: &Path) -> PathBuf {
    which::which_in(program, search_path, cwd).unwrap_or_else(|_| PathBuf::from(program))
}

/// 読み取りタスクの終了を待ち、異常終了した数を返す
async fn join_readers(readers: Vec<JoinHandle<()>>) -> usize {
    let mut failed = 0;
    for reader in readers {
        if let Err(e) = reader.await {
            tracing::warn!("package manager output reader failed, output may be truncated: {e}");
            failed += 1;
        }
    }
    failed
}

impl ProcessRunner for NpmRunner {
    fn run<'a>(
        &'a self,
        request: &'a ExecRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessResult>> + Send + 'a>> {
        Box::pin(self.execute(request))
    }
}

/// 子プロセスの出力を読み、転送先へ書きつつチャネルへ送る
async fn stream_chunks<R>(
    mut reader: R,
    mut passthrough: Option<Box<dyn AsyncWrite + Unpin + Send>>,
    tx: mpsc::Sender<Vec<u8>>,
    label: &'static str,
) where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; OUTPUT_BUFFER_SIZE];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if let Some(out) = passthrough.as_mut() {
                    // 表示に失敗しても蓄積は続ける
                    if out.write_all(&buf[..n]).await.is_err() || out.flush().await.is_err() {
                        passthrough = None;
                    }
                }
                if tx.send(buf[..n].to_vec()).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("package manager {label} read failed: {e}");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
