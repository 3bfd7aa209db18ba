// src/exec/local.rs

//! Local execution backend.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, anyhow};
use tokio::process::{Child, Command};
use tracing::{debug, error, info};

use crate::coordinator::CompletionReporter;
use crate::exec::backend::{ExecFuture, Executor, ExecutorContext};
use crate::job::handle::LOCAL_PREFIX;
use crate::job::{CompletionToken, GaswInput, JobHandle, format_handle};
use crate::proxy::UserProxy;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);
static RUN_ID: OnceLock<String> = OnceLock::new();

/// Per-process component of local job ids: first-use time (ms, hex) and pid.
fn run_id() -> &'static str {
    RUN_ID.get_or_init(|| {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        format!("{millis:x}p{}", std::process::id())
    })
}

/// Prepared state, filled in by `pre_process`.
#[derive(Debug)]
struct Prepared {
    job_id: String,
    command: String,
    stdout: PathBuf,
    stderr: PathBuf,
}

/// Runs one job as `sh -c "<executable> <parameters...>"` on this machine.
///
/// Handles look like `Local-<name>-<run>-<n>--<pid>`, where `<run>` is
/// unique per process. Stdout and stderr go to
/// `<output_dir>/<job id>.out` / `.err`, and the completion is reported
/// when the process exits.
#[derive(Debug)]
pub struct LocalExecutor {
    input: GaswInput,
    reporter: CompletionReporter,
    output_dir: PathBuf,
    prepared: Option<Prepared>,
    proxy: Option<UserProxy>,
}

impl LocalExecutor {
    pub fn new(ctx: ExecutorContext, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: ctx.input,
            reporter: ctx.reporter,
            output_dir: output_dir.into(),
            prepared: None,
            proxy: None,
        }
    }

    pub fn user_proxy(&self) -> Option<&UserProxy> {
        self.proxy.as_ref()
    }
}

impl Executor for LocalExecutor {
    fn pre_process(&mut self) -> ExecFuture<'_, ()> {
        Box::pin(async move {
            tokio::fs::create_dir_all(&self.output_dir)
                .await
                .with_context(|| {
                    format!("creating output directory {}", self.output_dir.display())
                })?;

            let n = SEQUENCE.fetch_add(1, Ordering::Relaxed) + 1;
            let job_id = format!(
                "{LOCAL_PREFIX}{}-{}-{n}",
                job_name(&self.input.executable),
                run_id()
            );

            self.prepared = Some(Prepared {
                stdout: self.output_dir.join(format!("{job_id}.out")),
                stderr: self.output_dir.join(format!("{job_id}.err")),
                command: self.input.command_line(),
                job_id,
            });
            Ok(())
        })
    }

    fn set_user_proxy(&mut self, proxy: UserProxy) {
        debug!(
            delegation = ?proxy.delegation,
            "local backend does not use delegated proxies; keeping it for reference"
        );
        self.proxy = Some(proxy);
    }

    fn submit(&mut self) -> ExecFuture<'_, JobHandle> {
        Box::pin(async move {
            let prepared = self
                .prepared
                .as_ref()
                .ok_or_else(|| anyhow!("submit called before pre_process"))?;

            // Never overwrite the output of an earlier job.
            let stdout = File::create_new(&prepared.stdout)
                .with_context(|| format!("creating {}", prepared.stdout.display()))?;
            let stderr = File::create_new(&prepared.stderr)
                .with_context(|| format!("creating {}", prepared.stderr.display()))?;

            let mut cmd = Command::new("sh");
            cmd.arg("-c")
                .arg(&prepared.command)
                .kill_on_drop(true)
                .stdin(Stdio::null())
                .stdout(Stdio::from(stdout))
                .stderr(Stdio::from(stderr));

            let child = cmd
                .spawn()
                .with_context(|| format!("spawning process for job '{}'", prepared.job_id))?;

            let pid = child.id().unwrap_or_default();
            let handle = format_handle(&prepared.job_id, &pid.to_string());

            info!(
                handle = %handle,
                cmd = %prepared.command,
                "started local job process"
            );

            tokio::spawn(watch_process(
                child,
                handle.clone(),
                prepared.stdout.clone(),
                prepared.stderr.clone(),
                self.reporter.clone(),
            ));

            Ok(handle)
        })
    }
}

/// Wait for the process and report it as finished, whatever the outcome.
async fn watch_process(
    mut child: Child,
    handle: JobHandle,
    stdout: PathBuf,
    stderr: PathBuf,
    reporter: CompletionReporter,
) {
    let exit_code = match child.wait().await {
        Ok(status) => {
            info!(
                handle = %handle,
                exit_code = ?status.code(),
                success = status.success(),
                "local job process exited"
            );
            status.code()
        }
        Err(err) => {
            error!(handle = %handle, error = %err, "waiting for local job process failed");
            None
        }
    };

    reporter.report(
        handle,
        CompletionToken {
            exit_code,
            stdout: Some(stdout),
            stderr: Some(stderr),
        },
    );
}

/// File-name part of the executable, reduced to characters that cannot
/// form a handle separator.
fn job_name(executable: &str) -> String {
    let base = Path::new(executable)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(executable);

    let name: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    if name.is_empty() { "job".to_string() } else { name }
}
