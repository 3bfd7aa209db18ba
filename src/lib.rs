// src/lib.rs

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod exec;
pub mod job;
pub mod logging;
pub mod monitor;
pub mod persistence;
pub mod proxy;
pub mod resolve;
pub mod types;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::cli::CliArgs;
use crate::config::GaswConfig;
use crate::coordinator::{Coordinator, GaswClient, resolve_target};
use crate::job::{GaswInput, GaswOutput};
use crate::types::ExecutionTarget;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config + job file loading
/// - the coordinator (local backend and local monitor/resolver)
/// - submission of every job
/// - the notify → drain → `wait_for_notification` loop
/// - Ctrl-C handling and shutdown
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::load_or_default(&args.config)?;
    logging::init_logging(args.log_level, cfg.logging.level.as_deref());

    let cfg = apply_target_overrides(cfg, &args);
    let jobs = config::load_jobs(&args.jobs)?;

    if args.dry_run {
        print_dry_run(&cfg, &jobs);
        return Ok(());
    }

    if jobs.is_empty() {
        info!(jobs = %args.jobs, "job file contains no jobs; nothing to do");
        return Ok(());
    }

    let coordinator = Coordinator::builder(cfg).build()?;
    let client = GaswClient::new();

    let total = jobs.len();
    let mut outstanding = 0usize;
    for job in jobs {
        match coordinator.submit(&client, job).await {
            Ok(handle) => {
                debug!(handle = %handle, "job accepted");
                outstanding += 1;
            }
            Err(err) => error!(error = %err, "job submission failed"),
        }
    }

    let collected = collect_outputs(&coordinator, &client, outstanding).await;
    coordinator.terminate().await?;
    collected?;

    let failed = total - outstanding;
    if failed > 0 {
        anyhow::bail!("{failed} of {total} job submissions failed");
    }
    Ok(())
}

fn apply_target_overrides(cfg: GaswConfig, args: &CliArgs) -> GaswConfig {
    if args.backend_version.is_none() && args.target.is_none() {
        return cfg;
    }
    let current = cfg.default_target().clone();
    let target = ExecutionTarget::new(
        args.backend_version.clone().unwrap_or(current.version),
        args.target.clone().unwrap_or(current.target),
    );
    cfg.with_default_target(target)
}

/// Wait for notifications and drain until `outstanding` jobs are collected
/// or Ctrl-C is pressed.
async fn collect_outputs(
    coordinator: &Coordinator,
    client: &GaswClient,
    mut outstanding: usize,
) -> Result<()> {
    while outstanding > 0 {
        tokio::select! {
            _ = client.notified() => {
                let outputs = coordinator.get_finished_jobs()?;
                for output in &outputs {
                    print_output(output);
                }
                outstanding = outstanding.saturating_sub(outputs.len());
                coordinator.wait_for_notification();
            }
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    warn!(error = %e, "failed to listen for Ctrl+C");
                }
                info!(outstanding, "interrupted; shutting down with jobs still running");
                break;
            }
        }
    }
    Ok(())
}

fn print_output(output: &GaswOutput) {
    println!("{}\t{:?}", output.job_id, output.exit_code);
    if let Some(ref stdout) = output.stdout {
        println!("  stdout: {}", stdout.display());
    }
    if let Some(ref stderr) = output.stderr {
        println!("  stderr: {}", stderr.display());
    }
}

/// Simple dry-run output: print each job and the backend it would use.
fn print_dry_run(cfg: &GaswConfig, jobs: &[GaswInput]) {
    println!("gasw dry-run");
    println!("  default target = {}", cfg.default_target());
    println!(
        "  notification_interval = {:?}",
        cfg.notification_interval()
    );
    println!("  local.output_dir = {}", cfg.local.output_dir.display());
    println!();

    println!("jobs ({}):", jobs.len());
    for job in jobs {
        println!("  - {}", job.command_line());
        println!("      target: {}", resolve_target(cfg.default_target(), job));
        if !job.release.name.is_empty() {
            println!("      release: {}", job.release.name);
        }
    }

    debug!("dry-run complete (nothing submitted)");
}
