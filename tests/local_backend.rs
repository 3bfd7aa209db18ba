// tests/local_backend.rs

mod common;
use crate::common::{TestResult, init_tracing};

use std::fs;
use std::time::Duration;

use gasw::config::GaswConfig;
use gasw::coordinator::{Coordinator, GaswClient};
use gasw::job::{GaswExitCode, GaswInput, GaswOutput};
use gasw::types::{ExecutionTarget, Family};
use tempfile::TempDir;

fn local_coordinator(dir: &TempDir) -> Result<Coordinator, gasw::errors::GaswError> {
    let config = GaswConfig::default()
        .with_local_output_dir(dir.path())
        .with_notification_interval(Duration::from_millis(50));
    Coordinator::builder(config)
        .target(ExecutionTarget::local())
        .build()
}

/// Wait for the client to be woken, then drain until something comes back.
async fn next_outputs(
    coordinator: &Coordinator,
    client: &GaswClient,
) -> Result<Vec<GaswOutput>, Box<dyn std::error::Error>> {
    loop {
        tokio::time::timeout(Duration::from_secs(10), client.notified()).await?;
        let outputs = coordinator.get_finished_jobs()?;
        coordinator.wait_for_notification();
        if !outputs.is_empty() {
            return Ok(outputs);
        }
    }
}

#[tokio::test]
async fn successful_job_reports_its_output_files() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let coordinator = local_coordinator(&dir)?;
    let client = GaswClient::new();

    let handle = coordinator
        .submit(&client, GaswInput::new("echo").with_parameter("hello"))
        .await?;
    assert!(handle.starts_with("Local-echo-"), "handle: {handle}");

    let outputs = next_outputs(&coordinator, &client).await?;
    assert_eq!(outputs.len(), 1);
    let output = &outputs[0];

    assert_eq!(output.family, Family::Local);
    assert_eq!(output.exit_code, GaswExitCode::Success);
    assert!(handle.starts_with(&output.job_id));

    let stdout = output.stdout.as_ref().expect("stdout path");
    assert!(stdout.starts_with(dir.path()));
    assert_eq!(fs::read_to_string(stdout)?.trim(), "hello");

    coordinator.terminate().await?;
    Ok(())
}

#[tokio::test]
async fn failing_job_reports_its_exit_code() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let coordinator = local_coordinator(&dir)?;
    let client = GaswClient::new();

    coordinator
        .submit(&client, GaswInput::new("exit").with_parameter("3"))
        .await?;

    let outputs = next_outputs(&coordinator, &client).await?;
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].exit_code, GaswExitCode::ExecutionFailed(3));

    coordinator.terminate().await?;
    Ok(())
}

#[tokio::test]
async fn unregistered_target_is_a_selection_failure() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let coordinator = Coordinator::builder(GaswConfig::default().with_local_output_dir(dir.path()))
        .build()?;

    // Default target is GRID/DIRAC; only target LOCAL is registered.
    let err = coordinator
        .submit(&GaswClient::new(), GaswInput::new("echo"))
        .await
        .expect_err("no executor for GRID/DIRAC");
    assert_eq!(
        err.submission_stage(),
        Some(gasw::errors::SubmissionStage::ExecutorSelection)
    );

    coordinator.terminate().await?;
    Ok(())
}
