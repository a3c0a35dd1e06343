//! Workflow recording, stage timing, and structured run logs.

use crate::runtime::error::{DockError, DockResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

const RUNS_DIR: &str = "runs";

#[derive(Debug, Clone, Serialize)]
struct StageRecord {
    name: String,
    started_at: String,
    duration_ms: u128,
    status: String,
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct RunManifest {
    workflow: String,
    config: Option<String>,
    started_at: String,
    finished_at: String,
    duration_ms: u128,
    status: String,
    error: Option<String>,
    run_dir: String,
    command: String,
    stages: Vec<StageRecord>,
}

#[derive(Debug)]
struct RunRecorder {
    workflow: String,
    config: Option<String>,
    started_at: DateTime<Utc>,
    started_instant: Instant,
    run_dir: PathBuf,
    manifest_path: PathBuf,
    events_path: PathBuf,
    command: String,
    stages: Vec<StageRecord>,
}

static ACTIVE_RUN_RECORDER: OnceLock<Mutex<Option<RunRecorder>>> = OnceLock::new();

fn active_run_recorder() -> &'static Mutex<Option<RunRecorder>> {
    ACTIVE_RUN_RECORDER.get_or_init(|| Mutex::new(None))
}

/// Shared workflow recorder service.
///
/// Stages always print `==> <stage>` and a `done in`/`failed in` line. When a run is started
/// with a log directory, every stage also lands in `<log_dir>/runs/<id>/events.jsonl` and the
/// run is summarized in `manifest.json` next to it.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkflowRecorder;

impl WorkflowRecorder {
    /// Create a recorder service.
    pub fn new() -> Self {
        Self
    }

    /// Run a workflow, recording events and a manifest when `log_dir` is set.
    ///
    /// The action's result is returned unchanged; recording failures only surface when the
    /// action itself succeeded.
    pub fn with_workflow_run<T, F>(
        &self,
        workflow: &str,
        config: Option<String>,
        log_dir: Option<&Path>,
        action: F,
    ) -> DockResult<T>
    where
        F: FnOnce() -> DockResult<T>,
    {
        let Some(log_dir) = log_dir else {
            return action();
        };

        let recorder = self.begin_workflow_run(workflow, config, log_dir)?;
        {
            let mut guard = active_run_recorder()
                .lock()
                .map_err(|_| DockError::io("failed to lock workflow recorder"))?;
            *guard = Some(recorder);
        }

        let result = action();
        let finished = self.finish_workflow_run(result.as_ref().err().cloned());
        let value = result?;
        finished?;
        Ok(value)
    }

    fn begin_workflow_run(
        &self,
        workflow: &str,
        config: Option<String>,
        log_dir: &Path,
    ) -> DockResult<RunRecorder> {
        let started_at = Utc::now();
        let run_id = format!("{}-{workflow}", started_at.format("%Y%m%dT%H%M%S%.3fZ"));
        let run_dir = log_dir.join(RUNS_DIR).join(run_id);
        fs::create_dir_all(&run_dir).map_err(|err| {
            DockError::io(format!("failed to create {}: {err}", run_dir.display()))
        })?;

        let events_path = run_dir.join("events.jsonl");
        let manifest_path = run_dir.join("manifest.json");
        fs::write(&events_path, "").map_err(|err| {
            DockError::io(format!(
                "failed to initialize {}: {err}",
                events_path.display()
            ))
        })?;

        append_run_event(
            &events_path,
            serde_json::json!({
                "type": "workflow_started",
                "workflow": workflow,
                "config": config,
                "timestamp": rfc3339(&started_at)
            }),
        )?;

        Ok(RunRecorder {
            workflow: workflow.to_string(),
            config,
            started_at,
            started_instant: Instant::now(),
            run_dir,
            manifest_path,
            events_path,
            command: env::args().collect::<Vec<_>>().join(" "),
            stages: Vec::new(),
        })
    }

    fn finish_workflow_run(&self, error: Option<DockError>) -> DockResult<()> {
        let mut guard = active_run_recorder()
            .lock()
            .map_err(|_| DockError::io("failed to lock workflow recorder"))?;
        let Some(recorder) = guard.take() else {
            return Ok(());
        };

        let finished_at = Utc::now();
        let status = if error.is_none() { "ok" } else { "failed" }.to_string();
        let manifest = RunManifest {
            workflow: recorder.workflow.clone(),
            config: recorder.config.clone(),
            started_at: rfc3339(&recorder.started_at),
            finished_at: rfc3339(&finished_at),
            duration_ms: recorder.started_instant.elapsed().as_millis(),
            status: status.clone(),
            error: error.as_ref().map(ToString::to_string),
            run_dir: recorder.run_dir.display().to_string(),
            command: recorder.command.clone(),
            stages: recorder.stages,
        };

        append_run_event(
            &recorder.events_path,
            serde_json::json!({
                "type": "workflow_finished",
                "workflow": recorder.workflow,
                "timestamp": rfc3339(&finished_at),
                "status": status,
                "error": error.as_ref().map(ToString::to_string)
            }),
        )?;

        let manifest_json = serde_json::to_string_pretty(&manifest)
            .map_err(|err| DockError::io(format!("failed to serialize run manifest: {err}")))?;
        fs::write(&recorder.manifest_path, manifest_json).map_err(|err| {
            DockError::io(format!(
                "failed to write {}: {err}",
                recorder.manifest_path.display()
            ))
        })?;
        println!("    run log: {}", recorder.manifest_path.display());

        Ok(())
    }

    /// Record a stage with timing and structured events.
    ///
    /// The stage result is propagated to the caller unchanged after the corresponding
    /// `stage_started` and `stage_finished` events are recorded.
    pub fn run_timed_stage<T, F>(&self, message: &str, action: F) -> DockResult<T>
    where
        F: FnOnce() -> DockResult<T>,
    {
        println!("\n==> {message}");
        let started = Instant::now();
        let started_at = Utc::now();
        append_active_run_event(serde_json::json!({
            "type": "stage_started",
            "name": message,
            "timestamp": rfc3339(&started_at)
        }))?;

        let result = action();
        let elapsed = started.elapsed();
        let stage = StageRecord {
            name: message.to_string(),
            started_at: rfc3339(&started_at),
            duration_ms: elapsed.as_millis(),
            status: if result.is_ok() { "ok" } else { "failed" }.to_string(),
            error: result.as_ref().err().map(ToString::to_string),
        };
        record_stage_event(stage, Utc::now())?;
        match &result {
            Ok(_) => println!("    done in {}", format_duration(elapsed)),
            Err(_) => println!("    failed in {}", format_duration(elapsed)),
        }
        result
    }

    /// Print a warning using the shared workflow output style.
    pub fn warn(&self, message: &str) {
        println!("\n[warn] {message}");
    }
}

fn append_run_event(path: &Path, event: serde_json::Value) -> DockResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| DockError::io(format!("failed to open {}: {err}", path.display())))?;
    let line = serde_json::to_string(&event)
        .map_err(|err| DockError::io(format!("failed to serialize run event: {err}")))?;
    use std::io::Write as _;
    writeln!(&mut file, "{line}")
        .map_err(|err| DockError::io(format!("failed to append {}: {err}", path.display())))
}

fn append_active_run_event(event: serde_json::Value) -> DockResult<()> {
    let guard = active_run_recorder()
        .lock()
        .map_err(|_| DockError::io("failed to lock workflow recorder"))?;
    let Some(recorder) = guard.as_ref() else {
        return Ok(());
    };
    append_run_event(&recorder.events_path, event)
}

fn record_stage_event(stage: StageRecord, finished_at: DateTime<Utc>) -> DockResult<()> {
    let mut guard = active_run_recorder()
        .lock()
        .map_err(|_| DockError::io("failed to lock workflow recorder"))?;
    let Some(recorder) = guard.as_mut() else {
        return Ok(());
    };
    append_run_event(
        &recorder.events_path,
        serde_json::json!({
            "type": "stage_finished",
            "name": stage.name,
            "started_at": stage.started_at,
            "finished_at": rfc3339(&finished_at),
            "duration_ms": stage.duration_ms,
            "status": stage.status,
            "error": stage.error
        }),
    )?;
    recorder.stages.push(stage);
    Ok(())
}

fn rfc3339(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format a duration for human-readable terminal output.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    if secs >= 60 {
        let minutes = secs / 60;
        let rem_secs = secs % 60;
        format!("{minutes}m {rem_secs}.{millis:03}s")
    } else {
        format!("{secs}.{millis:03}s")
    }
}

#[cfg(test)]
pub(crate) fn workflow_test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}
