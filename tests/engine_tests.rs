//! Installer engine pipeline tests

mod common;

use std::path::Path;
use std::sync::{Arc, Mutex};

use common::TestSpace;
use stackforge::engine::{
    CancellationToken, InstallRequest, InstallResult, InstallerEngine, ProgressUpdate,
};
use stackforge::error::{Result, StackforgeError};
use stackforge::logging::{BufferSink, LogSink};
use stackforge::manifest::{ManifestDescriptor, ManifestProvider, ModelEntry, OptionalStep};
use stackforge::runner::{RecordedAction, RecordingRunner, StepRunner};

fn descriptor_from(space: &TestSpace, name: &str, json: &str) -> ManifestDescriptor {
    space.write_manifest(name, json);
    let provider = ManifestProvider::new(space.manifests_dir(), Arc::new(BufferSink::new()));
    let stem = name.trim_end_matches(".json");
    provider.find(stem).expect("manifest loads")
}

fn engine_with(runner: Arc<dyn StepRunner>) -> InstallerEngine {
    InstallerEngine::new(runner)
}

#[test]
fn test_successful_install_places_stack_and_log() {
    let space = TestSpace::new();
    let descriptor = descriptor_from(&space, "demo.json", common::FULL_MANIFEST);
    let request = InstallRequest::new(descriptor, space.install_root());

    let runner = Arc::new(RecordingRunner::new());
    let log = Arc::new(BufferSink::new());
    let engine = engine_with(runner.clone());
    let result = engine.install(&request, None, log.clone(), &CancellationToken::new());

    assert!(result.is_success(), "unexpected result: {result:?}");
    assert!(space.file_exists("root/App/models"));

    // Log file exists at the recorded path, under the install root.
    assert!(result.log_path().exists());
    assert!(result.log_path().starts_with(space.install_root()));
    let log_file = std::fs::read_to_string(result.log_path()).expect("read log");
    assert!(log_file.contains("DemoApp"));
    assert!(log_file.lines().any(|l| l.contains("INFO:")));

    // The buffer saw the same run.
    assert!(log.render().contains("DemoApp"));

    // Delegated actions arrive in stage order.
    let actions = runner.actions();
    assert!(matches!(&actions[0], RecordedAction::Clone { url, .. }
        if url == "https://example.invalid/demo-app.git"));
    assert!(matches!(&actions[1], RecordedAction::PipInstall { requirements, .. }
        if requirements.ends_with("App/requirements.txt")));
    assert!(matches!(&actions[2], RecordedAction::FetchModel { name, .. } if name == "weights"));
    assert!(matches!(&actions[3], RecordedAction::Clone { url, .. }
        if url == "https://example.invalid/manager.git"));
    assert!(matches!(&actions[4], RecordedAction::RunStep { id, .. } if id == "a"));
    assert_eq!(actions.len(), 5);
}

#[test]
fn test_progress_is_monotonic_and_reaches_hundred() {
    let space = TestSpace::new();
    let descriptor = descriptor_from(&space, "demo.json", common::FULL_MANIFEST);
    let request = InstallRequest::new(descriptor, space.install_root());

    let percents: Mutex<Vec<f64>> = Mutex::new(Vec::new());
    let sink = |update: &ProgressUpdate| {
        percents.lock().expect("lock").push(update.percent);
    };

    let engine = engine_with(Arc::new(RecordingRunner::new()));
    let result = engine.install(
        &request,
        Some(&sink),
        Arc::new(BufferSink::new()),
        &CancellationToken::new(),
    );
    assert!(result.is_success());

    let percents = percents.lock().expect("lock");
    assert!(!percents.is_empty());
    for pair in percents.windows(2) {
        assert!(pair[1] >= pair[0], "progress went backwards: {pair:?}");
    }
    let last = percents.last().copied().expect("reports");
    assert!((last - 100.0).abs() < 1e-6, "final percent was {last}");
}

#[test]
fn test_empty_sections_complete_instantly() {
    let space = TestSpace::new();
    let descriptor = descriptor_from(&space, "min.json", common::MINIMAL_MANIFEST);
    let request = InstallRequest::new(descriptor, space.install_root());

    let runner = Arc::new(RecordingRunner::new());
    let engine = engine_with(runner.clone());
    let result = engine.install(
        &request,
        None,
        Arc::new(BufferSink::new()),
        &CancellationToken::new(),
    );

    assert!(result.is_success());
    // Name-only base software delegates nothing; empty sections run anyway.
    assert!(runner.actions().is_empty());
    assert!(space.file_exists("root/App"));
}

#[test]
fn test_precancelled_run_is_cancelled_not_failed() {
    let space = TestSpace::new();
    let descriptor = descriptor_from(&space, "demo.json", common::FULL_MANIFEST);
    let request = InstallRequest::new(descriptor, space.install_root());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let runner = Arc::new(RecordingRunner::new());
    let log = Arc::new(BufferSink::new());
    let engine = engine_with(runner.clone());
    let result = engine.install(&request, None, log.clone(), &cancel);

    assert!(result.is_cancelled());
    assert!(runner.actions().is_empty());
    assert!(log.render().contains("cancelled"));
}

/// Records like [`RecordingRunner`] but cancels the token when the model
/// stage is reached, so later stages must not run.
struct CancellingRunner {
    inner: RecordingRunner,
    token: CancellationToken,
}

impl StepRunner for CancellingRunner {
    fn clone_repository(
        &self,
        url: &str,
        git_ref: Option<&str>,
        target: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        self.inner.clone_repository(url, git_ref, target, log)
    }

    fn install_requirements(
        &self,
        requirements: &Path,
        python: Option<&str>,
        working_dir: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        self.inner
            .install_requirements(requirements, python, working_dir, log)
    }

    fn fetch_model(
        &self,
        model: &ModelEntry,
        preference: &[String],
        target: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        self.token.cancel();
        self.inner.fetch_model(model, preference, target, log)
    }

    fn run_step(
        &self,
        step: &OptionalStep,
        working_dir: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        self.inner.run_step(step, working_dir, log)
    }
}

#[test]
fn test_cancellation_mid_run_stops_at_next_boundary() {
    let space = TestSpace::new();
    let descriptor = descriptor_from(&space, "demo.json", common::FULL_MANIFEST);
    let request = InstallRequest::new(descriptor, space.install_root());

    let cancel = CancellationToken::new();
    let runner = Arc::new(CancellingRunner {
        inner: RecordingRunner::new(),
        token: cancel.clone(),
    });
    let engine = engine_with(runner.clone());
    let result = engine.install(&request, None, Arc::new(BufferSink::new()), &cancel);

    assert!(result.is_cancelled());
    // The in-flight model fetch completed; extensions and steps never ran.
    let actions = runner.inner.actions();
    assert!(actions.iter().any(|a| matches!(a, RecordedAction::FetchModel { .. })));
    assert!(!actions.iter().any(|a| matches!(a, RecordedAction::RunStep { .. })));
    assert_eq!(
        actions
            .iter()
            .filter(|a| matches!(a, RecordedAction::Clone { .. }))
            .count(),
        1,
        "extension clone must not run after cancellation"
    );
}

#[test]
fn test_escaping_requirement_path_fails_the_run() {
    let space = TestSpace::new();
    let descriptor = descriptor_from(
        &space,
        "escape.json",
        r#"{
            "schemaVersion": "1",
            "baseSoftware": { "name": "DemoApp", "target": "App" },
            "dependencies": {
                "pipRequirements": [ { "path": "../../payload/requirements.txt" } ]
            },
            "models": [
                { "name": "weights", "source": "url", "url": "https://example.invalid/w", "target": "App/models" }
            ]
        }"#,
    );
    let request = InstallRequest::new(descriptor, space.install_root());

    let runner = Arc::new(RecordingRunner::new());
    let engine = engine_with(runner.clone());
    let result = engine.install(
        &request,
        None,
        Arc::new(BufferSink::new()),
        &CancellationToken::new(),
    );

    assert!(matches!(
        result.error(),
        Some(StackforgeError::PathEscape { .. })
    ));
    // The pipeline aborted before the models stage.
    assert!(runner.actions().is_empty());
    // Nothing was written outside the install root.
    assert!(!space.path.join("payload").exists());
}

#[test]
fn test_vram_preference_flows_into_model_fetches() {
    let space = TestSpace::new();

    let descriptor = descriptor_from(&space, "demo.json", common::FULL_MANIFEST);
    let request =
        InstallRequest::new(descriptor.clone(), space.install_root()).with_vram_profile("16GB");
    let runner = Arc::new(RecordingRunner::new());
    let result = engine_with(runner.clone()).install(
        &request,
        None,
        Arc::new(BufferSink::new()),
        &CancellationToken::new(),
    );
    assert!(result.is_success());
    let preference = runner.actions().iter().find_map(|a| match a {
        RecordedAction::FetchModel { preference, .. } => Some(preference.clone()),
        _ => None,
    });
    assert_eq!(preference, Some(vec!["Q8".to_string()]));

    // Without a selection the first listed profile applies.
    let request = InstallRequest::new(descriptor, space.path.join("root2"));
    let runner = Arc::new(RecordingRunner::new());
    let result = engine_with(runner.clone()).install(
        &request,
        None,
        Arc::new(BufferSink::new()),
        &CancellationToken::new(),
    );
    assert!(result.is_success());
    let preference = runner.actions().iter().find_map(|a| match a {
        RecordedAction::FetchModel { preference, .. } => Some(preference.clone()),
        _ => None,
    });
    assert_eq!(preference, Some(vec!["Q4".to_string()]));
}

#[test]
fn test_optional_step_selection() {
    let space = TestSpace::new();
    let descriptor = descriptor_from(&space, "demo.json", common::FULL_MANIFEST);

    // Defaults: only the enabled-by-default step runs.
    let request = InstallRequest::new(descriptor.clone(), space.install_root());
    let runner = Arc::new(RecordingRunner::new());
    engine_with(runner.clone()).install(
        &request,
        None,
        Arc::new(BufferSink::new()),
        &CancellationToken::new(),
    );
    let step_ids: Vec<String> = runner
        .actions()
        .iter()
        .filter_map(|a| match a {
            RecordedAction::RunStep { id, .. } => Some(id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(step_ids, vec!["a"]);

    // Explicit selection replaces the defaults; unknown ids are ignored.
    let request = InstallRequest::new(descriptor, space.path.join("root2"))
        .with_optional_steps(vec!["b".to_string(), "ghost".to_string()]);
    let runner = Arc::new(RecordingRunner::new());
    engine_with(runner.clone()).install(
        &request,
        None,
        Arc::new(BufferSink::new()),
        &CancellationToken::new(),
    );
    let step_ids: Vec<String> = runner
        .actions()
        .iter()
        .filter_map(|a| match a {
            RecordedAction::RunStep { id, .. } => Some(id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(step_ids, vec!["b"]);
}

/// Fails every clone; everything else records.
struct CloneFailingRunner {
    inner: RecordingRunner,
}

impl StepRunner for CloneFailingRunner {
    fn clone_repository(
        &self,
        url: &str,
        _git_ref: Option<&str>,
        _target: &Path,
        _log: &dyn LogSink,
    ) -> Result<()> {
        Err(StackforgeError::GitCloneFailed {
            url: url.to_string(),
            reason: "network unreachable".to_string(),
        })
    }

    fn install_requirements(
        &self,
        requirements: &Path,
        python: Option<&str>,
        working_dir: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        self.inner
            .install_requirements(requirements, python, working_dir, log)
    }

    fn fetch_model(
        &self,
        model: &ModelEntry,
        preference: &[String],
        target: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        self.inner.fetch_model(model, preference, target, log)
    }

    fn run_step(
        &self,
        step: &OptionalStep,
        working_dir: &Path,
        log: &dyn LogSink,
    ) -> Result<()> {
        self.inner.run_step(step, working_dir, log)
    }
}

#[test]
fn test_stage_failure_aborts_remaining_stages() {
    let space = TestSpace::new();
    let descriptor = descriptor_from(&space, "demo.json", common::FULL_MANIFEST);
    let request = InstallRequest::new(descriptor, space.install_root());

    let runner = Arc::new(CloneFailingRunner {
        inner: RecordingRunner::new(),
    });
    let log = Arc::new(BufferSink::new());
    let result = engine_with(runner.clone()).install(
        &request,
        None,
        log.clone(),
        &CancellationToken::new(),
    );

    assert!(matches!(
        result.error(),
        Some(StackforgeError::GitCloneFailed { .. })
    ));
    assert!(runner.inner.actions().is_empty(), "later stages must not run");

    // Summary at Error level, detail at Verbose.
    let rendered = log.render();
    assert!(rendered.contains("ERROR: Installation failed"));
    assert!(rendered.contains("VERBOSE: GitCloneFailed"));
}

#[test]
fn test_unwritable_log_file_degrades_to_buffer_only() {
    let space = TestSpace::new();
    let descriptor = descriptor_from(&space, "min.json", common::MINIMAL_MANIFEST);

    // A directory at the log path makes file-sink creation fail.
    let bad_log = space.path.join("log-as-dir");
    std::fs::create_dir_all(&bad_log).expect("mkdir");
    let request =
        InstallRequest::new(descriptor, space.install_root()).with_log_file(&bad_log);

    let log = Arc::new(BufferSink::new());
    let result = engine_with(Arc::new(RecordingRunner::new())).install(
        &request,
        None,
        log.clone(),
        &CancellationToken::new(),
    );

    assert!(result.is_success(), "log failure must not abort the run");
    assert!(log.render().contains("in-memory logging only"));
}

#[test]
fn test_rerun_is_idempotent() {
    let space = TestSpace::new();
    let descriptor = descriptor_from(&space, "demo.json", common::FULL_MANIFEST);
    let request = InstallRequest::new(descriptor, space.install_root());

    let engine = engine_with(Arc::new(RecordingRunner::new()));
    let first = engine.install(
        &request,
        None,
        Arc::new(BufferSink::new()),
        &CancellationToken::new(),
    );
    let second = engine.install(
        &request,
        None,
        Arc::new(BufferSink::new()),
        &CancellationToken::new(),
    );

    assert!(first.is_success());
    assert!(second.is_success());
}
