//! Log sink behavior across a full installation run

mod common;

use std::sync::Arc;

use common::TestSpace;
use stackforge::engine::{CancellationToken, InstallRequest, InstallerEngine};
use stackforge::logging::{BufferSink, CompositeSink, FileSink, LogLevel, LogSink};
use stackforge::manifest::ManifestProvider;
use stackforge::runner::RecordingRunner;

/// A sink that panics on every call
struct ExplodingSink;

impl LogSink for ExplodingSink {
    fn log(&self, _level: LogLevel, _text: &str) {
        panic!("sink failure");
    }
}

#[test]
fn test_run_survives_a_failing_sink_in_the_composite() {
    let space = TestSpace::new();
    space.write_manifest("demo.json", common::FULL_MANIFEST);
    let provider = ManifestProvider::new(space.manifests_dir(), Arc::new(BufferSink::new()));
    let descriptor = provider.find("demo").expect("manifest");

    let buffer = Arc::new(BufferSink::new());
    let composite: Arc<dyn LogSink> = Arc::new(CompositeSink::new(vec![
        Arc::new(ExplodingSink),
        buffer.clone(),
    ]));

    let request = InstallRequest::new(descriptor, space.install_root());
    let engine = InstallerEngine::new(Arc::new(RecordingRunner::new()));
    let result = engine.install(&request, None, composite, &CancellationToken::new());

    assert!(result.is_success());
    let rendered = buffer.render();
    assert!(rendered.contains("DemoApp"));
    assert!(rendered.contains("completed"));
}

#[test]
fn test_log_file_lines_follow_the_format_contract() {
    let space = TestSpace::new();
    let path = space.path.join("probe.log");
    let sink = FileSink::create(&path).expect("create");
    sink.verbose("detail");
    sink.info("progress");
    sink.warn("careful");
    sink.error("broken");
    drop(sink);

    let content = std::fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);

    let levels = ["VERBOSE", "INFO", "WARNING", "ERROR"];
    for (line, level) in lines.iter().zip(levels) {
        // "[yyyy-MM-dd HH:mm:ss] LEVEL: message"
        assert_eq!(line.as_bytes()[0], b'[');
        let stamp = &line[1..20];
        assert!(
            chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok(),
            "bad timestamp in line: {line}"
        );
        assert_eq!(&line[20..21], "]");
        assert!(
            line[22..].starts_with(&format!("{level}: ")),
            "bad level in line: {line}"
        );
    }
}

#[test]
fn test_file_and_buffer_observe_the_same_run() {
    let space = TestSpace::new();
    space.write_manifest("min.json", common::MINIMAL_MANIFEST);
    let provider = ManifestProvider::new(space.manifests_dir(), Arc::new(BufferSink::new()));
    let descriptor = provider.find("min").expect("manifest");

    let buffer = Arc::new(BufferSink::new());
    let request = InstallRequest::new(descriptor, space.install_root());
    let engine = InstallerEngine::new(Arc::new(RecordingRunner::new()));
    let result = engine.install(
        &request,
        None,
        buffer.clone(),
        &CancellationToken::new(),
    );

    assert!(result.is_success());
    let file_lines = std::fs::read_to_string(result.log_path())
        .expect("read log")
        .lines()
        .count();
    assert_eq!(file_lines, buffer.len());
}
