//! Integration tests for the update pipeline.
//!
//! Tests cover:
//! - Locked items never reach the model or the server
//! - Dry runs never write and preview every unlocked item
//! - Per-item failures do not stop the batch
//! - Dry-run output is stable across runs

use plex_ai_titler::core::generator::TitleGenerator;
use plex_ai_titler::core::pipeline::{ItemOutcome, RunMode, SkipReason, UpdatePipeline};
use plex_ai_titler::models::config::AiConfig;
use plex_ai_titler::models::media::{Library, LibraryKind, MediaItem};
use plex_ai_titler::services::openai::ChatRequest;
use plex_ai_titler::services::{CompletionService, LibraryService};
use plex_ai_titler::{Error, Result};
use std::sync::{Arc, Mutex};

// ========== STUBS ==========

struct StubServer {
    items: Vec<MediaItem>,
    updates: Mutex<Vec<(String, String)>>,
    reject_updates_for: Option<String>,
}

impl StubServer {
    fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items,
            updates: Mutex::new(Vec::new()),
            reject_updates_for: None,
        }
    }

    fn updates(&self) -> Vec<(String, String)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LibraryService for StubServer {
    fn server_name(&self) -> &str {
        "Stub"
    }

    async fn libraries(&self) -> Result<Vec<Library>> {
        Ok(vec![movies()])
    }

    async fn items(&self, _library: &Library) -> Result<Vec<MediaItem>> {
        Ok(self.items.clone())
    }

    async fn update_title(&self, item: &MediaItem, title: &str) -> Result<()> {
        if self.reject_updates_for.as_deref() == Some(item.rating_key.as_str()) {
            return Err(Error::Update("HTTP 500".to_string()));
        }
        self.updates
            .lock()
            .unwrap()
            .push((item.rating_key.clone(), title.to_string()));
        Ok(())
    }
}

/// Deterministic model: upper-cases the path, fails on paths containing "bad".
struct StubModel {
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl CompletionService for StubModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let path = request.messages[1].content.clone();
        self.calls.lock().unwrap().push(path.clone());
        if path.contains("bad") {
            return Err(Error::Generation("429 Too Many Requests".to_string()));
        }
        Ok(format!(" {} \n", path.to_uppercase()))
    }
}

fn movies() -> Library {
    Library {
        key: "1".to_string(),
        title: "Movies".to_string(),
        kind: LibraryKind::Movie,
        locations: vec!["/media/Movies".to_string()],
    }
}

fn item(key: &str, file: Option<&str>, locked: bool) -> MediaItem {
    MediaItem {
        rating_key: key.to_string(),
        title: format!("title {}", key),
        title_locked: locked,
        files: file.map(|f| vec![f.to_string()]).unwrap_or_default(),
    }
}

fn generator(calls: Arc<Mutex<Vec<String>>>) -> TitleGenerator {
    TitleGenerator::new(
        Box::new(StubModel { calls }),
        AiConfig {
            endpoint: "http://stub/v1".to_string(),
            model: "stub".to_string(),
            api_key: None,
            temperature: 0.0,
            system_prompt: "Title this.".to_string(),
        },
    )
}

// ========== TESTS ==========

#[tokio::test]
async fn test_locked_items_are_never_generated_or_updated() {
    let server = StubServer::new(vec![
        item("1", Some("/media/Movies/locked.mkv"), true),
        item("2", Some("/media/Movies/open.mkv"), false),
    ]);
    let calls = Arc::new(Mutex::new(Vec::new()));
    let generator = generator(calls.clone());

    let report = UpdatePipeline::new(&server, &generator, RunMode::Apply)
        .run(&movies())
        .await
        .unwrap();

    assert_eq!(*calls.lock().unwrap(), vec!["open.mkv".to_string()]);
    assert_eq!(server.updates(), vec![("2".to_string(), "OPEN.MKV".to_string())]);
    assert_eq!(report.skipped_locked(), 1);
    assert_eq!(report.applied(), 1);
}

#[tokio::test]
async fn test_dry_run_never_updates() {
    let server = StubServer::new(vec![
        item("1", Some("/media/Movies/DJ Earworm/song.mp4"), false),
        item("2", Some("/media/Movies/b.mkv"), false),
    ]);
    let generator = generator(Arc::new(Mutex::new(Vec::new())));

    let report = UpdatePipeline::new(&server, &generator, RunMode::DryRun)
        .run(&movies())
        .await
        .unwrap();

    assert!(server.updates().is_empty());
    assert_eq!(report.previewed(), 2);
    assert_eq!(
        report.items[0].outcome,
        ItemOutcome::Previewed {
            relative_path: "DJ Earworm/song.mp4".to_string(),
            title: "DJ EARWORM/SONG.MP4".to_string(),
        }
    );
}

#[tokio::test]
async fn test_generation_failure_does_not_stop_batch() {
    let server = StubServer::new(vec![
        item("1", Some("/media/Movies/a.mkv"), false),
        item("2", Some("/media/Movies/bad.mkv"), false),
        item("3", Some("/media/Movies/c.mkv"), false),
    ]);
    let calls = Arc::new(Mutex::new(Vec::new()));
    let generator = generator(calls.clone());

    let report = UpdatePipeline::new(&server, &generator, RunMode::Apply)
        .run(&movies())
        .await
        .unwrap();

    assert_eq!(calls.lock().unwrap().len(), 3);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.applied(), 2);
    assert!(!report.all_failed());
    assert!(matches!(report.items[1].outcome, ItemOutcome::Failed { .. }));
    assert_eq!(
        server.updates(),
        vec![
            ("1".to_string(), "A.MKV".to_string()),
            ("3".to_string(), "C.MKV".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_update_failure_is_recorded() {
    let mut server = StubServer::new(vec![
        item("1", Some("/media/Movies/a.mkv"), false),
        item("2", Some("/media/Movies/b.mkv"), false),
    ]);
    server.reject_updates_for = Some("1".to_string());
    let generator = generator(Arc::new(Mutex::new(Vec::new())));

    let report = UpdatePipeline::new(&server, &generator, RunMode::Apply)
        .run(&movies())
        .await
        .unwrap();

    assert_eq!(report.failed(), 1);
    assert_eq!(report.applied(), 1);
    assert!(report.errors()[0].contains("HTTP 500"));
}

#[tokio::test]
async fn test_items_without_files_are_skipped() {
    let server = StubServer::new(vec![item("1", None, false)]);
    let calls = Arc::new(Mutex::new(Vec::new()));
    let generator = generator(calls.clone());

    let report = UpdatePipeline::new(&server, &generator, RunMode::Apply)
        .run(&movies())
        .await
        .unwrap();

    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(report.items[0].outcome, ItemOutcome::Skipped(SkipReason::NoFile));
    assert!(!report.all_failed());
}

#[tokio::test]
async fn test_every_attempt_failing() {
    let server = StubServer::new(vec![
        item("1", Some("/media/Movies/bad1.mkv"), false),
        item("2", Some("/media/Movies/locked.mkv"), true),
        item("3", Some("/media/Movies/bad3.mkv"), false),
    ]);
    let generator = generator(Arc::new(Mutex::new(Vec::new())));

    let report = UpdatePipeline::new(&server, &generator, RunMode::DryRun)
        .run(&movies())
        .await
        .unwrap();

    assert_eq!(report.attempted(), 2);
    assert!(report.all_failed());
}

#[tokio::test]
async fn test_dry_run_is_idempotent() {
    let server = StubServer::new(vec![
        item("1", Some("/media/Movies/x/one.mkv"), false),
        item("2", Some("/media/Movies/two.mkv"), true),
        item("3", Some("/elsewhere/three.mkv"), false),
    ]);
    let generator = generator(Arc::new(Mutex::new(Vec::new())));
    let pipeline = UpdatePipeline::new(&server, &generator, RunMode::DryRun);

    let first: Vec<String> = pipeline
        .run(&movies())
        .await
        .unwrap()
        .items
        .iter()
        .map(|r| r.line())
        .collect();
    let second: Vec<String> = pipeline
        .run(&movies())
        .await
        .unwrap()
        .items
        .iter()
        .map(|r| r.line())
        .collect();

    assert_eq!(first, second);
    assert_eq!(first[2], "DRY RUN: 'title 3' -> 'THREE.MKV'\n  Path: three.mkv");
}
