//! Publish, ZIP export and video tests for completed projects.

use std::io::{Cursor, Read};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pinforge_ai::{AiError, GenerativeAi};
use pinforge_core::{
    GeneratedPin, HumorLevel, ImperfectionType, LayoutType, NicheAnalysis, PinStrategy,
    ProductInput, Project, VisualStyle,
};
use pinforge_pipeline::{
    export_zip, generate_pin_video, publish_project, video_path, BackgroundLoader,
    PipelineError, PublishStatus,
};
use pinforge_platform::{PinPublisher, PlatformError};
use pinforge_store::{MemoryBackend, Store};

fn strategy(keyword: &str) -> PinStrategy {
    serde_json::from_value(serde_json::json!({
        "targetKeyword": keyword,
        "headline": "Your desk is a crime scene",
        "subheadline": "We fixed it",
        "cta": "Shop the fix",
        "layout": "split-vertical",
    }))
    .unwrap()
}

fn completed(keyword: &str, image_url: &str) -> GeneratedPin {
    let mut pin = GeneratedPin::pending(strategy(keyword));
    pin.complete(image_url.to_string());
    pin
}

fn project_with(pins: Vec<GeneratedPin>, destination: Option<&str>) -> Project {
    let mut project = Project::new(ProductInput {
        url_or_name: "Desk Lamp Co".to_string(),
        destination_url: destination.map(str::to_string),
        ..ProductInput::default()
    });
    for pin in pins {
        project.push_pin(pin);
    }
    project
}

fn png_data_url() -> String {
    let img = image::RgbaImage::from_pixel(8, 12, image::Rgba([200, 40, 90, 255]));
    let png = pinforge_render::encode_png(&img).unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

// ---------------------------------------------------------------------------
// Publish
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakePublisher {
    calls: Mutex<Vec<(String, Option<String>)>>,
    /// 1-based call that fails with an API error.
    fail_on: Option<usize>,
    /// 1-based call that fails with a rejected token.
    auth_on: Option<usize>,
}

#[async_trait]
impl PinPublisher for FakePublisher {
    async fn publish(
        &self,
        board_id: &str,
        pin: &GeneratedPin,
        link: Option<&str>,
    ) -> Result<String, PlatformError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((board_id.to_string(), link.map(str::to_string)));
            calls.len()
        };
        if self.auth_on == Some(call) {
            return Err(PlatformError::AuthRequired("token expired".to_string()));
        }
        if self.fail_on == Some(call) {
            return Err(PlatformError::Api {
                status: 400,
                message: "Invalid image".to_string(),
            });
        }
        Ok(format!("ext-{}", pin.strategy.target_keyword))
    }
}

#[tokio::test]
async fn publish_uses_destination_then_feed_link() {
    let mut linked = completed("desk", "https://img.example/1.png");
    linked.source_link = Some("https://blog.example/desk".to_string());
    let bare = completed("lamp", "https://img.example/2.png");
    let pending = GeneratedPin::pending(strategy("skipped"));

    let store = Store::new(MemoryBackend::new());
    let publisher = FakePublisher::default();
    let mut project = project_with(vec![linked, bare, pending], None);
    let mut statuses = Vec::new();

    let outcomes = publish_project(&publisher, &store, &mut project, "board-1", |_, s| {
        statuses.push(s);
    })
    .await
    .unwrap();

    assert_eq!(outcomes.len(), 2);
    let calls = publisher.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            ("board-1".to_string(), Some("https://blog.example/desk".to_string())),
            ("board-1".to_string(), None),
        ]
    );
    assert_eq!(
        statuses,
        vec![
            PublishStatus::Uploading,
            PublishStatus::Success,
            PublishStatus::Uploading,
            PublishStatus::Success,
        ]
    );
    assert!(project.completed_pins().all(|p| p.posted));
    assert_eq!(project.pins[0].external_id.as_deref(), Some("ext-desk"));

    let stored = store.get_project(project.id).await.unwrap();
    assert!(stored.pins[1].posted);
}

#[tokio::test]
async fn project_destination_overrides_feed_link() {
    let mut linked = completed("desk", "https://img.example/1.png");
    linked.source_link = Some("https://blog.example/desk".to_string());
    let publisher = FakePublisher::default();
    let mut project = project_with(vec![linked], Some("https://shop.example"));

    publish_project(
        &publisher,
        &Store::new(MemoryBackend::new()),
        &mut project,
        "b",
        |_, _| {},
    )
    .await
    .unwrap();

    let calls = publisher.calls.lock().unwrap();
    assert_eq!(calls[0].1.as_deref(), Some("https://shop.example"));
}

#[tokio::test]
async fn failed_pin_is_recorded_and_loop_continues() {
    let publisher = FakePublisher {
        fail_on: Some(1),
        ..FakePublisher::default()
    };
    let mut project = project_with(
        vec![
            completed("desk", "https://img.example/1.png"),
            completed("lamp", "https://img.example/2.png"),
        ],
        None,
    );

    let outcomes = publish_project(
        &publisher,
        &Store::new(MemoryBackend::new()),
        &mut project,
        "b",
        |_, _| {},
    )
    .await
    .unwrap();

    assert_eq!(outcomes[0].status, PublishStatus::Failed);
    assert!(outcomes[0].error.as_deref().unwrap().contains("Invalid image"));
    assert_eq!(outcomes[1].status, PublishStatus::Success);
    assert!(!project.pins[0].posted);
    assert!(project.pins[0].last_error.is_some());
    assert!(project.pins[1].posted);
}

#[tokio::test]
async fn rejected_token_stops_publishing_and_persists() {
    let publisher = FakePublisher {
        auth_on: Some(1),
        ..FakePublisher::default()
    };
    let store = Store::new(MemoryBackend::new());
    let mut project = project_with(
        vec![
            completed("desk", "https://img.example/1.png"),
            completed("lamp", "https://img.example/2.png"),
        ],
        None,
    );

    let (first, second) = (project.pins[0].id(), project.pins[1].id());
    let mut statuses = Vec::new();
    let result = publish_project(&publisher, &store, &mut project, "b", |id, status| {
        statuses.push((id, status));
    })
    .await;

    assert!(matches!(result, Err(PipelineError::AuthRequired(_))));
    assert_eq!(publisher.calls.lock().unwrap().len(), 1);
    assert_eq!(
        statuses,
        vec![
            (first, PublishStatus::Uploading),
            (first, PublishStatus::Failed),
            (second, PublishStatus::Failed),
        ]
    );
    let stored = store.get_project(project.id).await.unwrap();
    assert!(stored.pins[0].last_error.is_some());
    assert_eq!(
        stored.pins[1].last_error.as_deref(),
        Some("not attempted: authorization required")
    );
    assert!(!stored.pins[1].posted);
}

// ---------------------------------------------------------------------------
// ZIP export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zip_contains_png_and_svg_per_completed_pin() {
    let background = png_data_url();
    let broken = completed("broken", "data:image/png;base64,AAAA");
    let project = project_with(
        vec![
            completed("desk setup", &background),
            completed("desk setup", &background),
            broken.clone(),
            GeneratedPin::pending(strategy("pending")),
        ],
        None,
    );
    let loader = BackgroundLoader::new(Duration::from_secs(1), None).unwrap();

    let report = export_zip(&project, &loader, 2.5).await.unwrap();

    assert_eq!(report.written, vec!["desk_setup", "desk_setup_2"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].pin_id, broken.id());

    let mut archive = zip::ZipArchive::new(Cursor::new(report.bytes)).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "desk_setup.png",
            "desk_setup.svg",
            "desk_setup_2.png",
            "desk_setup_2.svg"
        ]
    );

    let mut png = Vec::new();
    archive
        .by_name("desk_setup.png")
        .unwrap()
        .read_to_end(&mut png)
        .unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (675, 1200));

    let mut svg = String::new();
    archive
        .by_name("desk_setup.svg")
        .unwrap()
        .read_to_string(&mut svg)
        .unwrap();
    assert!(svg.contains("<svg"));
}

#[tokio::test]
async fn missing_local_background_skips_the_pin() {
    let project = project_with(vec![completed("desk", "no/such/file.png")], None);
    let dir = tempfile::tempdir().unwrap();
    let loader = BackgroundLoader::new(Duration::from_secs(1), Some(dir.path().to_path_buf())).unwrap();

    let report = export_zip(&project, &loader, 1.0).await.unwrap();

    assert!(report.written.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].reason.contains("file.png"));
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

struct VideoAi {
    reject: bool,
}

#[async_trait]
impl GenerativeAi for VideoAi {
    fn has_credential(&self) -> bool {
        true
    }

    async fn analyze(&self, _input: &ProductInput) -> Result<NicheAnalysis, AiError> {
        Err(AiError::AnalysisFailed("unused".to_string()))
    }

    async fn generate_strategies(
        &self,
        _analysis: &NicheAnalysis,
        _count: usize,
        _humor: HumorLevel,
        _keywords: &[String],
        _imperfection: ImperfectionType,
    ) -> Result<Vec<PinStrategy>, AiError> {
        Err(AiError::StrategyFailed("unused".to_string()))
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _layout: LayoutType,
        _style: VisualStyle,
    ) -> Result<String, AiError> {
        Err(AiError::ImageUnavailable)
    }

    async fn generate_video(
        &self,
        _pin: &GeneratedPin,
        _style: VisualStyle,
    ) -> Result<Vec<u8>, AiError> {
        if self.reject {
            return Err(AiError::AuthRequired("permission denied".to_string()));
        }
        Ok(b"fake-mp4".to_vec())
    }
}

#[tokio::test]
async fn video_is_written_and_recorded_on_the_pin() {
    let dir = tempfile::tempdir().unwrap();
    let media = dir.path().join("media");
    let store = Store::new(MemoryBackend::new());
    let pin = completed("desk", "https://img.example/1.png");
    let pin_id = pin.id();
    let mut project = project_with(vec![pin], None);

    let path = generate_pin_video(
        &VideoAi { reject: false },
        &store,
        &mut project,
        pin_id,
        VisualStyle::Modern,
        &media,
    )
    .await
    .unwrap();

    assert_eq!(path, video_path(&media, pin_id));
    assert_eq!(std::fs::read(&path).unwrap(), b"fake-mp4");
    let stored = store.get_project(project.id).await.unwrap();
    assert_eq!(
        stored.pins[0].video_url.as_deref(),
        Some(path.display().to_string().as_str())
    );
}

#[tokio::test]
async fn video_requires_a_completed_pin() {
    let dir = tempfile::tempdir().unwrap();
    let pin = GeneratedPin::pending(strategy("desk"));
    let pin_id = pin.id();
    let mut project = project_with(vec![pin], None);

    let result = generate_pin_video(
        &VideoAi { reject: false },
        &Store::new(MemoryBackend::new()),
        &mut project,
        pin_id,
        VisualStyle::Modern,
        dir.path(),
    )
    .await;

    assert!(matches!(result, Err(PipelineError::NotFound(_))));
}

#[tokio::test]
async fn rejected_video_credential_is_auth_required() {
    let dir = tempfile::tempdir().unwrap();
    let pin = completed("desk", "https://img.example/1.png");
    let pin_id = pin.id();
    let mut project = project_with(vec![pin], None);

    let result = generate_pin_video(
        &VideoAi { reject: true },
        &Store::new(MemoryBackend::new()),
        &mut project,
        pin_id,
        VisualStyle::Modern,
        dir.path(),
    )
    .await;

    assert!(matches!(result, Err(PipelineError::AuthRequired(_))));
    assert!(!video_path(dir.path(), pin_id).exists());
}
