//! Project inspection, rendering, export and video commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use pinforge_ai::{GeminiClient, GeminiConfig};
use pinforge_core::{AppConfig, GeneratedPin, Project};
use pinforge_pipeline::{
    csv_file_name, export_csv, export_zip, generate_pin_video, zip_file_name, BackgroundLoader,
};
use pinforge_store::Store;
use uuid::Uuid;

pub(crate) async fn load_project(store: &Store, id: Uuid) -> anyhow::Result<Project> {
    store
        .get_project(id)
        .await
        .ok_or_else(|| anyhow::anyhow!("project {id} not found"))
}

fn find_pin(project: &Project, pin_id: Uuid) -> anyhow::Result<&GeneratedPin> {
    project
        .pin(pin_id)
        .ok_or_else(|| anyhow::anyhow!("pin {pin_id} not found in project {}", project.id))
}

async fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

pub(crate) async fn run_list(store: &Store) {
    let projects = store.list_projects().await;
    if projects.is_empty() {
        println!("no projects yet");
        return;
    }
    for project in projects {
        println!(
            "{}  {}  {:<32} {}/{} ready",
            project.id,
            project.created_at.format("%Y-%m-%d %H:%M"),
            project.name,
            project.completed_pins().count(),
            project.pins.len()
        );
    }
}

pub(crate) async fn run_show(store: &Store, id: Uuid) -> anyhow::Result<()> {
    let project = load_project(store, id).await?;
    println!("{} ({})", project.name, project.id);
    if let Some(analysis) = &project.analysis {
        println!("niche: {}", analysis.niche);
    }
    for pin in &project.pins {
        let posted = if pin.posted { " posted" } else { "" };
        println!(
            "{}  {:?}{posted}  {} | {}",
            pin.id(),
            pin.status,
            pin.strategy.target_keyword,
            pin.strategy.headline
        );
        if let Some(error) = &pin.last_error {
            println!("    last error: {error}");
        }
    }
    Ok(())
}

pub(crate) async fn run_delete(store: &Store, id: Uuid) -> anyhow::Result<()> {
    if store.delete_project(id).await? {
        println!("deleted project {id}");
    } else {
        println!("project {id} not found");
    }
    Ok(())
}

pub(crate) async fn run_render(
    store: &Store,
    project_id: Uuid,
    pin_id: Uuid,
    out: Option<PathBuf>,
    scale: f32,
    controls: bool,
) -> anyhow::Result<()> {
    let project = load_project(store, project_id).await?;
    let pin = find_pin(&project, pin_id)?;
    let svg = pinforge_render::render(pin, scale, controls).to_svg();
    match out {
        Some(path) => {
            write_output(&path, svg.as_bytes()).await?;
            println!("wrote {}", path.display());
        }
        None => println!("{svg}"),
    }
    Ok(())
}

pub(crate) async fn run_export_csv(
    config: &AppConfig,
    store: &Store,
    project_id: Uuid,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let project = load_project(store, project_id).await?;
    let csv = export_csv(&project, &config.default_destination_url)?;
    let path = out.unwrap_or_else(|| PathBuf::from(csv_file_name(&project)));
    write_output(&path, csv.as_bytes()).await?;
    tracing::info!(project = %project.id, path = %path.display(), "csv export written");
    println!("wrote {} pins to {}", project.pins.len(), path.display());
    Ok(())
}

pub(crate) async fn run_export_zip(
    config: &AppConfig,
    store: &Store,
    project_id: Uuid,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let project = load_project(store, project_id).await?;
    let loader = BackgroundLoader::new(
        Duration::from_secs(config.http_timeout_secs),
        Some(config.data_dir.clone()),
    )?;
    let report = export_zip(&project, &loader, config.export_pixel_ratio).await?;

    let path = out.unwrap_or_else(|| PathBuf::from(zip_file_name(&project)));
    write_output(&path, &report.bytes).await?;
    println!("wrote {} cards to {}", report.written.len(), path.display());
    for skipped in &report.skipped {
        tracing::warn!(
            pin = %skipped.pin_id,
            keyword = %skipped.keyword,
            reason = %skipped.reason,
            "card left out of archive"
        );
    }
    Ok(())
}

pub(crate) async fn run_video(
    config: &AppConfig,
    store: &Store,
    project_id: Uuid,
    pin_id: Uuid,
) -> anyhow::Result<()> {
    let mut project = load_project(store, project_id).await?;
    let style = project.input.visual_style;
    let ai = GeminiClient::new(GeminiConfig::from_app_config(config))?;

    println!("generating video; this can take a few minutes...");
    let path = generate_pin_video(&ai, store, &mut project, pin_id, style, &config.media_dir())
        .await?;
    println!("saved {}", path.display());
    Ok(())
}
