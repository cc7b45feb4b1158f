use std::path::{Path, PathBuf};

use pinforge_ai::GenerativeAi;
use pinforge_core::{Project, VisualStyle};
use pinforge_store::Store;
use uuid::Uuid;

use crate::error::PipelineError;

/// Where the clip for `pin_id` lives under `media_dir`.
#[must_use]
pub fn video_path(media_dir: &Path, pin_id: Uuid) -> PathBuf {
    media_dir.join(format!("{pin_id}.mp4"))
}

/// Generate a short clip for one completed pin, write it to
/// `<media_dir>/<pin_id>.mp4` and record the path on the pin.
///
/// # Errors
///
/// Returns [`PipelineError::NotFound`] when the pin does not exist or has no
/// finished image, [`PipelineError::AuthRequired`] when the AI credential is
/// rejected, or [`PipelineError::Io`] when the clip cannot be written.
pub async fn generate_pin_video(
    ai: &dyn GenerativeAi,
    store: &Store,
    project: &mut Project,
    pin_id: Uuid,
    style: VisualStyle,
    media_dir: &Path,
) -> Result<PathBuf, PipelineError> {
    let pin = project
        .pin(pin_id)
        .filter(|p| p.is_completed())
        .cloned()
        .ok_or_else(|| PipelineError::NotFound(format!("completed pin {pin_id}")))?;

    tracing::info!(pin = %pin_id, keyword = %pin.strategy.target_keyword, "generating pin video");
    let bytes = ai.generate_video(&pin, style).await?;

    tokio::fs::create_dir_all(media_dir)
        .await
        .map_err(|e| PipelineError::Io {
            path: media_dir.display().to_string(),
            source: e,
        })?;
    let path = video_path(media_dir, pin_id);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| PipelineError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

    let reference = path.display().to_string();
    project.update_pin(pin_id, |p| p.video_url = Some(reference));
    store.save_project(project).await?;

    tracing::info!(pin = %pin_id, bytes = bytes.len(), path = %path.display(), "pin video saved");
    Ok(path)
}
