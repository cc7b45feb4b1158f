//! Sequential publishing of completed pins to a board.

use pinforge_core::Project;
use pinforge_platform::PinPublisher;
use pinforge_store::Store;
use uuid::Uuid;

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Uploading,
    Success,
    Failed,
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishStatus::Uploading => write!(f, "uploading"),
            PublishStatus::Success => write!(f, "success"),
            PublishStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub pin_id: Uuid,
    pub status: PublishStatus,
    pub external_id: Option<String>,
    pub error: Option<String>,
}

const NOT_ATTEMPTED: &str = "not attempted: authorization required";

/// Publish every completed pin in `project` to `board_id`, one at a time.
///
/// Each pin's link is the project destination URL, falling back to the feed
/// entry the pin came from. A failed pin is recorded and the loop moves on;
/// a rejected token stops the loop, and every pin not yet attempted is
/// reported as [`PublishStatus::Failed`] and marked with an error. The project
/// is persisted before returning either way.
///
/// # Errors
///
/// Returns [`PipelineError::AuthRequired`] when the platform rejects the token.
pub async fn publish_project<F>(
    publisher: &dyn PinPublisher,
    store: &Store,
    project: &mut Project,
    board_id: &str,
    mut on_status: F,
) -> Result<Vec<PublishOutcome>, PipelineError>
where
    F: FnMut(Uuid, PublishStatus),
{
    let destination = project.input.destination().map(str::to_string);
    let targets: Vec<Uuid> = project.completed_pins().map(|p| p.id()).collect();
    let mut outcomes = Vec::with_capacity(targets.len());
    let mut auth_failure = None;

    let mut pending = targets.into_iter();
    while let Some(pin_id) = pending.next() {
        let Some(pin) = project.pin(pin_id).cloned() else {
            continue;
        };
        on_status(pin_id, PublishStatus::Uploading);

        let link = destination.as_deref().or(pin.source_link.as_deref());
        let result = publisher.publish(board_id, &pin, link).await;

        let outcome = match result {
            Ok(external_id) => {
                project.update_pin(pin_id, |p| {
                    p.posted = true;
                    p.external_id = Some(external_id.clone());
                    p.last_error = None;
                });
                PublishOutcome {
                    pin_id,
                    status: PublishStatus::Success,
                    external_id: Some(external_id),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(pin = %pin_id, board_id, error = %e, "publish failed");
                let message = e.to_string();
                project.update_pin(pin_id, |p| p.last_error = Some(message.clone()));
                if e.is_auth() {
                    auth_failure = Some(message.clone());
                }
                PublishOutcome {
                    pin_id,
                    status: PublishStatus::Failed,
                    external_id: None,
                    error: Some(message),
                }
            }
        };
        on_status(pin_id, outcome.status);
        outcomes.push(outcome);

        if auth_failure.is_some() {
            break;
        }
    }

    if auth_failure.is_some() {
        for pin_id in pending {
            project.update_pin(pin_id, |p| p.last_error = Some(NOT_ATTEMPTED.to_string()));
            on_status(pin_id, PublishStatus::Failed);
        }
    }

    if let Err(e) = store.save_project(project).await {
        tracing::error!(project = %project.id, error = %e, "failed to persist publish results");
    }

    let published = outcomes
        .iter()
        .filter(|o| o.status == PublishStatus::Success)
        .count();
    tracing::info!(project = %project.id, board_id, published, attempted = outcomes.len(), "publish finished");

    match auth_failure {
        Some(message) => Err(PipelineError::AuthRequired(message)),
        None => Ok(outcomes),
    }
}
