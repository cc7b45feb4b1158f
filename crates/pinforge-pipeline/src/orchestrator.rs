//! Batch generation: analysis, work-item expansion and the per-item
//! strategy → pin → image loop.

use std::sync::Arc;

use pinforge_ai::{AiError, GenerativeAi};
use pinforge_core::{FeedItem, GeneratedPin, NicheAnalysis, ProductInput, Project, SourceType};
use pinforge_store::Store;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::PipelineError;
use crate::types::{BatchEvent, BatchRequest, CancelFlag, WorkItem};

/// Subject used for feed analysis when no feed item has a title.
const FEED_FALLBACK_SUBJECT: &str = "RSS Stream";

/// Build at most `input.pin_count` work items.
///
/// Feed runs use entries in feed order. Brand runs use the manual keywords
/// when any are given, otherwise the analysis keywords.
#[must_use]
pub fn expand_work_items(
    input: &ProductInput,
    analysis: &NicheAnalysis,
    feed_items: &[FeedItem],
) -> Vec<WorkItem> {
    let limit = input.pin_count as usize;
    match input.source_type {
        SourceType::Rss => feed_items
            .iter()
            .take(limit)
            .map(|item| WorkItem {
                keyword: item.title.clone(),
                link: Some(item.link.clone()).filter(|l| !l.trim().is_empty()),
            })
            .collect(),
        SourceType::Brand => {
            let manual = input.manual_keyword_list();
            let keywords = if manual.is_empty() {
                analysis.keywords.clone()
            } else {
                manual
            };
            keywords
                .into_iter()
                .take(limit)
                .map(|keyword| WorkItem {
                    keyword,
                    link: None,
                })
                .collect()
        }
    }
}

/// Input used for the analysis call. Feed runs analyze the first entry's title.
fn analysis_input(request: &BatchRequest) -> ProductInput {
    let mut input = request.input.clone();
    if input.source_type == SourceType::Rss {
        input.url_or_name = request
            .feed_items
            .first()
            .map(|i| i.title.clone())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FEED_FALLBACK_SUBJECT.to_string());
    }
    input
}

pub struct BatchOrchestrator {
    ai: Arc<dyn GenerativeAi>,
    store: Store,
}

impl BatchOrchestrator {
    #[must_use]
    pub fn new(ai: Arc<dyn GenerativeAi>, store: Store) -> Self {
        Self { ai, store }
    }

    /// Run one batch and return the resulting project.
    ///
    /// Items are processed strictly in order. Cancellation is checked before
    /// each item and ends the run early without an error. Per-item strategy
    /// and image failures are logged and skipped; a rejected credential aborts
    /// the whole run after emitting [`BatchEvent::AuthRequired`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ValidationFailed`] for bad input,
    /// [`PipelineError::AuthRequired`] when the AI credential is missing or
    /// rejected, or [`PipelineError::AnalysisFailed`] when no analysis could be
    /// produced.
    pub async fn run(
        &self,
        request: BatchRequest,
        existing: Option<Project>,
        cancel: &CancelFlag,
        events: &UnboundedSender<BatchEvent>,
    ) -> Result<Project, PipelineError> {
        request.input.validate_for_batch(request.feed_items.len())?;

        if !self.ai.has_credential() {
            return Err(auth_abort(events, "no AI credential configured".to_string()));
        }

        let existing = existing.filter(|_| request.append);
        let reusable = existing.as_ref().and_then(|p| p.analysis.clone());
        let analysis = match reusable {
            Some(analysis) => {
                tracing::debug!("reusing stored niche analysis for append run");
                analysis
            }
            None => {
                emit(events, BatchEvent::Status("Analyzing niche...".to_string()));
                match self.ai.analyze(&analysis_input(&request)).await {
                    Ok(analysis) => analysis,
                    Err(e) if e.is_auth() => return Err(auth_abort(events, e.to_string())),
                    Err(e) => {
                        tracing::error!(error = %e, "niche analysis failed");
                        return Err(PipelineError::AnalysisFailed(e.to_string()));
                    }
                }
            }
        };

        let mut project = existing.unwrap_or_else(|| Project::new(request.input.clone()));
        project.analysis = Some(analysis.clone());

        let items = expand_work_items(&request.input, &analysis, &request.feed_items);
        tracing::info!(
            project = %project.id,
            items = items.len(),
            append = request.append,
            "batch started"
        );

        let total = items.len();
        for (index, item) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(project = %project.id, processed = index, "batch cancelled");
                emit(events, BatchEvent::Status("Stopped".to_string()));
                break;
            }

            emit(
                events,
                BatchEvent::Status(format!(
                    "Generating {} vibes: {}/{total}",
                    request.input.humor_level,
                    index + 1
                )),
            );

            if let Err(ItemFailure::Auth(message)) = self
                .process_item(&request, &analysis, item, &mut project, events)
                .await
            {
                return Err(auth_abort(events, message));
            }
        }

        tracing::info!(
            project = %project.id,
            pins = project.pins.len(),
            completed = project.completed_pins().count(),
            "batch finished"
        );
        Ok(project)
    }

    async fn process_item(
        &self,
        request: &BatchRequest,
        analysis: &NicheAnalysis,
        item: &WorkItem,
        project: &mut Project,
        events: &UnboundedSender<BatchEvent>,
    ) -> Result<(), ItemFailure> {
        let input = &request.input;
        let strategies = self
            .ai
            .generate_strategies(
                analysis,
                1,
                input.humor_level,
                std::slice::from_ref(&item.keyword),
                input.imperfection_type,
            )
            .await
            .map_err(|e| skip_or_abort(e, &item.keyword, "strategy generation failed"))?;

        let Some(mut strategy) = strategies.into_iter().next() else {
            tracing::warn!(keyword = %item.keyword, "no strategy returned; skipping");
            return Err(ItemFailure::Skipped);
        };

        tracing::debug!(
            keyword = %item.keyword,
            suggested = strategy.imperfection_level,
            "overriding suggested imperfection level"
        );
        strategy.imperfection_level = request.intensity.level();
        strategy.imperfection_type = input.imperfection_type;

        let mut pin = GeneratedPin::pending(strategy);
        pin.source_link.clone_from(&item.link);
        let pin_id = pin.id();
        if !project.push_pin(pin.clone()) {
            tracing::warn!(pin = %pin_id, "duplicate pin id; skipping");
            return Err(ItemFailure::Skipped);
        }
        emit(events, BatchEvent::PinAdded(pin.clone()));

        emit(
            events,
            BatchEvent::Status(format!("Rendering hero for \"{}\"", preview(&item.keyword))),
        );
        let image = self
            .ai
            .generate_image(&pin.strategy.image_prompt, pin.strategy.layout, input.visual_style)
            .await;

        match image {
            Ok(url) => {
                project.update_pin(pin_id, |p| p.complete(url));
            }
            Err(e) if e.is_auth() => return Err(ItemFailure::Auth(e.to_string())),
            Err(e) => {
                tracing::warn!(pin = %pin_id, keyword = %item.keyword, error = %e, "image generation failed");
                project.update_pin(pin_id, GeneratedPin::fail);
            }
        }

        if let Err(e) = self.store.save_project(project).await {
            tracing::error!(project = %project.id, error = %e, "failed to persist project");
        }
        if let Some(updated) = project.pin(pin_id) {
            emit(events, BatchEvent::PinUpdated(updated.clone()));
        }
        Ok(())
    }
}

enum ItemFailure {
    Auth(String),
    Skipped,
}

fn skip_or_abort(e: AiError, keyword: &str, context: &'static str) -> ItemFailure {
    if e.is_auth() {
        return ItemFailure::Auth(e.to_string());
    }
    tracing::warn!(keyword, error = %e, "{context}; skipping");
    ItemFailure::Skipped
}

fn auth_abort(events: &UnboundedSender<BatchEvent>, message: String) -> PipelineError {
    tracing::warn!(reason = %message, "batch aborted: authorization required");
    emit(events, BatchEvent::AuthRequired);
    PipelineError::AuthRequired(message)
}

fn emit(events: &UnboundedSender<BatchEvent>, event: BatchEvent) {
    // A dropped receiver only means nobody is watching progress.
    let _ = events.send(event);
}

/// First 15 characters of `keyword`, with an ellipsis when truncated.
fn preview(keyword: &str) -> String {
    let mut out: String = keyword.chars().take(15).collect();
    if keyword.chars().count() > 15 {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
