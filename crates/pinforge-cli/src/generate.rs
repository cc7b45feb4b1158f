//! `pinforge generate`: one batch run with live progress output.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use pinforge_ai::{GeminiClient, GeminiConfig};
use pinforge_core::{AppConfig, ImperfectionIntensity, PinStatus, ProductInput, SourceType};
use pinforge_pipeline::{BatchEvent, BatchOrchestrator, BatchRequest, CancelFlag};
use pinforge_platform::{fetch_feed, FallbackTransport};
use pinforge_store::Store;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::GenerateArgs;

/// Assemble the batch input from CLI flags and the optional keyword file.
pub(crate) async fn build_input(args: &GenerateArgs) -> anyhow::Result<ProductInput> {
    let mut keywords = args.keywords.clone();
    if let Some(path) = &args.keywords_file {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read keywords file {}", path.display()))?;
        keywords.extend(contents.lines().map(str::to_string));
    }

    Ok(ProductInput {
        source_type: if args.rss_url.is_some() {
            SourceType::Rss
        } else {
            SourceType::Brand
        },
        url_or_name: args.name.clone().unwrap_or_default(),
        manual_keywords: keywords.join("\n"),
        pin_count: args.count,
        humor_level: args.humor,
        visual_style: args.style,
        imperfection_type: args.imperfection,
        destination_url: args.destination.clone(),
        rss_url: args.rss_url.clone(),
        ..ProductInput::default()
    })
}

fn print_event(event: &BatchEvent) {
    match event {
        BatchEvent::Status(message) => println!("{message}"),
        BatchEvent::PinAdded(pin) => println!("  + {}", pin.strategy.headline),
        BatchEvent::PinUpdated(pin) => {
            let status = match pin.status {
                PinStatus::Completed => "ready",
                PinStatus::Failed => "image failed",
                PinStatus::Pending => "pending",
            };
            println!("  {} [{status}]", pin.strategy.target_keyword);
        }
        BatchEvent::AuthRequired => {
            tracing::error!("AI credential rejected; set GEMINI_API_KEY and retry");
        }
    }
}

async fn print_events(mut rx: UnboundedReceiver<BatchEvent>) {
    while let Some(event) = rx.recv().await {
        print_event(&event);
    }
}

/// Run a generation batch.
///
/// Ctrl-C stops the batch after the item in flight; pins finished so far are
/// kept in the saved project.
///
/// # Errors
///
/// Returns an error for invalid flags, an unreachable feed, an unknown
/// `--append` project, or a failed batch.
pub(crate) async fn run_generate(
    config: &AppConfig,
    store: &Store,
    args: GenerateArgs,
) -> anyhow::Result<()> {
    let input = build_input(&args).await?;
    let intensity = ImperfectionIntensity::new(args.intensity)?;
    let mut request = BatchRequest::new(input, intensity);

    if let Some(url) = &args.rss_url {
        let transport = FallbackTransport::new(
            Duration::from_secs(config.http_timeout_secs),
            Some(config.proxy_base.clone()),
        )?;
        request.feed_items = fetch_feed(&transport, url)
            .await
            .with_context(|| format!("failed to load feed {url}"))?;
        println!("loaded {} feed items", request.feed_items.len());
    }

    let existing = match args.append {
        Some(id) => {
            let project = store
                .get_project(id)
                .await
                .ok_or_else(|| anyhow::anyhow!("project {id} not found"))?;
            request.append = true;
            Some(project)
        }
        None => None,
    };

    let ai = GeminiClient::new(GeminiConfig::from_app_config(config))?;
    let orchestrator = BatchOrchestrator::new(Arc::new(ai), store.clone());

    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; stopping after the current pin");
            on_interrupt.cancel();
        }
    });

    let (tx, rx) = unbounded_channel();
    let printer = tokio::spawn(print_events(rx));
    let result = orchestrator.run(request, existing, &cancel, &tx).await;
    drop(tx);
    printer.await.context("progress printer panicked")?;

    let project = result?;
    tracing::info!(
        project = %project.id,
        pins = project.pins.len(),
        completed = project.completed_pins().count(),
        "generation run saved"
    );
    println!(
        "project {} ({}): {} of {} pins ready",
        project.id,
        project.name,
        project.completed_pins().count(),
        project.pins.len()
    );
    Ok(())
}
