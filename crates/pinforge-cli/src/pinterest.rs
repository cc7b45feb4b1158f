//! Feed, Pinterest account and publishing commands.

use std::time::Duration;

use anyhow::Context;
use pinforge_core::AppConfig;
use pinforge_pipeline::publish_project;
use pinforge_platform::{fetch_feed, FallbackTransport, OAuthConfig, PinterestAuth, PinterestClient};
use pinforge_store::Store;
use uuid::Uuid;

use crate::projects::load_project;

fn transport(config: &AppConfig) -> anyhow::Result<FallbackTransport> {
    FallbackTransport::new(
        Duration::from_secs(config.http_timeout_secs),
        Some(config.proxy_base.clone()),
    )
    .context("failed to build HTTP transport")
}

fn auth(config: &AppConfig, store: &Store) -> anyhow::Result<PinterestAuth> {
    Ok(PinterestAuth::new(
        transport(config)?,
        OAuthConfig::from_app_config(config),
        store.clone(),
    ))
}

async fn connected_client(config: &AppConfig, store: &Store) -> anyhow::Result<PinterestClient> {
    let token = store
        .get_token()
        .await?
        .ok_or_else(|| anyhow::anyhow!("not connected to Pinterest; run `pinforge auth url`"))?;
    Ok(PinterestClient::new(
        transport(config)?,
        &config.pinterest_api_base,
        token,
    ))
}

pub(crate) async fn run_feed(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let items = fetch_feed(&transport(config)?, url)
        .await
        .with_context(|| format!("failed to load feed {url}"))?;
    for (i, item) in items.iter().enumerate() {
        println!("{:>3}. {}", i + 1, item.title);
        if !item.link.is_empty() {
            println!("     {}", item.link);
        }
    }
    println!("{} items", items.len());
    Ok(())
}

pub(crate) async fn run_auth_url(config: &AppConfig, store: &Store) -> anyhow::Result<()> {
    let url = auth(config, store)?.authorization_url().await?;
    println!("open this URL to connect your account:\n{url}");
    println!("then run `pinforge auth callback --code <code> --state <state>`");
    Ok(())
}

pub(crate) async fn run_auth_callback(
    config: &AppConfig,
    store: &Store,
    code: &str,
    state: &str,
) -> anyhow::Result<()> {
    auth(config, store)?
        .complete(code, state)
        .await
        .context("failed to complete Pinterest authorization")?;
    println!("connected to Pinterest");
    Ok(())
}

pub(crate) async fn run_logout(config: &AppConfig, store: &Store) -> anyhow::Result<()> {
    auth(config, store)?.logout().await?;
    println!("disconnected from Pinterest");
    Ok(())
}

pub(crate) async fn run_boards(config: &AppConfig, store: &Store) -> anyhow::Result<()> {
    let boards = connected_client(config, store).await?.list_boards().await?;
    if boards.is_empty() {
        println!("no boards found");
    }
    for board in boards {
        println!("{}  {}  {}", board.id, board.name, board.url);
    }
    Ok(())
}

pub(crate) async fn run_publish(
    config: &AppConfig,
    store: &Store,
    project_id: Uuid,
    board_id: &str,
) -> anyhow::Result<()> {
    let client = connected_client(config, store).await?;
    let mut project = load_project(store, project_id).await?;

    let outcomes = publish_project(&client, store, &mut project, board_id, |pin_id, status| {
        println!("{pin_id}: {status}");
    })
    .await
    .context("publishing stopped; reconnect with `pinforge auth url`")?;

    let failed: Vec<_> = outcomes.iter().filter(|o| o.error.is_some()).collect();
    for outcome in &failed {
        tracing::warn!(
            project = %project.id,
            pin = %outcome.pin_id,
            error = outcome.error.as_deref().unwrap_or_default(),
            "pin not published"
        );
    }
    println!(
        "published {} of {} pins",
        outcomes.len() - failed.len(),
        outcomes.len()
    );
    Ok(())
}
