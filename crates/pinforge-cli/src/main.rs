use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pinforge_core::{HumorLevel, ImperfectionType, VisualStyle};
use pinforge_store::{FileBackend, Store};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod generate;
mod pinterest;
mod projects;

#[derive(Debug, Parser)]
#[command(name = "pinforge")]
#[command(about = "Generate, render, export and publish marketing pins")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a generation batch for a brand or an RSS feed.
    Generate(GenerateArgs),
    /// Fetch an RSS feed and list its entries.
    Feed { url: String },
    /// Inspect or delete stored projects.
    Projects {
        #[command(subcommand)]
        command: ProjectsCommands,
    },
    /// Write the SVG of one pin card.
    Render {
        project: Uuid,
        pin: Uuid,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
        /// Dim the card as it looks with hover controls shown.
        #[arg(long)]
        controls: bool,
    },
    /// Export a project as a bulk-upload CSV or a ZIP of rendered cards.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Generate a short video for one completed pin.
    Video { project: Uuid, pin: Uuid },
    /// Connect or disconnect the Pinterest account.
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// List the connected account's boards.
    Boards,
    /// Publish every completed pin of a project to a board.
    Publish {
        project: Uuid,
        #[arg(long)]
        board: String,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Product name, brand or URL.
    #[arg(long)]
    name: Option<String>,
    /// Manual keyword; repeat for several. Takes precedence over analysis keywords.
    #[arg(long = "keyword")]
    keywords: Vec<String>,
    /// File with one keyword per line.
    #[arg(long)]
    keywords_file: Option<PathBuf>,
    /// Generate from this RSS feed instead of a brand.
    #[arg(long, conflicts_with = "name")]
    rss_url: Option<String>,
    #[arg(long, default_value_t = 5)]
    count: u32,
    #[arg(long, default_value = "unhinged", value_parser = parse_choice::<HumorLevel>)]
    humor: HumorLevel,
    #[arg(long, default_value = "modern", value_parser = parse_choice::<VisualStyle>)]
    style: VisualStyle,
    #[arg(long, default_value = "organic", value_parser = parse_choice::<ImperfectionType>)]
    imperfection: ImperfectionType,
    /// Imperfection intensity, 0-5.
    #[arg(long, default_value_t = 3)]
    intensity: u8,
    #[arg(long)]
    destination: Option<String>,
    /// Add the new pins to this existing project.
    #[arg(long)]
    append: Option<Uuid>,
}

#[derive(Debug, Subcommand)]
enum ProjectsCommands {
    List,
    Show { id: Uuid },
    Delete { id: Uuid },
}

#[derive(Debug, Subcommand)]
enum ExportCommands {
    Csv {
        project: Uuid,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Zip {
        project: Uuid,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum AuthCommands {
    /// Print the authorization URL to open in a browser.
    Url,
    /// Finish the OAuth flow with the code and state from the redirect.
    Callback {
        #[arg(long)]
        code: String,
        #[arg(long)]
        state: String,
    },
    Logout,
}

/// Parse a kebab-case choice using the type's serde names.
fn parse_choice<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown value '{raw}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pinforge_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let store = Store::new(FileBackend::new(config.data_dir.clone()));

    match cli.command {
        Some(Commands::Generate(args)) => generate::run_generate(&config, &store, args).await?,
        Some(Commands::Feed { url }) => pinterest::run_feed(&config, &url).await?,
        Some(Commands::Projects { command }) => match command {
            ProjectsCommands::List => projects::run_list(&store).await,
            ProjectsCommands::Show { id } => projects::run_show(&store, id).await?,
            ProjectsCommands::Delete { id } => projects::run_delete(&store, id).await?,
        },
        Some(Commands::Render {
            project,
            pin,
            out,
            scale,
            controls,
        }) => projects::run_render(&store, project, pin, out, scale, controls).await?,
        Some(Commands::Export { command }) => match command {
            ExportCommands::Csv { project, out } => {
                projects::run_export_csv(&config, &store, project, out).await?;
            }
            ExportCommands::Zip { project, out } => {
                projects::run_export_zip(&config, &store, project, out).await?;
            }
        },
        Some(Commands::Video { project, pin }) => {
            projects::run_video(&config, &store, project, pin).await?;
        }
        Some(Commands::Auth { command }) => match command {
            AuthCommands::Url => pinterest::run_auth_url(&config, &store).await?,
            AuthCommands::Callback { code, state } => {
                pinterest::run_auth_callback(&config, &store, &code, &state).await?;
            }
            AuthCommands::Logout => pinterest::run_logout(&config, &store).await?,
        },
        Some(Commands::Boards) => pinterest::run_boards(&config, &store).await?,
        Some(Commands::Publish { project, board }) => {
            pinterest::run_publish(&config, &store, project, &board).await?;
        }
        None => println!("pinforge: run with --help to see available commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
