use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["pinforge"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn generate_defaults() {
    let cli = Cli::try_parse_from(["pinforge", "generate", "--name", "Desk Lamp"]).unwrap();
    let Some(Commands::Generate(args)) = cli.command else {
        panic!("expected generate");
    };
    assert_eq!(args.name.as_deref(), Some("Desk Lamp"));
    assert_eq!(args.count, 5);
    assert_eq!(args.intensity, 3);
    assert_eq!(args.humor, HumorLevel::Unhinged);
    assert_eq!(args.style, VisualStyle::Modern);
    assert_eq!(args.imperfection, ImperfectionType::Organic);
    assert!(args.keywords.is_empty());
    assert!(args.append.is_none());
}

#[test]
fn generate_collects_repeated_keywords_and_choices() {
    let cli = Cli::try_parse_from([
        "pinforge",
        "generate",
        "--keyword",
        "cable chaos",
        "--keyword",
        "desk hacks",
        "--humor",
        "sarcastic",
        "--style",
        "neon-noir",
        "--imperfection",
        "hand-drawn",
        "--count",
        "2",
    ])
    .unwrap();
    let Some(Commands::Generate(args)) = cli.command else {
        panic!("expected generate");
    };
    assert_eq!(args.keywords, vec!["cable chaos", "desk hacks"]);
    assert_eq!(args.humor, HumorLevel::Sarcastic);
    assert_eq!(args.style, VisualStyle::NeonNoir);
    assert_eq!(args.imperfection, ImperfectionType::HandDrawn);
    assert_eq!(args.count, 2);
}

#[test]
fn generate_rejects_unknown_style() {
    let result = Cli::try_parse_from(["pinforge", "generate", "--style", "baroque"]);
    assert!(result.is_err());
}

#[test]
fn generate_rejects_name_with_rss_url() {
    let result = Cli::try_parse_from([
        "pinforge",
        "generate",
        "--name",
        "x",
        "--rss-url",
        "https://blog.example/feed",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_projects_show() {
    let id = Uuid::new_v4();
    let cli = Cli::try_parse_from(["pinforge", "projects", "show", &id.to_string()]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Projects {
            command: ProjectsCommands::Show { id: parsed }
        }) if parsed == id
    ));
}

#[test]
fn parses_export_zip_with_out() {
    let id = Uuid::new_v4();
    let cli = Cli::try_parse_from([
        "pinforge",
        "export",
        "zip",
        &id.to_string(),
        "--out",
        "cards.zip",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Export {
            command: ExportCommands::Zip { out: Some(ref p), .. }
        }) if p == &PathBuf::from("cards.zip")
    ));
}

#[test]
fn parses_auth_callback() {
    let cli = Cli::try_parse_from([
        "pinforge", "auth", "callback", "--code", "abc", "--state", "k3x9",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Auth {
            command: AuthCommands::Callback { ref code, ref state }
        }) if code == "abc" && state == "k3x9"
    ));
}

#[test]
fn publish_requires_board() {
    let id = Uuid::new_v4().to_string();
    assert!(Cli::try_parse_from(["pinforge", "publish", &id]).is_err());
    let cli = Cli::try_parse_from(["pinforge", "publish", &id, "--board", "b1"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Publish { ref board, .. }) if board == "b1"
    ));
}

#[test]
fn render_defaults_scale_to_one() {
    let (project, pin) = (Uuid::new_v4().to_string(), Uuid::new_v4().to_string());
    let cli = Cli::try_parse_from(["pinforge", "render", &project, &pin]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Render { scale, controls: false, out: None, .. }) if (scale - 1.0).abs() < f32::EPSILON
    ));
}

#[tokio::test]
async fn build_input_merges_keyword_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("keywords.txt");
    std::fs::write(&file, "from file\n\n").unwrap();

    let cli = Cli::try_parse_from([
        "pinforge",
        "generate",
        "--keyword",
        "from flag",
        "--keywords-file",
        file.to_str().unwrap(),
    ])
    .unwrap();
    let Some(Commands::Generate(args)) = cli.command else {
        panic!("expected generate");
    };

    let input = generate::build_input(&args).await.unwrap();
    assert_eq!(input.manual_keyword_list(), vec!["from flag", "from file"]);
    assert_eq!(input.source_type, pinforge_core::SourceType::Brand);
}
