use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use solar_analysis::SolarAnalyzer;
use solarscope::api;
use solarscope::assets::AssetLoader;
use solarscope::models::AppConfig;
use solarscope::server;
use solarscope::services::write_artifacts;

#[derive(Parser)]
#[command(name = "solarscope")]
#[command(about = "Solarscope - rooftop photo analysis for solar panel siting")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Analyze one image and write the four result PNGs
    Analyze {
        /// PNG or JPEG file to analyze
        input: PathBuf,

        /// Directory for original.png, segmented.png, shadow.png and edges.png
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Number of color clusters
        #[arg(short, long)]
        k: Option<usize>,

        /// Gray levels at or below this are shadow
        #[arg(long)]
        shadow_threshold: Option<u8>,

        /// Lower edge hysteresis threshold
        #[arg(long)]
        edge_low: Option<u32>,

        /// Upper edge hysteresis threshold
        #[arg(long)]
        edge_high: Option<u32>,

        /// Gray levels at or above this are bright
        #[arg(long)]
        bright_low: Option<u8>,

        /// Seed for reproducible clustering
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Render the demonstration charts from example data
    Charts {
        /// Directory for the chart PNGs
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Seed for the random example data
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Solarscope API",
        description = "Rooftop photo analysis for solar panel siting",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_analyze, api::handle_artifact),
    components(schemas(api::AnalyzeResponse, api::AnalyzeImages)),
    tags(
        (name = "Analysis", description = "Image analysis"),
        (name = "Results", description = "Stored analysis artifacts")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Analyze {
            input,
            output_dir,
            k,
            shadow_threshold,
            edge_low,
            edge_high,
            bright_low,
            seed,
        }) => {
            let overrides = ParamOverrides {
                k,
                shadow_threshold,
                edge_low,
                edge_high,
                bright_low,
                seed,
            };
            run_analyze_command(&input, &output_dir, overrides)
        }
        Some(Commands::Charts { output_dir, seed }) => run_charts_command(&output_dir, seed),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot commands
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solarscope=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

struct ParamOverrides {
    k: Option<usize>,
    shadow_threshold: Option<u8>,
    edge_low: Option<u32>,
    edge_high: Option<u32>,
    bright_low: Option<u8>,
    seed: Option<u64>,
}

/// Analyze a file directly (no server needed)
fn run_analyze_command(
    input: &Path,
    output_dir: &Path,
    overrides: ParamOverrides,
) -> anyhow::Result<()> {
    init_cli_logging();

    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader);
    let defaults = config.analysis.params();

    let mut analyzer = SolarAnalyzer::from_params(defaults)
        .clusters(overrides.k.unwrap_or(defaults.k))
        .shadow_threshold(overrides.shadow_threshold.unwrap_or(defaults.shadow_threshold))
        .edge_thresholds(
            overrides.edge_low.unwrap_or(defaults.edge_low),
            overrides.edge_high.unwrap_or(defaults.edge_high),
        )
        .bright_threshold(overrides.bright_low.unwrap_or(defaults.bright_low));
    if let Some(seed) = overrides.seed.or(defaults.seed) {
        analyzer = analyzer.seed(seed);
    }

    let bytes = std::fs::read(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;
    let output = analyzer.analyze(&bytes)?;
    let written = write_artifacts(output_dir, &output)?;

    for path in &written {
        println!("Wrote {}", path.display());
    }
    println!();
    println!("Average brightness:    {:.2}", output.metrics.avg_brightness);
    println!(
        "Solar potential score: {:.2}",
        output.metrics.solar_potential_score
    );
    if let Some(message) = config
        .presentation
        .caution_for(output.metrics.solar_potential_score)
    {
        println!("\nCaution: {message}");
    }

    Ok(())
}

/// Render the demonstration charts
fn run_charts_command(output_dir: &Path, seed: Option<u64>) -> anyhow::Result<()> {
    init_cli_logging();

    let written = solarscope::rendering::render_example_charts(output_dir, seed)?;
    for path in &written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Show status information (no subcommand)
fn run_status_command() {
    use solarscope::assets::AssetCategory;

    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let templates_dir = std::env::var("TEMPLATES_DIR").ok();

    println!("Solarscope v{VERSION}");
    println!("Rooftop photo analysis for solar panel siting\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR     = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE   = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  TEMPLATES_DIR = {}",
        templates_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");
    let loader = AssetLoader::new(
        templates_dir.clone().map(PathBuf::from),
        config_file.clone().map(PathBuf::from),
    );

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:    {config_source}");

    let template_count = loader.list_templates().len();
    let embedded_count = AssetLoader::list_embedded(AssetCategory::Templates).len();
    match templates_dir {
        Some(ref dir) if loader.has_template_overrides() => {
            println!("  Templates: {dir} ({template_count} files, {embedded_count} embedded)")
        }
        _ => println!("  Templates: embedded ({embedded_count} files)"),
    }

    println!("\nCommands:");
    println!("  solarscope serve                       Start the HTTP server");
    println!("  solarscope analyze <INPUT> -o <DIR>    Analyze one image");
    println!("  solarscope charts -o <DIR>             Render demonstration charts");
    println!("  solarscope --help                      Show all options");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solarscope=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let asset_loader = Arc::new(AssetLoader::from_env());

    tracing::info!(
        templates = ?asset_loader
            .templates_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string()),
        config = ?asset_loader
            .config_file()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string()),
        "Asset sources configured"
    );

    match asset_loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                templates = report.templates_seeded.len(),
                config = report.config_seeded,
                "Seeded empty locations with embedded assets"
            );
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed assets");
        }
        _ => {}
    }

    let state = server::create_app_state(asset_loader)?;

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Solarscope server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
