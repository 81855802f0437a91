use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use terminal_size::{terminal_size, Width};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use fleetview::api::{HttpProvider, ProviderConfig};
use fleetview::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use fleetview::handlers;
use fleetview::models::{AppState, Instance, ScanPhase, StateFilter};
use fleetview::services::run_scan;
use fleetview::utils::group_digits;

// Embed the default stylesheet in the binary
const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);

    let client = reqwest::Client::builder()
        .user_agent(format!("Fleetview/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client");

    let provider = HttpProvider::new(
        client,
        ProviderConfig {
            api_base_url: config::get_api_base_url(),
            api_token: config::get_api_token(),
            default_region: config::get_default_region(),
        },
    );
    AppState::new(Arc::new(provider))
}

fn build_app(state: AppState) -> Router {
    // Always serve styles.css - use custom if provided, otherwise use embedded default
    let stylesheet_content = state
        .custom_css
        .clone()
        .unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());

    let static_routes: Router<AppState> = Router::new()
        .route(
            "/static/styles.css",
            get(move || {
                let css = stylesheet_content.clone();
                async move { ([(CONTENT_TYPE, "text/css")], css) }
            }),
        )
        .layer(
            ServiceBuilder::new().layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=3600"),
            )),
        );

    Router::new()
        .route("/", get(handlers::dashboard_get))
        .route("/fetch", post(handlers::fetch_post))
        .merge(static_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match std::fs::read_to_string(&path) {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                eprintln!(
                    "{} {}: {}",
                    yansi::Paint::red("Failed to read custom stylesheet at"),
                    path,
                    e
                );
                process::exit(1);
            }
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::new("Invalid host/port format").red(), e);
            process::exit(1);
        }
    };
    let app = build_app(state.clone());
    tracing::info!(%addr, "Starting Fleetview server");
    println!(
        "{} {}",
        yansi::Paint::new("Web server running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new(
                    "Please stop any process using this port, or start the server with a different --port value."
                )
                .yellow()
            );
            process::exit(1);
        }
    }
}

fn print_instances_table(instances: &[&Instance]) {
    if instances.is_empty() {
        println!("(no instances)");
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w - 4);
    }

    table.set_header(vec![
        "Instance ID",
        "Type",
        "Launch Time",
        "Owner",
        "Region",
        "State",
        "Network In (Bytes)",
        "Network Out (Bytes)",
    ]);
    for i in instances {
        table.add_row(vec![
            i.id.clone(),
            i.instance_type.clone(),
            i.launch_time_display.clone(),
            i.owner.clone(),
            i.region.clone(),
            i.state.label().to_string(),
            group_digits(i.network_in_bytes),
            group_digits(i.network_out_bytes),
        ]);
    }

    println!("\n{table}\n");
}

async fn run_scan_command(state: AppState, filter: StateFilter) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").expect("spinner template"));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let mut progress = |phase: &ScanPhase| {
        spinner.set_message(phase.status_message());
    };
    match run_scan(state.provider.as_ref(), &mut progress).await {
        Ok(instances) => {
            spinner.finish_with_message(ScanPhase::Complete.status_message());
            let visible = filter.apply(&instances);
            print_instances_table(&visible);
            println!(
                "{}",
                yansi::Paint::new(format!(
                    "Showing {} of {} instances",
                    visible.len(),
                    instances.len()
                ))
                .dim()
            );
        }
        Err(e) => {
            spinner.finish_with_message(ScanPhase::Failed.status_message());
            eprintln!("{}: {}", yansi::Paint::new("Scan failed").red(), e);
            process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(
    name = "fleetview",
    author,
    version,
    about = "Cross-region compute fleet dashboard",
    long_about = r#"Fleetview — inventory every region of a provider account in one table.

A scan walks each region in enumeration order, lists its compute
instances and sums their inbound/outbound network usage, then shows the
result as a filterable table. Use the `--env-file` option or environment
variables to provide API credentials.

Examples:
  1) Serve the dashboard:
      fleetview serve --host 127.0.0.1 --port 8080
  2) One-shot scan in the terminal:
      fleetview scan --state running
"#,
    after_help = "Use `fleetview <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Scan every region once and print the fleet as a table
    #[command(
        about = "Scan all regions and print the fleet as a table",
        long_about = "Walk every region in enumeration order, collect compute instances and their network usage totals, and print the result. The scan is all-or-nothing: a failure in any region discards the whole run."
    )]
    Scan {
        /// Only show instances in this state (running, stopped, terminated, pending, shutting-down, stopping)
        #[arg(long)]
        state: Option<String>,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Validate configuration (env vars / API credentials)
    #[command(
        about = "Validate configuration and ensure API connectivity.",
        long_about = "Validate environment variables required for Fleetview, and validate the configured API token by attempting to enumerate regions."
    )]
    CheckConfig { env_file: Option<String> },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // CLI parsing
    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        fleetview::api::set_silent(true);
    }

    // Dispatch CLI commands. If no command provided, serve the web app by default
    if cli.command.is_none() {
        let state = build_state_from_env(None);
        start_server(state, DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    }
    match cli.command.unwrap() {
        Commands::Serve {
            host,
            port,
            env_file,
            stylesheet,
        } => {
            let state = build_state_from_env(env_file.as_deref());
            start_server(state, &host, port, stylesheet).await;
        }
        Commands::Scan { state, env_file } => {
            let app_state = build_state_from_env(env_file.as_deref());
            let filter = StateFilter::from_query(state.as_deref().unwrap_or("All"));
            run_scan_command(app_state, filter).await;
        }
        Commands::CheckConfig { env_file } => {
            let state = build_state_from_env(env_file.as_deref());
            let mut ok = true;
            if config::get_api_base_url().trim().is_empty() {
                eprintln!("{}", yansi::Paint::new("API_BASE_URL is not configured").red());
                ok = false;
            }
            if config::get_api_token().trim().is_empty() {
                eprintln!("{}", yansi::Paint::new("API_TOKEN is not configured").red());
                ok = false;
            }
            if !ok {
                process::exit(1);
            }
            match state.provider.list_regions().await {
                Ok(regions) => {
                    println!(
                        "{}",
                        yansi::Paint::new(format!(
                            "Configuration looks valid ({} regions returned)",
                            regions.len()
                        ))
                        .green()
                    );
                }
                Err(e) => {
                    eprintln!(
                        "{}: {}",
                        yansi::Paint::new("Configuration appears invalid").red(),
                        e
                    );
                    process::exit(1);
                }
            }
        }
    }
}
