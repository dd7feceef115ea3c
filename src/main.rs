use anyhow::{Context, Result};
use arxiv_search_client::backend::BackendStrategy;
use arxiv_search_client::config::{find_config_file, get_config, load_config, Config};
use arxiv_search_client::controller::{SearchController, Submission};
use arxiv_search_client::models::SearchOutcome;
use arxiv_search_client::query::current_filter_options;
use arxiv_search_client::render::{DelimiterTypesetter, MemoryView, ResultsView};
use arxiv_search_client::ui::{self, TerminalView};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv Search - find papers by abstract, description or arXiv ID
#[derive(Parser, Debug)]
#[command(name = "arxiv-search")]
#[command(version = arxiv_search_client::VERSION)]
#[command(about = "Semantic search over arXiv papers", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Search service base URL (overrides configuration)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Backend endpoint shape (overrides configuration)
    #[arg(long, global = true, value_enum)]
    strategy: Option<Strategy>,

    /// Request timeout in seconds (overrides configuration)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Terminal view if stdout is a TTY, JSON otherwise
    Auto,
    /// Colored cards with a loading spinner
    Terminal,
    /// The rendered results region, math typeset
    Html,
    /// The final outcome as JSON
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    Unified,
    Reranked,
    ById,
}

impl From<Strategy> for BackendStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Unified => BackendStrategy::Unified,
            Strategy::Reranked => BackendStrategy::Reranked,
            Strategy::ById => BackendStrategy::ById,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search by abstract, paper description or arXiv ID
    #[command(alias = "s")]
    Search {
        /// Search text (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Filter expression (see `filters`)
        #[arg(long, short)]
        filter: Option<String>,

        /// Maximum number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Run the search encoded in a shared link
    #[command(alias = "l")]
    Link {
        /// Link URL or query string, e.g. "?arxiv_id=2401.07215&filter=year%3D%3D2025"
        location: String,
    },

    /// Find papers similar to an arXiv ID
    Similar {
        /// arXiv identifier
        id: String,

        /// Filter expression (see `filters`)
        #[arg(long, short)]
        filter: Option<String>,

        /// Maximum number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// List the year filter options
    Filters,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the path of the configuration file in use
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("arxiv_search_client={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = match &config_path {
        Some(path) => {
            tracing::info!("Using config file: {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => get_config()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if let Some(strategy) = cli.strategy {
        config.backend.strategy = strategy.into();
    }
    if let Some(timeout) = cli.timeout {
        config.backend.timeout_secs = timeout;
    }

    if let Commands::Search { limit: Some(limit), .. } | Commands::Similar { limit: Some(limit), .. } =
        &cli.command
    {
        config.backend.search_limit = Some(*limit);
    }

    match &cli.command {
        Commands::Search { text, filter, .. } => {
            let text = text.join(" ");
            run_search(
                &cli,
                &config,
                SearchAction::Input {
                    text: &text,
                    filter: filter.as_deref(),
                },
            )
            .await
        }
        Commands::Link { location } => run_search(&cli, &config, SearchAction::Link(location)).await,
        Commands::Similar { id, filter, .. } => {
            run_search(
                &cli,
                &config,
                SearchAction::Similar {
                    id,
                    filter: filter.as_deref().unwrap_or_default(),
                },
            )
            .await
        }
        Commands::Filters => {
            for option in current_filter_options(&config.filters.recent_years) {
                if option.expression.is_empty() {
                    println!("{:<16} {}", option.label.bold(), "(no filter)".dimmed());
                } else {
                    println!("{:<16} {}", option.label.bold(), option.expression);
                }
            }
            Ok(())
        }
        Commands::Config { command } => {
            match command {
                ConfigCommands::Show => print!("{}", config.to_toml()?),
                ConfigCommands::Path => match &config_path {
                    Some(path) => println!("{}", path.display()),
                    None => println!("{}", "(defaults, no config file found)".dimmed()),
                },
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "arxiv-search",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

/// The entry point a search starts from
enum SearchAction<'a> {
    Input { text: &'a str, filter: Option<&'a str> },
    Link(&'a str),
    Similar { id: &'a str, filter: &'a str },
}

/// Build a controller over the selected output surface, run one search and
/// print the outcome
async fn run_search(cli: &Cli, config: &Config, action: SearchAction<'_>) -> Result<()> {
    let format = match cli.output {
        OutputFormat::Auto if ui::is_terminal() => OutputFormat::Terminal,
        OutputFormat::Auto => OutputFormat::Json,
        other => other,
    };

    let memory = Arc::new(MemoryView::new());
    let view: Arc<dyn ResultsView> = if format == OutputFormat::Terminal && !cli.quiet {
        Arc::new(TerminalView::new())
    } else {
        memory.clone()
    };

    let controller =
        SearchController::from_config(config, view, Arc::new(DelimiterTypesetter::new()))?;

    let submission = match action {
        SearchAction::Input { text, filter } => controller.submit_input(text, filter).await,
        SearchAction::Link(location) => controller.load_deep_link(location).await,
        SearchAction::Similar { id, filter } => controller.search_similar(id, filter).await,
    };
    if submission == Submission::Ignored {
        anyhow::bail!("Nothing to search for");
    }

    match format {
        OutputFormat::Html => println!("{}", memory.markup()),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&controller.outcome())?);
        }
        _ => {}
    }

    match controller.outcome() {
        Some(SearchOutcome::Failure(message)) => anyhow::bail!(message),
        _ => Ok(()),
    }
}
