use anyhow::Context;
use ares_research::{
    api::routes::create_router,
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    utils::config::{ConfigError, ResearchConfig},
    AppState, ResearchCoordinator,
};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    // Init never reads a configuration file
    if let Commands::Init { path, force } = &cli.command {
        init_tracing(cli.verbose, cli.log_json, "warn");
        return match init::run(
            InitConfig {
                path: path.clone(),
                force: *force,
            },
            &output,
        ) {
            InitResult::Success | InitResult::AlreadyExists => Ok(()),
            InitResult::Error(e) => Err(anyhow::anyhow!("init failed: {}", e)),
        };
    }

    let loaded = ResearchConfig::load(&cli.config);
    let log_level = match &loaded {
        Ok(config) => config.server.log_level.clone(),
        Err(_) => "info".to_string(),
    };
    init_tracing(cli.verbose, cli.log_json, &log_level);

    let config = resolve_config(loaded, &cli.config)?;

    match cli.command {
        Commands::Research { query, json } => {
            let coordinator = ResearchCoordinator::from_config(&config)?;
            let bundle = coordinator.research(&query).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            } else {
                output.bundle(&bundle);
            }
        }
        Commands::Plan { query } => {
            let coordinator = ResearchCoordinator::from_config(&config)?;
            let (plan, origin) = coordinator.plan(&query).await?.into_parts();

            output.plan(&plan);
            output.origin("Plan", &origin);
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            serve(config, &host, port).await?;
        }
        Commands::Config => {
            output.header(&format!("Configuration ({})", cli.config.display()));
            println!("\n{}", config.to_toml_string()?);
            output.kv("LLM endpoint", config.llm.api_base());
            output.kv("LLM model", config.llm.model());
            match (config.llm.api_key_env(), config.llm.api_key()) {
                (None, _) => output.info("This provider needs no API key"),
                (Some(var), Some(_)) => output.success(&format!("{} is set", var)),
                (Some(var), None) => output.warning(&format!(
                    "{} is not set; heuristic fallbacks will be used",
                    var
                )),
            }
        }
        // Handled before configuration loading
        Commands::Init { .. } => {}
    }

    Ok(())
}

/// A missing file means defaults; any other problem is fatal
fn resolve_config(
    loaded: Result<ResearchConfig, ConfigError>,
    path: &Path,
) -> anyhow::Result<ResearchConfig> {
    match loaded {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            tracing::warn!(
                "{} not found, using default configuration (run `ares-research init` to create one)",
                path.display()
            );
            Ok(ResearchConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", path.display())),
    }
}

fn init_tracing(verbose: bool, json: bool, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { default_level };
        EnvFilter::new(format!(
            "ares_research={level},tower_http={level},{}",
            if verbose { "info" } else { "warn" }
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn serve(config: ResearchConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let coordinator = ResearchCoordinator::from_config(&config)?;
    let state = AppState::new(config, coordinator);
    let app = create_router().with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("ares-research listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
