use anyhow::Context;
use std::sync::Arc;
use todolist::{
    api::routes::create_app,
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    utils::logging::init_tracing,
    AppConfig, AppState, TokenIssuer,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Err(e) = run(cli, &output).await {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Init {
            path,
            force,
            host,
            port,
        }) => {
            let config = InitConfig {
                path,
                force,
                host,
                port,
            };
            match init::run(config, output) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => anyhow::bail!("init failed: {}", e),
            }
        }
        Some(Commands::Secret) => {
            println!("{}", todolist::auth::token::generate_secret());
            Ok(())
        }
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, output),
        None => serve(&cli.config, cli.verbose, output).await,
    }
}

fn show_config(path: &std::path::Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = AppConfig::parse(&content)?;

    output.header(&format!("Configuration: {}", path.display()));
    output.kv("bind", &config.bind_address());
    output.kv("log_level", &config.server.log_level);
    output.kv("token_secret_env", &config.auth.token_secret_env);
    output.kv(
        "token_lifetime_secs",
        &config.auth.token_lifetime_secs.to_string(),
    );
    output.kv("database.url", &config.database.url);
    output.kv(
        "password.min_length",
        &config.accounts.password.min_length.to_string(),
    );

    if validate {
        output.newline();
        config.validate()?;
        output.success("Configuration is valid");
    }

    Ok(())
}

async fn serve(path: &std::path::Path, verbose: bool, output: &Output) -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    if !path.exists() {
        output.warning(&format!("{} not found", path.display()));
        output.hint("Run 'todolist-server init' to create one");
        anyhow::bail!("configuration file {} not found", path.display());
    }

    let config = AppConfig::load(path)?;
    init_tracing(&config.server, verbose);

    output.banner();

    let signing_key = config.signing_key()?;
    let token_issuer = Arc::new(TokenIssuer::new(&signing_key, config.token_lifetime()?));
    drop(signing_key);

    let provider = config.database_provider()?;
    let store = provider
        .create_store(config.credentials()?)
        .await
        .with_context(|| format!("opening {} identity store", provider.describe()))?;
    tracing::info!(store = %provider.describe(), "identity store ready");

    let state = AppState::new(store, token_issuer);
    let app = create_app(state, config.server.body_limit_bytes);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!(%addr, "todolist-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
