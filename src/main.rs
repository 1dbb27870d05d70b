use anyhow::Context;
use clap::Parser;
use entregador::config::{AppConfig, Cli, Command, RegisterArgs};
use entregador::http::{self, AppState};
use entregador::utils::{logger, validation::Validate};
use entregador::{build_registration, DeliveryRequest, RequestContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    logger::init_logger(
        cli.verbose,
        config.logging.level.as_deref(),
        config.logging.format,
    );
    tracing::info!("Starting entregador");
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match cli.command {
        Command::Serve { bind } => serve(config, bind).await,
        Command::Register(args) => register(config, args).await,
    }
}

async fn serve(config: AppConfig, bind: Option<String>) -> anyhow::Result<()> {
    let registration = build_registration(&config).context("failed to build registration")?;
    let bind_address = bind.unwrap_or_else(|| config.server.bind_address.clone());
    let state = AppState::new(registration, &config);

    http::serve(state, &bind_address)
        .await
        .with_context(|| format!("HTTP server on {} failed", bind_address))
}

async fn register(config: AppConfig, args: RegisterArgs) -> anyhow::Result<()> {
    let request = DeliveryRequest::from(args);
    if let Err(e) = request.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let registration = build_registration(&config).context("failed to build registration")?;
    let mut ctx = RequestContext::new();
    if let Some(timeout) = config.request_timeout() {
        ctx = ctx.with_timeout(timeout);
    }

    let delivery = request.into_delivery(&config.registration.default_status);
    match registration.execute_with_report(&ctx, delivery).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report.delivery)?);
            if report.notified() {
                println!("✅ Resident notified");
            } else {
                println!("⚠️  Delivery registered, resident not notified");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Registration failed: {} (Category: {:?})",
                e,
                e.category()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }
}
