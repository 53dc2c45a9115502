pub mod api;
pub mod cli;
pub mod dashboard;
pub mod form;
pub mod models;
pub mod settings;
pub mod utils;
pub mod view;

use std::{
    io::{self, Read},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};

use api::HttpFeedbackApi;
use cli::{Cli, Command};
use dashboard::DashboardController;
use form::{FeedbackForm, FormError};
use settings::Settings;
use view::{render_form, TerminalSink};

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Loaded first so RUST_LOG from .env applies too.
    let dotenv = dotenvy::dotenv();

    utils::logging::init(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!("Failed to load .env: {err}");
        }
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut settings);

    // No backend, no network activity: fail before building a client.
    let base_url = settings.backend_url()?.to_string();
    let api = Arc::new(
        HttpFeedbackApi::new(&base_url, settings.request_timeout())
            .context("Failed to build HTTP client")?,
    );
    info!("Using backend {}", api.base_url());

    match cli.command {
        Command::Submit { rating, review } => submit(api, rating, review).await,
        Command::Dashboard { once, .. } => dashboard(api, &settings, once).await,
        Command::Ping => {
            let service = api
                .ping()
                .await
                .with_context(|| format!("Backend {base_url} is unreachable"))?;
            println!("{}", service.message);
            Ok(())
        }
    }
}

async fn submit(api: Arc<HttpFeedbackApi>, rating: u8, review: Option<String>) -> Result<()> {
    let review = match review.as_deref() {
        Some(text) if text != "-" => text.to_string(),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read review from stdin")?;
            text
        }
    };

    let form = FeedbackForm::new(api);
    form.select_rating(rating).await?;
    form.set_review(review).await;

    form.submit().await.map_err(submit_failure)?;
    print!("{}", render_form(&form.snapshot().await));
    Ok(())
}

/// The connection message is shown once, followed by the backend detail.
fn submit_failure(err: FormError) -> anyhow::Error {
    match err {
        FormError::Connection(source) => {
            anyhow::Error::new(source).context(form::CONNECTION_ERROR_MESSAGE)
        }
        other => other.into(),
    }
}

async fn dashboard(api: Arc<HttpFeedbackApi>, settings: &Settings, once: bool) -> Result<()> {
    let sink = Arc::new(TerminalSink::new(settings.view.density, !once));
    let controller = DashboardController::new(api, sink, settings.view.poll_interval());

    if once {
        controller.refresh().await;
        if controller.is_stale().await {
            bail!("Could not load submissions");
        }
        return Ok(());
    }

    controller.activate().await;
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    controller.deactivate().await;
    info!("Dashboard closed");
    Ok(())
}
