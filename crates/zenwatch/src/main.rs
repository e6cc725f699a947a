//! `ZenWatch` - command-line client for the tech-news aggregator
//!
//! Reads go through the shared query cache and writes through the
//! optimistic mutation protocol in `zenwatch-core`; this binary only
//! parses arguments, renders output and persists the session.

#![forbid(unsafe_code)]

mod args;
mod commands;
mod print;

use anyhow::Context as _;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zenwatch_api::{AccessToken, ApiClient, ClientConfig, SessionEvent, TokenStore};
use zenwatch_core::{AppSettings, AppState, ZenWatch};

use args::Cli;
use commands::Ctx;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zenwatch=info,zenwatch_core=info,zenwatch_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings_path = cli.settings.clone().unwrap_or_else(AppSettings::default_path);
    let settings = AppSettings::load(&settings_path)
        .await
        .with_context(|| format!("could not read {}", settings_path.display()))?;

    let zw = connect(cli.api_url.as_deref(), &settings)?;
    info!(api = %zw.api().config().base_url, "Starting ZenWatch");

    let mut toasts = zw.notifier().subscribe();
    let mut sessions = zw.tokens().subscribe();
    let mut ctx = Ctx {
        state: AppState::from_settings(&settings),
        zw,
        settings: settings.clone(),
        settings_path,
        json: cli.json,
    };

    let result = commands::handle(&mut ctx, cli.command).await;

    while let Ok(toast) = toasts.try_recv() {
        eprintln!("{}", print::toast(&toast));
    }
    let mut expired = false;
    while let Ok(event) = sessions.try_recv() {
        debug!(?event, "Session event");
        expired |= event == SessionEvent::Expired;
        ctx.state.handle_session_event(event);
    }
    if expired {
        eprintln!("Your session has expired. Run `zenwatch login` to sign in again.");
    }

    persist(&mut ctx, &settings).await;
    result
}

fn connect(api_url: Option<&str>, settings: &AppSettings) -> anyhow::Result<ZenWatch> {
    let config = match api_url {
        Some(url) => ClientConfig::new(url)?,
        None => ClientConfig::from_env()?,
    };
    let tokens = settings
        .session_token
        .as_ref()
        .map_or_else(TokenStore::new, |t| TokenStore::with_token(AccessToken::bearer(t)));
    Ok(ZenWatch::new(ApiClient::with_tokens(config, tokens)?))
}

/// Writes settings back when a command changed them or the token moved
/// (login, logout, refresh).
async fn persist(ctx: &mut Ctx, loaded: &AppSettings) {
    ctx.settings.session_token = ctx.zw.tokens().get().map(|t| t.value);
    if ctx.settings == *loaded {
        return;
    }
    if let Err(e) = ctx.settings.save(&ctx.settings_path).await {
        warn!(error = %e, "Failed to save settings");
    }
}
