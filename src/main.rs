use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod config;
mod context;
mod email_confirmation;
mod search;
mod state;
mod users;

#[cfg(test)]
mod testing;

const DEFAULT_LOG_FILTER: &str = "tabnews_users=debug,axum=info,tower_http=info";

/// `RUST_LOG` selects levels, `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let (json_layer, text_layer) = if json {
        (Some(fmt::layer().json().with_target(false)), None)
    } else {
        (None, Some(fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = config::AppConfig::from_env()?;
    let app_state = state::AppState::init(&config).await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
        tracing::warn!(error = %e, "migrations not applied");
    }

    app::serve(app::build_app(app_state), config.listen_addr).await
}
