use actix_web::{middleware::Logger, web, App, HttpServer};
use people_board::handlers::{self, people::WidgetRenderer};
use people_board::services::rate_limit::FixedDelay;
use people_board::services::{ContributorFetcher, LeaderboardService, RefreshScheduler};
use people_board::utils::config::Config;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file FIRST before anything else
    dotenv::dotenv().ok();

    // Initialize logger with default level if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let host = config.host.clone();
    let port = config.port;

    log::info!("Configuration loaded:");
    log::info!("   - Repository: {}/{}", config.github_owner, config.github_repo);
    log::info!("   - Window: last {} days", config.days);
    log::info!("   - Refresh interval: {} seconds", config.refresh_interval_seconds);
    if config.github_token.is_none() {
        log::warn!("GITHUB_TOKEN is not set, GitHub will reject the GraphQL requests");
    }

    let fetcher = ContributorFetcher::from_config(
        &config,
        Arc::new(FixedDelay::from_millis(config.page_delay_ms)),
    )?;
    let service = Arc::new(LeaderboardService::new(fetcher));
    let renderer = web::Data::new(WidgetRenderer::new()?);

    // Start the refresh scheduler; it keeps stale data visible when a cycle fails
    log::info!("Starting leaderboard refresh scheduler");
    let scheduler = Arc::new(RefreshScheduler::new(
        service.clone(),
        config.refresh_interval_seconds,
    ));
    tokio::spawn(scheduler.start());

    log::info!("Server started at http://{}:{}", host, port);

    let service_data = web::Data::from(service);
    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
            .app_data(renderer.clone())
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}
