use std::net::SocketAddr;
use std::sync::Arc;

use station_server::board::TodayBoard;
use station_server::provider::ProviderCommand;
use station_server::realtime::{
    CachedRealtimeClient, RealtimeCacheConfig, RealtimeClient, RealtimeConfig,
};
use station_server::refresh::{RefreshConfig, Refresher};
use station_server::schedule::{ScheduleSource, SqliteSchedule};
use station_server::weather::{WeatherConfig, WeatherService};
use station_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "station_server=info".into()),
        )
        .init();

    // Master schedule database
    let db_path =
        std::env::var("SCHEDULE_DB").unwrap_or_else(|_| "train_allocations.db".to_string());
    let schedule: Arc<dyn ScheduleSource> = Arc::new(SqliteSchedule::new(&db_path));

    // Provider programs (the original deployment shipped Python scrapers)
    let interpreter = std::env::var("PROVIDER_PROGRAM").unwrap_or_else(|_| "python3".to_string());
    let realtime_script =
        std::env::var("REALTIME_SCRIPT").unwrap_or_else(|_| "py/real_time.py".to_string());
    let weather_script =
        std::env::var("WEATHER_SCRIPT").unwrap_or_else(|_| "py/scrape_weather.py".to_string());

    let realtime_command = ProviderCommand::new(&interpreter).with_arg(realtime_script);
    let weather_command = ProviderCommand::new(&interpreter).with_arg(weather_script);

    // Build today's working set (fail fast: there is nothing stale to
    // serve before the first load succeeds)
    let board = Arc::new(
        TodayBoard::build(schedule.clone()).expect("failed to load master schedule"),
    );
    let day = board.day().await;
    let trains = board.active_count().await;
    tracing::info!(db = %db_path, day = %day, trains, "working set loaded");

    // Real-time lookup client with cache
    let realtime = Arc::new(CachedRealtimeClient::new(
        RealtimeClient::new(RealtimeConfig::new(realtime_command)),
        &RealtimeCacheConfig::default(),
    ));

    // Weather service
    let weather = Arc::new(WeatherService::new(WeatherConfig::new(weather_command)));

    // Spawn the background refresh loop
    let refresher = Arc::new(Refresher::new(
        board.clone(),
        realtime.clone(),
        RefreshConfig::default(),
    ));
    tokio::spawn(refresher.clone().run());

    // Build app state and router
    let state = AppState::new(board, realtime, weather, refresher, schedule);
    let app = create_router(state);

    // Bind and serve
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(4001);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("arrivals board listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
