mod bootstrap;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use dashboard_core::clock::SystemClock;
use dashboard_core::settings::Settings;
use dashboard_core::time_utils::TimezoneHandler;
use dashboard_data::reader::{resolve_data_path, JsonlStore};
use dashboard_data::source::CountByDay;
use dashboard_runtime::orchestrator::ReportOrchestrator;
use dashboard_runtime::report_service::ReportService;
use dashboard_ui::app::{App, ViewMode};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;
    let log_file = bootstrap::log_target(&settings.view, settings.log_file.as_ref(), &app_dir);
    bootstrap::setup_logging(&settings.log_level, log_file.as_ref())?;

    tracing::info!("Admin Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Series: {} vs {}, Window: {} month(s), Timezone: {}",
        settings.view,
        settings.series_a,
        settings.series_b,
        settings.window_months,
        settings.timezone
    );

    let (series_a, series_b) = settings.series_kinds()?;
    let tz = TimezoneHandler::new(&settings.timezone);
    let data_path = resolve_data_path(settings.data_path.as_deref());
    tracing::info!("Reading records from {}", data_path.display());

    let store: Arc<dyn CountByDay> = Arc::new(JsonlStore::new(data_path, tz));
    let service = Arc::new(
        ReportService::new(store, Arc::new(SystemClock), tz.default_tz())
            .with_window_months(settings.window_months)
            .with_series(series_a, series_b),
    );

    if settings.view == "json" {
        let report = service.generate().await?;
        println!("{}", serde_json::to_string_pretty(&report.chart_data())?);
        return Ok(());
    }

    let view_mode = ViewMode::from_name(&settings.view)
        .ok_or_else(|| anyhow!("Unknown view mode: {}", settings.view))?;

    let orchestrator = ReportOrchestrator::new(service, u64::from(settings.refresh_rate));
    let (rx, handle) = orchestrator.start();

    let app = App::new(
        &settings.theme,
        view_mode,
        series_a,
        series_b,
        settings.timezone.clone(),
    );

    let result = app.run_live(rx).await;
    handle.abort();
    result?;

    Ok(())
}
