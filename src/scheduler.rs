use crate::error::FetchError;
use crate::fetch::fetch_panel_data;
use crate::format::format_alert;
use crate::model::{Config, PanelData};
use crate::status::{check_license, StatusAlert, StatusTracker};
use crate::utils::{telegram_create_instance, telegram_send_message, SendMessageOption, SendMessageParseMode};
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Repeating poll task. Owns the `StatusTracker`, making it the single
/// writer of cross-poll state; the on-demand `/status` path never sees it.
pub async fn start_scheduler(client: Arc<reqwest::Client>, config: Arc<Config>, cancel: CancellationToken) {
    let schedule = &config.schedule;
    info!("Polling panel every {}s, first poll in {}s", schedule.interval_secs, schedule.initial_delay_secs);

    let mut tracker = StatusTracker::new();
    let bot = telegram_create_instance(&config.telegram.bot_token, &config.telegram.chat_id);
    let start = tokio::time::Instant::now() + Duration::from_secs(schedule.initial_delay_secs);
    let mut ticker = tokio::time::interval_at(start, Duration::from_secs(schedule.interval_secs));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let result = fetch_panel_data(&client, &config.panel).await;
                for alert in collect_alerts(&mut tracker, result) {
                    let message = format_alert(&alert);
                    let options = SendMessageOption { parse_mode: SendMessageParseMode::HTML };
                    telegram_send_message(&client, &bot, &message, Some(&options)).await;
                }
            }
            () = cancel.cancelled() => break,
        }
    }
    info!("Scheduler stopped");
}

/// License check plus status diff for one completed poll. A failed fetch
/// yields no alerts and leaves the tracker untouched, so a panel outage is
/// never mistaken for a fleet outage.
fn collect_alerts(tracker: &mut StatusTracker, result: Result<PanelData, FetchError>) -> Vec<StatusAlert> {
    match result {
        Ok(data) => {
            let mut alerts = Vec::new();
            if let Some(alert) = check_license(&data.dashboard) {
                alerts.push(alert);
            }
            alerts.extend(tracker.diff(&data.servers));
            alerts
        }
        Err(err) => {
            error!("Poll failed, keeping previous server statuses: {err}");
            Vec::new()
        }
    }
}
