use crate::fetch::fetch_panel_data;
use crate::format::format_report;
use crate::model::Config;
use crate::utils::{telegram_get_updates, telegram_send_message, BotInstance, SendMessageOption, SendMessageParseMode, TelegramUpdate};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// Must stay below the client request timeout.
const LONG_POLL_TIMEOUT_SECS: u64 = 25;
const POLL_ERROR_BACKOFF_SECS: u64 = 5;

const WELCOME_TEXT: &str = "Welcome to the Server Dashboard Bot! Type /status to get the latest stats.";

/// Long-polls `getUpdates` and answers the two supported commands.
pub async fn run_command_loop(client: Arc<reqwest::Client>, config: Arc<Config>, cancel: CancellationToken) {
    let mut offset: i64 = 0;
    info!("Listening for bot commands");
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            updates = telegram_get_updates(&client, &config.telegram.bot_token, offset, LONG_POLL_TIMEOUT_SECS) => {
                match updates {
                    Ok(updates) => {
                        for update in updates {
                            offset = offset.max(update.update_id + 1);
                            handle_update(&client, &config, update).await;
                        }
                    }
                    Err(err) => {
                        error!("Failed to poll telegram updates: {err}");
                        tokio::time::sleep(Duration::from_secs(POLL_ERROR_BACKOFF_SECS)).await;
                    }
                }
            }
        }
    }
    info!("Command loop stopped");
}

async fn handle_update(client: &reqwest::Client, config: &Config, update: TelegramUpdate) {
    let Some(message) = update.message else { return };
    let Some(text) = message.text.as_deref() else { return };
    // strip an "@botname" suffix from the command
    let command = text
        .split_whitespace()
        .next()
        .map(|c| c.split('@').next().unwrap_or(c));

    let reply_to = BotInstance {
        bot_token: config.telegram.bot_token.clone(),
        chat_id: message.chat.id.to_string(),
        message_thread_id: None,
    };

    match command {
        Some("/start") => {
            telegram_send_message(client, &reply_to, WELCOME_TEXT, None).await;
        }
        Some("/status") => match fetch_panel_data(client, &config.panel).await {
            Ok(data) => {
                let options = SendMessageOption { parse_mode: SendMessageParseMode::HTML };
                telegram_send_message(client, &reply_to, &format_report(&data), Some(&options)).await;
            }
            Err(err) => error!("Status request failed: {err}"),
        },
        Some(other) => debug!("Ignoring unknown command {other}"),
        None => {}
    }
}
