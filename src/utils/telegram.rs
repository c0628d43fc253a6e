use log::{debug, error};
use url::Url;

/// Requests will be sent according to bot instance.
#[derive(Clone)]
pub struct BotInstance {
    pub bot_token: String,
    pub chat_id: String,
    pub message_thread_id: Option<String>,
}

/// Telegram's error result.
#[derive(Debug, serde::Deserialize)]
struct TelegramErrorResult {
    #[allow(unused)]
    pub ok: bool,
    #[allow(unused)]
    pub error_code: i32,
    pub description: String,
}

/// Parse mode for `sendMessage` API
pub enum SendMessageParseMode {
    MarkdownV2,
    HTML,
}

/// Options which can be used with `sendMessage` API
pub struct SendMessageOption {
    pub parse_mode: SendMessageParseMode,
}

fn get_send_message_parse_mode_str(mode: &SendMessageParseMode) -> &'static str {
    match mode {
        SendMessageParseMode::MarkdownV2 => "MarkdownV2",
        SendMessageParseMode::HTML => "HTML",
    }
}

#[derive(Debug, serde::Serialize)]
struct RequestObj {
    pub chat_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct GetUpdatesRequestObj {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, serde::Deserialize)]
struct GetUpdatesResult {
    #[allow(unused)]
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<TelegramUpdate>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

/// Create an instance to interact with APIs.
pub fn telegram_create_instance(bot_token: &str, chat_id: &str) -> BotInstance {
    // chat-id:thread-id
    let mut parts = chat_id.splitn(2, ':');
    let chat_id_part = parts.next().unwrap_or_default();
    let thread_id_part = parts.next().map(ToString::to_string);

    BotInstance {
        bot_token: bot_token.to_string(),
        chat_id: chat_id_part.to_string(),
        message_thread_id: thread_id_part,
    }
}

fn api_url(bot_token: &str, method: &str) -> Option<Url> {
    let raw_url_str = format!("https://api.telegram.org/bot{bot_token}/{method}");
    match Url::parse(&raw_url_str) {
        Ok(url) => Some(url),
        Err(e) => {
            error!("Invalid telegram api url for {method}: {e}");
            None
        }
    }
}

/// Sends one message and awaits the api answer so callers keep their
/// dispatch order. Failures are logged, never propagated.
pub async fn telegram_send_message(
    client: &reqwest::Client,
    instance: &BotInstance,
    msg: &str,
    options: Option<&SendMessageOption>,
) {
    let chat_id = instance.chat_id.to_string();
    let Some(url) = api_url(&instance.bot_token, "sendMessage") else {
        return;
    };

    let request_json_obj = RequestObj {
        chat_id: instance.chat_id.clone(),
        message_thread_id: instance.message_thread_id.clone(),
        text: msg.to_string(),
        parse_mode: options
            .map(|o| get_send_message_parse_mode_str(&o.parse_mode))
            .map(ToString::to_string),
    };

    let result = client.post(url).json(&request_json_obj).send().await;

    match result {
        Ok(response) => {
            if response.status().is_success() {
                debug!("Message sent successfully to {chat_id} telegram api");
            } else {
                match response.json::<TelegramErrorResult>().await {
                    Ok(json) => error!("Message wasn't sent to {chat_id} telegram api because of: {}", json.description),
                    Err(_) => error!("Message wasn't sent to {chat_id} telegram api. Telegram response could not be parsed!"),
                }
            }
        }
        Err(e) => error!("Message wasn't sent to {chat_id} telegram api because of: {e}"),
    }
}

/// Long-polls `getUpdates`. The poll timeout must stay below the client's
/// request timeout or every idle poll reports a transport error.
pub async fn telegram_get_updates(
    client: &reqwest::Client,
    bot_token: &str,
    offset: i64,
    timeout_secs: u64,
) -> Result<Vec<TelegramUpdate>, reqwest::Error> {
    let Some(url) = api_url(bot_token, "getUpdates") else {
        return Ok(Vec::new());
    };

    let request_json_obj = GetUpdatesRequestObj {
        offset,
        timeout: timeout_secs,
        allowed_updates: &["message"],
    };

    let response = client.post(url).json(&request_json_obj).send().await?;
    let updates = response.json::<GetUpdatesResult>().await?;
    Ok(updates.result)
}
