use crate::error::FetchError;
use crate::model::{DashboardStats, PanelConfig, PanelData, ServerRecord};
use crate::utils::extract_csrf_token;
use log::debug;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

const CSRF_FIELD: &str = "_token";

/// Runs one complete fetch cycle: session login followed by the two data
/// endpoints. The session lives in the client's cookie store and is not
/// reused across cycles.
pub async fn fetch_panel_data(client: &reqwest::Client, panel: &PanelConfig) -> Result<PanelData, FetchError> {
    login(client, panel).await?;
    let dashboard = fetch_json::<DashboardStats>(client, &panel.dashboard_url()).await?;
    let servers = fetch_json::<Vec<ServerRecord>>(client, &panel.servers_url()).await?;
    Ok(PanelData { dashboard, servers })
}

async fn login(client: &reqwest::Client, panel: &PanelConfig) -> Result<(), FetchError> {
    let login_url = panel.login_url();
    let login_page = client.get(&login_url).send().await.map_err(FetchError::Transport)?;
    if !login_page.status().is_success() {
        return Err(FetchError::Http(login_page.status()));
    }
    let page_body = login_page.text().await.map_err(FetchError::Transport)?;
    let csrf_token = extract_csrf_token(&page_body)
        .ok_or_else(|| FetchError::LoginFailed(format!("no {CSRF_FIELD} field on login page")))?;

    let mut form: HashMap<&str, &str> = panel.credentials
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    form.insert(CSRF_FIELD, csrf_token.as_str());

    let response = client.post(&login_url).form(&form).send().await.map_err(FetchError::Transport)?;
    let status = response.status();
    let landed_on = response.url().clone();
    // The panel redirects to the dashboard on success and re-renders the
    // login form on bad credentials, both with status 200.
    if status.is_success() && landed_on.as_str().contains("dashboard") {
        debug!("Panel login successful, landed on {landed_on}");
        Ok(())
    } else {
        Err(FetchError::LoginFailed(format!("credentials rejected, landed on {landed_on} with status {status}")))
    }
}

async fn fetch_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T, FetchError> {
    let response = client.get(url).send().await.map_err(FetchError::Transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http(status));
    }
    let body = response.text().await.map_err(FetchError::Transport)?;
    serde_json::from_str(&body).map_err(|err| FetchError::Decode(format!("{url}: {err}")))
}
