use thiserror::Error;

use contracts::domain::a001_outlet::Outlet;
use contracts::domain::a002_outlet_report::OutletReport;

/// Исход HTTP-отправки одной записи. Повторяется только rate limit;
/// остальное фиксируется как построчная неудача без повторов.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("rate limited by the backend (HTTP 429)")]
    RateLimited,

    /// Отказ сервера (422 — валидация полей, в т.ч. дубликат пары
    /// аутлет/дата; 409/500/... — с сообщением сервера, когда оно есть)
    #[error("rejected by the backend (HTTP {status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// Ответ не получен вовсе
    #[error("no response from the backend: {0}")]
    Transport(String),
}

impl SubmitError {
    /// HTTP-статус, если ответ вообще был получен
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SubmitError::RateLimited => Some(429),
            SubmitError::ServerRejected { status, .. } => Some(*status),
            SubmitError::Transport(_) => None,
        }
    }
}

/// HTTP-клиент REST API дашборда
pub struct ReportApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ReportApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Отправить один валидированный отчёт: POST {base_url}/reports
    pub async fn create_report(&self, report: &OutletReport) -> Result<(), SubmitError> {
        let url = format!("{}/reports", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(report)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(format!("connection failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        if status.as_u16() == 429 {
            tracing::warn!("Report API rate limited (outlet {})", report.outlet_id);
            return Err(SubmitError::RateLimited);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_server_message(&body, status.as_u16());
        tracing::error!("Report API request failed ({}): {}", status, message);
        Err(SubmitError::ServerRejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Получить справочник аутлетов: GET {base_url}/outlets.
    /// Это забота внешнего слоя (CLI), сам конвейер справочник не тянет.
    pub async fn fetch_outlets(&self) -> anyhow::Result<Vec<Outlet>> {
        let url = format!("{}/outlets", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Outlet list request failed: {}", body);
            anyhow::bail!("outlet list request failed with status {}: {}", status, body);
        }

        let body = response.text().await?;
        let preview: String = body.chars().take(500).collect();
        tracing::debug!("Outlet list response preview: {}", preview);

        match serde_json::from_str::<Vec<Outlet>>(&body) {
            Ok(outlets) => Ok(outlets),
            Err(e) => {
                tracing::error!("Failed to parse outlet list response. Error: {}", e);
                anyhow::bail!("failed to parse outlet list JSON: {}. Response: {}", e, preview)
            }
        }
    }
}

/// Достаёт поле `message` из JSON-тела ответа, иначе — усечённое тело,
/// иначе — generic-строка со статусом
fn extract_server_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with status {}", status)
    } else {
        trimmed.chars().take(200).collect()
    }
}
