use std::time::Duration;

use tokio::time::sleep;

use contracts::domain::a002_outlet_report::OutletReport;
use contracts::usecases::u101_import_reports::{RowOutcome, RowStatus};

use super::progress_tracker::ProgressTracker;
use super::report_api_client::{ReportApiClient, SubmitError};

/// Политика повторов: явный объект-значение вместо зашитых в цикл констант,
/// чтобы её можно было подменять в тестах и настраивать конфигом
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Всего попыток на строку (1 исходная + повторы)
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 2000,
            retryable_status_codes: vec![429],
        }
    }
}

impl RetryPolicy {
    fn is_retryable(&self, error: &SubmitError) -> bool {
        error
            .status_code()
            .is_some_and(|code| self.retryable_status_codes.contains(&code))
    }
}

/// Настройки отправки: размер пачки и пауза между последовательными
/// запросами — осознанный backpressure в сторону бэкенда
#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub batch_size: usize,
    pub pacing_ms: u64,
    pub retry: RetryPolicy,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            batch_size: 10,
            pacing_ms: 300,
            retry: RetryPolicy::default(),
        }
    }
}

/// Отправляет валидированные записи пачками, строго последовательно.
///
/// Откатов нет: успешные строки остаются на сервере, даже если последующие
/// падают — частичный успех является ожидаемым терминальным состоянием.
/// Каждый итог сразу уходит в трекер, чтобы наблюдатель видел живой прогресс.
pub async fn submit_records(
    client: &ReportApiClient,
    tracker: &ProgressTracker,
    session_id: &str,
    records: &[(usize, OutletReport)],
    settings: &SubmitSettings,
) {
    let total = records.len();
    let batch_size = settings.batch_size.max(1);
    let mut submitted = 0usize;

    for (batch_no, batch) in records.chunks(batch_size).enumerate() {
        tracing::info!(
            "Submitting batch {}/{} ({} rows)",
            batch_no + 1,
            total.div_ceil(batch_size),
            batch.len()
        );

        for (row_index, report) in batch {
            tracker.set_current_item(
                session_id,
                Some(format!("{} / {}", report.outlet_id, report.report_date)),
            );

            let outcome = match submit_with_retry(client, report, &settings.retry).await {
                Ok(()) => RowOutcome {
                    row_index: *row_index,
                    status: RowStatus::Success,
                    message: "Report created".to_string(),
                },
                Err(e) => RowOutcome {
                    row_index: *row_index,
                    status: RowStatus::Error,
                    message: e.to_string(),
                },
            };
            tracker.record_row(session_id, outcome);

            submitted += 1;
            if submitted < total {
                sleep(Duration::from_millis(settings.pacing_ms)).await;
            }
        }
    }

    tracker.set_current_item(session_id, None);
}

/// Одна строка: повторяется только то, что политика считает retryable
/// (по умолчанию rate limit 429), с фиксированной паузой между попытками.
/// 422 и транспортные ошибки не повторяются никогда.
async fn submit_with_retry(
    client: &ReportApiClient,
    report: &OutletReport,
    policy: &RetryPolicy,
) -> Result<(), SubmitError> {
    let mut attempt = 1u32;
    loop {
        match client.create_report(report).await {
            Ok(()) => return Ok(()),
            Err(e) if policy.is_retryable(&e) && attempt < policy.max_attempts => {
                tracing::warn!(
                    "Submission attempt {}/{} hit a retryable response, backing off {} ms",
                    attempt,
                    policy.max_attempts,
                    policy.backoff_ms
                );
                sleep(Duration::from_millis(policy.backoff_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
