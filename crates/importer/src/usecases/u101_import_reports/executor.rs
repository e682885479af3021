use std::sync::Arc;

use uuid::Uuid;

use contracts::domain::a001_outlet::Outlet;
use contracts::domain::a002_outlet_report::OutletReport;
use contracts::usecases::u101_import_reports::{
    ImportProgress, ImportResponse, ImportStartStatus, RowOutcome, RowStatus,
};

use crate::shared::config::ImportConfig;

use super::error::ImportError;
use super::progress_tracker::ProgressTracker;
use super::reader::{self, SourceData};
use super::report_api_client::ReportApiClient;
use super::schema;
use super::submitter::{self, RetryPolicy, SubmitSettings};
use super::validator::{self, OutletIndex};

/// Executor use-case импорта отчётов аутлетов.
///
/// Данные идут строго в одну сторону: чтение файла → схема → валидация →
/// отправка. Ошибки уровня файла валят весь прогон одним сообщением;
/// построчные проблемы только копятся в итогах.
#[derive(Clone)]
pub struct ImportExecutor {
    api_client: Arc<ReportApiClient>,
    pub progress_tracker: Arc<ProgressTracker>,
    settings: ImportConfig,
}

impl ImportExecutor {
    pub fn new(
        api_client: Arc<ReportApiClient>,
        progress_tracker: Arc<ProgressTracker>,
        settings: ImportConfig,
    ) -> Self {
        Self {
            api_client,
            progress_tracker,
            settings,
        }
    }

    /// Запустить импорт в фоне (создаёт async task и возвращает session_id).
    /// Отмена не поддерживается: начатый прогон идёт до конца.
    pub fn start_import(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        outlets: Vec<Outlet>,
    ) -> ImportResponse {
        let session_id = self.create_session();
        let executor = self.clone();
        let sid = session_id.clone();

        tokio::spawn(async move {
            executor.run_in_session(&sid, &file_name, &bytes, &outlets).await;
        });

        ImportResponse {
            session_id,
            status: ImportStartStatus::Started,
            message: "Import started".to_string(),
        }
    }

    /// Выполнить импорт и дождаться итога (вариант для CLI)
    pub async fn run_import(
        &self,
        file_name: &str,
        bytes: &[u8],
        outlets: &[Outlet],
    ) -> ImportProgress {
        let session_id = self.create_session();
        self.run_in_session(&session_id, file_name, bytes, outlets)
            .await
    }

    /// Получить прогресс сессии
    pub fn get_progress(&self, session_id: &str) -> Option<ImportProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    fn create_session(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(session_id.clone());
        session_id
    }

    async fn run_in_session(
        &self,
        session_id: &str,
        file_name: &str,
        bytes: &[u8],
        outlets: &[Outlet],
    ) -> ImportProgress {
        match self.execute_import(session_id, file_name, bytes, outlets).await {
            Ok(()) => self.progress_tracker.complete_session(session_id),
            Err(e) => {
                tracing::error!("Report import aborted: {}", e);
                self.progress_tracker.fail_session(session_id, e.to_string());
            }
        }
        self.progress_tracker
            .get_progress(session_id)
            .unwrap_or_else(|| ImportProgress::new(session_id.to_string()))
    }

    /// Конвейер одного прогона (фоновая задача)
    async fn execute_import(
        &self,
        session_id: &str,
        file_name: &str,
        bytes: &[u8],
        outlets: &[Outlet],
    ) -> Result<(), ImportError> {
        tracing::info!(
            "Starting report import from '{}' ({} bytes, {} reference outlets)",
            file_name,
            bytes.len(),
            outlets.len()
        );

        let source = reader::read_source(file_name, bytes, self.settings.max_file_size_bytes)?;

        let grid: Vec<Vec<String>> = match source {
            SourceData::Delimited { lines } => {
                let delimiter = schema::detect_delimiter(&lines[0]);
                tracing::info!("Detected delimiter: {:?}", delimiter as char);
                schema::split_delimited(&lines, delimiter)
            }
            SourceData::Sheet { rows } => rows,
        };

        if grid.len() < 2 {
            return Err(ImportError::EmptyFile);
        }

        let resolved = schema::resolve_headers(&grid[0])?;
        for warning in &resolved.warnings {
            tracing::warn!("{}", warning);
            self.progress_tracker.add_warning(session_id, warning.clone());
        }

        let rows = schema::map_rows(&grid[1..], &resolved);
        if rows.is_empty() {
            return Err(ImportError::EmptyFile);
        }
        self.progress_tracker.set_total_rows(session_id, rows.len());
        tracing::info!("Parsed {} data rows", rows.len());

        // Валидация — чистый проход по памяти; неудачи сразу в итоги
        let index = OutletIndex::new(outlets);
        let mut valid: Vec<(usize, OutletReport)> = Vec::new();
        for row in &rows {
            match validator::validate_row(row, &index) {
                Ok(report) => valid.push((row.row_index, report)),
                Err(failure) => {
                    self.progress_tracker.record_row(
                        session_id,
                        RowOutcome {
                            row_index: row.row_index,
                            status: RowStatus::Error,
                            message: failure.message(),
                        },
                    );
                }
            }
        }
        tracing::info!(
            "Validation finished: {} of {} rows ready for submission",
            valid.len(),
            rows.len()
        );

        let settings = SubmitSettings {
            batch_size: self.settings.batch_size,
            pacing_ms: self.settings.batch_delay_ms,
            retry: RetryPolicy {
                max_attempts: self.settings.max_attempts,
                backoff_ms: self.settings.rate_limit_backoff_ms,
                ..RetryPolicy::default()
            },
        };
        submitter::submit_records(
            &self.api_client,
            &self.progress_tracker,
            session_id,
            &valid,
            &settings,
        )
        .await;

        Ok(())
    }
}
