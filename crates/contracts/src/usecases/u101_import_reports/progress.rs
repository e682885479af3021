use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Итог обработки одной строки импорта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_index: usize,
    pub status: RowStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Success,
    Error,
}

/// Текущий прогресс сессии импорта отчётов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProgress {
    pub session_id: String,
    pub status: ImportStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    /// Всего строк данных в файле (0, пока файл не разобран)
    pub total_rows: usize,
    pub processed: usize,
    pub success_count: usize,
    pub failure_count: usize,

    /// Монотонно неубывающий процент: processed / total_rows
    pub percent_complete: f32,

    /// Текущая обрабатываемая строка (код аутлета / дата)
    pub current_item: Option<String>,

    /// Поштучные итоги в порядке обработки
    pub results: Vec<RowOutcome>,

    /// Предупреждения уровня файла (например, позиционное сопоставление колонок)
    pub warnings: Vec<String>,

    /// Сообщение фатальной ошибки уровня файла (формат/размер/схема)
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Импорт запущен
    Running,
    /// Импорт завершён, все строки приняты
    Completed,
    /// Импорт завершён, часть строк отклонена (частичный успех — тоже успех)
    CompletedWithErrors,
    /// Импорт провален: ни одной принятой строки или фатальная ошибка файла
    Failed,
}

impl ImportProgress {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            status: ImportStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            updated_at: Utc::now(),
            total_rows: 0,
            processed: 0,
            success_count: 0,
            failure_count: 0,
            percent_complete: 0.0,
            current_item: None,
            results: Vec::new(),
            warnings: Vec::new(),
            error_message: None,
        }
    }

    /// Терминальный статус по счётчикам: частичный успех считается успешным прогоном
    pub fn terminal_status(&self) -> ImportStatus {
        if self.success_count == 0 {
            ImportStatus::Failed
        } else if self.failure_count > 0 {
            ImportStatus::CompletedWithErrors
        } else {
            ImportStatus::Completed
        }
    }
}
