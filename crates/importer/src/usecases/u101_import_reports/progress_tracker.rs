use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use contracts::usecases::u101_import_reports::{
    ImportProgress, ImportStatus, RowOutcome, RowStatus,
};

/// Трекер прогресса импорта (in-memory, для real-time наблюдения из UI).
///
/// Пишет в прогресс только последовательный цикл отправки — конкурентных
/// писателей нет, RwLock здесь ради наблюдателей.
#[derive(Clone)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, ImportProgress>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Создать новую сессию импорта
    pub fn create_session(&self, session_id: String) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session_id.clone(), ImportProgress::new(session_id));
    }

    /// Получить текущий прогресс сессии
    pub fn get_progress(&self, session_id: &str) -> Option<ImportProgress> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(session_id).cloned()
    }

    /// Зафиксировать число строк данных (известно после разбора файла)
    pub fn set_total_rows(&self, session_id: &str, total_rows: usize) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.total_rows = total_rows;
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Предупреждение уровня файла (например, позиционное сопоставление колонок)
    pub fn add_warning(&self, session_id: &str, warning: String) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.warnings.push(warning);
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Текущая обрабатываемая строка (код аутлета / дата)
    pub fn set_current_item(&self, session_id: &str, label: Option<String>) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.current_item = label;
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Добавить итог одной строки; счётчики и процент обновляются
    /// инкрементально, процент монотонно не убывает
    pub fn record_row(&self, session_id: &str, outcome: RowOutcome) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            match outcome.status {
                RowStatus::Success => progress.success_count += 1,
                RowStatus::Error => progress.failure_count += 1,
            }
            progress.processed += 1;
            if progress.total_rows > 0 {
                let percent =
                    (progress.processed as f32 / progress.total_rows as f32) * 100.0;
                if percent > progress.percent_complete {
                    progress.percent_complete = percent;
                }
            }
            progress.results.push(outcome);
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Зафиксировать фатальную ошибку уровня файла и провалить сессию
    pub fn fail_session(&self, session_id: &str, error: String) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.error_message = Some(error);
            progress.status = ImportStatus::Failed;
            progress.completed_at = Some(chrono::Utc::now());
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Завершить сессию импорта терминальным статусом по счётчикам
    pub fn complete_session(&self, session_id: &str) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.status = progress.terminal_status();
            progress.percent_complete = 100.0;
            progress.completed_at = Some(chrono::Utc::now());
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Удалить старые сессии (для очистки памяти)
    pub fn cleanup_old_sessions(&self, max_age_hours: i64) {
        let mut sessions = self.sessions.write().unwrap();
        let now = chrono::Utc::now();
        sessions.retain(|_, progress| {
            if let Some(completed_at) = progress.completed_at {
                (now - completed_at).num_hours() < max_age_hours
            } else {
                true // Не удаляем активные сессии
            }
        });
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
