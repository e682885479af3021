use serde::{Deserialize, Serialize};

/// Одна строка файла после сопоставления колонок, до валидации.
///
/// Все поля — сырые строки (возможно пустые) под каноническими именами;
/// типизация и проверки происходят на следующем этапе.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRow {
    /// Индекс строки в исходном файле (нумерация строк данных с 1)
    pub row_index: usize,

    pub outlet_code: String,
    pub outlet_name: String,
    pub date: String,
    pub line_of_business: String,
    pub revenue_primary: String,
    pub revenue_secondary: String,
    pub bill_count: String,
    pub attendance_count: String,
    pub target_percent: String,
    pub target_headcount: String,
    pub notes: String,
}

impl ImportRow {
    /// Строка считается пустой, если ни одно сопоставленное поле не заполнено
    pub fn is_empty(&self) -> bool {
        self.outlet_code.is_empty()
            && self.outlet_name.is_empty()
            && self.date.is_empty()
            && self.line_of_business.is_empty()
            && self.revenue_primary.is_empty()
            && self.revenue_secondary.is_empty()
            && self.bill_count.is_empty()
            && self.attendance_count.is_empty()
            && self.target_percent.is_empty()
            && self.target_headcount.is_empty()
            && self.notes.is_empty()
    }
}
