use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a001_outlet::OutletId;

/// Периодический отчёт аутлета — валидированная запись, готовая к отправке.
///
/// С точки зрения бэкенда запись уникальна по паре (outlet_id, report_date);
/// повторную отправку той же пары отклоняет сервер, не клиент.
/// Клиент не хранит копию после попытки отправки — системой записи является бэкенд.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletReport {
    pub outlet_id: OutletId,

    /// Календарная дата без компонента времени
    pub report_date: NaiveDate,

    /// Омзет F&B, неотрицательный, округлён до 2 знаков
    pub revenue_primary: f64,

    /// Омзет Cinema, неотрицательный, округлён до 2 знаков
    pub revenue_secondary: f64,

    pub bill_count: u32,
    pub attendance_count: u32,

    /// Целевой процент в [0, 100]; хранится ровно как распарсен,
    /// без пересчёта (68.34 означает 68.34%)
    pub target_percent: f64,

    pub target_headcount: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_camel_case_payload() {
        let report = OutletReport {
            outlet_id: OutletId::new("42"),
            report_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            revenue_primary: 65231000.0,
            revenue_secondary: 0.0,
            bill_count: 120,
            attendance_count: 340,
            target_percent: 68.34,
            target_headcount: 400,
            notes: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outletId"], "42");
        assert_eq!(json["reportDate"], "2025-03-14");
        assert_eq!(json["revenuePrimary"], 65231000.0);
        assert_eq!(json["targetPercent"], 68.34);
        assert!(json.get("notes").is_none());
    }
}
