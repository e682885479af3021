use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use contracts::domain::a001_outlet::Outlet;
use contracts::domain::a002_outlet_report::OutletReport;
use contracts::usecases::u101_import_reports::ImportRow;

use crate::shared::numeric::{clean_number, digits_only, round2};

/// Построчная неудача валидации. Это значение, а не исключение: кривая
/// строка всегда превращается в отчёт об ошибке, никогда в панику.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFailure {
    /// Аутлет не удалось сопоставить ни одним из шагов резолюции
    OutletNotFound {
        code: String,
        name: String,
        line_of_business: String,
    },
    /// Одна или несколько проблем на уровне полей (строка может нести сразу все)
    FieldValidation { problems: Vec<String> },
}

impl RowFailure {
    /// Человекочитаемое сообщение для итогов прогона
    pub fn message(&self) -> String {
        match self {
            RowFailure::OutletNotFound {
                code,
                name,
                line_of_business,
            } => format!(
                "Outlet not found: code '{}', name '{}', LOB '{}'",
                code, name, line_of_business
            ),
            RowFailure::FieldValidation { problems } => problems.join("; "),
        }
    }
}

/// Синонимы линий бизнеса: после lower-case + trim известные варианты
/// сводятся к одному каноническому токену
static LOB_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("hs", "hello sunday"),
        ("hello_sunday", "hello sunday"),
        ("hello sunday", "hello sunday"),
        ("premier", "premiere"),
        ("kafe", "cafe"),
    ])
});

fn normalize_lob(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    match LOB_SYNONYMS.get(lower.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => lower,
    }
}

/// Справочник аутлетов, загруженный до начала импорта.
///
/// Пары (code, line_of_business) в справочнике ожидаются уникальными; если
/// это не так, резолюция детерминированно берёт первый подходящий в порядке
/// загрузки, а не сливает записи молча.
pub struct OutletIndex<'a> {
    outlets: &'a [Outlet],
}

impl<'a> OutletIndex<'a> {
    pub fn new(outlets: &'a [Outlet]) -> Self {
        Self { outlets }
    }

    pub fn is_empty(&self) -> bool {
        self.outlets.is_empty()
    }

    /// Порядок резолюции (первое совпадение побеждает, каждый шаг пробуется
    /// только если предыдущий ничего не дал):
    /// 1. точный code + LOB после нормализации синонимов;
    /// 2. точный code + LOB без синонимов, без учёта регистра;
    /// 3. точный code + частичное совпадение нормализованных LOB в любую сторону;
    /// 4. только code, точно;
    /// 5. только code, без учёта регистра.
    pub fn resolve(&self, code: &str, line_of_business: &str) -> Option<&'a Outlet> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        let lob_raw = line_of_business.trim().to_lowercase();
        let lob_norm = normalize_lob(line_of_business);

        self.outlets
            .iter()
            .find(|o| o.code == code && normalize_lob(&o.line_of_business) == lob_norm)
            .or_else(|| {
                self.outlets.iter().find(|o| {
                    o.code == code && o.line_of_business.trim().to_lowercase() == lob_raw
                })
            })
            .or_else(|| {
                if lob_norm.is_empty() {
                    return None;
                }
                self.outlets.iter().find(|o| {
                    let o_norm = normalize_lob(&o.line_of_business);
                    o.code == code
                        && !o_norm.is_empty()
                        && (o_norm.contains(&lob_norm) || lob_norm.contains(&o_norm))
                })
            })
            .or_else(|| self.outlets.iter().find(|o| o.code == code))
            .or_else(|| {
                self.outlets
                    .iter()
                    .find(|o| o.code.eq_ignore_ascii_case(code))
            })
    }
}

/// Форматы дат, принимаемые после отсечения времени (по порядку)
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"];

/// Дата отчёта: непустая строка, компонент времени (всё после первого
/// пробела) отбрасывается
fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(' ').next()?.trim();
    if date_part.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Проверяет и нормализует одну строку импорта.
///
/// Все проблемы полей собираются независимо — строка с тремя кривыми полями
/// отчитывается одним сообщением о трёх проблемах, а не первой попавшейся.
pub fn validate_row(row: &ImportRow, outlets: &OutletIndex) -> Result<OutletReport, RowFailure> {
    let outlet = outlets
        .resolve(&row.outlet_code, &row.line_of_business)
        .ok_or_else(|| RowFailure::OutletNotFound {
            code: row.outlet_code.clone(),
            name: row.outlet_name.clone(),
            line_of_business: row.line_of_business.clone(),
        })?;

    let mut problems: Vec<String> = Vec::new();

    let report_date = match parse_report_date(&row.date) {
        Some(d) => Some(d),
        None => {
            if row.date.trim().is_empty() {
                problems.push("date is empty".to_string());
            } else {
                problems.push(format!("date '{}' is not a valid calendar date", row.date));
            }
            None
        }
    };

    let revenue_primary = parse_money(&row.revenue_primary, "omzet f&b", &mut problems);
    let revenue_secondary = parse_money(&row.revenue_secondary, "omzet cinema", &mut problems);

    let bill_count = parse_count(&row.bill_count, "bill count", &mut problems);
    let attendance_count = parse_count(&row.attendance_count, "attendance count", &mut problems);
    let target_headcount = parse_count(&row.target_headcount, "target headcount", &mut problems);

    // Процент хранится ровно как распарсен: никакого деления/умножения на 100
    let target_percent: f64 = clean_number(&row.target_percent)
        .parse()
        .unwrap_or(0.0);
    if !(0.0..=100.0).contains(&target_percent) {
        problems.push(format!(
            "target percent {} is outside the range 0-100",
            target_percent
        ));
    }

    if !problems.is_empty() {
        return Err(RowFailure::FieldValidation { problems });
    }

    Ok(OutletReport {
        outlet_id: outlet.id.clone(),
        // report_date заполнен, иначе выше был бы выход с FieldValidation
        report_date: report_date.unwrap_or_default(),
        revenue_primary: round2(revenue_primary),
        revenue_secondary: round2(revenue_secondary),
        bill_count,
        attendance_count,
        target_percent,
        target_headcount,
        notes: if row.notes.trim().is_empty() {
            None
        } else {
            Some(row.notes.trim().to_string())
        },
    })
}

fn parse_money(raw: &str, label: &str, problems: &mut Vec<String>) -> f64 {
    let value: f64 = clean_number(raw).parse().unwrap_or(0.0);
    if value < 0.0 {
        problems.push(format!("{} must be non-negative, got {}", label, value));
    }
    value
}

/// Целочисленные поля: всё, кроме цифр, выбрасывается; пустой результат —
/// ноль (та же конвенция, что у clean_number для пустых сумм)
fn parse_count(raw: &str, label: &str, problems: &mut Vec<String>) -> u32 {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return 0;
    }
    match digits.parse::<u32>() {
        Ok(v) => v,
        Err(_) => {
            problems.push(format!("{} '{}' is not a valid count", label, raw));
            0
        }
    }
}
