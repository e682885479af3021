use std::collections::HashMap;

use contracts::usecases::u101_import_reports::ImportRow;

use super::error::ImportError;

/// Канонические поля строки импорта.
///
/// Порядок объявления в `SYNONYM_TABLE` значим: заголовок, подходящий под
/// несколько групп синонимов, уходит первой группе по порядку объявления.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    OutletCode,
    OutletName,
    Date,
    LineOfBusiness,
    RevenuePrimary,
    RevenueSecondary,
    BillCount,
    AttendanceCount,
    TargetPercent,
    TargetHeadcount,
    Notes,
}

/// Таблица синонимов: каноническое поле -> подстроки заголовка
/// (после lower-case + trim). Явная таблица вместо рассыпанных условий,
/// чтобы её можно было тестировать и расширять отдельно от логики.
pub const SYNONYM_TABLE: &[(Field, &[&str])] = &[
    (Field::OutletCode, &["kode", "code"]),
    (Field::OutletName, &["nama", "name"]),
    (Field::Date, &["tanggal", "date", "report_date"]),
    (
        Field::LineOfBusiness,
        &["lob", "line of business", "line_of_business"],
    ),
    (
        Field::RevenuePrimary,
        &["f&b", "fnb", "omzet makanan", "revenue_primary"],
    ),
    (
        Field::RevenueSecondary,
        &["cinema", "bioskop", "revenue_secondary"],
    ),
    (Field::BillCount, &["bill", "struk"]),
    (
        Field::AttendanceCount,
        &["penonton", "attendance", "pengunjung"],
    ),
    (
        Field::TargetPercent,
        &["target (%)", "target %", "target_percent", "persen"],
    ),
    (Field::TargetHeadcount, &["target head", "head"]),
    (Field::Notes, &["catatan", "note", "keterangan"]),
];

/// Кандидаты-разделители в порядке приоритета при равенстве счётчиков
const DELIMITER_PRIORITY: [u8; 4] = [b';', b',', b'\t', b'|'];

/// Выбирает разделитель по первой строке файла: побеждает кандидат с
/// максимальным числом вхождений, при равенстве — более ранний в
/// `DELIMITER_PRIORITY`. Если ни один кандидат не встретился — запятая.
///
/// Это эвристика, не гарантия: строка с разделителями внутри кавычек может
/// обмануть подсчёт, но для реальных выгрузок этого достаточно.
pub fn detect_delimiter(first_line: &str) -> u8 {
    let mut best: Option<(u8, usize)> = None;
    for candidate in DELIMITER_PRIORITY {
        let count = first_line
            .bytes()
            .filter(|b| *b == candidate)
            .count();
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ if count == 0 => {}
            _ => best = Some((candidate, count)),
        }
    }
    best.map(|(d, _)| d).unwrap_or(b',')
}

/// Разбирает нормализованные строки на ячейки выбранным разделителем.
/// Кривые записи пропускаются с предупреждением, а не валят прогон.
pub fn split_delimited(lines: &[String], delimiter: u8) -> Vec<Vec<String>> {
    let text = lines.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(record.iter().map(|c| c.to_string()).collect()),
            Err(e) => {
                tracing::warn!("Skipping malformed delimited record: {}", e);
            }
        }
    }
    rows
}

/// Результат сопоставления заголовков: колонка на каноническое поле
/// плюс предупреждения (позиционное сопоставление никогда не молчит).
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    pub columns: HashMap<Field, usize>,
    pub warnings: Vec<String>,
}

/// Сопоставляет заголовки каноническим полям по таблице синонимов.
///
/// Если обязательные поля (код и имя аутлета) не нашлись по синонимам,
/// включается позиционное допущение: колонка 0 — код, 1 — имя, 2 — линия
/// бизнеса. Это осознанно хрупкое удобство, поэтому оно всегда
/// сопровождается предупреждением. Если и после этого обязательные поля не
/// закрыты (меньше двух колонок) — `UnresolvedSchema`.
pub fn resolve_headers(headers: &[String]) -> Result<ResolvedSchema, ImportError> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut columns: HashMap<Field, usize> = HashMap::new();
    for (idx, header) in normalized.iter().enumerate() {
        if header.is_empty() {
            continue;
        }
        for (field, needles) in SYNONYM_TABLE {
            if columns.contains_key(field) {
                continue;
            }
            if needles.iter().any(|needle| header.contains(needle)) {
                columns.insert(*field, idx);
                break;
            }
        }
    }

    let mut warnings = Vec::new();

    if !columns.contains_key(&Field::OutletCode) || !columns.contains_key(&Field::OutletName) {
        if headers.len() >= 2 {
            columns.insert(Field::OutletCode, 0);
            columns.insert(Field::OutletName, 1);
            if headers.len() >= 3 && !columns.contains_key(&Field::LineOfBusiness) {
                columns.insert(Field::LineOfBusiness, 2);
            }
            warnings.push(format!(
                "Mandatory columns were not recognized by header name; assumed by position \
                 (column 1 = outlet code, column 2 = outlet name). Headers seen: {:?}",
                headers
            ));
        } else {
            return Err(ImportError::UnresolvedSchema {
                headers: headers.to_vec(),
            });
        }
    }

    Ok(ResolvedSchema { columns, warnings })
}

/// Превращает строки данных в `ImportRow` по сопоставленным колонкам.
/// Полностью пустые строки отбрасываются; `row_index` — номер строки
/// данных в файле, с единицы.
pub fn map_rows(data_rows: &[Vec<String>], schema: &ResolvedSchema) -> Vec<ImportRow> {
    let cell = |row: &Vec<String>, field: Field| -> String {
        schema
            .columns
            .get(&field)
            .and_then(|idx| row.get(*idx))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let mut rows = Vec::new();
    for (i, raw) in data_rows.iter().enumerate() {
        let row = ImportRow {
            row_index: i + 1,
            outlet_code: cell(raw, Field::OutletCode),
            outlet_name: cell(raw, Field::OutletName),
            date: cell(raw, Field::Date),
            line_of_business: cell(raw, Field::LineOfBusiness),
            revenue_primary: cell(raw, Field::RevenuePrimary),
            revenue_secondary: cell(raw, Field::RevenueSecondary),
            bill_count: cell(raw, Field::BillCount),
            attendance_count: cell(raw, Field::AttendanceCount),
            target_percent: cell(raw, Field::TargetPercent),
            target_headcount: cell(raw, Field::TargetHeadcount),
            notes: cell(raw, Field::Notes),
        };
        if !row.is_empty() {
            rows.push(row);
        }
    }
    rows
}
