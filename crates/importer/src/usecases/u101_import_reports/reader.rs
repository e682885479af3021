use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::error::ImportError;

/// Потолок размера входного файла (5 MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Сырые табличные данные, снятые с файла. Дальше по конвейеру
/// всё работает только со строками.
#[derive(Debug, Clone)]
pub enum SourceData {
    /// Текст с разделителями: непустые строки с нормализованными переводами строк.
    /// Разбиение на ячейки происходит после выбора разделителя (см. schema).
    Delimited { lines: Vec<String> },
    /// Первый лист книги Excel, ячейки уже приведены к строкам
    Sheet { rows: Vec<Vec<String>> },
}

/// Читает файл, выбранный пользователем (содержимое уже в памяти).
///
/// Отклоняет файлы сверх лимита размера и с расширением вне принятого
/// набора (.csv, .xlsx, .xls). Ничего, кроме чтения, не делает.
pub fn read_source(
    file_name: &str,
    bytes: &[u8],
    max_size: usize,
) -> Result<SourceData, ImportError> {
    if bytes.len() > max_size {
        return Err(ImportError::FileTooLarge {
            size: bytes.len(),
            limit: max_size,
        });
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_delimited_text(bytes),
        "xlsx" | "xls" => read_first_sheet(bytes),
        _ => Err(ImportError::UnsupportedFormat { extension }),
    }
}

fn read_delimited_text(bytes: &[u8]) -> Result<SourceData, ImportError> {
    // Strip UTF-8 BOM if present
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{FEFF}');

    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = normalized
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect();

    if lines.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    Ok(SourceData::Delimited { lines })
}

fn read_first_sheet(bytes: &[u8]) -> Result<SourceData, ImportError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| ImportError::Spreadsheet(e.to_string()))?;

    // Только первый лист
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::EmptyFile)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::Spreadsheet(e.to_string()))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect();

    if rows.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    Ok(SourceData::Sheet { rows })
}

/// Приводит ячейку к строке: числа без хвостового ".0", даты в ISO-виде.
/// Сырые числовые/датовые значения дальше не живут.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.to_string()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_file() {
        let bytes = vec![b'a'; 16];
        let err = read_source("omzet.csv", &bytes, 8).unwrap_err();
        assert!(matches!(err, ImportError::FileTooLarge { size: 16, limit: 8 }));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = read_source("omzet.pdf", b"x", MAX_FILE_SIZE).unwrap_err();
        match err {
            ImportError::UnsupportedFormat { extension } => assert_eq!(extension, "pdf"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn normalizes_line_endings_and_drops_blanks() {
        let bytes = b"a;b\r\nc;d\r\n\r\ne;f\rg;h\n";
        let source = read_source("omzet.csv", bytes, MAX_FILE_SIZE).unwrap();
        match source {
            SourceData::Delimited { lines } => {
                assert_eq!(lines, vec!["a;b", "c;d", "e;f", "g;h"]);
            }
            _ => panic!("expected delimited source"),
        }
    }

    #[test]
    fn strips_utf8_bom() {
        let bytes = "\u{FEFF}kode;nama\nA;B\n".as_bytes();
        let source = read_source("omzet.csv", bytes, MAX_FILE_SIZE).unwrap();
        match source {
            SourceData::Delimited { lines } => assert_eq!(lines[0], "kode;nama"),
            _ => panic!("expected delimited source"),
        }
    }

    #[test]
    fn empty_csv_is_rejected() {
        let err = read_source("omzet.csv", b"\n\r\n  \n", MAX_FILE_SIZE).unwrap_err();
        assert!(matches!(err, ImportError::EmptyFile));
    }
}
