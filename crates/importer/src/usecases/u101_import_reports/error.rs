use thiserror::Error;

/// Фатальные ошибки уровня файла: прерывают весь прогон до/во время разбора.
/// Построчные проблемы ошибками не являются — они копятся в итогах прогона.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported file format '.{extension}' (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat { extension: String },

    #[error("file is too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: usize, limit: usize },

    #[error("file contains no data rows")]
    EmptyFile,

    #[error("could not resolve mandatory columns (outlet code, outlet name); headers seen: {headers:?}")]
    UnresolvedSchema { headers: Vec<String> },

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),
}
