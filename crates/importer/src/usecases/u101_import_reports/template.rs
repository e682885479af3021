use contracts::domain::a001_outlet::Outlet;

/// Готовый к скачиванию шаблон: байты + предлагаемое имя файла.
/// Само сохранение на диск — забота вызывающего слоя.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Канонический заголовок шаблона импорта (разделитель — точка с запятой).
/// Инвариант: прогон этого заголовка через резолвер схемы закрывает все
/// поля без позиционного допущения — см. тест ниже.
pub const TEMPLATE_HEADER: [&str; 11] = [
    "kode_outlet",
    "nama_outlet",
    "tanggal",
    "lob",
    "omzet f&b",
    "omzet cinema",
    "jumlah bill",
    "jumlah penonton",
    "target (%)",
    "target head",
    "catatan",
];

/// Рендерит шаблон импорта: заголовок плюс примеры строк, засеянные
/// реальными аутлетами из справочника (до трёх), либо одной синтетической
/// строкой, когда справочник пуст. Чистая функция, без I/O.
pub fn render_template(outlets: &[Outlet]) -> TemplateFile {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    // csv::Writer пишет в Vec<u8>; ошибок записи в память не бывает,
    // но контракт у него всё равно Result
    let _ = writer.write_record(TEMPLATE_HEADER);

    let example_date = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();

    if outlets.is_empty() {
        let _ = writer.write_record([
            "OUT-001",
            "Contoh Outlet",
            example_date.as_str(),
            "Cafe",
            "1500000",
            "0",
            "120",
            "340",
            "75",
            "400",
            "",
        ]);
    } else {
        for outlet in outlets.iter().take(3) {
            let _ = writer.write_record([
                outlet.code.as_str(),
                outlet.name.as_str(),
                example_date.as_str(),
                outlet.line_of_business.as_str(),
                "1500000",
                "0",
                "120",
                "340",
                "75",
                "400",
                "",
            ]);
        }
    }

    let bytes = writer.into_inner().unwrap_or_default();
    TemplateFile {
        file_name: "template_import_laporan.csv".to_string(),
        bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u101_import_reports::schema;

    #[test]
    fn template_header_round_trips_through_resolver() {
        let template = render_template(&[]);
        let text = String::from_utf8(template.bytes).unwrap();
        let first_line = text.lines().next().unwrap();

        assert_eq!(schema::detect_delimiter(first_line), b';');

        let lines: Vec<String> = text.lines().map(|l| l.to_string()).collect();
        let rows = schema::split_delimited(&lines, b';');
        let resolved = schema::resolve_headers(&rows[0]).unwrap();

        // Все 11 полей закрыты, позиционное допущение не понадобилось
        assert_eq!(resolved.columns.len(), 11);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn template_is_seeded_from_reference_outlets() {
        let outlets = vec![
            Outlet::new("1", "NSR067-1201", "Nusantara Cafe", "Cafe"),
            Outlet::new("2", "NSR067-1202", "Nusantara Premiere", "Premiere"),
        ];
        let template = render_template(&outlets);
        let text = String::from_utf8(template.bytes).unwrap();

        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("NSR067-1201"));
        assert!(text.contains("Nusantara Premiere"));
        assert_eq!(template.file_name, "template_import_laporan.csv");
    }
}
