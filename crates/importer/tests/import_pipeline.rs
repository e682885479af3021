use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::domain::a001_outlet::Outlet;
use contracts::usecases::u101_import_reports::{ImportStatus, RowStatus};
use importer::shared::config::ImportConfig;
use importer::usecases::u101_import_reports::progress_tracker::ProgressTracker;
use importer::usecases::u101_import_reports::report_api_client::ReportApiClient;
use importer::usecases::u101_import_reports::ImportExecutor;

const PRODUCTION_HEADER: &str = "kode_outlet;nama_outlet;tanggal;lob;omzet f&b;omzet cinema;jumlah bill;jumlah penonton;target (%);target head;catatan";

fn reference_outlets() -> Vec<Outlet> {
    vec![
        Outlet::new("1", "NSR067-1201", "Nusantara Cafe", "Cafe"),
        Outlet::new("2", "NSR067-1201", "Nusantara Premiere", "Premiere"),
        Outlet::new("3", "OUT-001", "Outlet Utama", "Hello Sunday"),
    ]
}

/// Настройки с короткими паузами, чтобы тесты не ждали продакшен-тайминги
fn fast_settings() -> ImportConfig {
    ImportConfig {
        batch_delay_ms: 1,
        rate_limit_backoff_ms: 1,
        ..ImportConfig::default()
    }
}

fn executor(base_url: &str, settings: ImportConfig) -> ImportExecutor {
    ImportExecutor::new(
        Arc::new(ReportApiClient::new(base_url, "test-token")),
        Arc::new(ProgressTracker::new()),
        settings,
    )
}

#[tokio::test]
async fn three_row_csv_with_unknown_outlet_is_partial_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/reports")
        .match_header("authorization", "Bearer test-token")
        .with_status(201)
        .expect(2)
        .create_async()
        .await;

    let csv = format!(
        "{PRODUCTION_HEADER}\n\
         NSR067-1201;Nusantara Cafe;2025-03-14;Cafe;65.231.000;1.200.000;120;340;68,34;400;ok\n\
         GHOST-99;Outlet Hantu;2025-03-14;Cafe;100;0;1;1;50;10;\n\
         OUT-001;Outlet Utama;2025-03-14;hs;200;0;2;2;50;10;\n"
    );

    let outlets = reference_outlets();
    let progress = executor(&server.url(), fast_settings())
        .run_import("laporan.csv", csv.as_bytes(), &outlets)
        .await;

    mock.assert_async().await;
    assert_eq!(progress.status, ImportStatus::CompletedWithErrors);
    assert_eq!(progress.success_count, 2);
    assert_eq!(progress.failure_count, 1);
    assert_eq!(progress.total_rows, 3);
    assert_eq!(progress.percent_complete, 100.0);

    let failed: Vec<_> = progress
        .results
        .iter()
        .filter(|r| r.status == RowStatus::Error)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].row_index, 2);
    assert!(failed[0].message.contains("GHOST-99"));
}

#[tokio::test]
async fn target_percent_is_submitted_exactly_as_parsed() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/reports")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "targetPercent": 68.34,
            "revenuePrimary": 65231000.0,
            "reportDate": "2025-03-14",
        })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let csv = format!(
        "{PRODUCTION_HEADER}\n\
         NSR067-1201;Nusantara Cafe;2025-03-14;Cafe;65.231.000;0;120;340;68,34;400;\n"
    );

    let outlets = reference_outlets();
    let progress = executor(&server.url(), fast_settings())
        .run_import("laporan.csv", csv.as_bytes(), &outlets)
        .await;

    mock.assert_async().await;
    assert_eq!(progress.success_count, 1);
}

#[tokio::test]
async fn rate_limited_row_is_retried_twice_then_recorded_as_failed() {
    let mut server = mockito::Server::new_async().await;
    // 1 исходная попытка + ровно 2 повтора
    let mock = server
        .mock("POST", "/reports")
        .with_status(429)
        .expect(3)
        .create_async()
        .await;

    let csv = format!(
        "{PRODUCTION_HEADER}\n\
         OUT-001;Outlet Utama;2025-03-14;hs;100;0;1;1;50;10;\n"
    );

    let outlets = reference_outlets();
    let progress = executor(&server.url(), fast_settings())
        .run_import("laporan.csv", csv.as_bytes(), &outlets)
        .await;

    mock.assert_async().await;
    assert_eq!(progress.status, ImportStatus::Failed);
    assert_eq!(progress.failure_count, 1);
    assert!(progress.results[0].message.contains("rate limited"));
}

#[tokio::test]
async fn unprocessable_row_is_never_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/reports")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"report for this outlet and date already exists"}"#)
        .expect(1)
        .create_async()
        .await;

    let csv = format!(
        "{PRODUCTION_HEADER}\n\
         OUT-001;Outlet Utama;2025-03-14;hs;100;0;1;1;50;10;\n"
    );

    let outlets = reference_outlets();
    let progress = executor(&server.url(), fast_settings())
        .run_import("laporan.csv", csv.as_bytes(), &outlets)
        .await;

    mock.assert_async().await;
    assert_eq!(progress.failure_count, 1);
    assert!(progress.results[0]
        .message
        .contains("report for this outlet and date already exists"));
}

#[tokio::test]
async fn twenty_five_rows_are_paced_sequentially() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/reports")
        .with_status(201)
        .expect(25)
        .create_async()
        .await;

    let mut csv = String::from(PRODUCTION_HEADER);
    for day in 1..=25 {
        csv.push_str(&format!(
            "\nOUT-001;Outlet Utama;2025-03-{:02};hs;100;0;1;1;50;10;",
            day
        ));
    }

    let settings = ImportConfig {
        batch_delay_ms: 20,
        rate_limit_backoff_ms: 1,
        ..ImportConfig::default()
    };

    let outlets = reference_outlets();
    let started = Instant::now();
    let progress = executor(&server.url(), settings)
        .run_import("laporan.csv", csv.as_bytes(), &outlets)
        .await;
    let elapsed = started.elapsed();

    mock.assert_async().await;
    assert_eq!(progress.success_count, 25);
    assert_eq!(progress.failure_count, 0);
    assert_eq!(progress.status, ImportStatus::Completed);
    // 24 паузы между 25 последовательными отправками
    assert!(
        elapsed >= Duration::from_millis(24 * 20),
        "expected at least 480ms of pacing, got {:?}",
        elapsed
    );
}

#[tokio::test]
async fn transport_error_is_a_row_failure_without_retry() {
    // Порт 1 — соединение отклоняется, ответа нет
    let csv = format!(
        "{PRODUCTION_HEADER}\n\
         OUT-001;Outlet Utama;2025-03-14;hs;100;0;1;1;50;10;\n"
    );

    let outlets = reference_outlets();
    let progress = executor("http://127.0.0.1:1", fast_settings())
        .run_import("laporan.csv", csv.as_bytes(), &outlets)
        .await;

    assert_eq!(progress.status, ImportStatus::Failed);
    assert_eq!(progress.failure_count, 1);
    assert!(progress.results[0].message.contains("no response"));
}

#[tokio::test]
async fn oversized_file_aborts_the_whole_run() {
    let settings = ImportConfig {
        max_file_size_bytes: 64,
        ..fast_settings()
    };

    let csv = format!(
        "{PRODUCTION_HEADER}\n\
         OUT-001;Outlet Utama;2025-03-14;hs;100;0;1;1;50;10;\n"
    );

    let outlets = reference_outlets();
    let progress = executor("http://127.0.0.1:1", settings)
        .run_import("laporan.csv", csv.as_bytes(), &outlets)
        .await;

    assert_eq!(progress.status, ImportStatus::Failed);
    assert_eq!(progress.processed, 0);
    assert!(progress
        .error_message
        .as_deref()
        .unwrap_or_default()
        .contains("too large"));
}

#[tokio::test]
async fn unsupported_extension_aborts_the_whole_run() {
    let outlets = reference_outlets();
    let progress = executor("http://127.0.0.1:1", fast_settings())
        .run_import("laporan.pdf", b"whatever", &outlets)
        .await;

    assert_eq!(progress.status, ImportStatus::Failed);
    assert!(progress
        .error_message
        .as_deref()
        .unwrap_or_default()
        .contains("unsupported file format"));
}

#[tokio::test]
async fn positional_fallback_surfaces_a_warning() {
    let mut server = mockito::Server::new_async().await;
    // Дата в трёхколоночном файле не сопоставляется, поэтому до отправки
    // не доходит ни одной строки
    let mock = server
        .mock("POST", "/reports")
        .with_status(201)
        .expect(0)
        .create_async()
        .await;

    // Заголовки не распознаются по именам — колонки берутся по позиции
    let csv = "kolom1;kolom2;kolom3\nOUT-001;Outlet Utama;Hello Sunday\n";

    let outlets = reference_outlets();
    let progress = executor(&server.url(), fast_settings())
        .run_import("laporan.csv", csv.as_bytes(), &outlets)
        .await;

    mock.assert_async().await;
    assert_eq!(progress.warnings.len(), 1);
    assert!(progress.warnings[0].contains("assumed by position"));
    assert_eq!(progress.failure_count, 1);
    assert!(progress.results[0].message.contains("date is empty"));
}
