use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use contracts::usecases::u101_import_reports::{ImportStatus, RowStatus};
use importer::shared::config;
use importer::usecases::u101_import_reports::progress_tracker::ProgressTracker;
use importer::usecases::u101_import_reports::report_api_client::ReportApiClient;
use importer::usecases::u101_import_reports::template;
use importer::usecases::u101_import_reports::ImportExecutor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Создаем директорию для логов
    let log_dir = Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("importer.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = config::load_config()?;
    let client = Arc::new(ReportApiClient::new(
        config.api.base_url.clone(),
        config.api.token.clone(),
    ));

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(|s| s.as_str()) {
        Some("template") => {
            // Шаблон сеется реальными аутлетами, когда API доступен
            let outlets = match client.fetch_outlets().await {
                Ok(outlets) => outlets,
                Err(e) => {
                    tracing::warn!("Could not fetch outlets, using empty template seed: {}", e);
                    Vec::new()
                }
            };
            let template = template::render_template(&outlets);
            let out_path = args
                .get(1)
                .cloned()
                .unwrap_or_else(|| template.file_name.clone());
            std::fs::write(&out_path, &template.bytes)
                .with_context(|| format!("failed to write template to {}", out_path))?;
            println!("Template written to {}", out_path);
            Ok(())
        }
        Some(path) => run_import(client, config.import, path).await,
        None => {
            eprintln!("Usage: importer <file.csv|file.xlsx|file.xls>");
            eprintln!("       importer template [output.csv]");
            std::process::exit(2);
        }
    }
}

async fn run_import(
    client: Arc<ReportApiClient>,
    settings: config::ImportConfig,
    path: &str,
) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path))?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);

    // Справочник аутлетов загружается до начала прогона
    let outlets = client
        .fetch_outlets()
        .await
        .context("failed to load reference outlets")?;

    let tracker = Arc::new(ProgressTracker::new());
    let executor = ImportExecutor::new(client, tracker, settings);
    let progress = executor.run_import(file_name, &bytes, &outlets).await;

    for warning in &progress.warnings {
        println!("warning: {}", warning);
    }
    for outcome in &progress.results {
        if outcome.status == RowStatus::Error {
            println!("row {}: {}", outcome.row_index, outcome.message);
        }
    }
    println!(
        "Import {:?}: {} succeeded, {} failed ({} rows total)",
        progress.status, progress.success_count, progress.failure_count, progress.total_rows
    );

    if progress.status == ImportStatus::Failed {
        if let Some(message) = &progress.error_message {
            anyhow::bail!("import failed: {}", message);
        }
        anyhow::bail!("import failed: no rows were accepted");
    }
    Ok(())
}
