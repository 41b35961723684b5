use anyhow::Context;
use clap::Parser;
use employee_directory::core::Storage;
use employee_directory::utils::{logger, validation::Validate};
use employee_directory::{
    CliConfig, DirectoryError, Directory, Document, HttpDirectoryApi, LocalStorage, TomlConfig,
};
use std::sync::Arc;

const OUTPUT_FILE: &str = "index.html";

fn report(stage: &str, e: &DirectoryError) {
    tracing::error!("❌ {} failed: {}", stage, e);
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}: {}", stage, e);
    eprintln!("💡 {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting employee-directory");

    // 載入 TOML 配置（覆蓋命令列預設值）
    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path) {
            Ok(toml) => config.merge_toml(&toml),
            Err(e) => {
                report("Loading config", &e);
                std::process::exit(1);
            }
        }
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        report("Configuration validation", &e);
        std::process::exit(1);
    }

    let api = HttpDirectoryApi::from_config(&config).context("failed to build HTTP client")?;
    let mut directory = Directory::new(Arc::new(api), Document::with_layout())
        .with_concurrency(config.concurrent_requests);

    let mut failures = 0usize;

    if let Err(e) = directory.init_app().await {
        report("Loading employees", &e);
        failures += 1;
    }

    if let Some(employee_id) = config.employee {
        match directory.select_employee(employee_id).await {
            Ok(outcome) if outcome.is_ok() => {}
            Ok(outcome) => {
                eprintln!("❌ Rendering posts of employee {} failed", employee_id);
                failures += outcome.failed;
            }
            Err(e) => {
                report("Selecting employee", &e);
                failures += 1;
            }
        }
    }

    for post_id in &config.toggle {
        match directory.click_toggle(*post_id).await {
            Ok(outcome) => failures += outcome.failed,
            Err(e) => {
                report("Toggling comments", &e);
                failures += 1;
            }
        }
    }

    let html = directory.into_document().to_html();

    if config.stdout {
        print!("{}", html);
    } else {
        let storage = LocalStorage::new(config.output_path.clone());
        storage
            .write_file(OUTPUT_FILE, html.as_bytes())
            .await
            .with_context(|| format!("failed to write {}", storage.full_path(OUTPUT_FILE)))?;
        tracing::info!("📁 Page saved to: {}", storage.full_path(OUTPUT_FILE));
        println!("✅ Page saved to: {}", storage.full_path(OUTPUT_FILE));
    }

    if failures > 0 {
        tracing::warn!("⚠️ Finished with {} failed step(s)", failures);
        std::process::exit(2);
    }

    Ok(())
}
