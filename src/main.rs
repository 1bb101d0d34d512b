use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use olympiad_catalog::config::cli::{Command, ListArgs};
use olympiad_catalog::utils::{logger, validation::Validate};
use olympiad_catalog::{AppError, Catalog, CliConfig, Olympiad, Resource, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (若有指定)
    let toml_config = match &cli.config {
        Some(path) => {
            let mut config = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?;
            cli.apply_overrides(&mut config);
            Some(config)
        }
        None => None,
    };

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(toml_config.as_ref().and_then(|c| c.log_level()));
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting olympiad-catalog CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    let validation = match &toml_config {
        Some(config) => config.validate().and_then(|_| cli.validate()),
        None => cli.validate(),
    };
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let catalog = match &toml_config {
        Some(config) => Catalog::with_settings_defaults(config, config.settings_defaults())?,
        None => Catalog::from_config(&cli)?,
    };

    let outcome = match &cli.command {
        Command::List(args) => list(&catalog, args).await,
        Command::Show { id } => show(&catalog, *id).await,
        Command::Subjects => subjects(&catalog).await,
    };

    if let Err(e) = outcome {
        tracing::error!("❌ Request failed: {:?}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        if e.is_retryable() {
            eprintln!("💡 Retry the same command once the catalog is reachable again");
        }
        std::process::exit(if e.is_retryable() { 2 } else { 1 });
    }

    Ok(())
}

fn failure_cause(cause: Option<AppError>) -> AppError {
    cause.unwrap_or(AppError::UnknownError { message: None })
}

async fn list(catalog: &Catalog, args: &ListArgs) -> Result<(), AppError> {
    let page_size = args
        .page_size
        .unwrap_or_else(|| catalog.observe_page_size.current());

    let mut pages = catalog
        .get_paginated_olympiads
        .execute(args.page, page_size, Some(args.filter()));

    while let Some(resource) = pages.next().await {
        match resource {
            Resource::Loading => tracing::debug!("⏳ Loading page {}...", args.page),
            Resource::Success(page) => {
                let meta = page.meta;
                println!(
                    "Page {}/{} ({} olympiads in total, {} per page)",
                    meta.current_page, meta.total_pages, meta.total_items, meta.page_size
                );
                if page.items.is_empty() {
                    println!("  (no olympiads on this page)");
                }
                for olympiad in &page.items {
                    print_summary(olympiad);
                }
            }
            Resource::Failure(cause) => return Err(failure_cause(cause)),
        }
    }
    Ok(())
}

async fn show(catalog: &Catalog, id: i64) -> Result<(), AppError> {
    let resource = catalog.get_olympiad_by_id.execute(id).await;
    resource.fold(
        |olympiad| {
            print_details(&olympiad);
            Ok(())
        },
        |cause| Err(failure_cause(cause)),
        || Ok(()),
    )
}

async fn subjects(catalog: &Catalog) -> Result<(), AppError> {
    match catalog.get_available_subjects.execute().await {
        Resource::Success(subjects) => {
            for subject in subjects {
                println!("{:>4}  {}", subject.id, subject.name);
            }
            Ok(())
        }
        Resource::Failure(cause) => Err(failure_cause(cause)),
        Resource::Loading => Ok(()),
    }
}

fn print_summary(olympiad: &Olympiad) {
    let subjects: Vec<&str> = olympiad.subjects.iter().map(|s| s.name.as_str()).collect();
    println!(
        "{:>5}  {}  [{}]  ({})",
        olympiad.id,
        olympiad.name,
        subjects.join(", "),
        olympiad.grade_range_label()
    );
}

fn print_details(olympiad: &Olympiad) {
    println!("#{} {}", olympiad.id, olympiad.name);
    println!("Grades:   {}", olympiad.grade_range_label());
    let subjects: Vec<&str> = olympiad.subjects.iter().map(|s| s.name.as_str()).collect();
    println!("Subjects: {}", subjects.join(", "));
    if let Some(description) = &olympiad.description {
        println!("About:    {}", description);
    }
    if let Some(link) = &olympiad.link {
        println!("Link:     {}", link);
    }
    for stage in &olympiad.stages {
        let date = |d: Option<chrono::NaiveDate>| d.map_or("?".to_string(), |d| d.to_string());
        println!(
            "  - {}: {} .. {}",
            stage.name,
            date(stage.start_date),
            date(stage.end_date)
        );
    }
}
