mod cli;
mod logging;

use bom_inspector::adapters::outbound::network::{BomServiceClient, CachingScanService};
use bom_inspector::adapters::outbound::storage::InMemoryRepositoryStore;
use bom_inspector::application::dto::{
    DownloadDecision, RepositoryOutcome, StatusReport, SweepReport,
};
use bom_inspector::application::{InspectionService, ReconciliationScheduler, SweepKind};
use bom_inspector::config::{self, ConfigFile, CONFIG_FILENAME};
use bom_inspector::inspection::domain::RepoPath;
use bom_inspector::ports::inbound::InspectionPort;
use bom_inspector::shared::error::{ExitCode, InspectionError};
use bom_inspector::shared::Result;
use cli::{Args, Command};
use owo_colors::OwoColorize;
use std::path::Path;
use std::process;
use std::sync::Arc;

type Service = InspectionService<InMemoryRepositoryStore, CachingScanService<BomServiceClient>>;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    if let Err(e) = logging::init_tracing(&args.log_level, args.log_format) {
        eprintln!("{} {}", "error:".red(), e);
        process::exit(ExitCode::ApplicationError.as_i32());
    }

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;

    if let Command::Status = args.command {
        let report = config::status_report(&config);
        print_status(&report);
        return Ok(if report.is_valid() {
            ExitCode::Success
        } else {
            ExitCode::RepositoryFailures
        });
    }

    config::validate_config(&config)?;
    let config = Arc::new(config);

    // Create adapters (Dependency Injection)
    let store = Arc::new(InMemoryRepositoryStore::load(&args.snapshot)?);
    let client = BomServiceClient::new(&config.scan_service)?;
    let scan_service = Arc::new(CachingScanService::new(client));
    let service = Arc::new(InspectionService::new(
        Arc::clone(&store),
        scan_service,
        Arc::clone(&config),
    ));

    let code = execute(args.command, &service, &config).await?;

    store.save(&args.snapshot)?;
    Ok(code)
}

async fn execute(
    command: Command,
    service: &Arc<Service>,
    config: &ConfigFile,
) -> Result<ExitCode> {
    let code = match command {
        Command::Initialize { repos } => sweep(service, config, SweepKind::Initialize, repos).await,
        Command::InspectDelta { repos } => {
            sweep(service, config, SweepKind::InspectDelta, repos).await
        }
        Command::UpdateMetadata { repos } => {
            sweep(service, config, SweepKind::UpdateMetadata, repos).await
        }
        Command::Reinspect { properties } => {
            let count = service.reinspect_failures(&properties)?;
            println!("{} artifact(s) put back under inspection", count);
            ExitCode::Success
        }
        Command::DeleteProperties { repos, properties } => {
            let repos = if repos.is_empty() {
                service.configured_repositories()
            } else {
                repos
            };
            let count = service.delete_inspection_properties(&repos, &properties)?;
            println!("Inspection properties removed from {} item(s)", count);
            ExitCode::Success
        }
        Command::ArtifactEvent { path } => {
            let path = parse_path(&path)?;
            if service.handle_artifact_created_or_moved(&path)? {
                println!("{} is under inspection", path);
            } else {
                println!("{} is not under inspection", path);
            }
            ExitCode::Success
        }
        Command::CheckDownload { path } => {
            let path = parse_path(&path)?;
            match service.handle_before_download(&path) {
                DownloadDecision::Allow => {
                    println!("{} {}", "ALLOW".green(), path);
                    ExitCode::Success
                }
                DownloadDecision::Block { reason, status } => {
                    println!("{} ({}) {}", "BLOCK".red(), status, reason);
                    ExitCode::RepositoryFailures
                }
            }
        }
        Command::Status => {
            let report = service.status_report();
            print_status(&report);
            if report.is_valid() {
                ExitCode::Success
            } else {
                ExitCode::RepositoryFailures
            }
        }
    };
    Ok(code)
}

async fn sweep(
    service: &Arc<Service>,
    config: &ConfigFile,
    kind: SweepKind,
    repos: Vec<String>,
) -> ExitCode {
    let scheduler =
        ReconciliationScheduler::new(Arc::clone(service), config.scan_service.concurrency);
    let report = if repos.is_empty() {
        scheduler.run_sweep(kind).await
    } else {
        scheduler.run_sweep_over(kind, &repos).await
    };
    print_sweep(kind, &report);

    if report.has_failures() {
        ExitCode::RepositoryFailures
    } else {
        ExitCode::Success
    }
}

fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = path {
        return config::load_config_from_path(path);
    }
    let cwd = std::env::current_dir()?;
    config::discover_config(&cwd)?.ok_or_else(|| {
        InspectionError::ConfigFile {
            details: format!("No {} found in {}", CONFIG_FILENAME, cwd.display()),
            hint: "Create the file or pass --config <PATH>".to_string(),
        }
        .into()
    })
}

fn parse_path(raw: &str) -> Result<RepoPath> {
    RepoPath::parse(raw).ok_or_else(|| anyhow::anyhow!("Invalid item path: '{}'", raw))
}

fn print_sweep(kind: SweepKind, report: &SweepReport) {
    println!("{} {}", "Sweep:".bold(), kind);
    for entry in &report.entries {
        match &entry.outcome {
            RepositoryOutcome::Completed(summary) => {
                println!("  {} {}: {}", "✔".green(), entry.repo_key, summary)
            }
            RepositoryOutcome::Failed(reason) => {
                println!("  {} {}: {}", "✘".red(), entry.repo_key, reason)
            }
        }
    }
}

fn print_status(report: &StatusReport) {
    for module in &report.modules {
        let state = if module.enabled {
            "enabled".green().to_string()
        } else {
            "disabled".yellow().to_string()
        };
        let validity = if module.is_valid() {
            "valid".green().to_string()
        } else {
            "invalid".red().to_string()
        };
        println!("{}: {}, {}", module.name.bold(), state, validity);
        for error in &module.errors {
            println!("  - {}: {}", error.property, error.message);
        }
    }
}
