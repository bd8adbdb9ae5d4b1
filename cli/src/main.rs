//! CLI entrypoint for Case Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    AuditLogger, CouncilProgress, CouncilService, NoAuditLogger, RunAnalysisUseCase, build_agents,
};
use council_domain::{AnalysisRequest, Question, Roster};
use council_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, InMemoryCaseStore, JsonlAuditLogger, ProviderKind,
    build_backend,
};
use council_presentation::{
    ApiRouter, Cli, Command, ConsoleFormatter, OutputFormat, ProgressMode, serve,
};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // stderr keeps stdout clean for JSON output and the serve protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let Some(command) = cli.command.clone() else {
        bail!("A command is required. Run with --help for usage.");
    };

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    info!("Starting Case Council");

    let output = cli.output.unwrap_or(match config.output.format {
        Some(FileOutputFormat::Json) => OutputFormat::Json,
        Some(FileOutputFormat::Full) | None => OutputFormat::Full,
    });
    if !config.output.color {
        colored::control::set_override(false);
    }

    if let Command::BiasCheck { text, file } = &command {
        let text = match (text, file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, None) => bail!("Provide text or --file"),
        };
        // Bias checks never reach a backend or the case store
        let mut offline = config.clone();
        offline.provider.kind = ProviderKind::Mock;
        offline.cases.path = None;
        let report = build_service(&offline, &cli, &command)?.bias_check(&text);
        match output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Full => print!("{}", ConsoleFormatter::format_bias(&report)),
        }
        return Ok(());
    }

    let service = Arc::new(build_service(&config, &cli, &command)?);

    match command {
        Command::Analyze {
            case_id,
            question,
            force,
        } => {
            let question = match question {
                Some(text) => Question::new(text)?,
                None => service.default_question()?,
            };
            let request = AnalysisRequest::new(&case_id, question)?;
            let result = service.analyze(request, force).await?;
            print_result(output, &result);
        }
        Command::Cached { case_id, question } => {
            let question = match question {
                Some(text) => Question::new(text)?,
                None => service.default_question()?,
            };
            match service.cached(&case_id, &question).await {
                Some(result) => print_result(output, &result),
                None => bail!("No stored analysis for case {}", case_id),
            }
        }
        Command::Serve => {
            let router = Arc::new(ApiRouter::new(service));
            serve(router, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
        }
        Command::Health => {
            println!("{}", serde_json::to_string_pretty(&service.health())?);
        }
        Command::BiasCheck { .. } => {}
    }

    Ok(())
}

/// Wire config, backend, case store and audit log into a service
fn build_service(config: &FileConfig, cli: &Cli, command: &Command) -> Result<CouncilService> {
    let params = config.to_council_params()?;

    let backend = build_backend(&config.provider)?;
    let provider = backend.name().to_string();
    let agents = build_agents(&Roster::default(), backend);

    let case_store = match &config.cases.path {
        Some(path) => InMemoryCaseStore::from_json_file(path)?,
        None => {
            warn!(
                "No [cases] path configured (set it or COUNCIL_CASES__PATH); every case lookup will miss"
            );
            InMemoryCaseStore::default()
        }
    };

    let audit: Arc<dyn AuditLogger> = match config
        .logging
        .audit_log
        .as_ref()
        .and_then(JsonlAuditLogger::new)
    {
        Some(logger) => {
            info!(path = %logger.path().display(), "Audit log enabled");
            Arc::new(logger)
        }
        None => Arc::new(NoAuditLogger),
    };

    // No progress while serving
    let serving = matches!(command, Command::Serve);
    let progress: Arc<dyn CouncilProgress> =
        ProgressMode::detect(cli.quiet || serving, std::io::stderr().is_terminal()).reporter();

    let use_case = RunAnalysisUseCase::new(agents, Arc::new(case_store), params)
        .with_audit_logger(Arc::clone(&audit));

    Ok(CouncilService::new(use_case)
        .with_audit_logger(audit)
        .with_progress(progress)
        .with_provider_name(provider))
}

fn print_result(output: OutputFormat, result: &council_domain::AnalysisResult) {
    let rendered = match output {
        OutputFormat::Full => ConsoleFormatter::format(result),
        OutputFormat::Json => ConsoleFormatter::format_json(result),
    };
    println!("{}", rendered);
}
