use clap::Parser;
use pdd_action::utils::{logger, validation::Validate, workflow};
use pdd_action::{ActionConfig, CliArgs, GitHubClient, PddAction, PddError, RunSummary, TomlConfig};

fn load_config(args: &CliArgs) -> Result<ActionConfig, PddError> {
    let mut config = ActionConfig::from_env()?;
    args.apply(&mut config);

    if let Some(path) = config.config_path.clone() {
        tracing::info!("Loading overrides from {}", path.display());
        let toml = TomlConfig::from_file(&path)?;
        config.apply_toml(&toml);
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: ActionConfig) -> Result<RunSummary, PddError> {
    let client = GitHubClient::new(config.token(), config.repository.parse()?, &config.api_url)?;
    tracing::info!("Repository: {}", client.repo());

    PddAction::new(client, config).run().await
}

fn report(summary: &RunSummary) -> Result<(), PddError> {
    workflow::set_output("issues_created", &summary.created.len().to_string())?;
    workflow::set_output("files_updated", &summary.updated_files.to_string())?;

    for comment in &summary.created {
        if let Some(url) = &comment.issue_url {
            println!("{}:{} -> {}", comment.file_path, comment.line_number, url);
        }
    }
    if summary.failed_updates > 0 {
        workflow::warning(&format!(
            "{} file(s) could not be updated with their issue links",
            summary.failed_updates
        ));
    }
    Ok(())
}

fn fail(e: &PddError) -> ! {
    tracing::error!(
        "PDD action failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
    workflow::error(&e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting pdd-action");
    tracing::debug!("CLI args: {:?}", args);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    match run(config).await {
        Ok(summary) => {
            if let Err(e) = report(&summary) {
                workflow::warning(&format!("Failed to write step outputs: {}", e));
            }
            match &summary.skipped_reason {
                Some(reason) => workflow::notice(&format!("Nothing to do: {}", reason)),
                None => tracing::info!(
                    "PDD action completed: {} scanned, {} new, {} issues created, {} files updated",
                    summary.scanned,
                    summary.unprocessed,
                    summary.created.len(),
                    summary.updated_files
                ),
            }
        }
        Err(e) if e.exit_code() == 0 => {
            workflow::warning(&e.user_friendly_message());
        }
        Err(e) => fail(&e),
    }
}
