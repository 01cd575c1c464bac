use campaign_dash::utils::error::DashError;
use campaign_dash::utils::validation::{validate_required_field, Validate};
use campaign_dash::utils::logger;
use campaign_dash::{app, web, CampaignRequest, CliConfig, Command, DashboardConfig};
use clap::Parser;

async fn run(cli: &CliConfig, config: DashboardConfig) -> Result<Option<String>, DashError> {
    match &cli.command {
        Command::Analytics { .. } => {
            let chart = app::run_analytics(&config, cli.monitor).await?;
            Ok(Some(chart.output_path))
        }
        Command::Campaign { url, .. } => {
            let request = CampaignRequest {
                email: validate_required_field("email", &config.campaign.email)?.clone(),
                password: validate_required_field("password", &config.campaign.password)?
                    .clone(),
                campaign_url: url.clone(),
            };
            let chart = app::run_campaign(&config, request, cli.monitor).await?;
            Ok(Some(chart.output_path))
        }
        Command::Serve { .. } => {
            web::serve(config, cli.monitor)
                .await
                .map_err(|e| DashError::ConfigError {
                    message: format!("{:#}", e),
                })?;
            Ok(None)
        }
    }
}

fn report_failure(e: &DashError) -> i32 {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    e.severity().exit_code()
}

#[tokio::main]
async fn main() {
    // A missing .env is fine; the variables may come from the shell.
    let _ = dotenvy::dotenv();

    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting campaign-dash");
    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let config = match cli.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            std::process::exit(report_failure(&e));
        }
    };

    match run(&cli, config).await {
        Ok(Some(output_path)) => {
            tracing::info!("✅ Chart rendered");
            println!("✅ Chart rendered");
            println!("📁 Output saved to: {}", output_path);
        }
        Ok(None) => {}
        Err(e) => std::process::exit(report_failure(&e)),
    }
}
