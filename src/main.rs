use clap::Parser;
use finqa::config::{set_thread_log_level, Config, LogLevel, ServiceSettings};
use finqa::session::chat::{run_interactive_session, RunOptions};
use finqa::session::AnswerClient;
use finqa::{log_error, log_info};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "finqa")]
#[command(version = "0.1.0")]
#[command(about = "Ask finance questions to a hosted knowledge base")]
struct FinqaArgs {
	/// TOML configuration file; environment variables still take precedence
	#[arg(long, short, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Log level: none, info or debug (runtime only, overrides the config file)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<LogLevel>,

	/// Print new lines below the previous ones instead of redrawing the screen
	#[arg(long)]
	no_clear: bool,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
	let args = FinqaArgs::parse();

	// Load configuration once; it stays constant for the whole process
	let mut config = Config::load(args.config.as_deref())?;
	if let Some(level) = args.log_level {
		config.log_level = level;
	}
	set_thread_log_level(config.get_log_level());

	if let Some(path) = &config.config_path {
		log_info!("Loaded configuration from {}", path.display());
	}

	// A bad configuration is reported now and again as the answer to every question
	let settings = ServiceSettings::from_config(&config);
	match &settings {
		Ok(settings) => log_info!(
			"Using project '{}' (deployment '{}') at {}",
			settings.project_name,
			settings.deployment_name,
			settings.endpoint
		),
		Err(e) => log_error!("Configuration error: {}", e),
	}

	let client = Arc::new(AnswerClient::new(settings.as_ref()));
	let options = RunOptions {
		clear_screen: !args.no_clear,
	};

	run_interactive_session(client, options).await
}
