//! Main entry point for the transaction race harness.
//!
//! This binary runs exactly one race: it submits a low-fee parameter
//! update and a high-fee swap from the same sender in parallel, waits for
//! both to be mined, and reports which one the chain executed first.

use clap::Parser;
use racer_account::implementations::local::create_local_account;
use racer_account::AccountService;
use racer_chain::implementations::alloy::create_chain_client;
use racer_chain::ChainInterface;
use racer_config::{Config, ConfigError};
use racer_core::fees::{gwei, FeeTips};
use racer_core::{RaceCoordinator, RaceSettings};
use std::path::PathBuf;
use std::sync::Arc;

mod report;

/// Command-line arguments for the race harness.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the race harness.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads and validates configuration from file
/// 4. Wires the chain and account collaborators into the coordinator
/// 5. Runs one race and prints the outcome
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	// Create env filter with default from args
	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started race harness");

	// Load configuration
	let config = Config::from_file(&args.config)?;
	tracing::info!(config = %args.config.display(), "Loaded configuration");

	let settings = race_settings(&config)?;
	let chain: Arc<dyn ChainInterface> = Arc::from(create_chain_client(&config.chain)?);
	let account = Arc::new(AccountService::new(create_local_account(
		&config.account.private_key,
	)?));

	let coordinator = RaceCoordinator::new(chain, account, settings);
	let result = coordinator.run().await?;

	report::print_race_summary(&result);

	Ok(())
}

/// Builds the race inputs from validated configuration.
fn race_settings(config: &Config) -> Result<RaceSettings, ConfigError> {
	Ok(RaceSettings {
		amm: config.contracts.amm.clone(),
		storage: config.contracts.storage.clone(),
		pair_id: config.contracts.pair_id,
		tips: FeeTips {
			high: gwei(config.race.tip_high_gwei),
			low: gwei(config.race.tip_low_gwei),
		},
		swap_amount_x: config.race.swap_amount_x()?,
		min_amount_y_out: config.race.min_amount_y_out()?,
		concentration: config.race.concentration()?,
		mult_x: config.race.mult_x()?,
		mult_y: config.race.mult_y()?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::U256;

	const TEST_CONFIG: &str = r#"
[account]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"

[contracts]
amm = "0xDc64a140Aa3E981100a9becA4E685f962f0cF6C9"
storage = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
pair_id = "0x667546a103822a3ea5b74bdf319f969f53de0a26339708852cfa21db6575a3be"

[race]
tip_high_gwei = 12
tip_low_gwei = 2
"#;

	#[test]
	fn test_args_default_values() {
		let args = Args {
			config: PathBuf::from("config.toml"),
			log_level: "info".to_string(),
		};

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_race_settings_from_config() {
		let config: Config = TEST_CONFIG.parse().unwrap();
		let settings = race_settings(&config).unwrap();

		assert_eq!(
			settings.amm.to_string(),
			"0xdc64a140aa3e981100a9beca4e685f962f0cf6c9"
		);
		assert_eq!(
			settings.storage.to_string(),
			"0xe7f1725e7734ce288f8367e1bb143e90bb3f0512"
		);
		assert_eq!(settings.pair_id.as_slice()[0], 0x66);
		assert_eq!(settings.tips.high, 12_000_000_000);
		assert_eq!(settings.tips.low, 2_000_000_000);
		assert_eq!(settings.concentration, U256::from(150));
		assert_eq!(
			settings.swap_amount_x,
			U256::from(10).pow(U256::from(18))
		);
	}
}
