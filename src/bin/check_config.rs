//! Check IBC Withdraw Configuration
//!
//! Loads and validates the middleware configuration, then prints the params
//! the middleware would start with. With `--address <bech32>`, also prints
//! the local-prefix form of that address, which is the account a transfer
//! from it to "itself" would land in.

use anyhow::{Context, Result};
use ibc_withdraw::address::AddressCorrelator;
use ibc_withdraw::config::{Config, CONFIG_PATH_ENV};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("Check IBC withdraw configuration");
        println!();
        println!("Usage: check_config [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --config <path>     Use custom config file path");
        println!("  --address <bech32>  Print the local-prefix form of an address");
        println!("  --help, -h          Show this help message");
        println!();
        println!("Environment variables:");
        println!("  {}    Path to config file (overridden by --config)", CONFIG_PATH_ENV);
        return Ok(());
    }

    let mut config_path = None;
    let mut address = None;

    let mut i = 1; // Skip program name
    while i < args.len() {
        if args[i] == "--config" && i + 1 < args.len() {
            config_path = Some(args[i + 1].clone());
            i += 1;
        } else if args[i] == "--address" && i + 1 < args.len() {
            address = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            info!("Using custom config: {}", path);
            Config::load_from_path(&path)?
        }
        None => Config::load()?,
    };
    info!("Configuration loaded successfully");

    let params = config.withdraw.to_params();
    println!("chain_id:          {}", config.chain.chain_id);
    println!("bech32_prefix:     {}", config.chain.bech32_prefix);
    println!("native_denom:      {}", config.chain.native_denom);
    println!("enable_withdraw:   {}", params.enable_withdraw);
    println!("enabled_channels:  {:?}", params.enabled_channels);
    println!("evm_channels:      {:?}", params.evm_channels);
    println!("packet_timeout:    {}s", params.packet_timeout.as_secs());

    if let Some(address) = address {
        let correlator = AddressCorrelator::new(&config.chain.bech32_prefix);
        let local = correlator
            .to_local(&address)
            .with_context(|| format!("Failed to convert address '{}'", address))?;
        println!("local_address:     {}", local);
    }

    Ok(())
}
