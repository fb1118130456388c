// Coin Redemption Status - CLI
// Checks one drop from the terminal and prints a status table

use anyhow::Result;
use colored::Colorize;
use std::env;

use coin_redemption::{present_drop, Config, DropRegistry, HttpBalanceApi, StatusLabel};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let config = Config::load()?;
    let registry = match &config.data.drops_file {
        Some(path) => DropRegistry::from_file(path)?,
        None => DropRegistry::defaults(),
    };

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some(slug) => check_drop(&config, &registry, slug),
        None => {
            list_drops(&registry);
            Ok(())
        }
    }
}

fn list_drops(registry: &DropRegistry) {
    println!("Known drops:");
    for drop in registry.iter() {
        println!("  {:<30} {}", drop.slug, drop.title);
    }
    println!("\nUsage: coin-redemption <drop-slug>");
}

fn check_drop(config: &Config, registry: &DropRegistry, slug: &str) -> Result<()> {
    let def = match registry.get(slug) {
        Some(def) => def,
        None => {
            eprintln!("Unknown drop: {}", slug);
            eprintln!("Run without arguments to list known drops.");
            std::process::exit(1);
        }
    };

    let api = HttpBalanceApi::new(
        &config.providers.bulk_base,
        &config.providers.fallback_base,
        config.provider_timeout(),
    )?;

    println!("Checking {} ...\n", def.title);

    let view = present_drop(def, &config.data.dir, &config.explorer_base, &api)?;

    for section in &view.sections {
        println!(
            "{} ({} coins, source: {})",
            section.label.bold(),
            section.coins.len(),
            section.source
        );

        for coin in &section.coins {
            let status = paint_status(coin.status.label);
            println!(
                "  {:<12} {:<42} {:>14.8}  {}",
                coin.serial_number, coin.address, coin.final_balance, status
            );
        }
        println!();
    }

    println!("✓ {} checked", view.title);
    Ok(())
}

/// Terminal rendering of the web hex colors
fn paint_status(label: StatusLabel) -> colored::ColoredString {
    match label {
        StatusLabel::NeverLoaded => label.as_str().dimmed(),
        StatusLabel::NeverRedeemed => label.as_str().green(),
        StatusLabel::FullyRedeemed => label.as_str().red(),
        StatusLabel::PartialRedeemed => label.as_str().yellow(),
        StatusLabel::Error => label.as_str().red().bold(),
    }
}
