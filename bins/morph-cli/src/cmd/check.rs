use morph_engine::StandardConverter;

use crate::config::{CheckArgs, load_config};
use crate::error::CliError;

pub fn run(args: CheckArgs) -> Result<(), CliError> {
    let config = load_config(Some(args.config.as_str()))?;
    let catalog = &config.catalog;
    tracing::info!(
        numeric_widening = catalog.numeric_widening,
        string_parsing = catalog.string_parsing,
        containers = catalog.containers,
        json = catalog.json,
        "config is valid"
    );

    let converter = StandardConverter::from_config(&config);
    println!("catalog entries: {}", converter.catalog().len());
    Ok(())
}
