use morph_api::ConvertExt;
use morph_engine::{Adapter, StandardConverter};

use crate::config::{ConvertArgs, TargetKind, load_config};
use crate::error::CliError;

pub fn run(args: ConvertArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let converter = StandardConverter::from_config(&config);
    let adapter = list_adapter(&converter, &args.separator)?;

    tracing::debug!(to = ?args.to, input = %args.input, "converting");
    let rendered = render(&adapter, args.to, args.input)?;
    println!("{rendered}");
    Ok(())
}

/// Adapter with a `String ↔ Vec<String>` rule splitting on `separator`.
pub fn list_adapter(converter: &StandardConverter, separator: &str) -> Result<Adapter, CliError> {
    if separator.is_empty() {
        return Err(CliError::EmptySeparator);
    }
    let split_on = separator.to_string();
    let join_with = separator.to_string();
    let adapter = converter.adapt().rule_fn(
        move |s: &String| s.split(split_on.as_str()).map(String::from).collect::<Vec<_>>(),
        move |parts: &Vec<String>| parts.join(&join_with),
    )?;
    Ok(adapter)
}

/// Convert `input` to `to` and format the result for stdout.
pub fn render(adapter: &Adapter, to: TargetKind, input: String) -> Result<String, CliError> {
    let rendered = match to {
        TargetKind::I64 => adapter.convert::<i64>(input)?.to_string(),
        TargetKind::U64 => adapter.convert::<u64>(input)?.to_string(),
        TargetKind::F64 => adapter.convert::<f64>(input)?.to_string(),
        TargetKind::Bool => adapter.convert::<bool>(input)?.to_string(),
        TargetKind::Char => adapter.convert::<char>(input)?.to_string(),
        TargetKind::String => adapter.convert::<String>(input)?,
        TargetKind::Json => adapter.convert::<serde_json::Value>(input)?.to_string(),
        TargetKind::List => serde_json::to_string(&adapter.convert::<Vec<String>>(input)?)?,
    };
    Ok(rendered)
}
