use clap::{Args, ValueEnum};
use keyprox_core::config::ProximityConfig;
use keyprox_core::{KpResult, ProximityError, ProximityInfo};
use std::fs;
use tracing::info;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Arrays handed to the native decoder.
    Contract,
    /// Gesture-typing key arrays.
    Layout,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub config: ProximityConfig,

    #[arg(long, value_enum, default_value_t = ExportKind::Contract)]
    pub kind: ExportKind,

    /// Output file. Prints to stdout when absent.
    #[arg(short, long)]
    pub out: Option<String>,
}

pub fn run(args: &ExportArgs, info: &ProximityInfo) -> KpResult<()> {
    let json = match args.kind {
        ExportKind::Contract => {
            let contract = info.contract().ok_or_else(|| {
                ProximityError::Validation("keyboard has no area, no contract to export".to_string())
            })?;
            serde_json::to_string_pretty(contract)?
        }
        ExportKind::Layout => serde_json::to_string_pretty(&info.keyboard_layout())?,
    };

    match &args.out {
        Some(path) => {
            fs::write(path, json)?;
            info!("💾 Wrote {:?} export to {}", args.kind, path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
