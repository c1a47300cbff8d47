use crate::reports;
use clap::Args;
use keyprox_core::config::ProximityConfig;
use keyprox_core::{KpResult, ProximityInfo};

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub config: ProximityConfig,

    /// List cells without neighbors too.
    #[arg(long, default_value_t = false)]
    pub all_cells: bool,

    /// Show the per-key sweet spots, if the keyboard is calibrated.
    #[arg(long, default_value_t = false)]
    pub sweet_spots: bool,
}

pub fn run(args: &InspectArgs, info: &ProximityInfo) -> KpResult<()> {
    reports::print_summary(info);

    if info.is_degenerate() {
        println!("Keyboard has no area; nothing is indexed.");
        return Ok(());
    }

    reports::print_cell_table(info, args.all_cells);
    if args.sweet_spots {
        reports::print_sweet_spots(info);
    }
    Ok(())
}
