use super::parse_code;
use crate::reports;
use clap::Args;
use keyprox_core::config::ProximityConfig;
use keyprox_core::consts::NOT_A_CODE;
use keyprox_core::{KpResult, ProximityInfo};

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub config: ProximityConfig,

    #[arg(short, long, allow_hyphen_values = true)]
    pub x: i32,

    #[arg(short, long, allow_hyphen_values = true)]
    pub y: i32,

    /// Key under the finger, as a character or a numeric code.
    #[arg(short, long, value_parser = parse_code, allow_hyphen_values = true)]
    pub primary: Option<i32>,

    /// Size of the candidate array.
    #[arg(short, long, default_value_t = 16)]
    pub slots: usize,

    /// Clamp the point onto the keyboard before looking it up.
    #[arg(long, default_value_t = false)]
    pub clamp: bool,
}

pub fn run(args: &QueryArgs, info: &ProximityInfo) -> KpResult<()> {
    let neighbors = if args.clamp {
        info.nearest_keys_clamped(args.x, args.y)
    } else {
        info.nearest_keys(args.x, args.y)
    };
    reports::print_neighbors(args.x, args.y, neighbors);

    let mut dest = vec![NOT_A_CODE; args.slots];
    let written = info.fill_nearest_key_codes(
        args.x,
        args.y,
        args.primary.unwrap_or(NOT_A_CODE),
        &mut dest,
    );
    reports::print_candidates(&dest, written);
    Ok(())
}
