use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keyprox_core::consts::NOT_A_CODE;
use keyprox_core::keycodes::{is_real_character, printable_code};
use keyprox_core::proximity::NeighborList;
use keyprox_core::ProximityInfo;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, columns: std::ops::Range<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn print_summary(info: &ProximityInfo) {
    let params = info.params();
    let (mcw, mch) = info.most_common_key_size();
    let config = info.config();

    let mut table = new_table();
    let rows: Vec<(&str, String)> = vec![
        ("Keyboard", format!("{} x {} px", params.keyboard_min_width, params.keyboard_height)),
        ("Keys", info.keys().len().to_string()),
        ("Most common key", format!("{} x {} px", mcw, mch)),
        ("Grid", format!("{} x {} cells", params.grid_width, params.grid_height)),
        ("Cell", format!("{} x {} px", params.cell_width, params.cell_height)),
        (
            "Search threshold",
            format!("{} px ({} x key width)", info.grid().threshold(), config.search_distance),
        ),
        ("Neighbor entries", info.grid().total_neighbors().to_string()),
        (
            "Indexed keys",
            info.contract().map_or(0, |c| c.key_count()).to_string(),
        ),
        (
            "Touch correction",
            if info.sweet_spots().is_some() { "ON" } else { "OFF" }.to_string(),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    println!("{}", table);
}

pub fn print_sweet_spots(info: &ProximityInfo) {
    let Some(spots) = info.sweet_spots() else {
        println!("\nTouch position correction is off; no sweet spots.");
        return;
    };
    let Some(contract) = info.contract() else {
        return;
    };

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("X"),
        Cell::new("Y"),
        Cell::new("Center X"),
        Cell::new("Center Y"),
        Cell::new("Radius").fg(Color::Cyan),
    ]);
    align_right(&mut table, 1..6);

    for (i, &code) in contract.key_char_codes.iter().enumerate() {
        let Some(spot) = spots.get(i) else {
            break;
        };
        table.add_row(vec![
            Cell::new(printable_code(code)).add_attribute(Attribute::Bold),
            Cell::new(contract.key_x[i]),
            Cell::new(contract.key_y[i]),
            Cell::new(format!("{:.2}", spot.center_x)),
            Cell::new(format!("{:.2}", spot.center_y)),
            Cell::new(format!("{:.2}", spot.radius)).fg(Color::Cyan),
        ]);
    }
    println!("\nSweet spots");
    println!("{}", table);
}

pub fn print_neighbors(x: i32, y: i32, neighbors: NeighborList<'_>) {
    println!("\nNearest keys at ({}, {}): {}", x, y, neighbors.len());
    if neighbors.is_empty() {
        return;
    }

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Key"),
        Cell::new("Code"),
        Cell::new("X"),
        Cell::new("Y"),
        Cell::new("W"),
        Cell::new("H"),
    ]);
    align_right(&mut table, 2..7);

    for (i, key) in neighbors.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(printable_code(key.code)).add_attribute(Attribute::Bold),
            Cell::new(key.code),
            Cell::new(key.x),
            Cell::new(key.y),
            Cell::new(key.w),
            Cell::new(key.h),
        ]);
    }
    println!("{}", table);
}

pub fn print_candidates(dest: &[i32], written: usize) {
    let labels: Vec<String> = dest
        .iter()
        .map(|&c| match c {
            NOT_A_CODE => "-".to_string(),
            c if is_real_character(c) => printable_code(c),
            c => format!("[#{}]", c),
        })
        .collect();
    println!("\nCandidates ({} of {}): {}", written, dest.len(), labels.join(" "));
}
