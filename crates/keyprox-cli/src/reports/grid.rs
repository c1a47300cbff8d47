use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use keyprox_core::keycodes::printable_code;
use keyprox_core::ProximityInfo;

/// One row per grid cell: position, tested center and the flattened codes.
pub fn print_cell_table(info: &ProximityInfo, all_cells: bool) {
    let params = info.params();
    let Some(contract) = info.contract() else {
        return;
    };

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Cell").add_attribute(Attribute::Bold),
        Cell::new("Col"),
        Cell::new("Row"),
        Cell::new("Center"),
        Cell::new("Keys"),
        Cell::new("Proximity chars"),
    ]);
    for i in 0..4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    let mut shown = 0;
    for cell in 0..params.grid_size() {
        let neighbors = info.grid().cell_neighbors(cell);
        if neighbors.is_empty() && !all_cells {
            continue;
        }
        let (cx, cy) = params.cell_center(cell);
        let codes = contract.cell_codes(cell);
        let labels: Vec<String> = codes.iter().map(|&c| printable_code(c)).collect();

        table.add_row(vec![
            Cell::new(cell),
            Cell::new(cell as i32 % params.grid_width),
            Cell::new(cell as i32 / params.grid_width),
            Cell::new(format!("{},{}", cx, cy)),
            Cell::new(neighbors.len()),
            Cell::new(labels.join(" ")),
        ]);
        shown += 1;
    }

    println!("\nProximity table ({} of {} cells)", shown, params.grid_size());
    println!("{}", table);
}
