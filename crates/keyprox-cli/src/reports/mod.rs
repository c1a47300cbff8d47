mod grid;
mod tables;

pub use self::grid::print_cell_table;
pub use self::tables::{print_candidates, print_neighbors, print_summary, print_sweet_spots};
