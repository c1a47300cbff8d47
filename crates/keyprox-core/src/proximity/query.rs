use super::grid::ProximityGrid;
use crate::consts::NOT_A_CODE;
use crate::geometry::KeyNode;
use crate::keycodes::is_real_character;
use std::slice;

/// Ordered, borrowed view of one cell's neighbors.
#[derive(Debug, Clone, Copy)]
pub struct NeighborList<'a> {
    keys: &'a [KeyNode],
    indices: &'a [u32],
}

impl<'a> NeighborList<'a> {
    pub fn empty() -> Self {
        Self {
            keys: &[],
            indices: &[],
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions of the neighbors in the input key list.
    pub fn indices(&self) -> &'a [u32] {
        self.indices
    }

    pub fn get(&self, i: usize) -> Option<&'a KeyNode> {
        self.indices.get(i).map(|&k| &self.keys[k as usize])
    }

    pub fn iter(&self) -> NeighborIter<'a> {
        NeighborIter {
            keys: self.keys,
            indices: self.indices.iter(),
        }
    }

    pub fn codes(&self) -> impl Iterator<Item = i32> + 'a {
        self.iter().map(|k| k.code)
    }
}

impl<'a> IntoIterator for NeighborList<'a> {
    type Item = &'a KeyNode;
    type IntoIter = NeighborIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct NeighborIter<'a> {
    keys: &'a [KeyNode],
    indices: slice::Iter<'a, u32>,
}

impl<'a> Iterator for NeighborIter<'a> {
    type Item = &'a KeyNode;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.indices.next().map(|&k| &self.keys[k as usize])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for NeighborIter<'_> {}

impl ProximityGrid {
    /// Precomputed neighbors of the cell under `(x, y)`; empty outside the keyboard.
    #[inline(always)]
    pub fn nearest_keys(&self, x: i32, y: i32) -> NeighborList<'_> {
        match self.params().cell_index(x, y) {
            Some(cell) => NeighborList {
                keys: self.keys(),
                indices: self.cell_neighbors(cell),
            },
            None => NeighborList::empty(),
        }
    }

    /// Fills `dest` with decoding candidates for a touch at `(x, y)`.
    ///
    /// A real `primary_key_code` goes first even when it is not a geometric
    /// neighbor. Neighbors follow in frozen order until the first command key or
    /// until `dest` is full. Every remaining slot is set to `NOT_A_CODE`.
    /// Returns the number of codes written.
    pub fn fill_nearest_key_codes(&self, x: i32, y: i32, primary_key_code: i32, dest: &mut [i32]) -> usize {
        if dest.is_empty() {
            return 0;
        }

        let mut index = 0;
        if is_real_character(primary_key_code) {
            dest[index] = primary_key_code;
            index += 1;
        }

        for key in self.nearest_keys(x, y) {
            if index >= dest.len() || !is_real_character(key.code) {
                break;
            }
            dest[index] = key.code;
            index += 1;
        }

        dest[index..].fill(NOT_A_CODE);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::super::grid::GridParams;
    use super::*;
    use crate::keycodes::CommandCode;

    fn key(code: i32, x: i32, y: i32) -> KeyNode {
        KeyNode {
            id: String::new(),
            code,
            x,
            y,
            w: 100,
            h: 100,
            is_spacer: false,
            hit_box: None,
        }
    }

    fn row_grid(codes: &[i32]) -> ProximityGrid {
        let width = 100 * codes.len() as i32;
        let keys = codes
            .iter()
            .enumerate()
            .map(|(i, &c)| key(c, 100 * i as i32, 0))
            .collect();
        ProximityGrid::build(GridParams::new(codes.len() as i32, 1, width, 100), keys, 120)
    }

    #[test]
    fn test_nearest_keys_out_of_bounds() {
        let grid = row_grid(&['a' as i32, 'b' as i32]);
        assert!(grid.nearest_keys(-1, 10).is_empty());
        assert!(grid.nearest_keys(200, 10).is_empty());
        assert!(grid.nearest_keys(10, 100).is_empty());
        assert_eq!(grid.nearest_keys(10, 10).len(), 2);
    }

    #[test]
    fn test_neighbor_list_access() {
        let grid = row_grid(&['a' as i32, 'b' as i32]);
        let list = grid.nearest_keys(150, 50);
        assert_eq!(list.indices(), &[0, 1]);
        assert_eq!(list.get(1).map(|k| k.code), Some('b' as i32));
        assert!(list.get(2).is_none());
        assert_eq!(list.iter().len(), 2);
        assert_eq!(list.codes().collect::<Vec<_>>(), vec!['a' as i32, 'b' as i32]);
    }

    #[test]
    fn test_fill_stops_at_command_key() {
        let shift = CommandCode::Shift.code();
        let grid = row_grid(&['a' as i32, shift, 'b' as i32]);
        let mut dest = [0; 4];
        // Cell 1 sees a, shift, b in that order.
        let written = grid.fill_nearest_key_codes(150, 50, NOT_A_CODE, &mut dest);
        assert_eq!(written, 1);
        assert_eq!(dest, ['a' as i32, NOT_A_CODE, NOT_A_CODE, NOT_A_CODE]);
    }

    #[test]
    fn test_fill_primary_first_and_truncates() {
        let grid = row_grid(&['a' as i32, 'b' as i32, 'c' as i32]);
        let mut dest = [0; 2];
        let written = grid.fill_nearest_key_codes(150, 50, 'z' as i32, &mut dest);
        assert_eq!(written, 2);
        assert_eq!(dest, ['z' as i32, 'a' as i32]);
    }

    #[test]
    fn test_fill_empty_dest() {
        let grid = row_grid(&['a' as i32]);
        let mut dest: [i32; 0] = [];
        assert_eq!(grid.fill_nearest_key_codes(10, 10, 'a' as i32, &mut dest), 0);
    }
}
