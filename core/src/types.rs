/// Single grid axis: a column or row index, a board width or height.
pub type Coord = u8;

/// Counter type for quantities that may span the whole grid.
pub type CellCount = u16;

/// Grid position `(i, j)` = (column, row).
pub type Coord2 = (Coord, Coord);

pub(crate) trait GridIndex {
    fn nd(self) -> [usize; 2];
}

impl GridIndex for Coord2 {
    fn nd(self) -> [usize; 2] {
        [usize::from(self.0), usize::from(self.1)]
    }
}

pub(crate) const fn cell_total(width: Coord, height: Coord) -> CellCount {
    (width as CellCount).saturating_mul(height as CellCount)
}

/// Inverse of the flat scan index `j * width + i`, the order mines are
/// sampled in and the order the first-click relocation searches for a free
/// cell.
pub(crate) const fn from_flat(idx: CellCount, width: Coord) -> Coord2 {
    let width = width as CellCount;
    ((idx % width) as Coord, (idx / width) as Coord)
}

pub(crate) const fn in_bounds((i, j): Coord2, (width, height): Coord2) -> bool {
    i < width && j < height
}

const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// In-bounds 8-neighborhood of `center`, excluding `center` itself.
pub(crate) fn neighbors(center: Coord2, bounds: Coord2) -> Neighbors {
    Neighbors {
        center,
        bounds,
        at: 0,
    }
}

/// The in-bounds 3x3 block around `center`, `center` included. Chord opens
/// and the wide press preview work on this set.
pub(crate) fn block(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    core::iter::once(center)
        .filter(move |&pos| in_bounds(pos, bounds))
        .chain(neighbors(center, bounds))
}

#[derive(Debug)]
pub(crate) struct Neighbors {
    center: Coord2,
    bounds: Coord2,
    at: u8,
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(di, dj)) = NEIGHBOR_OFFSETS.get(usize::from(self.at)) {
            self.at += 1;

            let next_i = self.center.0.checked_add_signed(di);
            let next_j = self.center.1.checked_add_signed(dj);
            if let (Some(i), Some(j)) = (next_i, next_j) {
                if in_bounds((i, j), self.bounds) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}
