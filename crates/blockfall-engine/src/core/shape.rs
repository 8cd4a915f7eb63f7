use super::piece::{PieceKind, PieceRotation};

/// Occupied cells of one piece in one rotation state, as offsets into its
/// 4×4 bounding box. Row-major order.
pub(crate) type ShapeCells = [(u8, u8); 4];

/// Looks up the occupied cells of `kind` at `rotation`.
///
/// Pure and total for all 7×4 combinations; the tables are generated at
/// compile time and never mutated.
pub(crate) const fn shape_cells(kind: PieceKind, rotation: PieceRotation) -> ShapeCells {
    SHAPES[kind as usize][rotation.index()]
}

type Grid = [[bool; 4]; 4];

/// Generates all 4 rotation states of a shape by rotating 90° clockwise.
///
/// `size` is the effective box the piece rotates within (4 for I, 2 for O,
/// 3 for the rest).
const fn grid_rotations(size: usize, grid: Grid) -> [Grid; 4] {
    let mut rotations = [grid; 4];
    let mut i = 1;
    while i < 4 {
        let mut rotated = [[false; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                rotated[y][x] = rotations[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotations[i] = rotated;
        i += 1;
    }
    rotations
}

const fn cells_of(grid: &Grid) -> ShapeCells {
    let mut cells = [(0, 0); 4];
    let mut n = 0;
    let mut y = 0;
    while y < 4 {
        let mut x = 0;
        while x < 4 {
            if grid[y][x] {
                assert!(n < 4);
                cells[n] = (x as u8, y as u8);
                n += 1;
            }
            x += 1;
        }
        y += 1;
    }
    assert!(n == 4);
    cells
}

const fn shape_rotations(size: usize, grid: Grid) -> [ShapeCells; 4] {
    let rotations = grid_rotations(size, grid);
    [
        cells_of(&rotations[0]),
        cells_of(&rotations[1]),
        cells_of(&rotations[2]),
        cells_of(&rotations[3]),
    ]
}

const SHAPES: [[ShapeCells; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    [
        // I-piece
        shape_rotations(4, [EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        shape_rotations(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // S-piece
        shape_rotations(3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn rotations() -> [PieceRotation; 4] {
        let r0 = PieceRotation::default();
        let r1 = r0.rotated_right();
        let r2 = r1.rotated_right();
        let r3 = r2.rotated_right();
        [r0, r1, r2, r3]
    }

    #[test]
    fn every_shape_has_four_cells_inside_the_box() {
        for kind in PieceKind::ALL {
            for rotation in rotations() {
                let cells = shape_cells(kind, rotation);
                for (x, y) in cells {
                    assert!(x < 4 && y < 4, "{kind:?} cell ({x}, {y}) leaves the box");
                }
                for (i, a) in cells.iter().enumerate() {
                    for b in &cells[i + 1..] {
                        assert_ne!(a, b, "{kind:?} has a duplicate cell");
                    }
                }
            }
        }
    }

    #[test]
    fn o_piece_is_rotation_invariant() {
        let base = shape_cells(PieceKind::O, PieceRotation::default());
        for rotation in rotations() {
            assert_eq!(shape_cells(PieceKind::O, rotation), base);
        }
    }

    #[test]
    fn i_piece_alternates_between_row_and_column() {
        let [r0, r1, _, _] = rotations();
        assert_eq!(shape_cells(PieceKind::I, r0), [(0, 1), (1, 1), (2, 1), (3, 1)]);
        assert_eq!(shape_cells(PieceKind::I, r1), [(2, 0), (2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn t_piece_rotates_clockwise() {
        let [r0, r1, r2, r3] = rotations();
        // Pointing up, right, down, left in clockwise order.
        assert_eq!(shape_cells(PieceKind::T, r0), [(1, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(shape_cells(PieceKind::T, r1), [(1, 0), (1, 1), (2, 1), (1, 2)]);
        assert_eq!(shape_cells(PieceKind::T, r2), [(0, 1), (1, 1), (2, 1), (1, 2)]);
        assert_eq!(shape_cells(PieceKind::T, r3), [(1, 0), (0, 1), (1, 1), (1, 2)]);
    }
}
