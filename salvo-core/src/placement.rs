//! Ship placement validation.
//!
//! Every ship-board write made during setup goes through
//! [`ShipPlacement::validate`] first. The storage layer then writes all
//! segments of one ship in a single transaction.
//!
//! The edge check is `start + length > 9`, exactly as games already in the
//! wild enforce it. On a `0..=9` board this refuses a length-5 ship starting
//! at index 5 even though it would fit; the boundary is kept literally.

use rand::Rng;
use salvo_types::{Board, Coord, Orientation, ValidationError, BOARD_SIZE};

/// Standard fleet: carrier, battleship, cruiser, submarine, destroyer.
pub const FLEET: [u8; 5] = [5, 4, 3, 3, 2];

/// Total ship cells in one fleet.
pub fn fleet_cells() -> usize {
    FLEET.iter().map(|&len| usize::from(len)).sum()
}

/// Shortest ship allowed.
pub const MIN_SHIP_LENGTH: i32 = 2;

/// Longest ship allowed.
pub const MAX_SHIP_LENGTH: i32 = 5;

/// Highest value `start + length` may reach along the orientation axis.
pub const MAX_EXTENT: i32 = 9;

/// Candidate draws per ship before random placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// A validated ship placement and the cells it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipPlacement {
    board: Board,
    origin: Coord,
    length: u8,
    orientation: Orientation,
    segments: Vec<Coord>,
}

impl ShipPlacement {
    /// Validate a requested placement.
    ///
    /// Checks, in order: ship board, coordinates on the grid, length in
    /// `2..=5`, and the literal edge rule.
    pub fn validate(
        board: Board,
        x: i32,
        y: i32,
        length: i32,
        orientation: Orientation,
    ) -> Result<Self, ValidationError> {
        if !board.is_ship_board() {
            return Err(ValidationError::NotAShipBoard(board));
        }
        let origin = Coord::new(x, y)?;
        if !(MIN_SHIP_LENGTH..=MAX_SHIP_LENGTH).contains(&length) {
            return Err(ValidationError::InvalidLength(length));
        }

        let start = match orientation {
            Orientation::Horizontal => x,
            Orientation::Vertical => y,
        };
        if start + length > MAX_EXTENT {
            return Err(ValidationError::DoesNotFit {
                origin,
                length: length as u8,
                orientation,
            });
        }

        let segments = (0..length)
            .map(|i| match orientation {
                Orientation::Horizontal => Coord::new(x + i, y),
                Orientation::Vertical => Coord::new(x, y + i),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            board,
            origin,
            length: length as u8,
            orientation,
            segments,
        })
    }

    /// Target ship board.
    pub fn board(&self) -> Board {
        self.board
    }

    /// First segment.
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Number of segments.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// Orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Occupied cells, starting at the origin.
    pub fn segments(&self) -> &[Coord] {
        &self.segments
    }
}

/// A random placement request for a ship of `length`.
///
/// The start is drawn over the whole grid, so the result may not fit; callers
/// validate it and draw again on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Column of the first segment.
    pub x: i32,
    /// Row of the first segment.
    pub y: i32,
    /// Requested length.
    pub length: i32,
    /// Coin-flip orientation.
    pub orientation: Orientation,
}

impl Candidate {
    /// Draw a candidate start and orientation.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, length: u8) -> Self {
        let size = i32::from(BOARD_SIZE);
        let x = rng.gen_range(0..size);
        let y = rng.gen_range(0..size);
        let orientation = if rng.gen_bool(0.5) {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        Self {
            x,
            y,
            length: i32::from(length),
            orientation,
        }
    }

    /// Validate this candidate for `board`.
    pub fn validate(&self, board: Board) -> Result<ShipPlacement, ValidationError> {
        ShipPlacement::validate(board, self.x, self.y, self.length, self.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn coords(pairs: &[(i32, i32)]) -> Vec<Coord> {
        pairs.iter().map(|&(x, y)| Coord::new(x, y).unwrap()).collect()
    }

    #[test]
    fn standard_fleet_has_seventeen_cells() {
        assert_eq!(fleet_cells(), 17);
    }

    #[test]
    fn horizontal_carrier_at_origin() {
        let p = ShipPlacement::validate(Board::RedShips, 0, 0, 5, Orientation::Horizontal).unwrap();
        assert_eq!(
            p.segments(),
            coords(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]).as_slice()
        );
    }

    #[test]
    fn vertical_segments_grow_along_y() {
        let p = ShipPlacement::validate(Board::BlueShips, 6, 2, 3, Orientation::Vertical).unwrap();
        assert_eq!(p.segments(), coords(&[(6, 2), (6, 3), (6, 4)]).as_slice());
        assert_eq!(p.origin(), Coord::new(6, 2).unwrap());
    }

    #[test]
    fn bounds_table() {
        use Orientation::{Horizontal, Vertical};
        let cases = [
            ("fits horizontally", 0, 0, 5, Horizontal, true),
            ("fits vertically", 0, 0, 5, Vertical, true),
            ("too long horizontally", 7, 0, 5, Horizontal, false),
            ("too long vertically", 0, 7, 5, Vertical, false),
            ("out of bounds x", -1, 0, 3, Horizontal, false),
            ("out of bounds y", 0, -1, 3, Vertical, false),
            ("last allowed start for carrier", 4, 0, 5, Horizontal, true),
            ("literal edge rule refuses start 5", 5, 0, 5, Horizontal, false),
            ("destroyer at 7", 0, 7, 2, Vertical, true),
            ("destroyer at 8", 0, 8, 2, Vertical, false),
            ("y ignored for horizontal extent", 0, 9, 5, Horizontal, true),
        ];

        for (name, x, y, len, orientation, ok) in cases {
            let result = ShipPlacement::validate(Board::RedShips, x, y, len, orientation);
            assert_eq!(result.is_ok(), ok, "{name}: {result:?}");
        }
    }

    #[test]
    fn invalid_lengths_rejected() {
        for len in [-1, 0, 1, 6, 10] {
            assert_eq!(
                ShipPlacement::validate(Board::RedShips, 0, 0, len, Orientation::Horizontal),
                Err(ValidationError::InvalidLength(len))
            );
        }
    }

    #[test]
    fn shot_boards_rejected() {
        assert_eq!(
            ShipPlacement::validate(Board::RedShots, 0, 0, 3, Orientation::Horizontal),
            Err(ValidationError::NotAShipBoard(Board::RedShots))
        );
    }

    #[test]
    fn candidates_stay_on_grid() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let c = Candidate::draw(&mut rng, 4);
            assert!((0..10).contains(&c.x) && (0..10).contains(&c.y));
            assert_eq!(c.length, 4);
            if let Ok(p) = c.validate(Board::BlueShips) {
                assert_eq!(p.segments().len(), 4);
            }
        }
    }

    #[test]
    fn candidates_use_both_orientations() {
        let mut rng = StdRng::seed_from_u64(3);
        let draws: Vec<_> = (0..64).map(|_| Candidate::draw(&mut rng, 3)).collect();
        assert!(draws.iter().any(|c| c.orientation == Orientation::Vertical));
        assert!(draws.iter().any(|c| c.orientation == Orientation::Horizontal));
    }
}
