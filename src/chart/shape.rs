use super::event::NoteColor;

pub const SHAPE_COUNT: usize = 96;
pub const COLUMNS: u8 = 4;
pub const ROWS: u8 = 3;

/// Cut direction seen from the opposite hand. Entry 8 (dot note) is never
/// produced by decoding but maps to itself.
pub const MIRROR_DIRECTION: [u8; 9] = [0, 1, 3, 2, 5, 4, 7, 6, 8];

/// Note shape index in `1..=96`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteShape(u8);

impl NoteShape {
    pub fn new(index: u8) -> Option<Self> {
        if (1..=SHAPE_COUNT as u8).contains(&index) {
            Some(Self(index))
        } else {
            None
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Zero-based offset for table lookups.
    pub(crate) fn offset(self) -> usize {
        self.0 as usize - 1
    }

    pub(crate) fn from_offset(offset: usize) -> Self {
        debug_assert!(offset < SHAPE_COUNT);
        Self(offset as u8 + 1)
    }

    pub fn all() -> impl Iterator<Item = NoteShape> {
        (1..=SHAPE_COUNT as u8).map(NoteShape)
    }
}

/// Grid position and swing of a note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Line index, 0..=3 left to right
    pub column: u8,
    /// Line layer, 0..=2 bottom to top
    pub row: u8,
    pub direction: u8,
}

impl Placement {
    pub fn mirrored(self) -> Self {
        Self {
            column: COLUMNS - 1 - self.column,
            row: self.row,
            direction: MIRROR_DIRECTION[self.direction as usize],
        }
    }
}

/// Decode a shape into its placement. Color A keeps the raw triple, color B
/// gets the mirrored one.
pub fn decode(shape: NoteShape, color: NoteColor) -> Placement {
    let s = shape.offset() as u8;
    let raw = Placement {
        column: s % COLUMNS,
        row: (s / COLUMNS) % ROWS,
        direction: s / (COLUMNS * ROWS),
    };
    match color {
        NoteColor::A => raw,
        NoteColor::B => raw.mirrored(),
    }
}
