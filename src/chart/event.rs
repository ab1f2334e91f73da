use rand::Rng;
use serde::Serialize;

use super::shape::{decode, NoteShape, Placement};

/// Map schema version the exporter writes alongside the note records.
pub const SCHEMA_VERSION: &str = "2.0.0";

/// Saber hand: A (red, left) or B (blue, right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoteColor {
    A,
    B,
}

impl NoteColor {
    pub fn opposite(self) -> Self {
        match self {
            NoteColor::A => NoteColor::B,
            NoteColor::B => NoteColor::A,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            NoteColor::A
        } else {
            NoteColor::B
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            NoteColor::A => 0,
            NoteColor::B => 1,
        }
    }

    /// `_type` value in the exported note record.
    pub fn type_code(self) -> u8 {
        self.slot() as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteEvent {
    /// Seconds into the track
    pub time: f64,
    pub shape: NoteShape,
    pub color: NoteColor,
}

impl NoteEvent {
    pub fn placement(&self) -> Placement {
        decode(self.shape, self.color)
    }

    pub fn record(&self) -> NoteRecord {
        let placement = self.placement();
        NoteRecord {
            time: self.time,
            line_index: placement.column,
            line_layer: placement.row,
            note_type: self.color.type_code(),
            cut_direction: placement.direction,
        }
    }
}

/// One `_notes` entry as the exporter serializes it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NoteRecord {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "_lineIndex")]
    pub line_index: u8,
    #[serde(rename = "_lineLayer")]
    pub line_layer: u8,
    #[serde(rename = "_type")]
    pub note_type: u8,
    #[serde(rename = "_cutDirection")]
    pub cut_direction: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_flips() {
        assert_eq!(NoteColor::A.opposite(), NoteColor::B);
        assert_eq!(NoteColor::B.opposite().opposite(), NoteColor::B);
    }

    #[test]
    fn record_uses_mirrored_placement_for_b() {
        let shape = NoteShape::new(1).unwrap();
        let red = NoteEvent { time: 3.5, shape, color: NoteColor::A }.record();
        assert_eq!((red.line_index, red.line_layer, red.cut_direction, red.note_type), (0, 0, 0, 0));

        let blue = NoteEvent { time: 3.5, shape, color: NoteColor::B }.record();
        assert_eq!((blue.line_index, blue.line_layer, blue.cut_direction, blue.note_type), (3, 0, 0, 1));
    }

    #[test]
    fn record_serializes_with_schema_names() {
        let shape = NoteShape::new(27).unwrap();
        let event = NoteEvent { time: 2.25, shape, color: NoteColor::B };
        let json = serde_json::to_value(event.record()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_time": 2.25,
                "_lineIndex": 1,
                "_lineLayer": 0,
                "_type": 1,
                "_cutDirection": 3
            })
        );
    }
}
