use rand::distr::{weighted::WeightedIndex, Distribution};
use rand::Rng;

use super::event::{NoteColor, NoteEvent};
use super::shape::{NoteShape, SHAPE_COUNT};
use super::weights::WeightConfiguration;
use crate::error::{Error, Result};

/// Gaps shorter than this force the other hand and tighten the weight cap.
pub const FAST_GAP: f64 = 0.2;
/// Chance of a two-handed note on slower onsets.
pub const DOUBLE_CHANCE: f64 = 0.2;
/// Multiplier for repeating the other hand's last shape.
pub const MIRROR_BONUS: f64 = 100.0;
pub const SLOW_CAP: f64 = 50_000.0;
pub const FAST_CAP_SCALE: f64 = 2_000.0;

const START_LAST: u8 = 2;
const START_BEFORE_LAST: u8 = 14;

/// The last two shapes each hand placed.
#[derive(Clone, Debug, PartialEq)]
pub struct SequencerHistory {
    last: [NoteShape; 2],
    before_last: [NoteShape; 2],
}

impl Default for SequencerHistory {
    fn default() -> Self {
        let last = NoteShape::from_offset(START_LAST as usize - 1);
        let before_last = NoteShape::from_offset(START_BEFORE_LAST as usize - 1);
        Self {
            last: [last; 2],
            before_last: [before_last; 2],
        }
    }
}

impl SequencerHistory {
    pub fn last(&self, color: NoteColor) -> NoteShape {
        self.last[color.slot()]
    }

    pub fn before_last(&self, color: NoteColor) -> NoteShape {
        self.before_last[color.slot()]
    }

    pub fn record(&mut self, color: NoteColor, shape: NoteShape) {
        let slot = color.slot();
        self.before_last[slot] = self.last[slot];
        self.last[slot] = shape;
    }
}

/// Raw compatibility weight of every shape for the next `color` note,
/// mirror bonus included.
pub fn shape_weights(
    weights: &WeightConfiguration,
    history: &SequencerHistory,
    color: NoteColor,
) -> [f64; SHAPE_COUNT] {
    let other = color.opposite();
    let same = weights.same_color(history.last(color));
    let diff = weights.diff_color(history.last(other));
    let same2 = weights.same_color_2(history.before_last(color));
    let diff2 = weights.diff_color_2(history.before_last(other));
    let allowed = weights.allowed();

    let mut out = [0.0; SHAPE_COUNT];
    for (s, w) in out.iter_mut().enumerate() {
        *w = same[s] * diff[s] * same2[s] * diff2[s] * allowed[s];
    }
    out[history.last(other).offset()] *= MIRROR_BONUS;
    out
}

/// Upper bound on any single shape weight for a note `gap` seconds after the last.
pub fn weight_cap(gap: f64) -> f64 {
    if gap <= 0.0 {
        f64::INFINITY
    } else if gap < FAST_GAP {
        FAST_CAP_SCALE / (gap * gap)
    } else {
        SLOW_CAP
    }
}

/// Exponent applied to the weights: 1.0 at zero gap, falling linearly to 0.5
/// at `threshold` and staying there.
pub fn sharpness(gap: f64, threshold: f64) -> f64 {
    if gap > threshold {
        0.5
    } else {
        0.5 + 0.5 * (threshold - gap) / threshold
    }
}

/// Sampling weights for the next `color` note `gap` seconds after the last:
/// raw weights capped by [`weight_cap`], then raised to [`sharpness`].
///
/// Fails with the first shape whose raw weight is not finite, before any
/// capping can hide it.
pub fn draw_weights(
    weights: &WeightConfiguration,
    history: &SequencerHistory,
    color: NoteColor,
    gap: f64,
    threshold: f64,
) -> std::result::Result<[f64; SHAPE_COUNT], NoteShape> {
    let mut out = shape_weights(weights, history, color);
    if let Some(pos) = out.iter().position(|w| !w.is_finite()) {
        return Err(NoteShape::from_offset(pos));
    }

    let cap = weight_cap(gap);
    let power = sharpness(gap, threshold);
    for w in out.iter_mut() {
        *w = w.min(cap).powf(power);
    }
    Ok(out)
}

struct Sequencer<'a, R: ?Sized> {
    weights: &'a WeightConfiguration,
    threshold: f64,
    rng: &'a mut R,
    history: SequencerHistory,
    prev_color: NoteColor,
    last_time: f64,
    events: Vec<NoteEvent>,
}

impl<'a, R: Rng + ?Sized> Sequencer<'a, R> {
    fn step(&mut self, index: usize, time: f64) -> Result<()> {
        let gap = time - self.last_time;
        if gap < FAST_GAP {
            let color = self.prev_color.opposite();
            self.place(index, time, color)?;
        } else if self.rng.random::<f64>() < DOUBLE_CHANCE {
            let first = NoteColor::random(&mut *self.rng);
            self.place(index, time, first)?;
            let second = self.prev_color.opposite();
            self.place(index, time, second)?;
        } else {
            let color = NoteColor::random(&mut *self.rng);
            self.place(index, time, color)?;
        }
        Ok(())
    }

    fn place(&mut self, index: usize, time: f64, color: NoteColor) -> Result<()> {
        let gap = time - self.last_time;
        let draw = draw_weights(self.weights, &self.history, color, gap, self.threshold)
            .map_err(|shape| {
                Error::Configuration(format!(
                    "weight for shape {} is not finite at onset {} ({:.3}s)",
                    shape.index(),
                    index,
                    time
                ))
            })?;

        let dist = WeightedIndex::new(draw.iter().copied())
            .map_err(|_| Error::DegenerateWeights { index, time })?;
        let shape = NoteShape::from_offset(dist.sample(&mut *self.rng));

        self.history.record(color, shape);
        self.prev_color = color;
        self.last_time = time;
        self.events.push(NoteEvent { time, shape, color });
        Ok(())
    }
}

/// Turn ascending onset times into a note stream for one tier.
///
/// Fast onsets (gap under 0.2s) alternate hands; slower ones pick a hand at
/// random and sometimes add the other hand at the same time. Each shape is
/// drawn from the weight tables given both hands' recent history, sharpened
/// as the gap shrinks below `threshold`.
///
/// A draw where every shape weight is zero aborts with
/// [`Error::DegenerateWeights`]; no partial stream is returned.
pub fn sequence<R: Rng + ?Sized>(
    onsets: &[f64],
    threshold: f64,
    weights: &WeightConfiguration,
    rng: &mut R,
) -> Result<Vec<NoteEvent>> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "sequencer threshold must be positive, got {}",
            threshold
        )));
    }
    let mut prev = 0.0;
    for (i, &t) in onsets.iter().enumerate() {
        if !t.is_finite() || t < prev {
            return Err(Error::InvalidInput(format!(
                "onset {} at {} is not a non-negative ascending time",
                i, t
            )));
        }
        prev = t;
    }

    let prev_color = NoteColor::random(&mut *rng);
    let mut sequencer = Sequencer {
        weights,
        threshold,
        rng,
        history: SequencerHistory::default(),
        prev_color,
        last_time: 0.0,
        events: Vec::with_capacity(onsets.len()),
    };

    for (index, &time) in onsets.iter().enumerate() {
        sequencer.step(index, time)?;
    }

    Ok(sequencer.events)
}
