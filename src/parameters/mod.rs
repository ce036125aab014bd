//! The parameters of the panner: pan position, gain and panning law.
//!
//! The [`ParameterStore`] can be shared (e.g. behind an `Arc`) between the thread that
//! renders audio and the thread on which the host automates parameters or the user edits them.
//! All values are stored in atomics, so that reading a parameter never blocks.
//! There is no synchronisation between the different parameters: the renderer may see a new
//! pan position together with the previous gain. This is harmless because every value on its
//! own is always valid and the next block will use the new values.
//!
//! [`ParameterStore`]: ./struct.ParameterStore.html
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

mod state;
pub use self::state::{DeserializeError, PersistentState, MINIMUM_STATE_LENGTH, STATE_LENGTH};

pub const DEFAULT_PAN_POSITION: f32 = 0.0;
pub const DEFAULT_GAIN: f32 = 1.0;

/// The function that maps a pan position to the multipliers of the left and right channel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum PanningLaw {
    /// The multipliers change linearly with the pan position.
    /// Note that the perceived loudness dips in the centre.
    Linear = 0,
    /// The sum of the squares of the multipliers is one for every pan position,
    /// so that the perceived loudness stays the same across the stereo field.
    ConstantPower = 1,
}

impl PanningLaw {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PanningLaw::Linear),
            1 => Some(PanningLaw::ConstantPower),
            _ => None,
        }
    }
}

impl Default for PanningLaw {
    fn default() -> Self {
        PanningLaw::Linear
    }
}

impl fmt::Display for PanningLaw {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PanningLaw::Linear => write!(f, "Linear"),
            PanningLaw::ConstantPower => write!(f, "Constant Power"),
        }
    }
}

/// The values of all parameters, read once per block.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ParameterSnapshot {
    pub pan_position: f32,
    pub gain: f32,
    pub panning_law: PanningLaw,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            pan_position: DEFAULT_PAN_POSITION,
            gain: DEFAULT_GAIN,
            panning_law: PanningLaw::default(),
        }
    }
}

/// Holds the current values of the parameters.
///
/// Setters do not validate: a pan position outside `[-1, 1]` or a gain outside `[0, 1]`
/// is stored as-is. Hosts are expected to respect the ranges.
#[derive(Debug)]
pub struct ParameterStore {
    pan_position: AtomicU32,
    gain: AtomicU32,
    panning_law: AtomicU8,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::with_values(ParameterSnapshot::default())
    }

    pub fn with_values(values: ParameterSnapshot) -> Self {
        Self {
            pan_position: AtomicU32::new(values.pan_position.to_bits()),
            gain: AtomicU32::new(values.gain.to_bits()),
            panning_law: AtomicU8::new(values.panning_law as u8),
        }
    }

    pub fn pan_position(&self) -> f32 {
        f32::from_bits(self.pan_position.load(Ordering::Relaxed))
    }

    pub fn set_pan_position(&self, pan_position: f32) {
        self.pan_position
            .store(pan_position.to_bits(), Ordering::Relaxed);
    }

    pub fn gain(&self) -> f32 {
        f32::from_bits(self.gain.load(Ordering::Relaxed))
    }

    pub fn set_gain(&self, gain: f32) {
        self.gain.store(gain.to_bits(), Ordering::Relaxed);
    }

    pub fn panning_law(&self) -> PanningLaw {
        // Only valid discriminants are ever stored.
        PanningLaw::from_u8(self.panning_law.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_panning_law(&self, panning_law: PanningLaw) {
        self.panning_law
            .store(panning_law as u8, Ordering::Relaxed);
    }

    /// Read all parameters. Does not block and does not allocate.
    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            pan_position: self.pan_position(),
            gain: self.gain(),
            panning_law: self.panning_law(),
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies one of the parameters that are exposed to the host.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParameterId {
    PanPosition,
    Gain,
    PanningLaw,
}

impl ParameterId {
    pub const ALL: [ParameterId; 3] = [
        ParameterId::PanPosition,
        ParameterId::Gain,
        ParameterId::PanningLaw,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ParameterId::PanPosition => "Pan Position",
            ParameterId::Gain => "Gain",
            ParameterId::PanningLaw => "Constant Power",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParameterId::PanPosition => "",
            ParameterId::Gain => "%",
            ParameterId::PanningLaw => "",
        }
    }
}

/// Read and write parameters the way a host or a generic editor does:
/// by index, with values normalized to the range `[0, 1]`.
pub trait Parameters {
    fn number_of_parameters(&self) -> usize;

    fn parameter_name(&self, index: usize) -> Option<&'static str>;

    fn parameter_label(&self, index: usize) -> Option<&'static str>;

    /// The value of the parameter, mapped to `[0, 1]`.
    /// Returns `None` when there is no parameter with the given index.
    fn normalized_value(&self, index: usize) -> Option<f32>;

    /// Set the parameter from a value in `[0, 1]`. Unknown indices are ignored.
    fn set_normalized_value(&self, index: usize, value: f32);

    /// Write a human-readable representation of the current value.
    fn write_parameter_text<W: Write>(&self, index: usize, buffer: &mut W) -> fmt::Result;
}

impl Parameters for ParameterStore {
    fn number_of_parameters(&self) -> usize {
        ParameterId::ALL.len()
    }

    fn parameter_name(&self, index: usize) -> Option<&'static str> {
        ParameterId::from_index(index).map(ParameterId::name)
    }

    fn parameter_label(&self, index: usize) -> Option<&'static str> {
        ParameterId::from_index(index).map(ParameterId::label)
    }

    fn normalized_value(&self, index: usize) -> Option<f32> {
        Some(match ParameterId::from_index(index)? {
            ParameterId::PanPosition => (self.pan_position() + 1.0) / 2.0,
            ParameterId::Gain => self.gain(),
            ParameterId::PanningLaw => match self.panning_law() {
                PanningLaw::Linear => 0.0,
                PanningLaw::ConstantPower => 1.0,
            },
        })
    }

    fn set_normalized_value(&self, index: usize, value: f32) {
        match ParameterId::from_index(index) {
            Some(ParameterId::PanPosition) => self.set_pan_position(value * 2.0 - 1.0),
            Some(ParameterId::Gain) => self.set_gain(value),
            Some(ParameterId::PanningLaw) => self.set_panning_law(if value >= 0.5 {
                PanningLaw::ConstantPower
            } else {
                PanningLaw::Linear
            }),
            None => {}
        }
    }

    fn write_parameter_text<W: Write>(&self, index: usize, buffer: &mut W) -> fmt::Result {
        match ParameterId::from_index(index) {
            Some(ParameterId::PanPosition) => {
                // Kept as a float: out-of-range positions do not fit in an integer.
                let percentage = (self.pan_position() * 100.0).round();
                if percentage < 0.0 {
                    write!(buffer, "L {:.0}", -percentage)
                } else if percentage > 0.0 {
                    write!(buffer, "R {:.0}", percentage)
                } else {
                    buffer.write_str("C")
                }
            }
            Some(ParameterId::Gain) => write!(buffer, "{:.0}", self.gain() * 100.0),
            Some(ParameterId::PanningLaw) => write!(buffer, "{}", self.panning_law()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(store: &ParameterStore, index: usize) -> String {
        let mut result = String::new();
        store
            .write_parameter_text(index, &mut result)
            .expect("writing to a String does not fail");
        result
    }

    #[test]
    fn new_store_has_default_values() {
        let store = ParameterStore::new();
        assert_eq!(store.pan_position(), 0.0);
        assert_eq!(store.gain(), 1.0);
        assert_eq!(store.panning_law(), PanningLaw::Linear);
    }

    #[test]
    fn setters_accept_out_of_range_values() {
        let store = ParameterStore::new();
        store.set_pan_position(1.5);
        store.set_gain(-0.25);
        assert_eq!(store.pan_position(), 1.5);
        assert_eq!(store.gain(), -0.25);
    }

    #[test]
    fn snapshot_reflects_the_latest_values() {
        let store = ParameterStore::new();
        store.set_pan_position(-0.5);
        store.set_gain(0.75);
        store.set_panning_law(PanningLaw::ConstantPower);
        assert_eq!(
            store.snapshot(),
            ParameterSnapshot {
                pan_position: -0.5,
                gain: 0.75,
                panning_law: PanningLaw::ConstantPower,
            }
        );
    }

    #[test]
    fn panning_law_round_trips_through_its_discriminant() {
        assert_eq!(PanningLaw::from_u8(PanningLaw::Linear as u8), Some(PanningLaw::Linear));
        assert_eq!(
            PanningLaw::from_u8(PanningLaw::ConstantPower as u8),
            Some(PanningLaw::ConstantPower)
        );
        assert_eq!(PanningLaw::from_u8(2), None);
    }

    #[test]
    fn normalized_pan_position_maps_to_the_full_range() {
        let store = ParameterStore::new();
        let pan = ParameterId::PanPosition.index();
        store.set_normalized_value(pan, 0.0);
        assert_eq!(store.pan_position(), -1.0);
        store.set_normalized_value(pan, 1.0);
        assert_eq!(store.pan_position(), 1.0);
        store.set_normalized_value(pan, 0.5);
        assert_eq!(store.pan_position(), 0.0);
        assert_eq!(store.normalized_value(pan), Some(0.5));
    }

    #[test]
    fn normalized_panning_law_is_a_toggle() {
        let store = ParameterStore::new();
        let law = ParameterId::PanningLaw.index();
        store.set_normalized_value(law, 0.7);
        assert_eq!(store.panning_law(), PanningLaw::ConstantPower);
        assert_eq!(store.normalized_value(law), Some(1.0));
        store.set_normalized_value(law, 0.2);
        assert_eq!(store.panning_law(), PanningLaw::Linear);
    }

    #[test]
    fn unknown_parameter_index_is_ignored() {
        let store = ParameterStore::new();
        store.set_normalized_value(3, 0.0);
        assert_eq!(store.snapshot(), ParameterSnapshot::default());
        assert_eq!(store.normalized_value(3), None);
        assert_eq!(store.parameter_name(3), None);
        assert_eq!(text(&store, 3), "");
    }

    #[test]
    fn parameter_text_is_human_readable() {
        let store = ParameterStore::new();
        assert_eq!(text(&store, 0), "C");
        store.set_pan_position(-0.5);
        assert_eq!(text(&store, 0), "L 50");
        store.set_pan_position(0.25);
        assert_eq!(text(&store, 0), "R 25");
        store.set_gain(0.5);
        assert_eq!(text(&store, 1), "50");
        store.set_panning_law(PanningLaw::ConstantPower);
        assert_eq!(text(&store, 2), "Constant Power");
    }

    #[test]
    fn parameter_text_handles_huge_pan_positions() {
        let store = ParameterStore::new();
        store.set_pan_position(-1.0e8);
        assert_eq!(text(&store, 0), "L 10000000000");
        store.set_pan_position(f32::NEG_INFINITY);
        assert_eq!(text(&store, 0), "L inf");
        store.set_pan_position(f32::INFINITY);
        assert_eq!(text(&store, 0), "R inf");
        store.set_pan_position(f32::NAN);
        assert_eq!(text(&store, 0), "C");
    }

    #[test]
    fn store_can_be_shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParameterStore>();

        let store = std::sync::Arc::new(ParameterStore::new());
        let writer = {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || {
                store.set_pan_position(0.75);
                store.set_gain(0.5);
                store.set_panning_law(PanningLaw::ConstantPower);
            })
        };
        writer.join().unwrap();
        assert_eq!(
            store.snapshot(),
            ParameterSnapshot {
                pan_position: 0.75,
                gain: 0.5,
                panning_law: PanningLaw::ConstantPower,
            }
        );
    }
}
