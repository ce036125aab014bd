//! Saving and restoring the parameters as a flat byte blob.
//!
//! Layout (all numbers little-endian):
//!
//! | offset | size | field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 4    | pan position (`f32`)                    |
//! | 4      | 4    | gain (`f32`)                            |
//! | 8      | 1    | panning law (`0`: linear, `1`: constant power) |
//!
//! Older versions only stored the pan position. Fields that are missing at the end of the
//! blob are not restored; the corresponding parameters keep their current value.
//! Bytes after the last known field are ignored.
use super::{PanningLaw, ParameterStore};
use std::error::Error;
use std::fmt::{self, Display, Formatter};

const PAN_POSITION_OFFSET: usize = 0;
const GAIN_OFFSET: usize = 4;
const PANNING_LAW_OFFSET: usize = 8;

/// The smallest blob that can be restored: one that only contains the pan position.
pub const MINIMUM_STATE_LENGTH: usize = GAIN_OFFSET;
/// The length of the blob produced by [`ParameterStore::serialize`].
///
/// [`ParameterStore::serialize`]: ../struct.ParameterStore.html#method.serialize
pub const STATE_LENGTH: usize = PANNING_LAW_OFFSET + 1;

/// The reasons why a blob could not be restored.
/// When restoring fails, none of the parameters is changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeserializeError {
    /// The blob is too short to contain the pan position.
    InsufficientData { expected: usize, actual: usize },
    /// The blob contains a NaN or an infinite value.
    NonFiniteValue,
    /// The byte encoding the panning law does not correspond with a known panning law.
    InvalidPanningLaw(u8),
}

impl Display for DeserializeError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DeserializeError::InsufficientData { expected, actual } => write!(
                f,
                "insufficient data: expected at least {} bytes, got {}",
                expected, actual
            ),
            DeserializeError::NonFiniteValue => write!(f, "state contains a non-finite value"),
            DeserializeError::InvalidPanningLaw(value) => {
                write!(f, "invalid panning law: {}", value)
            }
        }
    }
}

impl Error for DeserializeError {}

/// Save and restore the state of a plugin, e.g. when the host saves or loads a project.
pub trait PersistentState {
    fn save_state(&self) -> Vec<u8>;
    fn load_state(&self, data: &[u8]) -> Result<(), DeserializeError>;
}

fn read_f32(data: &[u8], offset: usize) -> Option<f32> {
    let bytes = data.get(offset..offset + 4)?;
    let mut buffer = [0; 4];
    buffer.copy_from_slice(bytes);
    Some(f32::from_le_bytes(buffer))
}

fn finite(value: f32) -> Result<f32, DeserializeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DeserializeError::NonFiniteValue)
    }
}

impl ParameterStore {
    /// Note: cannot be used in a real-time context
    /// -------------------------------------
    /// This method allocates memory and cannot be used in a real-time context.
    pub fn serialize(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(STATE_LENGTH);
        data.extend_from_slice(&self.pan_position().to_le_bytes());
        data.extend_from_slice(&self.gain().to_le_bytes());
        data.push(self.panning_law() as u8);
        data
    }

    /// Restore the parameters from a blob created by [`serialize`].
    ///
    /// The blob is validated completely before any parameter is changed.
    ///
    /// [`serialize`]: #method.serialize
    pub fn deserialize(&self, data: &[u8]) -> Result<(), DeserializeError> {
        let pan_position = read_f32(data, PAN_POSITION_OFFSET).ok_or(
            DeserializeError::InsufficientData {
                expected: MINIMUM_STATE_LENGTH,
                actual: data.len(),
            },
        )?;
        let pan_position = finite(pan_position)?;
        let gain = read_f32(data, GAIN_OFFSET).map(finite).transpose()?;
        let panning_law = match data.get(PANNING_LAW_OFFSET) {
            Some(&value) => Some(
                PanningLaw::from_u8(value).ok_or(DeserializeError::InvalidPanningLaw(value))?,
            ),
            None => None,
        };

        if data.len() < STATE_LENGTH {
            debug!(
                "Restoring from a state of {} bytes, parameters that are not in it are left unchanged.",
                data.len()
            );
        }

        self.set_pan_position(pan_position);
        if let Some(gain) = gain {
            self.set_gain(gain);
        }
        if let Some(panning_law) = panning_law {
            self.set_panning_law(panning_law);
        }
        Ok(())
    }
}

impl PersistentState for ParameterStore {
    fn save_state(&self) -> Vec<u8> {
        self.serialize()
    }

    fn load_state(&self, data: &[u8]) -> Result<(), DeserializeError> {
        self.deserialize(data)
    }
}

#[cfg(test)]
mod tests {
    use super::super::ParameterSnapshot;
    use super::*;

    fn store(pan_position: f32, gain: f32, panning_law: PanningLaw) -> ParameterStore {
        ParameterStore::with_values(ParameterSnapshot {
            pan_position,
            gain,
            panning_law,
        })
    }

    #[test]
    fn serialize_has_a_fixed_little_endian_layout() {
        let data = store(0.5, 0.25, PanningLaw::ConstantPower).serialize();
        assert_eq!(data.len(), STATE_LENGTH);
        assert_eq!(&data[0..4], &0.5f32.to_le_bytes());
        assert_eq!(&data[4..8], &0.25f32.to_le_bytes());
        assert_eq!(data[8], 1);
    }

    #[test]
    fn deserialize_restores_a_bit_exact_pan_position() {
        let original = store(-0.123_456_79, 0.3, PanningLaw::ConstantPower);
        let restored = ParameterStore::new();
        assert_eq!(restored.deserialize(&original.serialize()), Ok(()));
        assert_eq!(
            restored.pan_position().to_bits(),
            original.pan_position().to_bits()
        );
        assert_eq!(restored.snapshot(), original.snapshot());
    }

    #[test]
    fn too_short_state_is_rejected_and_changes_nothing() {
        let restored = store(0.4, 0.6, PanningLaw::ConstantPower);
        assert_eq!(
            restored.deserialize(&[0, 0, 128]),
            Err(DeserializeError::InsufficientData {
                expected: 4,
                actual: 3
            })
        );
        assert!(restored.deserialize(&[]).is_err());
        assert_eq!(restored.snapshot(), store(0.4, 0.6, PanningLaw::ConstantPower).snapshot());
    }

    #[test]
    fn legacy_state_restores_only_the_pan_position() {
        let restored = store(0.0, 0.6, PanningLaw::ConstantPower);
        assert_eq!(restored.deserialize(&(-1.0f32).to_le_bytes()), Ok(()));
        assert_eq!(restored.pan_position(), -1.0);
        assert_eq!(restored.gain(), 0.6);
        assert_eq!(restored.panning_law(), PanningLaw::ConstantPower);
    }

    #[test]
    fn truncated_trailing_field_is_ignored() {
        let mut data = store(0.75, 0.5, PanningLaw::Linear).serialize();
        data.truncate(6);
        let restored = store(0.0, 0.9, PanningLaw::ConstantPower);
        assert_eq!(restored.deserialize(&data), Ok(()));
        assert_eq!(restored.pan_position(), 0.75);
        assert_eq!(restored.gain(), 0.9);
    }

    #[test]
    fn extra_trailing_bytes_are_ignored() {
        let original = store(0.1, 0.2, PanningLaw::ConstantPower);
        let mut data = original.serialize();
        data.extend_from_slice(&[1, 2, 3]);
        let restored = ParameterStore::new();
        assert_eq!(restored.deserialize(&data), Ok(()));
        assert_eq!(restored.snapshot(), original.snapshot());
    }

    #[test]
    fn invalid_panning_law_is_rejected_without_partial_update() {
        let mut data = store(0.75, 0.5, PanningLaw::Linear).serialize();
        data[8] = 7;
        let restored = ParameterStore::new();
        assert_eq!(
            restored.deserialize(&data),
            Err(DeserializeError::InvalidPanningLaw(7))
        );
        assert_eq!(restored.snapshot(), ParameterSnapshot::default());
    }

    #[test]
    fn non_finite_values_are_rejected_without_partial_update() {
        let mut data = store(0.75, 0.5, PanningLaw::Linear).serialize();
        data[4..8].copy_from_slice(&f32::NAN.to_le_bytes());
        let restored = ParameterStore::new();
        assert_eq!(
            restored.deserialize(&data),
            Err(DeserializeError::NonFiniteValue)
        );
        assert_eq!(restored.snapshot(), ParameterSnapshot::default());
    }

    #[test]
    fn errors_are_displayed_in_plain_words() {
        let error = DeserializeError::InsufficientData {
            expected: 4,
            actual: 1,
        };
        assert_eq!(
            error.to_string(),
            "insufficient data: expected at least 4 bytes, got 1"
        );
    }
}
