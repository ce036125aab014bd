//! The panning engine: redistributes a stereo signal over the left and the right channel.
//!
//! The multipliers for the left and the right channel are computed once per block
//! from the pan position and the [`PanningLaw`].
//! Changes to the pan position therefore take effect at block boundaries only.
//!
//! [`PanningLaw`]: ../parameters/enum.PanningLaw.html
use crate::buffer::AudioBlock;
use crate::parameters::{PanningLaw, ParameterSnapshot};
use dasp_sample::FromSample;
use num_traits::Zero;
use std::f64::consts::PI;
use std::ops::Mul;

/// The multipliers for the left and the right channel.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PanCoefficients {
    pub left: f64,
    pub right: f64,
}

impl PanningLaw {
    /// Compute the multipliers for the given pan position.
    ///
    /// For pan positions in `[-1, 1]`, both multipliers are in `[0, 1]`.
    /// Pan positions outside this range are not clamped and give multipliers outside `[0, 1]`.
    pub fn coefficients(self, pan_position: f32) -> PanCoefficients {
        let position = f64::from(pan_position) + 1.0;
        match self {
            PanningLaw::Linear => {
                let p_dash = position / 2.0;
                PanCoefficients {
                    left: 1.0 - p_dash,
                    right: p_dash,
                }
            }
            PanningLaw::ConstantPower => {
                let p_dash = (position * PI) / 4.0;
                PanCoefficients {
                    left: p_dash.cos(),
                    right: p_dash.sin(),
                }
            }
        }
    }
}

/// Pan and amplify the block in place.
///
/// Channels that do not carry input are set to zero first.
/// Channel 0 is the left channel and channel 1 is the right channel; other channels are not
/// panned. A block with a single channel is treated as the left channel.
///
/// This function does not allocate, does not lock and does not log, so it can be used
/// in the real-time thread.
pub fn process<S>(block: &mut AudioBlock<S>, parameters: &ParameterSnapshot)
where
    S: Copy + Zero + Mul<Output = S> + FromSample<f64>,
{
    block.clear_output_only_channels();

    let coefficients = parameters
        .panning_law
        .coefficients(parameters.pan_position);
    let left_multiplier = S::from_sample_(coefficients.left);
    let right_multiplier = S::from_sample_(coefficients.right);
    let gain = S::from_sample_(f64::from(parameters.gain));

    match block.number_of_channels() {
        0 => {}
        1 => {
            for sample in block.channel_mut(0).iter_mut() {
                *sample = *sample * left_multiplier * gain;
            }
        }
        _ => {
            if let Some((left, right)) = block.split_stereo() {
                for (left, right) in left.iter_mut().zip(right.iter_mut()) {
                    *left = *left * left_multiplier * gain;
                    *right = *right * right_multiplier * gain;
                }
            }
        }
    }
}
