//! Combine different back-ends for audio input and audio output,
//! mostly for offline rendering and testing.
//!
//! Support is only enabled if `rpan` is compiled with the `backend-combined`
//! feature, see [the cargo reference] for more information on setting cargo features.
//!
//! The [`run`] function can be used to run a plugin and read audio from the
//! input and write audio to the output.
//!
//! Currently, the following inputs and outputs are available:
//!
//! * Dummy: [`AudioDummy`]: dummy audio input (generates nothing) and output
//! * Hound: [`HoundAudioReader`] and [`HoundAudioWriter`]: read and write `.wav` files (behind the "backend-combined-hound" feature)
//! * Memory: [`AudioBufferReader`] and [`AudioBufferWriter`]: read and write audio from memory
//!
//! [`AudioDummy`]: ./dummy/struct.AudioDummy.html
//! [`HoundAudioReader`]: ./hound/struct.HoundAudioReader.html
//! [`HoundAudioWriter`]: ./hound/struct.HoundAudioWriter.html
//! [`AudioBufferReader`]: ./memory/type.AudioBufferReader.html
//! [`AudioBufferWriter`]: ./memory/struct.AudioBufferWriter.html
//! [`run`]: ./fn.run.html
//! [the cargo reference]: https://doc.rust-lang.org/cargo/reference/manifest.html#the-features-section

use crate::backend::HostInterface;
use crate::buffer::{buffers_as_mut_slice, buffers_as_slice, AudioBlock, AudioChunk};
use crate::{AudioHandler, AudioHandlerMeta, ContextualAudioRenderer};
use num_traits::Zero;
use std::cmp;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod dummy;
#[cfg(feature = "backend-combined-hound")]
pub mod hound;
pub mod memory;

/// Define how audio is read.
///
/// The type parameter `S` represents the sample type.
pub trait AudioReader<S> {
    type Err;
    fn number_of_channels(&self) -> usize;
    fn frames_per_second(&self) -> u64;

    /// Fill the buffers. Return the number of frames that have been written.
    /// If it is `<` the number of frames in the input, no more frames can be expected.
    fn fill_buffer(&mut self, output: &mut [&mut [S]]) -> Result<usize, Self::Err>;
}

/// Define how audio is written.
///
/// The type parameter `S` represents the sample type.
pub trait AudioWriter<S> {
    type Err;
    fn write_buffer(&mut self, buffer: &[&[S]]) -> Result<(), Self::Err>;
}

/// The error type that represents the errors you can get from the [`run`] function.
///
/// [`run`]: ./fn.run.html
#[derive(Debug)]
pub enum CombinedError<AudioInErr, AudioOutErr> {
    /// An error occurred when reading the audio.
    AudioInError(AudioInErr),
    /// An error occurred when writing the audio.
    AudioOutError(AudioOutErr),
}

impl<AudioInErr, AudioOutErr> Display for CombinedError<AudioInErr, AudioOutErr>
where
    AudioInErr: Display,
    AudioOutErr: Display,
{
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            CombinedError::AudioInError(ref e) => write!(f, "Audio in error: {}", e),
            CombinedError::AudioOutError(ref e) => write!(f, "Audio out error: {}", e),
        }
    }
}

impl<AudioInErr, AudioOutErr> Error for CombinedError<AudioInErr, AudioOutErr>
where
    AudioInErr: Error + 'static,
    AudioOutErr: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CombinedError::AudioInError(ref e) => Some(e),
            CombinedError::AudioOutError(ref e) => Some(e),
        }
    }
}

/// The context that is passed to the plugin by the [`run`] function.
///
/// [`run`]: ./fn.run.html
#[derive(Debug, Default)]
pub struct OfflineHost {
    stop_requested: bool,
}

impl OfflineHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }
}

impl HostInterface for OfflineHost {
    fn stop(&mut self) {
        self.stop_requested = true;
    }
}

/// Run a plugin, reading audio from `audio_in` and writing it to `audio_out`, block by block.
///
/// The plugin gets as many channels as it has outputs; the first of them carry the input.
/// Rendering stops when the reader returns fewer frames than requested or when the plugin
/// calls [`stop`] on the context.
///
/// Note: cannot be used in a real-time context
/// -------------------------------------
/// This function allocates memory and cannot be used in a real-time context.
///
/// # Panics
/// Panics if `buffer_size_in_frames` is `0`.
///
/// [`stop`]: ../trait.HostInterface.html#method.stop
pub fn run<S, P, AudioIn, AudioOut>(
    plugin: &mut P,
    buffer_size_in_frames: usize,
    mut audio_in: AudioIn,
    mut audio_out: AudioOut,
) -> Result<(), CombinedError<AudioIn::Err, AudioOut::Err>>
where
    P: AudioHandler + AudioHandlerMeta + ContextualAudioRenderer<S, OfflineHost>,
    AudioIn: AudioReader<S>,
    AudioOut: AudioWriter<S>,
    S: Copy + Zero,
{
    assert!(buffer_size_in_frames > 0);

    let frames_per_second = audio_in.frames_per_second();
    plugin.set_sample_rate(frames_per_second as f64);

    let number_of_input_channels = audio_in.number_of_channels();
    let number_of_output_channels = plugin.max_number_of_audio_outputs();
    let number_of_channels_with_input = cmp::min(number_of_input_channels, number_of_output_channels);
    info!(
        "Rendering offline: {} input channel(s), {} output channel(s), {} frames per block.",
        number_of_input_channels, number_of_output_channels, buffer_size_in_frames
    );

    let mut buffers = AudioChunk::zero(
        cmp::max(number_of_input_channels, number_of_output_channels),
        buffer_size_in_frames,
    )
    .inner();
    let mut host = OfflineHost::new();
    let mut number_of_blocks = 0;

    loop {
        let frames_read = audio_in
            .fill_buffer(&mut buffers_as_mut_slice(
                &mut buffers[..number_of_input_channels],
                buffer_size_in_frames,
            ))
            .map_err(CombinedError::AudioInError)?;
        assert!(frames_read <= buffer_size_in_frames);
        if frames_read == 0 {
            break;
        }

        {
            let mut channels =
                buffers_as_mut_slice(&mut buffers[..number_of_output_channels], frames_read);
            let mut block =
                AudioBlock::new(&mut channels, frames_read, number_of_channels_with_input);
            plugin.render_buffer(&mut block, &mut host);
        }

        audio_out
            .write_buffer(&buffers_as_slice(
                &buffers[..number_of_output_channels],
                frames_read,
            ))
            .map_err(CombinedError::AudioOutError)?;
        number_of_blocks += 1;

        if frames_read < buffer_size_in_frames || host.stop_requested() {
            break;
        }
    }

    debug!("Rendered {} block(s).", number_of_blocks);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::dummy::AudioDummy;
    use super::memory::{AudioBufferReader, AudioBufferWriter};
    use super::*;
    use crate::buffer::AudioChunk;
    use crate::parameters::PanningLaw;
    use crate::StereoPanner;

    #[test]
    fn renders_the_panned_input_in_blocks() {
        let input = audio_chunk![[1.0f32, 1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0, 1.0]];
        let mut output = AudioChunk::new(2);
        let mut panner = StereoPanner::new();
        panner.parameters().set_pan_position(-1.0);
        panner.parameters().set_gain(0.5);

        run(
            &mut panner,
            2,
            AudioBufferReader::new(&input, 44100),
            AudioBufferWriter::new(&mut output),
        )
        .unwrap();

        assert_eq!(
            output,
            audio_chunk![[0.5f32, 0.5, 0.5, 0.5, 0.5], [0.0, 0.0, 0.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn missing_input_channel_is_rendered_as_silence() {
        let input = audio_chunk![[1.0f64, -1.0, 0.5]];
        let mut output = AudioChunk::new(2);
        let mut panner = StereoPanner::new();
        panner
            .parameters()
            .set_panning_law(PanningLaw::ConstantPower);

        run(
            &mut panner,
            4,
            AudioBufferReader::new(&input, 48000),
            AudioBufferWriter::new(&mut output),
        )
        .unwrap();

        let expected = (std::f64::consts::PI / 4.0).cos();
        assert_eq!(output.channels()[0], vec![expected, -expected, 0.5 * expected]);
        assert_eq!(output.channels()[1], vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let mut output = AudioChunk::<f32>::new(2);
        let mut panner = StereoPanner::new();
        run(
            &mut panner,
            16,
            AudioDummy::new(),
            AudioBufferWriter::new(&mut output),
        )
        .unwrap();
        assert_eq!(output.number_of_frames(), 0);
    }

    struct FailingWriter;

    #[derive(Debug, PartialEq)]
    struct WriteFailed;

    impl Display for WriteFailed {
        fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
            write!(f, "write failed")
        }
    }

    impl Error for WriteFailed {}

    impl AudioWriter<f32> for FailingWriter {
        type Err = WriteFailed;
        fn write_buffer(&mut self, _buffer: &[&[f32]]) -> Result<(), Self::Err> {
            Err(WriteFailed)
        }
    }

    #[test]
    fn writer_errors_are_propagated() {
        let input = audio_chunk![[1.0f32, 1.0], [1.0, 1.0]];
        let mut panner = StereoPanner::new();
        let result = run(
            &mut panner,
            2,
            AudioBufferReader::new(&input, 44100),
            FailingWriter,
        );
        match result {
            Err(CombinedError::AudioOutError(e)) => assert_eq!(e.to_string(), "write failed"),
            other => panic!("expected an audio out error, got {:?}", other),
        }
    }
}
