//! Dummy audio input and output.
use super::{AudioReader, AudioWriter};
use std::marker::PhantomData;

/// An [`AudioReader`] without channels that never delivers a frame and an [`AudioWriter`]
/// that discards everything that is written to it.
///
/// [`AudioReader`]: ../trait.AudioReader.html
/// [`AudioWriter`]: ../trait.AudioWriter.html
pub struct AudioDummy<S> {
    frames_per_second: u64,
    _phantom: PhantomData<S>,
}

impl<S> AudioDummy<S> {
    pub fn new() -> Self {
        Self::with_frames_per_second(44100)
    }

    pub fn with_frames_per_second(frames_per_second: u64) -> Self {
        AudioDummy {
            frames_per_second,
            _phantom: PhantomData,
        }
    }
}

impl<S> Default for AudioDummy<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> AudioReader<S> for AudioDummy<S> {
    type Err = std::convert::Infallible;

    fn number_of_channels(&self) -> usize {
        0
    }

    fn frames_per_second(&self) -> u64 {
        self.frames_per_second
    }

    fn fill_buffer(&mut self, _output: &mut [&mut [S]]) -> Result<usize, Self::Err> {
        Ok(0)
    }
}

impl<S> AudioWriter<S> for AudioDummy<S> {
    type Err = std::convert::Infallible;

    fn write_buffer(&mut self, _buffer: &[&[S]]) -> Result<(), Self::Err> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::memory::AudioBufferReader;
    use super::super::run;
    use super::*;
    use crate::StereoPanner;

    #[test]
    fn discards_the_rendered_audio() {
        let input = audio_chunk![[1.0f32, 1.0, 1.0], [1.0, 1.0, 1.0]];
        let mut panner = StereoPanner::new();
        let result = run(
            &mut panner,
            2,
            AudioBufferReader::new(&input, 44100),
            AudioDummy::<f32>::new(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn reports_its_sample_rate() {
        let dummy = AudioDummy::<f64>::with_frames_per_second(96000);
        assert_eq!(AudioReader::<f64>::frames_per_second(&dummy), 96000);
        assert_eq!(AudioReader::<f64>::number_of_channels(&dummy), 0);
    }
}
