//! Read audio from memory and write audio to memory, useful for testing and for
//! applications that keep the whole signal in memory.
use super::{AudioReader, AudioWriter};
use crate::buffer::AudioChunk;
use std::borrow::Borrow;
use std::marker::PhantomData;

/// An [`AudioReader`] that reads from a given [`AudioChunk`].
/// The generic parameter type `S` represents the sample type.
///
/// The chunk can be owned (`AudioChunkReader<S, AudioChunk<S>>`) or borrowed
/// (see [`AudioBufferReader`]).
///
/// [`AudioReader`]: ../trait.AudioReader.html
/// [`AudioChunk`]: ../../../buffer/struct.AudioChunk.html
/// [`AudioBufferReader`]: ./type.AudioBufferReader.html
pub struct AudioChunkReader<S, T>
where
    T: Borrow<AudioChunk<S>>,
    S: Copy,
{
    frames_per_second: u64,
    frame: usize,
    chunk: T,
    phantom: PhantomData<S>,
}

impl<S, T> AudioChunkReader<S, T>
where
    T: Borrow<AudioChunk<S>>,
    S: Copy,
{
    /// Construct a new `AudioChunkReader` with the given [`AudioChunk`] and
    /// sample rate in frames per second.
    ///
    /// [`AudioChunk`]: ../../../buffer/struct.AudioChunk.html
    pub fn new(chunk: T, frames_per_second: u64) -> Self {
        Self {
            chunk,
            frames_per_second,
            frame: 0,
            phantom: PhantomData::<S>,
        }
    }
}

impl<S, T> AudioReader<S> for AudioChunkReader<S, T>
where
    T: Borrow<AudioChunk<S>>,
    S: Copy,
{
    type Err = std::convert::Infallible;

    fn number_of_channels(&self) -> usize {
        self.chunk.borrow().channels().len()
    }

    fn frames_per_second(&self) -> u64 {
        self.frames_per_second
    }

    fn fill_buffer(&mut self, output: &mut [&mut [S]]) -> Result<usize, Self::Err> {
        assert_eq!(output.len(), self.number_of_channels());
        let chunk = self.chunk.borrow();
        let buffer_size = output.first().map(|channel| channel.len()).unwrap_or(0);
        let remainder = chunk.number_of_frames() - self.frame;
        let frames_to_copy = std::cmp::min(buffer_size, remainder);

        for (output_channel, input_channel) in output.iter_mut().zip(chunk.channels().iter()) {
            assert_eq!(buffer_size, output_channel.len());
            output_channel[0..frames_to_copy]
                .copy_from_slice(&input_channel[self.frame..self.frame + frames_to_copy]);
        }
        self.frame += frames_to_copy;
        Ok(frames_to_copy)
    }
}

/// An [`AudioReader`] that reads from a borrowed [`AudioChunk`].
/// The generic parameter type `S` represents the sample type.
///
/// [`AudioReader`]: ../trait.AudioReader.html
/// [`AudioChunk`]: ../../../buffer/struct.AudioChunk.html
pub type AudioBufferReader<'b, S> = AudioChunkReader<S, &'b AudioChunk<S>>;

/// An [`AudioWriter`] that appends to a given [`AudioChunk`].
/// The generic parameter type `S` represents the sample type.
///
/// Note about using in a real-time context
/// =======================================
/// Because this appends to an [`AudioChunk`], it may allocate memory
/// when the capacity of the [`AudioChunk`] is exceeded.
///
/// [`AudioWriter`]: ../trait.AudioWriter.html
/// [`AudioChunk`]: ../../../buffer/struct.AudioChunk.html
pub struct AudioBufferWriter<'b, S> {
    buffer: &'b mut AudioChunk<S>,
}

impl<'b, S> AudioBufferWriter<'b, S> {
    pub fn new(buffer: &'b mut AudioChunk<S>) -> Self {
        Self { buffer }
    }
}

impl<'b, S> AudioWriter<S> for AudioBufferWriter<'b, S>
where
    S: Copy,
{
    type Err = std::convert::Infallible;

    fn write_buffer(&mut self, buffer: &[&[S]]) -> Result<(), Self::Err> {
        self.buffer.append_sliced_chunk(buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{AudioReader, AudioWriter};
    use super::*;

    #[test]
    fn reader_fills_the_buffer_until_the_chunk_is_exhausted() {
        let audio_buffer = audio_chunk![[1, 2, 3, 4, 5], [6, 7, 8, 9, 10], [11, 12, 13, 14, 15]];
        let mut reader = AudioBufferReader::new(&audio_buffer, 16);
        assert_eq!(reader.number_of_channels(), 3);
        assert_eq!(reader.frames_per_second(), 16);

        let mut output_buffer = AudioChunk::zero(3, 2);
        let mut slices = output_buffer.as_mut_slices();
        assert_eq!(Ok(2), reader.fill_buffer(&mut slices));
        assert_eq!(slices[0], [1, 2]);
        assert_eq!(slices[1], [6, 7]);
        assert_eq!(slices[2], [11, 12]);

        assert_eq!(Ok(2), reader.fill_buffer(&mut slices));
        assert_eq!(slices[0], [3, 4]);
        assert_eq!(slices[1], [8, 9]);
        assert_eq!(slices[2], [13, 14]);

        assert_eq!(Ok(1), reader.fill_buffer(&mut slices));
        assert_eq!(slices[0], [5, 4]);
        assert_eq!(slices[1], [10, 9]);
        assert_eq!(slices[2], [15, 14]);

        assert_eq!(Ok(0), reader.fill_buffer(&mut slices));
    }

    #[test]
    fn reader_can_own_its_chunk() {
        let mut reader = AudioChunkReader::new(audio_chunk![[0.25f32, 0.5]], 44100);
        let mut output_buffer = AudioChunk::zero(1, 4);
        let mut slices = output_buffer.as_mut_slices();
        assert_eq!(Ok(2), reader.fill_buffer(&mut slices));
        assert_eq!(slices[0], [0.25, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn writer_appends_every_buffer() {
        let mut chunk = AudioChunk::new(2);
        {
            let mut writer = AudioBufferWriter::new(&mut chunk);
            assert_eq!(Ok(()), writer.write_buffer(&[&[1, 2], &[3, 4]]));
            assert_eq!(Ok(()), writer.write_buffer(&[&[5], &[6]]));
        }
        assert_eq!(chunk, audio_chunk![[1, 2, 5], [3, 4, 6]]);
    }
}
