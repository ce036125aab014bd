//! Audio buffers.
//!
//! ## Some audio concepts
//! A *sample* is a single number representing the air pressure at a given time.
//! It is usually represented by an `f32` or an `f64`.
//!
//! A *channel* usually corresponds with a speaker or a number of speakers.
//! E.g. in a stereo setup, there is a "left" channel and a "right" channel.
//!
//! A *frame* consists of the samples for all the channels at a given time.
//!
//! A *block* consists of subsequent frames for all channels, as handed over by the host
//! for one call to the renderer.
//!
//!```text
//!                         ┌ block     ┌ frame
//!             ┌ sample    ↓           ↓
//!             │      ┌─────────┐     ┌─┐
//!          ┌──↓──────┼─────────┼─────┼─┼───────────────────┐
//!   left  →│• • • • •│• • • • •│• • •│•│• • • • • • • • • •│
//!          └─────────┼─────────┼─────┼─┼───────────────────┘
//!   right   • • • • •│• • • • •│• • •│•│• • • • • • • • • •
//!                    └─────────┘     └─┘
//! ```
use num_traits::Zero;

/// An owned audio buffer with one `Vec` per channel.
///
/// Used for offline rendering and in tests; the real-time path works on [`AudioBlock`]s.
///
/// [`AudioBlock`]: ./struct.AudioBlock.html
#[derive(Clone, PartialEq, Debug)]
pub struct AudioChunk<S> {
    channels: Vec<Vec<S>>,
}

impl<S> AudioChunk<S> {
    /// Note: cannot be used in a real-time context
    /// -------------------------------------
    /// This method allocates memory and cannot be used in a real-time context.
    pub fn zero(number_of_channels: usize, number_of_frames: usize) -> Self
    where
        S: Zero + Clone,
    {
        let mut channels = Vec::with_capacity(number_of_channels);
        for _ in 0..number_of_channels {
            channels.push(vec![S::zero(); number_of_frames]);
        }
        Self { channels }
    }

    /// # Panics
    /// Panics if `channels` is empty or if not all channels have the same length.
    pub fn from_channels(channels: Vec<Vec<S>>) -> Self {
        assert!(!channels.is_empty());
        let len = channels[0].len();
        for channel in channels.iter() {
            assert_eq!(len, channel.len());
        }

        Self { channels }
    }

    /// Create a new `AudioChunk` with the given number of empty channels.
    ///
    /// Note: cannot be used in a real-time context
    /// -------------------------------------
    /// This method allocates memory and cannot be used in a real-time context.
    pub fn new(number_of_channels: usize) -> Self {
        let mut channels = Vec::with_capacity(number_of_channels);
        for _ in 0..number_of_channels {
            channels.push(Vec::new());
        }

        Self { channels }
    }

    pub fn channels(&self) -> &Vec<Vec<S>> {
        &self.channels
    }

    pub fn number_of_frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    /// Note about using in a real-time context
    /// ---------------------------------------
    /// This method will allocate memory if the capacity of the chunk is exceeded and cannot
    /// be used in a real-time context in that case.
    pub fn append_sliced_chunk(&mut self, chunk: &[&[S]])
    where
        S: Clone,
    {
        assert_eq!(self.channels.len(), chunk.len());
        if let Some(first) = chunk.first() {
            let len = first.len();
            for channel in chunk.iter() {
                assert_eq!(len, channel.len());
            }
        }
        for (output_channel, input_channel) in self.channels.iter_mut().zip(chunk.iter()) {
            output_channel.extend_from_slice(input_channel);
        }
    }

    pub fn inner(self) -> Vec<Vec<S>> {
        self.channels
    }

    /// Note: cannot be used in a real-time context
    /// -------------------------------------
    /// This method allocates memory and cannot be used in a real-time context.
    pub fn as_slices(&self) -> Vec<&[S]> {
        self.channels
            .iter()
            .map(|element| element.as_slice())
            .collect()
    }

    /// Note: cannot be used in a real-time context
    /// -------------------------------------
    /// This method allocates memory and cannot be used in a real-time context.
    pub fn as_mut_slices(&mut self) -> Vec<&mut [S]> {
        self.channels
            .iter_mut()
            .map(|element| element.as_mut_slice())
            .collect()
    }
}

#[macro_export]
macro_rules! audio_chunk {
    [
        [
            $($head:expr),*
        ]
        $(
            ,
            [
                $($tail:expr),*
            ]
        )*
    ] => {
        $crate::buffer::AudioChunk::from_channels(
            vec![
                vec![$($head),*]
                $(
                    , vec![$($tail),*]
                )*
            ]
        )
    };
}

pub fn buffers_as_slice<'a, S>(buffers: &'a [Vec<S>], slice_len: usize) -> Vec<&'a [S]> {
    buffers.iter().map(|b| &b[0..slice_len]).collect()
}

pub fn buffers_as_mut_slice<'a, S>(buffers: &'a mut [Vec<S>], slice_len: usize) -> Vec<&'a mut [S]> {
    buffers.iter_mut().map(|b| &mut b[0..slice_len]).collect()
}

/// A block of audio that is processed in place.
///
/// The first `number_of_input_channels` channels contain input data, the remaining channels
/// are output-only and may contain garbage until they are cleared.
/// Only the first `number_of_frames` samples of each channel are ever read or written.
pub struct AudioBlock<'a, 'b, S> {
    channels: &'a mut [&'b mut [S]],
    number_of_frames: usize,
    number_of_input_channels: usize,
}

impl<'a, 'b, S> AudioBlock<'a, 'b, S> {
    /// # Panics
    /// Panics if one of the channels is shorter than `number_of_frames`.
    pub fn new(
        channels: &'a mut [&'b mut [S]],
        number_of_frames: usize,
        number_of_input_channels: usize,
    ) -> Self {
        for channel in channels.iter() {
            assert!(channel.len() >= number_of_frames);
        }
        Self {
            channels,
            number_of_frames,
            number_of_input_channels,
        }
    }

    /// Create a block in which every channel carries input.
    ///
    /// # Panics
    /// Panics if not all channels have the same length.
    pub fn from_channels(channels: &'a mut [&'b mut [S]]) -> Self {
        let number_of_frames = channels.first().map(|c| c.len()).unwrap_or(0);
        for channel in channels.iter() {
            assert_eq!(number_of_frames, channel.len());
        }
        let number_of_input_channels = channels.len();
        Self {
            channels,
            number_of_frames,
            number_of_input_channels,
        }
    }

    pub fn number_of_frames(&self) -> usize {
        self.number_of_frames
    }

    pub fn number_of_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn number_of_input_channels(&self) -> usize {
        self.number_of_input_channels
    }

    pub fn channel(&self, index: usize) -> &[S] {
        &self.channels[index][..self.number_of_frames]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [S] {
        &mut self.channels[index][..self.number_of_frames]
    }

    /// The left and the right channel, if the block has at least two channels.
    pub fn split_stereo(&mut self) -> Option<(&mut [S], &mut [S])> {
        let number_of_frames = self.number_of_frames;
        let (left, rest) = self.channels.split_first_mut()?;
        let right = rest.first_mut()?;
        Some((&mut left[..number_of_frames], &mut right[..number_of_frames]))
    }

    /// Set every channel that does not carry input to zero.
    pub fn clear_output_only_channels(&mut self)
    where
        S: Zero,
    {
        let number_of_frames = self.number_of_frames;
        for channel in self.channels.iter_mut().skip(self.number_of_input_channels) {
            for sample in channel[..number_of_frames].iter_mut() {
                *sample = S::zero();
            }
        }
    }
}

#[test]
fn append_works_as_expected() {
    let mut audio_buffer = AudioChunk::new(3);
    let input = audio_chunk![[1, 2], [3, 4], [5, 6]];
    audio_buffer.append_sliced_chunk(input.as_slices().as_ref());
    assert_eq!(audio_buffer.channels()[0], vec![1, 2]);
    assert_eq!(audio_buffer.channels()[1], vec![3, 4]);
    assert_eq!(audio_buffer.channels()[2], vec![5, 6]);
}
