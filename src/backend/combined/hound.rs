//! Read and write `.wav` files with the [`hound`](https://crates.io/crates/hound) crate.
//!
//! Supported formats are 32 bits floating point and 8, 16, 24 and 32 bits integer.
//! Integer samples are scaled so that the full range of the file maps to `-1.0..1.0`.
use super::{AudioReader, AudioWriter};
use dasp_sample::{FromSample, ToSample};
use hound::{WavReader, WavSamples, WavWriter};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{Read, Seek, Write};

/// The error returned when a `.wav` file has a format that is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoundAudioError {
    UnsupportedAudioFormat {
        sample_format: hound::SampleFormat,
        bits_per_sample: u16,
    },
}

impl Display for HoundAudioError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            HoundAudioError::UnsupportedAudioFormat {
                sample_format,
                bits_per_sample,
            } => {
                let format = match sample_format {
                    hound::SampleFormat::Float => "floating point",
                    hound::SampleFormat::Int => "integer",
                };
                write!(
                    f,
                    "Unsupported audio format: {} bits {} samples.",
                    bits_per_sample, format
                )
            }
        }
    }
}

impl Error for HoundAudioError {}

fn check_spec(spec: &hound::WavSpec) -> Result<(), HoundAudioError> {
    let supported = match spec.sample_format {
        hound::SampleFormat::Float => spec.bits_per_sample == 32,
        hound::SampleFormat::Int => matches!(spec.bits_per_sample, 8 | 16 | 24 | 32),
    };
    if supported {
        Ok(())
    } else {
        Err(HoundAudioError::UnsupportedAudioFormat {
            sample_format: spec.sample_format,
            bits_per_sample: spec.bits_per_sample,
        })
    }
}

/// An [`AudioReader`] that reads the samples of a `.wav` file.
///
/// [`AudioReader`]: ../trait.AudioReader.html
pub struct HoundAudioReader<'wr, F>
where
    F: FromSample<f32> + FromSample<i32>,
{
    hound_sample_reader: Box<dyn HoundSampleReader<F> + 'wr>,
    number_of_channels: usize,
    frames_per_second: u64,
}

impl<'wr, F> HoundAudioReader<'wr, F>
where
    F: FromSample<f32> + FromSample<i32>,
{
    pub fn new<R: Read>(reader: &'wr mut WavReader<R>) -> Result<Self, HoundAudioError> {
        let spec = reader.spec();
        check_spec(&spec)?;

        let hound_sample_reader: Box<dyn HoundSampleReader<F> + 'wr> = match spec.sample_format
        {
            hound::SampleFormat::Float => Box::new(FloatSampleReader {
                samples: reader.samples(),
            }),
            hound::SampleFormat::Int => Box::new(IntSampleReader {
                samples: reader.samples(),
                shift: 32 - u32::from(spec.bits_per_sample),
            }),
        };
        Ok(Self {
            number_of_channels: spec.channels as usize,
            frames_per_second: spec.sample_rate as u64,
            hound_sample_reader,
        })
    }
}

impl<'wr, F> AudioReader<F> for HoundAudioReader<'wr, F>
where
    F: FromSample<f32> + FromSample<i32>,
{
    type Err = hound::Error;

    fn number_of_channels(&self) -> usize {
        self.number_of_channels
    }

    fn frames_per_second(&self) -> u64 {
        self.frames_per_second
    }

    fn fill_buffer(&mut self, outputs: &mut [&mut [F]]) -> Result<usize, Self::Err> {
        assert_eq!(outputs.len(), self.number_of_channels());
        let length = match outputs.first() {
            Some(output) => output.len(),
            None => return Ok(0),
        };
        for output in outputs.iter() {
            assert_eq!(output.len(), length);
        }

        for frame_index in 0..length {
            for output in outputs.iter_mut() {
                match self.hound_sample_reader.read_sample()? {
                    Some(sample) => output[frame_index] = sample,
                    None => return Ok(frame_index),
                }
            }
        }
        Ok(length)
    }
}

trait HoundSampleReader<F> {
    fn read_sample(&mut self) -> Result<Option<F>, hound::Error>;
}

struct FloatSampleReader<'wr, R: Read> {
    samples: WavSamples<'wr, R, f32>,
}

impl<'wr, R: Read, F> HoundSampleReader<F> for FloatSampleReader<'wr, R>
where
    F: FromSample<f32>,
{
    fn read_sample(&mut self) -> Result<Option<F>, hound::Error> {
        match self.samples.next() {
            Some(n) => Ok(Some(F::from_sample_(n?))),
            None => Ok(None),
        }
    }
}

/// Hound delivers integer samples right-aligned; shifting them to the left
/// lets them use the full range of an `i32`.
struct IntSampleReader<'wr, R: Read> {
    samples: WavSamples<'wr, R, i32>,
    shift: u32,
}

impl<'wr, R: Read, F> HoundSampleReader<F> for IntSampleReader<'wr, R>
where
    F: FromSample<i32>,
{
    fn read_sample(&mut self) -> Result<Option<F>, hound::Error> {
        match self.samples.next() {
            Some(n) => Ok(Some(F::from_sample_(n? << self.shift))),
            None => Ok(None),
        }
    }
}

/// An [`AudioWriter`] that writes the samples to a `.wav` file.
///
/// The `WavWriter` must still be finalized when all audio has been written.
///
/// [`AudioWriter`]: ../trait.AudioWriter.html
pub struct HoundAudioWriter<'ww, F>
where
    F: ToSample<f32> + ToSample<i32>,
{
    hound_sample_writer: Box<dyn HoundSampleWriter<F> + 'ww>,
    number_of_channels: usize,
}

impl<'ww, F> HoundAudioWriter<'ww, F>
where
    F: ToSample<f32> + ToSample<i32>,
{
    pub fn new<W: Write + Seek>(writer: &'ww mut WavWriter<W>) -> Result<Self, HoundAudioError> {
        let spec = writer.spec();
        check_spec(&spec)?;

        let hound_sample_writer: Box<dyn HoundSampleWriter<F> + 'ww> = match spec.sample_format {
            hound::SampleFormat::Float => Box::new(FloatSampleWriter { writer }),
            hound::SampleFormat::Int => Box::new(IntSampleWriter {
                writer,
                shift: 32 - u32::from(spec.bits_per_sample),
            }),
        };
        Ok(Self {
            hound_sample_writer,
            number_of_channels: spec.channels as usize,
        })
    }
}

impl<'ww, F> AudioWriter<F> for HoundAudioWriter<'ww, F>
where
    F: ToSample<f32> + ToSample<i32> + Copy,
{
    type Err = hound::Error;

    fn write_buffer(&mut self, inputs: &[&[F]]) -> Result<(), Self::Err> {
        assert_eq!(inputs.len(), self.number_of_channels);
        let length = inputs.first().map(|input| input.len()).unwrap_or(0);
        for input in inputs.iter() {
            assert_eq!(input.len(), length);
        }

        for frame_index in 0..length {
            for input in inputs.iter() {
                self.hound_sample_writer.write_sample(input[frame_index])?;
            }
        }

        self.hound_sample_writer.flush()
    }
}

trait HoundSampleWriter<F> {
    fn write_sample(&mut self, sample: F) -> Result<(), hound::Error>;
    fn flush(&mut self) -> Result<(), hound::Error>;
}

struct FloatSampleWriter<'ww, W>
where
    W: Write + Seek,
{
    writer: &'ww mut WavWriter<W>,
}

impl<'ww, F, W> HoundSampleWriter<F> for FloatSampleWriter<'ww, W>
where
    F: ToSample<f32>,
    W: Write + Seek,
{
    fn write_sample(&mut self, sample: F) -> Result<(), hound::Error> {
        self.writer.write_sample::<f32>(sample.to_sample_())
    }

    fn flush(&mut self) -> Result<(), hound::Error> {
        self.writer.flush()
    }
}

struct IntSampleWriter<'ww, W>
where
    W: Write + Seek,
{
    writer: &'ww mut WavWriter<W>,
    shift: u32,
}

impl<'ww, F, W> HoundSampleWriter<F> for IntSampleWriter<'ww, W>
where
    F: ToSample<i32>,
    W: Write + Seek,
{
    fn write_sample(&mut self, sample: F) -> Result<(), hound::Error> {
        let full_range: i32 = sample.to_sample_();
        self.writer.write_sample::<i32>(full_range >> self.shift)
    }

    fn flush(&mut self) -> Result<(), hound::Error> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::combined::memory::{AudioBufferReader, AudioBufferWriter};
    use crate::backend::combined::run;
    use crate::buffer::AudioChunk;
    use crate::StereoPanner;
    use std::io::Cursor;

    fn spec(sample_format: hound::SampleFormat, bits_per_sample: u16) -> hound::WavSpec {
        hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample,
            sample_format,
        }
    }

    fn write_wav(spec: hound::WavSpec, chunk: &AudioChunk<f32>) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut wav_writer = WavWriter::new(&mut cursor, spec).unwrap();
            {
                let mut writer = HoundAudioWriter::new(&mut wav_writer).unwrap();
                writer.write_buffer(&chunk.as_slices()).unwrap();
            }
            wav_writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn read_wav(bytes: Vec<u8>) -> AudioChunk<f32> {
        let mut wav_reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let reader = HoundAudioReader::<f32>::new(&mut wav_reader).unwrap();
        let mut chunk = AudioChunk::new(reader.number_of_channels());
        run(
            &mut Passthrough,
            3,
            reader,
            AudioBufferWriter::new(&mut chunk),
        )
        .unwrap();
        chunk
    }

    struct Passthrough;

    impl crate::AudioHandlerMeta for Passthrough {
        fn max_number_of_audio_inputs(&self) -> usize {
            2
        }
        fn max_number_of_audio_outputs(&self) -> usize {
            2
        }
    }

    impl crate::AudioHandler for Passthrough {
        fn set_sample_rate(&mut self, _sample_rate: f64) {}
    }

    impl<S, C> crate::ContextualAudioRenderer<S, C> for Passthrough {
        fn render_buffer(&mut self, _block: &mut crate::buffer::AudioBlock<S>, _context: &mut C) {}
    }

    #[test]
    fn float_samples_are_kept_exactly() {
        let chunk = audio_chunk![[0.1f32, -0.75, 0.3, 1.0], [0.0, 0.2, -1.0, 0.5]];
        let bytes = write_wav(spec(hound::SampleFormat::Float, 32), &chunk);
        assert_eq!(read_wav(bytes), chunk);
    }

    #[test]
    fn integer_samples_use_the_full_range() {
        let chunk = audio_chunk![[0.5f32, -1.0, 0.25, 0.0], [-0.5, 0.75, 0.0, -0.25]];
        for bits_per_sample in [8, 16, 24, 32].iter() {
            let bytes = write_wav(spec(hound::SampleFormat::Int, *bits_per_sample), &chunk);
            assert_eq!(read_wav(bytes), chunk, "{} bits per sample", bits_per_sample);
        }
    }

    #[test]
    fn sixteen_bit_samples_are_scaled_to_the_file_range() {
        let chunk = audio_chunk![[0.5f32, -1.0], [0.0, 0.25]];
        let bytes = write_wav(spec(hound::SampleFormat::Int, 16), &chunk);
        let mut wav_reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let samples: Vec<i16> = wav_reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![16384, 0, -32768, 8192]);
    }

    #[test]
    fn pans_a_wav_file() {
        let input = audio_chunk![[1.0f32, 0.5], [1.0, 0.5]];
        let mut panned = AudioChunk::new(2);
        let mut panner = StereoPanner::new();
        panner.parameters().set_pan_position(1.0);
        run(
            &mut panner,
            64,
            AudioBufferReader::new(&input, 44100),
            AudioBufferWriter::new(&mut panned),
        )
        .unwrap();

        let bytes = write_wav(spec(hound::SampleFormat::Float, 32), &panned);
        assert_eq!(read_wav(bytes), audio_chunk![[0.0f32, 0.0], [1.0, 0.5]]);
    }

    #[test]
    fn unsupported_formats_are_described() {
        let error = HoundAudioError::UnsupportedAudioFormat {
            sample_format: hound::SampleFormat::Float,
            bits_per_sample: 64,
        };
        assert_eq!(
            error.to_string(),
            "Unsupported audio format: 64 bits floating point samples."
        );
        assert_eq!(
            check_spec(&spec(hound::SampleFormat::Float, 64)),
            Err(error)
        );
        assert_eq!(check_spec(&spec(hound::SampleFormat::Int, 24)), Ok(()));
    }
}
