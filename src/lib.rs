//! # Rpan
//! A real-time stereo panner for audio plugins and applications.
//! It redistributes a stereo signal over the left and the right channel according to a
//! pan position, using either a linear or a constant-power panning law, and applies a gain.
//!
//! ## Overview
//!
//! * [`ParameterStore`] holds the pan position, the gain and the panning law.
//!   It can be shared between the audio thread and the host, and it can be saved to and
//!   restored from a byte blob.
//! * [`panning::process`] pans one block of audio in place.
//! * [`StereoPanner`] combines both into a plugin that can be run by every backend.
//!
//! ## Back-ends
//! `rpan` currently supports the following back-ends:
//!
//! * [`jack`] (behind the `backend-jack` feature)
//! * [`vst`] (behind the `backend-vst` feature)
//! * [`combined`] combine different back-ends for audio input and audio output,
//!     mostly for offline rendering and testing (behind the `backend-combined` features)
//!
//! ### Starting the backend/entry point for the host
//!
//! * Jack: [`run()`](./backend/jack_backend/fn.run.html)
//! * Offline : [`run()`](backend/combined/fn.run.html)
//! * VST 2.4:  [`vst_init!`]
//!
//! ### Meta-data
//! The backends need the name of the plugin and the names of its audio ports.
//! Implement the [`Meta`] trait to get [`CommonPluginMeta`], [`AudioHandlerMeta`] and
//! [`CommonAudioPortMeta`] for free.
//!
//! ### Rendering audio
//! All backends require the plugin to implement [`AudioHandler`] and
//! [`ContextualAudioRenderer`]. The "context" gives access to the backend;
//! common functionality of the context is defined in the [`HostInterface`] trait.
//!
//! [`jack`]: ./backend/jack_backend/index.html
//! [`vst`]: ./backend/vst_backend/index.html
//! [`combined`]: ./backend/combined/index.html
//! [`ParameterStore`]: ./parameters/struct.ParameterStore.html
//! [`panning::process`]: ./panning/fn.process.html
//! [`StereoPanner`]: ./plugin/struct.StereoPanner.html
//! [`Meta`]: ./meta/trait.Meta.html
//! [`CommonPluginMeta`]: ./trait.CommonPluginMeta.html
//! [`AudioHandlerMeta`]: ./trait.AudioHandlerMeta.html
//! [`CommonAudioPortMeta`]: ./trait.CommonAudioPortMeta.html
//! [`AudioHandler`]: ./trait.AudioHandler.html
//! [`ContextualAudioRenderer`]: ./trait.ContextualAudioRenderer.html
//! [`HostInterface`]: ./backend/trait.HostInterface.html
//! [`vst_init!`]: ./macro.vst_init.html

#[macro_use]
extern crate log;

use crate::buffer::AudioBlock;
use crate::meta::{AudioPort, General, Meta, Name, Port};
use std::fmt::{Error, Write};

#[macro_use]
pub mod buffer;
pub mod backend;
pub mod meta;
pub mod panning;
pub mod parameters;
pub mod plugin;
pub mod test_utilities;

pub use crate::parameters::{PanningLaw, ParameterSnapshot, ParameterStore};
pub use crate::plugin::StereoPanner;

/// Re-exports from the [`vecstorage`](https://crates.io/crates/vecstorage) crate.
pub mod vecstorage {
    pub use vecstorage::VecStorage;
}

/// Define the maximum number of audio inputs and the maximum number of audio outputs.
///
/// Backends that require the plugin to implement this trait ensure that when calling the
/// [`render_buffer`] method of the [`ContextualAudioRenderer`] trait, the number of channels
/// of the block is smaller than or equal to `Self::max_number_of_audio_outputs()`.
///
/// # Remark
/// This trait can be more conveniently implemented by implementing the [`Meta`] trait.
///
/// [`Meta`]: ./meta/trait.Meta.html
/// [`render_buffer`]: ./trait.ContextualAudioRenderer.html#tymethod.render_buffer
/// [`ContextualAudioRenderer`]: ./trait.ContextualAudioRenderer.html
pub trait AudioHandlerMeta {
    /// The maximum number of audio inputs supported.
    /// This method should return the same value every time it is called.
    fn max_number_of_audio_inputs(&self) -> usize;

    /// The maximum number of audio outputs supported.
    /// This method should return the same value every time it is called.
    fn max_number_of_audio_outputs(&self) -> usize;
}

/// Define how sample-rate changes are handled.
pub trait AudioHandler {
    /// Called when the sample-rate changes.
    /// The backend should ensure that this function is called before
    /// any other method.
    ///
    /// # Parameters
    /// `sample_rate`: The new sample rate in frames per second (Hz).
    fn set_sample_rate(&mut self, sample_rate: f64);
}

/// Defines how audio is rendered.
/// The parameter `context` can be used by the backend to provide extra information.
///
/// The type parameter `S` refers to the data type of a sample.
/// It is typically `f32` or `f64`.
pub trait ContextualAudioRenderer<S, Context> {
    /// This method is called repeatedly for subsequent blocks.
    ///
    /// The block is processed in place: the channels that carry input contain the input
    /// when this method is called and must contain the output when it returns.
    /// This method is called in the real-time thread.
    fn render_buffer(&mut self, block: &mut AudioBlock<S>, context: &mut Context);
}

/// Provides common meta-data of the plugin or application to the host.
/// This trait can be more conveniently implemented by implementing the [`Meta`] trait.
///
/// [`Meta`]: ./meta/trait.Meta.html
pub trait CommonPluginMeta {
    /// The name of the plugin or application.
    fn plugin_name<W: Write>(&self, buffer: &mut W) -> Result<(), Error>;
}

/// Provides some meta-data of the audio-ports used by the plugin or application to the host.
/// This trait can be more conveniently implemented by implementing the [`Meta`] trait.
///
/// [`Meta`]: ./meta/trait.Meta.html
pub trait CommonAudioPortMeta: AudioHandlerMeta {
    /// The name of the audio input with the given index.
    /// You can assume that `index` is strictly smaller than [`Self::max_number_of_audio_inputs()`].
    ///
    /// # Note
    /// When using the Jack backend, the name should not be an empty string.
    ///
    /// [`Self::max_number_of_audio_inputs()`]: trait.AudioHandlerMeta.html#tymethod.max_number_of_audio_inputs
    fn input_name<W: Write>(&self, buffer: &mut W, index: usize) -> Result<(), Error> {
        write!(buffer, "audio in {}", index)
    }

    /// The name of the audio output with the given index.
    /// You can assume that `index` is strictly smaller than [`Self::max_number_of_audio_outputs()`].
    ///
    /// # Note
    /// When using the Jack backend, the name should not be an empty string.
    ///
    /// [`Self::max_number_of_audio_outputs()`]: ./trait.AudioHandlerMeta.html#tymethod.max_number_of_audio_outputs
    fn output_name<W: Write>(&self, buffer: &mut W, index: usize) -> Result<(), Error> {
        write!(buffer, "audio out {}", index)
    }
}

impl<T> CommonPluginMeta for T
where
    T: Meta,
    T::MetaData: General,
    <<T as Meta>::MetaData as General>::GeneralData: Name,
{
    fn plugin_name<W: Write>(&self, buffer: &mut W) -> Result<(), Error> {
        self.meta().general().write_name(buffer)
    }
}

impl<T> AudioHandlerMeta for T
where
    T: Meta,
    T::MetaData: Port<AudioPort>,
{
    fn max_number_of_audio_inputs(&self) -> usize {
        self.meta().in_ports().len()
    }

    fn max_number_of_audio_outputs(&self) -> usize {
        self.meta().out_ports().len()
    }
}

impl<T> CommonAudioPortMeta for T
where
    T: Meta,
    T::MetaData: Port<AudioPort>,
    <<T as Meta>::MetaData as Port<AudioPort>>::PortData: Name,
{
    fn input_name<W: Write>(&self, buffer: &mut W, index: usize) -> Result<(), Error> {
        self.meta().in_ports()[index].write_name(buffer)
    }

    fn output_name<W: Write>(&self, buffer: &mut W, index: usize) -> Result<(), Error> {
        self.meta().out_ports()[index].write_name(buffer)
    }
}
