//! Backends bind a plugin to a host: a VST host, the JACK server or files on disk.
//!
//! Backends contain no signal processing; they hand blocks of audio to the plugin's
//! [`render_buffer`] method.
//!
//! Backends that deliver separate input and output buffers copy the input channels into the
//! output channels first, so that the plugin can process the output channels in place.
//!
//! [`render_buffer`]: ../trait.ContextualAudioRenderer.html#tymethod.render_buffer
#[cfg(feature = "backend-combined")]
pub mod combined;
#[cfg(feature = "backend-jack")]
pub mod jack_backend;
#[cfg(feature = "backend-vst")]
pub mod vst_backend;

/// Defines an interface for communicating with the host or server.
pub trait HostInterface {
    /// Stop processing.
    /// The default implementation does nothing: not every backend can be stopped
    /// by the plugin (VST 2.4 cannot).
    fn stop(&mut self) {}
}

/// Copy the first input channels into the first output channels and return the number
/// of channels that were copied.
///
/// Only the first `number_of_frames` samples of every channel are copied.
pub fn copy_inputs_to_outputs<S: Copy>(
    inputs: &[&[S]],
    outputs: &mut [&mut [S]],
    number_of_frames: usize,
) -> usize {
    let mut copied = 0;
    for (output, input) in outputs.iter_mut().zip(inputs.iter()) {
        output[..number_of_frames].copy_from_slice(&input[..number_of_frames]);
        copied += 1;
    }
    copied
}
