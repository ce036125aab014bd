//! The stereo panner as a plugin that can be run by every backend.
use crate::buffer::AudioBlock;
use crate::meta::{InOut, Meta, MetaData};
use crate::panning;
use crate::parameters::ParameterStore;
use crate::{AudioHandler, ContextualAudioRenderer};
use dasp_sample::FromSample;
use num_traits::Zero;
use std::ops::Mul;
use std::sync::Arc;

/// Pans a stereo signal according to the parameters in its [`ParameterStore`].
///
/// The parameter store is shared with the host (or an editor) through an `Arc`, so that
/// parameters can be changed while audio is being rendered.
///
/// [`ParameterStore`]: ../parameters/struct.ParameterStore.html
pub struct StereoPanner {
    meta_data: MetaData<&'static str, &'static str>,
    parameters: Arc<ParameterStore>,
}

impl StereoPanner {
    fn meta_data() -> MetaData<&'static str, &'static str> {
        MetaData {
            general_meta: "Stereo panner",
            audio_port_meta: InOut {
                inputs: vec!["left in", "right in"],
                outputs: vec!["left out", "right out"],
            },
        }
    }

    pub fn new() -> Self {
        Self::with_parameters(Arc::new(ParameterStore::new()))
    }

    pub fn with_parameters(parameters: Arc<ParameterStore>) -> Self {
        Self {
            meta_data: Self::meta_data(),
            parameters,
        }
    }

    pub fn parameters(&self) -> &Arc<ParameterStore> {
        &self.parameters
    }
}

impl Default for StereoPanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Meta for StereoPanner {
    type MetaData = MetaData<&'static str, &'static str>;

    fn meta(&self) -> &Self::MetaData {
        &self.meta_data
    }
}

impl AudioHandler for StereoPanner {
    fn set_sample_rate(&mut self, sample_rate: f64) {
        // Panning does not depend on the sample rate.
        trace!("set_sample_rate(sample_rate={})", sample_rate);
    }
}

impl<S, Context> ContextualAudioRenderer<S, Context> for StereoPanner
where
    S: Copy + Zero + Mul<Output = S> + FromSample<f64>,
{
    fn render_buffer(&mut self, block: &mut AudioBlock<S>, _context: &mut Context) {
        let parameters = self.parameters.snapshot();
        panning::process(block, &parameters);
    }
}

#[cfg(feature = "backend-vst")]
impl crate::backend::vst_backend::VstPluginMeta for StereoPanner {
    const PLUGIN_ID: i32 = 0x7270_616e;
    const CATEGORY: vst::plugin::Category = vst::plugin::Category::Effect;
    type Parameters = ParameterStore;

    fn parameter_object(&self) -> Arc<ParameterStore> {
        Arc::clone(&self.parameters)
    }
}
