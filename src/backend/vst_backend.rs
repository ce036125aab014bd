//! Wrapper for the VST backend.
//!
//! Support is only enabled if you compile with the "backend-vst" feature, see
//! [the cargo reference] for more information on setting cargo features.
//!
//! For an example, see `vst_panner.rs` in the `demos` folder.
//!
//! # Usage
//! See also the documentation of the [`vst_init`] macro.
//!
//! # Parameters and presets
//! The parameters of the plugin are exposed to the host by [`VstParameters`], which
//! also saves and restores the state of the plugin as a preset chunk.
//!
//! [`vst_init`]: ../../macro.vst_init.html
//! [`VstParameters`]: ./struct.VstParameters.html
//! [the cargo reference]: https://doc.rust-lang.org/cargo/reference/manifest.html#the-features-section
use crate::backend::{copy_inputs_to_outputs, HostInterface};
use crate::buffer::AudioBlock;
use crate::parameters::{Parameters, PersistentState};
use crate::{
    AudioHandler, AudioHandlerMeta, CommonAudioPortMeta, CommonPluginMeta,
    ContextualAudioRenderer,
};
use std::cmp;
use std::sync::Arc;
use vecstorage::VecStorage;
use vst::buffer::AudioBuffer;
use vst::channels::ChannelInfo;
use vst::plugin::{Category, HostCallback, Info, PluginParameters};

pub use vst;

/// A VST plugin should implement this trait in addition to [`CommonPluginMeta`],
/// [`CommonAudioPortMeta`], [`AudioHandler`] and [`ContextualAudioRenderer`].
///
/// [`CommonPluginMeta`]: ../../trait.CommonPluginMeta.html
/// [`CommonAudioPortMeta`]: ../../trait.CommonAudioPortMeta.html
/// [`AudioHandler`]: ../../trait.AudioHandler.html
/// [`ContextualAudioRenderer`]: ../../trait.ContextualAudioRenderer.html
pub trait VstPluginMeta: CommonPluginMeta + AudioHandlerMeta {
    const PLUGIN_ID: i32;
    const CATEGORY: Category;

    /// The parameters that are shared with the host.
    type Parameters: Parameters + PersistentState + Send + Sync + 'static;

    /// Return the parameters that are shared with the host.
    /// This must return the same object every time it is called.
    fn parameter_object(&self) -> Arc<Self::Parameters>;
}

/// Exposes [`Parameters`] to a VST host.
///
/// Values are exchanged with the host in the normalized range `0.0..=1.0`.
/// The state is exchanged as a preset chunk; a bank holds a single preset.
///
/// [`Parameters`]: ../../parameters/trait.Parameters.html
pub struct VstParameters<P> {
    parameters: Arc<P>,
}

impl<P> VstParameters<P> {
    pub fn new(parameters: Arc<P>) -> Self {
        Self { parameters }
    }
}

impl<P> VstParameters<P>
where
    P: Parameters + PersistentState,
{
    fn index(&self, index: i32) -> Option<usize> {
        if index >= 0 && (index as usize) < self.parameters.number_of_parameters() {
            Some(index as usize)
        } else {
            None
        }
    }

    fn load(&self, data: &[u8]) {
        if let Err(e) = self.parameters.load_state(data) {
            warn!("Failed to restore the plugin state: {}", e);
        }
    }
}

impl<P> PluginParameters for VstParameters<P>
where
    P: Parameters + PersistentState + Send + Sync,
{
    fn get_parameter_label(&self, index: i32) -> String {
        self.index(index)
            .and_then(|index| self.parameters.parameter_label(index))
            .unwrap_or("")
            .to_string()
    }

    fn get_parameter_text(&self, index: i32) -> String {
        let mut text = String::new();
        if let Some(index) = self.index(index) {
            if self.parameters.write_parameter_text(index, &mut text).is_err() {
                text.clear();
            }
        }
        text
    }

    fn get_parameter_name(&self, index: i32) -> String {
        self.index(index)
            .and_then(|index| self.parameters.parameter_name(index))
            .unwrap_or("")
            .to_string()
    }

    fn get_parameter(&self, index: i32) -> f32 {
        self.index(index)
            .and_then(|index| self.parameters.normalized_value(index))
            .unwrap_or(0.0)
    }

    fn set_parameter(&self, index: i32, value: f32) {
        if let Some(index) = self.index(index) {
            self.parameters.set_normalized_value(index, value);
        }
    }

    fn can_be_automated(&self, index: i32) -> bool {
        self.index(index).is_some()
    }

    fn get_preset_data(&self) -> Vec<u8> {
        self.parameters.save_state()
    }

    fn get_bank_data(&self) -> Vec<u8> {
        self.parameters.save_state()
    }

    fn load_preset_data(&self, data: &[u8]) {
        self.load(data);
    }

    fn load_bank_data(&self, data: &[u8]) {
        self.load(data);
    }
}

/// A struct used internally by the `vst_init` macro. Normally, plugin's do not need to use this.
pub struct VstPluginWrapper<P: VstPluginMeta> {
    plugin: P,
    host: HostCallback,
    parameters: Arc<VstParameters<P::Parameters>>,
    inputs_f32: VecStorage<&'static [f32]>,
    outputs_f32: VecStorage<&'static mut [f32]>,
    inputs_f64: VecStorage<&'static [f64]>,
    outputs_f64: VecStorage<&'static mut [f64]>,
}

impl<P> VstPluginWrapper<P>
where
    P: CommonAudioPortMeta
        + VstPluginMeta
        + AudioHandler
        + ContextualAudioRenderer<f32, HostCallback>
        + ContextualAudioRenderer<f64, HostCallback>,
{
    pub fn get_info(&self) -> Info {
        trace!("get_info");
        let mut name = String::new();
        if let Err(e) = self.plugin.plugin_name(&mut name) {
            error!("Failed to get the plugin name: {:?}", e);
        }
        Info {
            name,
            inputs: self.plugin.max_number_of_audio_inputs() as i32,
            outputs: self.plugin.max_number_of_audio_outputs() as i32,
            parameters: self.parameters.parameters.number_of_parameters() as i32,
            unique_id: P::PLUGIN_ID,
            category: P::CATEGORY,
            preset_chunks: true,
            f64_precision: true,
            ..Info::default()
        }
    }

    pub fn new(plugin: P, host: HostCallback) -> Self {
        let number_of_inputs = plugin.max_number_of_audio_inputs();
        let number_of_outputs = plugin.max_number_of_audio_outputs();
        let parameters = Arc::new(VstParameters::new(plugin.parameter_object()));
        Self {
            plugin,
            host,
            parameters,
            inputs_f32: VecStorage::with_capacity(number_of_inputs),
            outputs_f32: VecStorage::with_capacity(number_of_outputs),
            inputs_f64: VecStorage::with_capacity(number_of_inputs),
            outputs_f64: VecStorage::with_capacity(number_of_outputs),
        }
    }

    pub fn host(&self) -> &HostCallback {
        &self.host
    }

    pub fn get_parameter_object(&self) -> Arc<dyn PluginParameters> {
        Arc::clone(&self.parameters) as Arc<dyn PluginParameters>
    }

    pub fn process<'b>(&mut self, buffer: &mut AudioBuffer<'b, f32>) {
        let number_of_frames = buffer.samples();
        let (input_buffers, mut output_buffers) = buffer.split();

        let mut inputs = self.inputs_f32.vec_guard();
        for i in 0..cmp::min(inputs.capacity(), input_buffers.len()) {
            inputs.push(input_buffers.get(i));
        }

        let mut outputs = self.outputs_f32.vec_guard();
        for i in 0..cmp::min(outputs.capacity(), output_buffers.len()) {
            outputs.push(output_buffers.get_mut(i));
        }

        let number_of_input_channels =
            copy_inputs_to_outputs(inputs.as_slice(), outputs.as_mut_slice(), number_of_frames);
        let mut block = AudioBlock::new(
            outputs.as_mut_slice(),
            number_of_frames,
            number_of_input_channels,
        );
        self.plugin.render_buffer(&mut block, &mut self.host);
    }

    pub fn process_f64<'b>(&mut self, buffer: &mut AudioBuffer<'b, f64>) {
        let number_of_frames = buffer.samples();
        let (input_buffers, mut output_buffers) = buffer.split();

        let mut inputs = self.inputs_f64.vec_guard();
        for i in 0..cmp::min(inputs.capacity(), input_buffers.len()) {
            inputs.push(input_buffers.get(i));
        }

        let mut outputs = self.outputs_f64.vec_guard();
        for i in 0..cmp::min(outputs.capacity(), output_buffers.len()) {
            outputs.push(output_buffers.get_mut(i));
        }

        let number_of_input_channels =
            copy_inputs_to_outputs(inputs.as_slice(), outputs.as_mut_slice(), number_of_frames);
        let mut block = AudioBlock::new(
            outputs.as_mut_slice(),
            number_of_frames,
            number_of_input_channels,
        );
        self.plugin.render_buffer(&mut block, &mut self.host);
    }

    pub fn get_input_info(&self, input_index: i32) -> ChannelInfo {
        trace!("get_input_info({})", input_index);
        let mut name = String::new();
        if let Err(e) = self.plugin.input_name(&mut name, input_index as usize) {
            error!("Failed to get the name of input {}: {:?}", input_index, e);
        }
        ChannelInfo::new(name, None, true, None)
    }

    pub fn get_output_info(&self, output_index: i32) -> ChannelInfo {
        trace!("get_output_info({})", output_index);
        let mut name = String::new();
        if let Err(e) = self.plugin.output_name(&mut name, output_index as usize) {
            error!("Failed to get the name of output {}: {:?}", output_index, e);
        }
        ChannelInfo::new(name, None, true, None)
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        trace!("sample_rate: {}", sample_rate);
        self.plugin.set_sample_rate(sample_rate);
    }
}

// VST 2.4 plugins cannot stop the host.
impl HostInterface for HostCallback {}

/// A wrapper around the `plugin_main!` macro from the `vst` crate.
/// You call this with one parameter, which is the function declaration of a function
/// that creates your plugin.
/// This function may also do some setup (e.g. initialize logging).
///
/// Example:
/// ```
/// # #[macro_use] extern crate rpan;
/// use rpan::StereoPanner;
///
/// vst_init!(
///    fn init() -> StereoPanner {
///        StereoPanner::new()
///    }
/// );
/// # fn main() {}
/// ```
//
// We define this macro so that plugins do not have to implement the `Default` trait.
//
// We will need the return type (as type parameter for `VstWrapperWrapper`)
// and we need to call the function in the `vst::plugin::Plugin::new()` function
// to which we cannot supply an extra parameter.
// This is the reason why we use a macro instead of a normal function that gets
// a `FnOnce` or something like that.
#[macro_export]
macro_rules! vst_init {
    (fn $function_name:ident() -> $return_type:ty
        $body:block
    ) => {

        fn $function_name () -> $return_type
        $body

        struct VstWrapperWrapper {
            wrapper: $crate::backend::vst_backend::VstPluginWrapper<$return_type>
        }

        impl Default for VstWrapperWrapper {
            fn default() -> Self {
                // We only need this so that the `Plugin` trait from the vst crate
                // can have a default implementation for its `new` function,
                // it is not actually used by the `vst` crate.
                unreachable!()
            }
        }

        // This macro is expanded in the context of the plugin.
        // For this reason, we do not use any "use" statements here,
        // as this may mess up the plugin's namespaces.
        impl $crate::backend::vst_backend::vst::plugin::Plugin for VstWrapperWrapper
        {
            fn get_info(&self) -> $crate::backend::vst_backend::vst::plugin::Info {
                self.wrapper.get_info()
            }

            fn new(host: $crate::backend::vst_backend::vst::plugin::HostCallback) -> Self
            where
                Self: Sized + Default
            {
                VstWrapperWrapper
                {
                    wrapper: $crate::backend::vst_backend::VstPluginWrapper::new($function_name(), host)
                }
            }

            fn init(&mut self) {
                // Get the sample rate from the host and set it in the plugin.
                if let Some($crate::backend::vst_backend::vst::api::TimeInfo{sample_rate, ..}) =
                    $crate::backend::vst_backend::vst::host::Host::get_time_info(
                        self.wrapper.host(),
                        0 // equivalent to `vst::api::TimeInfoFlags::empty().bits()`
                    )
                {
                    self.wrapper.set_sample_rate(sample_rate);
                }
            }

            fn set_sample_rate(&mut self, rate: f32) {
                self.wrapper.set_sample_rate(rate as f64);
            }

            #[inline]
            fn process<'b>(&mut self, buffer: &mut $crate::backend::vst_backend::vst::buffer::AudioBuffer<'b, f32>) {
                self.wrapper.process(buffer);
            }

            #[inline]
            fn process_f64<'b>(&mut self, buffer: &mut $crate::backend::vst_backend::vst::buffer::AudioBuffer<'b, f64>) {
                self.wrapper.process_f64(buffer);
            }

            fn get_input_info(&self, input_index: i32) -> $crate::backend::vst_backend::vst::channels::ChannelInfo {
                self.wrapper.get_input_info(input_index)
            }

            fn get_output_info(&self, output_index: i32) -> $crate::backend::vst_backend::vst::channels::ChannelInfo {
                self.wrapper.get_output_info(output_index)
            }

            fn get_parameter_object(&mut self) -> std::sync::Arc<dyn $crate::backend::vst_backend::vst::plugin::PluginParameters> {
                self.wrapper.get_parameter_object()
            }
        }

        $crate::backend::vst_backend::vst::plugin_main!(VstWrapperWrapper);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{PanningLaw, ParameterStore};

    fn vst_parameters() -> (Arc<ParameterStore>, VstParameters<ParameterStore>) {
        let store = Arc::new(ParameterStore::new());
        let parameters = VstParameters::new(Arc::clone(&store));
        (store, parameters)
    }

    #[test]
    fn exposes_the_parameters_by_index() {
        let (_, parameters) = vst_parameters();
        assert_eq!(parameters.get_parameter_name(0), "Pan Position");
        assert_eq!(parameters.get_parameter_name(1), "Gain");
        assert_eq!(parameters.get_parameter_name(2), "Constant Power");
        assert_eq!(parameters.get_parameter_label(1), "%");
        assert!(parameters.can_be_automated(2));
        assert!(!parameters.can_be_automated(3));
        assert!(!parameters.can_be_automated(-1));
    }

    #[test]
    fn set_parameter_reaches_the_store() {
        let (store, parameters) = vst_parameters();
        parameters.set_parameter(0, 1.0);
        parameters.set_parameter(2, 1.0);
        assert_eq!(store.pan_position(), 1.0);
        assert_eq!(store.panning_law(), PanningLaw::ConstantPower);
        assert_eq!(parameters.get_parameter(0), 1.0);
        assert_eq!(parameters.get_parameter(2), 1.0);
        assert_eq!(parameters.get_parameter_text(2), "Constant Power");
    }

    #[test]
    fn unknown_indices_are_ignored() {
        let (store, parameters) = vst_parameters();
        parameters.set_parameter(7, 1.0);
        assert_eq!(parameters.get_parameter(7), 0.0);
        assert_eq!(parameters.get_parameter_text(-3), "");
        assert_eq!(store.snapshot(), Default::default());
    }

    #[test]
    fn presets_are_the_serialized_state() {
        let (store, parameters) = vst_parameters();
        store.set_pan_position(-0.5);
        store.set_gain(0.25);
        let preset = parameters.get_preset_data();
        assert_eq!(preset, store.serialize());

        let (restored_store, restored) = vst_parameters();
        restored.load_preset_data(&preset);
        assert_eq!(restored_store.snapshot(), store.snapshot());
    }

    #[test]
    fn invalid_presets_leave_the_parameters_unchanged() {
        let (store, parameters) = vst_parameters();
        store.set_gain(0.5);
        parameters.load_bank_data(&[1, 2]);
        assert_eq!(store.gain(), 0.5);
        assert_eq!(store.pan_position(), 0.0);
    }
}
