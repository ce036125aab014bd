//! Wrapper for the [JACK] backend.
//! Support is only enabled if you compile with the "backend-jack" feature, see
//! [the cargo reference] for more information on setting cargo features.
//!
//! For an example, see `jack_panner.rs` in the `demos` folder.
//!
//! [JACK]: http://www.jackaudio.org/
//! [the cargo reference]: https://doc.rust-lang.org/cargo/reference/manifest.html#the-features-section
use crate::backend::{copy_inputs_to_outputs, HostInterface};
use crate::buffer::AudioBlock;
use crate::{AudioHandler, CommonAudioPortMeta, CommonPluginMeta, ContextualAudioRenderer};
use jack::{AudioIn, AudioOut, Port, ProcessScope};
use jack::{Client, ClientOptions, Control, ProcessHandler};
use std::io;
use vecstorage::VecStorage;

impl<'c> HostInterface for &'c Client {}

fn port_name<F>(write_name: F, default: String) -> String
where
    F: FnOnce(&mut String) -> std::fmt::Result,
{
    let mut name = String::new();
    match write_name(&mut name) {
        Ok(()) if !name.is_empty() => name,
        _ => default,
    }
}

fn audio_in_ports<P>(client: &Client, plugin: &P) -> Vec<Port<AudioIn>>
where
    P: CommonAudioPortMeta,
{
    let number_of_inputs = plugin.max_number_of_audio_inputs();
    let mut in_ports = Vec::with_capacity(number_of_inputs);
    for index in 0..number_of_inputs {
        let name = port_name(
            |buffer| plugin.input_name(buffer, index),
            format!("audio_in_{}", index),
        );
        info!("Registering audio input port with name {}", name);
        match client.register_port(&name, AudioIn::default()) {
            Ok(p) => {
                in_ports.push(p);
            }
            Err(e) => {
                error!(
                    "Failed to open audio input port with index {} and name {}: {:?}. Skipping this port.",
                    index, name, e
                );
            }
        }
    }
    in_ports
}

fn audio_out_ports<P>(client: &Client, plugin: &P) -> Vec<Port<AudioOut>>
where
    P: CommonAudioPortMeta,
{
    let number_of_outputs = plugin.max_number_of_audio_outputs();
    let mut out_ports = Vec::with_capacity(number_of_outputs);
    for index in 0..number_of_outputs {
        let name = port_name(
            |buffer| plugin.output_name(buffer, index),
            format!("audio_out_{}", index),
        );
        info!("Registering audio output port with name {}", name);
        match client.register_port(&name, AudioOut::default()) {
            Ok(p) => {
                out_ports.push(p);
            }
            Err(e) => {
                error!(
                    "Failed to open audio output port with index {} and name {}: {:?}. Skipping this port.",
                    index, name, e
                );
            }
        }
    }
    out_ports
}

struct JackProcessHandler<P> {
    audio_in_ports: Vec<Port<AudioIn>>,
    audio_out_ports: Vec<Port<AudioOut>>,
    plugin: P,
    inputs: VecStorage<&'static [f32]>,
    outputs: VecStorage<&'static mut [f32]>,
}

impl<P> JackProcessHandler<P>
where
    P: CommonAudioPortMeta,
{
    fn new(client: &Client, plugin: P) -> Self {
        trace!("JackProcessHandler::new()");
        let audio_in_ports = audio_in_ports(client, &plugin);
        let audio_out_ports = audio_out_ports(client, &plugin);
        let inputs = VecStorage::with_capacity(audio_in_ports.len());
        let outputs = VecStorage::with_capacity(audio_out_ports.len());

        JackProcessHandler {
            audio_in_ports,
            audio_out_ports,
            plugin,
            inputs,
            outputs,
        }
    }
}

impl<P> ProcessHandler for JackProcessHandler<P>
where
    P: Send,
    for<'c> P: ContextualAudioRenderer<f32, &'c Client>,
{
    fn process(&mut self, client: &Client, process_scope: &ProcessScope) -> Control {
        let number_of_frames = process_scope.n_frames() as usize;

        let mut inputs = self.inputs.vec_guard();
        for port in self.audio_in_ports.iter() {
            inputs.push(port.as_slice(process_scope));
        }

        let mut outputs = self.outputs.vec_guard();
        for port in self.audio_out_ports.iter_mut() {
            outputs.push(port.as_mut_slice(process_scope));
        }

        let number_of_input_channels =
            copy_inputs_to_outputs(inputs.as_slice(), outputs.as_mut_slice(), number_of_frames);
        let mut block = AudioBlock::new(
            outputs.as_mut_slice(),
            number_of_frames,
            number_of_input_channels,
        );
        self.plugin.render_buffer(&mut block, &mut &*client);

        Control::Continue
    }
}

/// Run the plugin until the user presses the Enter key on the computer keyboard.
///
/// The JACK client is named after the plugin and has one port per audio input and output.
pub fn run<P>(mut plugin: P) -> Result<(), jack::Error>
where
    P: CommonPluginMeta + CommonAudioPortMeta + AudioHandler + Send,
    for<'c> P: ContextualAudioRenderer<f32, &'c Client>,
{
    let client_name = port_name(|buffer| plugin.plugin_name(buffer), "rpan".to_string());
    let (client, _status) = Client::new(&client_name, ClientOptions::NO_START_SERVER)?;

    let sample_rate = client.sample_rate();
    info!("Connected to JACK as {} at {} Hz.", client_name, sample_rate);
    plugin.set_sample_rate(sample_rate as f64);

    let jack_process_handler = JackProcessHandler::new(&client, plugin);
    let active_client = match client.activate_async((), jack_process_handler) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to activate client: {:?}", e);
            return Err(e);
        }
    };

    println!("Press Enter to quit");
    let mut user_input = String::new();
    io::stdin().read_line(&mut user_input).ok();

    info!("Deactivating client...");
    match active_client.deactivate() {
        Ok(_) => {
            info!("Client deactivated.");
            Ok(())
        }
        Err(e) => {
            error!("Failed to deactivate client: {:?}", e);
            Err(e)
        }
    }
}
