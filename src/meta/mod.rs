//! Meta-data of a plugin or application: its name and the names of its audio ports.
//!
//! The backends read it to name the VST plugin and its channels and to register the JACK
//! client and its ports; the offline backend uses the number of output ports.
//! [`StereoPanner`](../plugin/struct.StereoPanner.html) has two inputs and two outputs.
//!
//! Example
//! -------
//! ```
//! use rpan::meta::{Meta, MetaData, InOut};
//! struct MyPlugin {
//!     meta: MetaData<&'static str, &'static str>
//! /* ... */
//! }
//!
//! impl MyPlugin {
//!     pub fn new() -> Self {
//!         Self {
//!             meta: MetaData {
//!                 general_meta: "My plugin",
//!                 audio_port_meta: InOut {
//!                     inputs: vec!["in left", "in right"],
//!                     outputs: vec!["out left", "out right"],
//!                 },
//!             }
//!         }
//!     }
//! }
//!
//! impl Meta for MyPlugin {
//!     type MetaData = MetaData<&'static str, &'static str>;
//!     fn meta(&self) -> &Self::MetaData {
//!         &self.meta
//!     }
//! }
//! ```
use std::fmt::Write;

pub trait Meta {
    type MetaData;
    fn meta(&self) -> &Self::MetaData;
}

pub trait General {
    type GeneralData;
    fn general(&self) -> &Self::GeneralData;
}

pub trait Name {
    fn name(&self) -> &str;

    fn write_name<W: Write>(&self, buffer: &mut W) -> Result<(), std::fmt::Error> {
        buffer.write_str(self.name())
    }
}

impl Name for String {
    fn name(&self) -> &str {
        self
    }
}

impl Name for &'static str {
    fn name(&self) -> &str {
        self
    }
}

pub trait Port<T> {
    type PortData;
    fn in_ports(&self) -> &[Self::PortData];
    fn out_ports(&self) -> &[Self::PortData];
}

/// A "marker" struct
pub struct AudioPort;

pub struct MetaData<G, AP> {
    pub general_meta: G,
    pub audio_port_meta: InOut<AP>,
}

pub struct InOut<T> {
    pub inputs: Vec<T>,
    pub outputs: Vec<T>,
}

impl<G, AP> General for MetaData<G, AP> {
    type GeneralData = G;
    fn general(&self) -> &G {
        &self.general_meta
    }
}

impl<G, AP> Port<AudioPort> for MetaData<G, AP> {
    type PortData = AP;
    fn in_ports(&self) -> &[AP] {
        self.audio_port_meta.inputs.as_ref()
    }

    fn out_ports(&self) -> &[AP] {
        self.audio_port_meta.outputs.as_ref()
    }
}
