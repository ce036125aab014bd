// The stereo panner as a VST 2.4 plugin.
//
// Compiling
// =========
// You can compile this demo with
// ```
// cargo build --release --examples --features backend-vst
// ```
// This generates a library that you can find
//
// * under `target/release/examples/libvst_panner.so` for linux
// * in the `target/release/examples/` folder for other operating systems.
//
// Running
// =======
// Copy the library to a folder that is in the `VST_PATH` environment variable
// and rescan the plugins in the host.
//
// The host sees three parameters ("Pan Position", "Gain" and "Constant Power")
// and saves and restores them as a preset chunk.
//
// ## Logging
// See `logging.rs`. Logging only happens when `RPAN_LOG_FILE` is set.
#[macro_use]
extern crate rpan;

mod logging;

use rpan::StereoPanner;

vst_init!(
    fn init() -> StereoPanner {
        logging::initialize_plugin_logging();
        StereoPanner::new()
    }
);
