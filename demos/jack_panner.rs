// The stereo panner as a JACK client.
//
// Compiling
// =========
// You can compile this demo with
// ```
// cargo build --release --examples --features backend-jack
// ```
//
// Running
// =======
// 1. Start the `jack` daemon (e.g. with `qjackctl`).
// 2. Start `target/release/examples/jack_panner`, optionally with the initial pan position
//    (between -1 and 1) as command line argument.
// 3. Connect a stereo source to "left in" and "right in" and
//    "left out" and "right out" to the system playback ports.
// 4. Press Enter to quit.
//
// ## Logging
// See `logging.rs`.
#[cfg(feature = "backend-jack")]
#[macro_use]
extern crate log;

mod logging;

#[cfg(feature = "backend-jack")]
fn main() {
    use rpan::backend::jack_backend::run;
    use rpan::StereoPanner;
    use std::env;

    logging::initialize_logging();

    let panner = StereoPanner::new();
    if let Some(argument) = env::args().nth(1) {
        match argument.parse::<f32>() {
            Ok(pan_position) => panner.parameters().set_pan_position(pan_position),
            Err(e) => warn!("Ignoring pan position {:?}: {}", argument, e),
        }
    }

    if let Err(e) = run(panner) {
        eprintln!("Failed to run the JACK client: {:?}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "backend-jack"))]
fn main() {
    println!("This demo was compiled without support for jack.");
    println!("Compile with passing `--features backend-jack`");
    println!("as parameter to `cargo`.");
}
