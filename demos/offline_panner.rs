// The stereo panner, rendering a `.wav` file to another `.wav` file.
//
// Running
// =======
// ```
// cargo run --example offline_panner -- input.wav output.wav [pan] [gain] [linear|constant-power]
// ```
// `pan` is between -1 (left) and 1 (right) and defaults to 0; `gain` defaults to 1.
// The output file has the same format as the input file.
//
// ## Logging
// See `logging.rs`.
#[cfg(feature = "backend-combined-hound")]
#[macro_use]
extern crate log;

mod logging;

#[cfg(feature = "backend-combined-hound")]
mod offline {
    use rpan::backend::combined::hound::{HoundAudioReader, HoundAudioWriter};
    use rpan::backend::combined::run;
    use rpan::{PanningLaw, ParameterSnapshot, ParameterStore, StereoPanner};
    use std::error::Error;
    use std::sync::Arc;

    const BUFFER_SIZE_IN_FRAMES: usize = 1024;

    pub struct Arguments {
        input_file: String,
        output_file: String,
        parameters: ParameterSnapshot,
    }

    fn parse_panning_law(argument: &str) -> Result<PanningLaw, String> {
        match argument {
            "linear" => Ok(PanningLaw::Linear),
            "constant-power" => Ok(PanningLaw::ConstantPower),
            _ => Err(format!(
                "Unknown panning law {:?}, expected 'linear' or 'constant-power'.",
                argument
            )),
        }
    }

    pub fn parse_arguments(arguments: &[String]) -> Result<Arguments, String> {
        if arguments.len() < 2 {
            return Err(
                "Usage: offline_panner input.wav output.wav [pan] [gain] [linear|constant-power]"
                    .to_string(),
            );
        }
        let mut parameters = ParameterSnapshot::default();
        if let Some(pan) = arguments.get(2) {
            parameters.pan_position = pan
                .parse()
                .map_err(|e| format!("Invalid pan position {:?}: {}", pan, e))?;
        }
        if let Some(gain) = arguments.get(3) {
            parameters.gain = gain
                .parse()
                .map_err(|e| format!("Invalid gain {:?}: {}", gain, e))?;
        }
        if let Some(law) = arguments.get(4) {
            parameters.panning_law = parse_panning_law(law)?;
        }
        Ok(Arguments {
            input_file: arguments[0].clone(),
            output_file: arguments[1].clone(),
            parameters,
        })
    }

    pub fn render(arguments: Arguments) -> Result<(), Box<dyn Error>> {
        let mut wav_reader = hound::WavReader::open(&arguments.input_file)?;
        let spec = wav_reader.spec();
        info!(
            "Reading {}: {} channel(s), {} Hz.",
            arguments.input_file, spec.channels, spec.sample_rate
        );
        let output_spec = hound::WavSpec {
            channels: 2,
            ..spec
        };
        let mut wav_writer = hound::WavWriter::create(&arguments.output_file, output_spec)?;

        let parameters = Arc::new(ParameterStore::with_values(arguments.parameters));
        let mut panner = StereoPanner::with_parameters(parameters);
        {
            let reader = HoundAudioReader::<f32>::new(&mut wav_reader)?;
            let writer = HoundAudioWriter::<f32>::new(&mut wav_writer)?;
            run(&mut panner, BUFFER_SIZE_IN_FRAMES, reader, writer)?;
        }
        wav_writer.finalize()?;
        info!("Written {}.", arguments.output_file);
        Ok(())
    }
}

#[cfg(feature = "backend-combined-hound")]
fn main() {
    let arguments: Vec<String> = std::env::args().skip(1).collect();
    logging::initialize_logging();

    let arguments = match offline::parse_arguments(&arguments) {
        Ok(arguments) => arguments,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };
    if let Err(e) = offline::render(arguments) {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "backend-combined-hound"))]
fn main() {
    println!("This demo was compiled without support for hound.");
    println!("Compile with passing `--features backend-combined-hound`");
    println!("as parameter to `cargo`.");
}
