use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tonaldata_core::{
    payload, read_samples, Decoder, DetectedTone, Encoder, ModemConfig, ModemError, WavSink,
};

#[derive(Parser)]
#[command(name = "tonaldata")]
#[command(about = "Encode and decode data as audio tones (Tonal Data Transmission)")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a data file into a WAV audio file
    Encode {
        /// Input data file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Sample rate of the generated audio in Hz
        #[arg(short, long, default_value_t = tonaldata_core::SAMPLE_RATE)]
        sample_rate: u32,

        /// Samples per tone (must match the decoder)
        #[arg(short, long, default_value_t = tonaldata_core::TONE_SAMPLES)]
        tone_samples: usize,
    },

    /// Decode a WAV audio file back into a data file
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Output data file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Samples per tone (must match the encoder)
        #[arg(short, long, default_value_t = tonaldata_core::TONE_SAMPLES)]
        tone_samples: usize,

        /// Print the recovered bit string
        #[arg(long)]
        print_bits: bool,
    },

    /// Show the detected frequency and label of every tone window
    Inspect {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Samples per tone
        #[arg(short, long, default_value_t = tonaldata_core::TONE_SAMPLES)]
        tone_samples: usize,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Modem(#[from] ModemError),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

fn read_file(path: &PathBuf) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })
}

fn write_file(path: &PathBuf, data: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, data).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            sample_rate,
            tone_samples,
        } => encode_command(&input, &output, sample_rate, tone_samples),
        Commands::Decode {
            input,
            output,
            tone_samples,
            print_bits,
        } => decode_command(&input, &output, tone_samples, print_bits),
        Commands::Inspect {
            input,
            tone_samples,
            json,
        } => inspect_command(&input, tone_samples, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn encode_command(
    input_path: &PathBuf,
    output_path: &PathBuf,
    sample_rate: u32,
    tone_samples: usize,
) -> Result<(), CliError> {
    let data = read_file(input_path)?;
    info!("Read {} bytes from {}", data.len(), input_path.display());

    let config = ModemConfig::default()
        .with_sample_rate(sample_rate)
        .with_tone_samples(tone_samples);
    let encoder = Encoder::new(config)?;

    let mut sink = WavSink::create(output_path, sample_rate)?;
    let written = encoder.encode_bytes(&data, &mut sink)?;
    sink.finalize()?;

    info!(
        "Encoded {} tones ({:.2} s at {} Hz)",
        written / tone_samples,
        written as f64 / sample_rate as f64,
        sample_rate
    );
    println!("Wrote {} samples to {}", written, output_path.display());
    Ok(())
}

fn load_decoder(input_path: &PathBuf, tone_samples: usize) -> Result<(Decoder, Vec<i16>), CliError> {
    let (samples, sample_rate) = read_samples(input_path)?;
    info!(
        "Read {} samples at {} Hz from {}",
        samples.len(),
        sample_rate,
        input_path.display()
    );

    let config = ModemConfig::default()
        .with_sample_rate(sample_rate)
        .with_tone_samples(tone_samples);
    Ok((Decoder::new(config)?, samples))
}

fn decode_command(
    input_path: &PathBuf,
    output_path: &PathBuf,
    tone_samples: usize,
    print_bits: bool,
) -> Result<(), CliError> {
    let (mut decoder, samples) = load_decoder(input_path, tone_samples)?;

    let bits = decoder.decode(&samples)?;
    if bits.is_empty() {
        warn!("No transmission found in {}", input_path.display());
    }
    if print_bits {
        let bit_string: String = bits.iter().map(|&b| if b == 1 { '1' } else { '0' }).collect();
        println!("Encoded bits: {}", bit_string);
    }

    let data = payload::from_bits(&bits);
    write_file(output_path, &data)?;

    println!("Decoded {} bytes to {}", data.len(), output_path.display());
    info!("Decoded text: {}", String::from_utf8_lossy(&data));
    Ok(())
}

#[derive(Serialize)]
struct ToneReport {
    index: usize,
    offset_samples: usize,
    frequency_hz: f64,
    label: &'static str,
}

impl ToneReport {
    fn new(tone: &DetectedTone, tone_samples: usize) -> Self {
        Self {
            index: tone.index,
            offset_samples: tone.index * tone_samples,
            frequency_hz: tone.frequency,
            label: tone.label.name(),
        }
    }
}

fn inspect_command(input_path: &PathBuf, tone_samples: usize, json: bool) -> Result<(), CliError> {
    let (mut decoder, samples) = load_decoder(input_path, tone_samples)?;
    let tones = decoder.detect_tones(&samples)?;

    let reports: Vec<ToneReport> = tones
        .iter()
        .map(|tone| ToneReport::new(tone, tone_samples))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!(
                "{:>6} {:>9} {:>8.1} Hz  {}",
                report.index, report.offset_samples, report.frequency_hz, report.label
            );
        }
    }
    Ok(())
}
