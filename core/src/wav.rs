//! WAV container transport: mono, 16-bit signed PCM

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::encoder::SampleSink;
use crate::error::{ModemError, Result};

fn pcm16_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// [`SampleSink`] writing straight into a WAV file.
///
/// Call [`WavSink::finalize`] to complete the header. If the sink is dropped
/// early, e.g. while an error propagates, the file is still closed.
pub struct WavSink {
    writer: WavWriter<BufWriter<File>>,
    samples_written: usize,
}

impl WavSink {
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Self> {
        let writer = WavWriter::create(path, pcm16_spec(sample_rate))?;
        Ok(Self {
            writer,
            samples_written: 0,
        })
    }

    pub fn samples_written(&self) -> usize {
        self.samples_written
    }

    pub fn finalize(self) -> Result<()> {
        debug!("finalizing WAV with {} samples", self.samples_written);
        self.writer.finalize()?;
        Ok(())
    }
}

impl SampleSink for WavSink {
    fn write_block(&mut self, block: &[i16]) -> Result<()> {
        for &sample in block {
            self.writer.write_sample(sample)?;
        }
        self.samples_written += block.len();
        Ok(())
    }
}

/// Read every sample of a mono 16-bit PCM WAV file.
///
/// Returns the samples and the file's sample rate.
pub fn read_samples<P: AsRef<Path>>(path: P) -> Result<(Vec<i16>, u32)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(ModemError::UnsupportedFormat(format!(
            "{} channels, expected mono",
            spec.channels
        )));
    }
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(ModemError::UnsupportedFormat(format!(
            "{}-bit {:?} samples, expected 16-bit PCM",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!("read {} samples at {} Hz", samples.len(), spec.sample_rate);

    Ok((samples, spec.sample_rate))
}
