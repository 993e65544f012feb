use crate::error::{ModemError, Result};
use crate::{AMPLITUDE, FREQ_11, SAMPLE_RATE, TOLERANCE, TONE_SAMPLES};

/// Audio parameters shared by the encoder and the decoder.
///
/// Both ends must agree on `tone_samples`; the sample rate travels in the
/// WAV header.
#[derive(Debug, Clone, PartialEq)]
pub struct ModemConfig {
    /// Samples per second
    pub sample_rate: u32,
    /// Duration of every tone in samples
    pub tone_samples: usize,
    /// Peak sample value for rendered tones
    pub amplitude: f64,
    /// Relative tolerance for classifying detected frequencies
    pub tolerance: f64,
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            tone_samples: TONE_SAMPLES,
            amplitude: AMPLITUDE,
            tolerance: TOLERANCE,
        }
    }
}

impl ModemConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_tone_samples(mut self, tone_samples: usize) -> Self {
        self.tone_samples = tone_samples;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ModemError::InvalidConfig("sample rate must be non-zero".into()));
        }
        if self.tone_samples == 0 {
            return Err(ModemError::InvalidConfig("tone duration must be non-zero".into()));
        }
        if !(self.amplitude > 0.0 && self.amplitude <= i16::MAX as f64) {
            return Err(ModemError::InvalidConfig(format!(
                "amplitude {} outside (0, {}]",
                self.amplitude,
                i16::MAX
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(ModemError::InvalidConfig(format!(
                "tolerance {} outside (0, 1)",
                self.tolerance
            )));
        }
        let nyquist = self.sample_rate as f64 / 2.0;
        if FREQ_11 >= nyquist {
            return Err(ModemError::InvalidConfig(format!(
                "sample rate {} Hz cannot carry a {} Hz tone",
                self.sample_rate, FREQ_11
            )));
        }
        Ok(())
    }

    /// Tone duration in seconds.
    pub fn tone_duration_secs(&self) -> f64 {
        self.tone_samples as f64 / self.sample_rate as f64
    }
}
