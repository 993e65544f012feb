use std::f64::consts::PI;

use crate::config::ModemConfig;

/// Render one tone of `duration` samples starting at `start_phase`.
///
/// Phase is measured in cycles (0.0..1.0). The returned phase is where the
/// next tone has to start for the waveform to stay continuous, whatever its
/// frequency.
pub fn render(
    frequency: f64,
    duration: usize,
    sample_rate: u32,
    amplitude: f64,
    start_phase: f64,
) -> (Vec<i16>, f64) {
    let sample_rate = sample_rate as f64;
    let offset = start_phase * sample_rate / frequency;

    let samples = (0..duration)
        .map(|i| {
            let value = amplitude * (2.0 * PI * frequency * (i as f64 + offset) / sample_rate).sin();
            // `as` truncates toward zero and saturates
            value as i16
        })
        .collect();

    let cycles = duration as f64 * frequency / sample_rate + start_phase;
    (samples, cycles - cycles.floor())
}

/// Renders tones with the audio parameters of a [`ModemConfig`].
#[derive(Debug, Clone)]
pub struct ToneSynthesizer {
    sample_rate: u32,
    tone_samples: usize,
    amplitude: f64,
}

impl ToneSynthesizer {
    pub fn new(config: &ModemConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            tone_samples: config.tone_samples,
            amplitude: config.amplitude,
        }
    }

    /// Append one tone to `block` and return the phase to continue from.
    pub fn append_tone(&self, block: &mut Vec<i16>, frequency: f64, phase: f64) -> f64 {
        let (samples, phase) = render(frequency, self.tone_samples, self.sample_rate, self.amplitude, phase);
        block.extend_from_slice(&samples);
        phase
    }

    /// Append `count` identical tones.
    pub fn append_tones(&self, block: &mut Vec<i16>, frequency: f64, count: usize, mut phase: f64) -> f64 {
        for _ in 0..count {
            phase = self.append_tone(block, frequency, phase);
        }
        phase
    }

    pub fn tone_samples(&self) -> usize {
        self.tone_samples
    }
}
