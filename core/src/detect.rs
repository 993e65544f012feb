use std::collections::HashMap;
use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};

use crate::error::{ModemError, Result};

/// Dominant-frequency estimator for single tone windows.
///
/// Keeps its FFT plans between windows, every window of a transmission has
/// the same length.
pub struct FrequencyDetector {
    sample_rate: u32,
    planner: RealFftPlanner<f64>,
    plans: HashMap<usize, Arc<dyn RealToComplex<f64>>>,
}

impl FrequencyDetector {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            planner: RealFftPlanner::new(),
            plans: HashMap::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Centre frequency of the strongest bin of `window`'s spectrum.
    ///
    /// Ties go to the lowest bin.
    pub fn detect(&mut self, window: &[i16]) -> Result<f64> {
        if window.is_empty() {
            return Err(ModemError::EmptyInput);
        }

        let len = window.len();
        let planner = &mut self.planner;
        let r2c = self
            .plans
            .entry(len)
            .or_insert_with(|| planner.plan_fft_forward(len))
            .clone();

        let mut input: Vec<f64> = window.iter().map(|&s| s as f64).collect();
        let mut spectrum = r2c.make_output_vec();
        r2c.process(&mut input, &mut spectrum)
            .map_err(|e| ModemError::Fft(format!("forward transform of {} samples failed: {:?}", len, e)))?;

        let mut peak_bin = 0;
        let mut peak_magnitude = f64::NEG_INFINITY;
        for (bin, value) in spectrum.iter().enumerate() {
            let magnitude = value.norm();
            if magnitude > peak_magnitude {
                peak_magnitude = magnitude;
                peak_bin = bin;
            }
        }

        Ok(peak_bin as f64 * self.sample_rate as f64 / len as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::render;

    fn bin_width(len: usize) -> f64 {
        12000.0 / len as f64
    }

    #[test]
    fn test_detect_reference_tones() {
        let mut detector = FrequencyDetector::new(12000);
        for frequency in [1000.0, 1250.0, 1500.0, 1750.0, 2000.0] {
            let (samples, _) = render(frequency, 375, 12000, 32767.0, 0.0);
            let detected = detector.detect(&samples).unwrap();
            assert!(
                (detected - frequency).abs() <= bin_width(375),
                "{} Hz detected as {} Hz",
                frequency,
                detected
            );
        }
    }

    #[test]
    fn test_detect_with_nonzero_start_phase() {
        let mut detector = FrequencyDetector::new(12000);
        let (samples, _) = render(1750.0, 375, 12000, 32767.0, 0.6);
        let detected = detector.detect(&samples).unwrap();
        assert!((detected - 1750.0).abs() <= bin_width(375));
    }

    #[test]
    fn test_detect_exact_bin() {
        // 1500 Hz is bin 64 of a 512-point transform at 12 kHz
        let mut detector = FrequencyDetector::new(12000);
        let (samples, _) = render(1500.0, 512, 12000, 10000.0, 0.0);
        assert_eq!(detector.detect(&samples).unwrap(), 1500.0);
    }

    #[test]
    fn test_detect_silence_is_dc() {
        let mut detector = FrequencyDetector::new(12000);
        assert_eq!(detector.detect(&[0i16; 375]).unwrap(), 0.0);
    }

    #[test]
    fn test_detect_empty_window() {
        let mut detector = FrequencyDetector::new(12000);
        assert!(matches!(detector.detect(&[]), Err(ModemError::EmptyInput)));
    }
}
