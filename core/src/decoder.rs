use log::{debug, warn};

use crate::config::ModemConfig;
use crate::detect::FrequencyDetector;
use crate::error::{ModemError, Result};
use crate::payload;
use crate::symbol::{Symbol, ToneLabel};
use crate::{BITS_PER_GROUP, SYNC_PATTERN, SYNC_TONES};

/// Where the frame parser is in the transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// Waiting for the first `11` header tone
    AwaitHeader,
    /// Header seen, waiting for a divider
    AwaitHeaderDivider,
    /// Collecting the 16 sync bits
    CollectSync,
    /// Inside the payload
    Decode,
}

/// Frame parser fed one classified tone at a time.
///
/// Before the payload only the expected trigger tones move the parser
/// forward and everything else is skipped. A wrong sync pattern is fatal.
/// Inside the payload nothing is: unknown tones decode as `00`.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    sync: Vec<u8>,
    bits: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: DecodeState::AwaitHeader,
            sync: Vec::with_capacity(SYNC_TONES),
            bits: Vec::new(),
        }
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Bits recovered so far.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn push(&mut self, tone: ToneLabel) -> Result<()> {
        match self.state {
            DecodeState::AwaitHeader => {
                if tone == ToneLabel::Symbol(Symbol::Three) {
                    self.state = DecodeState::AwaitHeaderDivider;
                }
            }
            DecodeState::AwaitHeaderDivider => {
                if tone == ToneLabel::Divider {
                    self.state = DecodeState::CollectSync;
                }
            }
            DecodeState::CollectSync => {
                match tone {
                    ToneLabel::Symbol(Symbol::Three) => self.sync.push(1),
                    ToneLabel::Symbol(Symbol::Zero) => self.sync.push(0),
                    _ => return Ok(()),
                }
                if self.sync.len() == SYNC_TONES {
                    if self.sync != SYNC_PATTERN {
                        debug!("sync mismatch: {:?}", self.sync);
                        return Err(ModemError::BadSync);
                    }
                    debug!("sync pattern matched, decoding payload");
                    self.state = DecodeState::Decode;
                }
            }
            DecodeState::Decode => match tone {
                ToneLabel::Symbol(symbol) => self.bits.extend_from_slice(&symbol.bits()),
                ToneLabel::Divider => {
                    while self.bits.len() % BITS_PER_GROUP != 0 {
                        self.bits.extend_from_slice(&[0, 0]);
                    }
                }
                ToneLabel::Unknown => self.bits.extend_from_slice(&[0, 0]),
            },
        }
        Ok(())
    }

    /// The recovered bits. Empty when the payload was never reached.
    pub fn finish(self) -> Vec<u8> {
        if self.state != DecodeState::Decode {
            warn!("input ended before the payload (state {:?})", self.state);
        }
        self.bits
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Frequency and classification of one tone window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedTone {
    pub index: usize,
    pub frequency: f64,
    pub label: ToneLabel,
}

/// Sample-level decoder
///
/// Slices the input into windows of one tone, detects and classifies each
/// one and runs the result through a [`FrameDecoder`].
pub struct Decoder {
    config: ModemConfig,
    detector: FrequencyDetector,
}

impl Decoder {
    pub fn new(config: ModemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: FrequencyDetector::new(config.sample_rate),
            config,
        })
    }

    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// Classify every complete tone window of `samples`.
    ///
    /// A trailing partial window is ignored.
    pub fn detect_tones(&mut self, samples: &[i16]) -> Result<Vec<DetectedTone>> {
        let windows = samples.chunks_exact(self.config.tone_samples);
        if windows.len() == 0 {
            return Err(ModemError::EmptyInput);
        }

        let mut tones = Vec::with_capacity(windows.len());
        for (index, window) in windows.enumerate() {
            let frequency = self.detector.detect(window)?;
            tones.push(DetectedTone {
                index,
                frequency,
                label: ToneLabel::classify(frequency, self.config.tolerance),
            });
        }
        Ok(tones)
    }

    /// Recover the payload bit sequence, terminator included.
    pub fn decode(&mut self, samples: &[i16]) -> Result<Vec<u8>> {
        let tones = self.detect_tones(samples)?;
        debug!("decoding {} tone windows", tones.len());

        let mut frame = FrameDecoder::new();
        for tone in &tones {
            frame.push(tone.label)?;
        }

        let unknown = tones
            .iter()
            .filter(|t| t.label == ToneLabel::Unknown)
            .count();
        if unknown > 0 {
            warn!("{} tone windows had no recognizable frequency", unknown);
        }

        Ok(frame.finish())
    }

    /// Recover the payload bytes, terminator stripped.
    pub fn decode_bytes(&mut self, samples: &[i16]) -> Result<Vec<u8>> {
        let bits = self.decode(samples)?;
        Ok(payload::from_bits(&bits))
    }
}

impl Default for Decoder {
    fn default() -> Self {
        let config = ModemConfig::default();
        Self {
            detector: FrequencyDetector::new(config.sample_rate),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE: ToneLabel = ToneLabel::Symbol(Symbol::Three);
    const TWO: ToneLabel = ToneLabel::Symbol(Symbol::Two);
    const ONE: ToneLabel = ToneLabel::Symbol(Symbol::One);
    const ZERO: ToneLabel = ToneLabel::Symbol(Symbol::Zero);
    const DIV: ToneLabel = ToneLabel::Divider;

    fn synced() -> FrameDecoder {
        let mut frame = FrameDecoder::new();
        frame.push(THREE).unwrap();
        frame.push(DIV).unwrap();
        for _ in 0..8 {
            frame.push(ZERO).unwrap();
            frame.push(THREE).unwrap();
        }
        assert_eq!(frame.state(), DecodeState::Decode);
        frame
    }

    #[test]
    fn test_header_transitions() {
        let mut frame = FrameDecoder::new();
        frame.push(ZERO).unwrap();
        frame.push(DIV).unwrap();
        assert_eq!(frame.state(), DecodeState::AwaitHeader);

        frame.push(THREE).unwrap();
        assert_eq!(frame.state(), DecodeState::AwaitHeaderDivider);
        frame.push(THREE).unwrap();
        frame.push(ToneLabel::Unknown).unwrap();
        assert_eq!(frame.state(), DecodeState::AwaitHeaderDivider);

        frame.push(DIV).unwrap();
        assert_eq!(frame.state(), DecodeState::CollectSync);
    }

    #[test]
    fn test_sync_ignores_other_tones() {
        let mut frame = FrameDecoder::new();
        frame.push(THREE).unwrap();
        for _ in 0..16 {
            frame.push(DIV).unwrap();
        }
        for _ in 0..8 {
            frame.push(ZERO).unwrap();
            frame.push(TWO).unwrap();
            frame.push(THREE).unwrap();
        }
        assert_eq!(frame.state(), DecodeState::Decode);
        assert!(frame.bits().is_empty());
    }

    #[test]
    fn test_bad_sync_is_fatal() {
        let mut frame = FrameDecoder::new();
        frame.push(THREE).unwrap();
        frame.push(DIV).unwrap();
        for _ in 0..15 {
            frame.push(THREE).unwrap();
        }
        assert!(matches!(frame.push(THREE), Err(ModemError::BadSync)));
    }

    #[test]
    fn test_payload_symbols() {
        let mut frame = synced();
        for tone in [DIV, DIV, THREE, TWO, ONE, ZERO] {
            frame.push(tone).unwrap();
        }
        assert_eq!(frame.finish(), vec![1, 1, 1, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_unknown_tone_decodes_as_zero_pair() {
        let mut frame = synced();
        frame.push(ONE).unwrap();
        frame.push(ToneLabel::Unknown).unwrap();
        frame.push(TWO).unwrap();
        assert_eq!(frame.finish(), vec![0, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn test_divider_pads_incomplete_group() {
        let mut frame = synced();
        for _ in 0..4 {
            frame.push(THREE).unwrap();
        }
        frame.push(DIV).unwrap();
        let bits = frame.finish();
        assert_eq!(bits.len(), 16);
        assert_eq!(&bits[..8], &[1; 8]);
        assert_eq!(&bits[8..], &[0; 8]);
    }

    #[test]
    fn test_divider_on_group_boundary_adds_nothing() {
        let mut frame = synced();
        for _ in 0..8 {
            frame.push(ONE).unwrap();
        }
        frame.push(DIV).unwrap();
        frame.push(DIV).unwrap();
        assert_eq!(frame.bits().len(), 16);
    }

    #[test]
    fn test_finish_without_payload_is_empty() {
        let mut frame = FrameDecoder::new();
        frame.push(THREE).unwrap();
        assert!(frame.finish().is_empty());
    }

    #[test]
    fn test_decode_empty_input() {
        let mut decoder = Decoder::default();
        assert!(matches!(decoder.decode(&[]), Err(ModemError::EmptyInput)));
        // shorter than one tone window
        assert!(matches!(decoder.decode(&[0; 374]), Err(ModemError::EmptyInput)));
    }

    #[test]
    fn test_detect_tones_ignores_partial_window() {
        let mut decoder = Decoder::default();
        let tones = decoder.detect_tones(&[0; 375 * 3 + 100]).unwrap();
        assert_eq!(tones.len(), 3);
        assert_eq!(tones[2].index, 2);
        assert_eq!(tones[0].label, ToneLabel::Unknown);
    }
}
