//! Tonal data transmission modem
//!
//! Four-tone FSK: every tone carries two bits, a reserved divider tone marks
//! frame boundaries, and a fixed header plus alternating sync pattern gates
//! the payload decoder.

pub mod config;
pub mod decoder;
pub mod detect;
pub mod encoder;
pub mod error;
pub mod payload;
pub mod symbol;
pub mod synth;
pub mod wav;

pub use config::ModemConfig;
pub use decoder::{DecodeState, Decoder, DetectedTone, FrameDecoder};
pub use detect::FrequencyDetector;
pub use encoder::{frame_tone_count, Encoder, FrameBlocks, SampleSink};
pub use error::{ModemError, Result};
pub use symbol::{Symbol, ToneLabel};
pub use synth::{render, ToneSynthesizer};
pub use wav::{read_samples, WavSink};

// Reference audio parameters
pub const SAMPLE_RATE: u32 = 12000;
pub const TONE_SAMPLES: usize = 375; // 31.25 ms per tone
pub const AMPLITUDE: f64 = 32767.0;
pub const TOLERANCE: f64 = 0.1;

// Tone frequencies (Hz)
pub const FREQ_11: f64 = 2000.0;
pub const FREQ_10: f64 = 1750.0;
pub const FREQ_DIVIDER: f64 = 1500.0;
pub const FREQ_01: f64 = 1250.0;
pub const FREQ_00: f64 = 1000.0;

// Frame layout (in tones)
pub const HEADER_TONES: usize = 16;
pub const HEADER_DIVIDER_TONES: usize = 16;
pub const SYNC_TONES: usize = 16;
pub const PRE_PAYLOAD_DIVIDER_TONES: usize = 4;
pub const TAIL_DIVIDER_TONES: usize = 4;
pub const BITS_PER_GROUP: usize = 16; // a divider follows every group
pub const FRAME_OVERHEAD_TONES: usize = HEADER_TONES
    + HEADER_DIVIDER_TONES
    + SYNC_TONES
    + PRE_PAYLOAD_DIVIDER_TONES
    + TAIL_DIVIDER_TONES; // 56

/// Bits the sync tones decode to.
pub const SYNC_PATTERN: [u8; SYNC_TONES] = [0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1];

/// Trailing bytes appended to every payload; dropped unchecked on decode.
pub const TERMINATOR: [u8; 2] = [0xFF, 0xFF];
pub const TERMINATOR_BITS: usize = TERMINATOR.len() * 8;
