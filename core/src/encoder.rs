use log::debug;

use crate::config::ModemConfig;
use crate::error::{ModemError, Result};
use crate::payload;
use crate::symbol::Symbol;
use crate::synth::ToneSynthesizer;
use crate::{
    BITS_PER_GROUP, FRAME_OVERHEAD_TONES, FREQ_DIVIDER, HEADER_DIVIDER_TONES, HEADER_TONES,
    PRE_PAYLOAD_DIVIDER_TONES, SYNC_TONES, TAIL_DIVIDER_TONES,
};

const SYMBOLS_PER_GROUP: usize = BITS_PER_GROUP / 2;

/// Destination for rendered sample blocks.
pub trait SampleSink {
    fn write_block(&mut self, block: &[i16]) -> Result<()>;
}

impl SampleSink for Vec<i16> {
    fn write_block(&mut self, block: &[i16]) -> Result<()> {
        self.extend_from_slice(block);
        Ok(())
    }
}

/// Number of tones in the frame carrying `payload_bits` bits.
pub fn frame_tone_count(payload_bits: usize) -> usize {
    FRAME_OVERHEAD_TONES + payload_bits.div_ceil(2) + payload_bits / BITS_PER_GROUP
}

/// Frame encoder
///
/// Renders header, sync, payload and tail tones and hands them to a
/// [`SampleSink`] one 16-bit group at a time.
pub struct Encoder {
    config: ModemConfig,
    synth: ToneSynthesizer,
}

impl Encoder {
    pub fn new(config: ModemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            synth: ToneSynthesizer::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// Lazily render the frame for `bits`.
    ///
    /// Every bit must be 0 or 1 and the count must be even; this is checked
    /// up front so a bad sequence never produces a partial frame.
    pub fn blocks(&self, bits: &[u8]) -> Result<FrameBlocks<'_>> {
        if bits.len() % 2 != 0 {
            return Err(ModemError::InvalidSymbol);
        }
        let symbols = bits
            .chunks_exact(2)
            .map(|pair| Symbol::from_bits(pair[0], pair[1]))
            .collect::<Result<Vec<_>>>()?;

        Ok(FrameBlocks {
            synth: &self.synth,
            symbols,
            next_symbol: 0,
            phase: 0.0,
            stage: Stage::Header,
        })
    }

    /// Encode a raw bit sequence into `sink`. Returns the number of samples
    /// written.
    pub fn encode<S: SampleSink + ?Sized>(&self, bits: &[u8], sink: &mut S) -> Result<usize> {
        let mut written = 0;
        for (index, block) in self.blocks(bits)?.enumerate() {
            sink.write_block(&block)?;
            written += block.len();
            debug!("flushed block {} ({} samples)", index, block.len());
        }
        debug!(
            "encoded {} bits into {} tones",
            bits.len(),
            written / self.config.tone_samples
        );
        Ok(written)
    }

    /// Pad, terminate and encode `data`.
    pub fn encode_bytes<S: SampleSink + ?Sized>(&self, data: &[u8], sink: &mut S) -> Result<usize> {
        self.encode(&payload::to_bits(data), sink)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        let config = ModemConfig::default();
        Self {
            synth: ToneSynthesizer::new(&config),
            config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Header,
    Payload,
    Done,
}

/// Sample blocks of one frame, in transmission order.
///
/// The first block holds header, divider and sync tones. Each following block
/// holds one 16-bit group and its divider, the last one also holds the tail.
pub struct FrameBlocks<'a> {
    synth: &'a ToneSynthesizer,
    symbols: Vec<Symbol>,
    next_symbol: usize,
    phase: f64,
    stage: Stage,
}

impl FrameBlocks<'_> {
    fn header_block(&mut self) -> Vec<i16> {
        let tones = HEADER_TONES + HEADER_DIVIDER_TONES + SYNC_TONES + PRE_PAYLOAD_DIVIDER_TONES;
        let mut block = Vec::with_capacity(tones * self.synth.tone_samples());

        let mut phase = self.phase;
        phase = self.synth.append_tones(&mut block, Symbol::Three.frequency(), HEADER_TONES, phase);
        phase = self.synth.append_tones(&mut block, FREQ_DIVIDER, HEADER_DIVIDER_TONES, phase);
        for _ in 0..SYNC_TONES / 2 {
            phase = self.synth.append_tone(&mut block, Symbol::Zero.frequency(), phase);
            phase = self.synth.append_tone(&mut block, Symbol::Three.frequency(), phase);
        }
        self.phase = self.synth.append_tones(&mut block, FREQ_DIVIDER, PRE_PAYLOAD_DIVIDER_TONES, phase);
        block
    }

    fn payload_block(&mut self) -> Vec<i16> {
        let end = (self.next_symbol + SYMBOLS_PER_GROUP).min(self.symbols.len());
        let group = &self.symbols[self.next_symbol..end];
        let full = group.len() == SYMBOLS_PER_GROUP;

        let tones = group.len() + if full { 1 } else { TAIL_DIVIDER_TONES };
        let mut block = Vec::with_capacity(tones * self.synth.tone_samples());

        let mut phase = self.phase;
        for symbol in group {
            phase = self.synth.append_tone(&mut block, symbol.frequency(), phase);
        }
        if full {
            phase = self.synth.append_tone(&mut block, FREQ_DIVIDER, phase);
        } else {
            phase = self.synth.append_tones(&mut block, FREQ_DIVIDER, TAIL_DIVIDER_TONES, phase);
            self.stage = Stage::Done;
        }

        self.next_symbol = end;
        self.phase = phase;
        block
    }
}

impl Iterator for FrameBlocks<'_> {
    type Item = Vec<i16>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.stage {
            Stage::Header => {
                self.stage = Stage::Payload;
                Some(self.header_block())
            }
            Stage::Payload => Some(self.payload_block()),
            Stage::Done => None,
        }
    }
}
