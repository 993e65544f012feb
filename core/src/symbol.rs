use crate::error::{ModemError, Result};
use crate::{FREQ_00, FREQ_01, FREQ_10, FREQ_11, FREQ_DIVIDER};

/// A data tone carrying two bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// `11`
    Three,
    /// `10`
    Two,
    /// `01`
    One,
    /// `00`
    Zero,
}

impl Symbol {
    /// Classification priority, highest first.
    pub const PRIORITY: [Symbol; 4] = [Symbol::Three, Symbol::Two, Symbol::One, Symbol::Zero];

    pub fn from_bits(high: u8, low: u8) -> Result<Self> {
        match (high, low) {
            (1, 1) => Ok(Symbol::Three),
            (1, 0) => Ok(Symbol::Two),
            (0, 1) => Ok(Symbol::One),
            (0, 0) => Ok(Symbol::Zero),
            _ => Err(ModemError::InvalidSymbol),
        }
    }

    /// The two bits, most significant first.
    pub fn bits(self) -> [u8; 2] {
        match self {
            Symbol::Three => [1, 1],
            Symbol::Two => [1, 0],
            Symbol::One => [0, 1],
            Symbol::Zero => [0, 0],
        }
    }

    pub fn frequency(self) -> f64 {
        match self {
            Symbol::Three => FREQ_11,
            Symbol::Two => FREQ_10,
            Symbol::One => FREQ_01,
            Symbol::Zero => FREQ_00,
        }
    }
}

/// What a detected frequency is taken to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneLabel {
    Symbol(Symbol),
    Divider,
    Unknown,
}

impl ToneLabel {
    /// Classify `frequency` against the tone table.
    ///
    /// A band is `nominal ± tolerance * nominal`. The `10` band overlaps both
    /// `11` and the divider, so bands are tried in the fixed order
    /// `11, 10, 01, 00, divider` and the first hit wins.
    pub fn classify(frequency: f64, tolerance: f64) -> Self {
        for symbol in Symbol::PRIORITY {
            if within_tolerance(frequency, symbol.frequency(), tolerance) {
                return ToneLabel::Symbol(symbol);
            }
        }
        if within_tolerance(frequency, FREQ_DIVIDER, tolerance) {
            return ToneLabel::Divider;
        }
        ToneLabel::Unknown
    }

    pub fn name(self) -> &'static str {
        match self {
            ToneLabel::Symbol(Symbol::Three) => "11",
            ToneLabel::Symbol(Symbol::Two) => "10",
            ToneLabel::Symbol(Symbol::One) => "01",
            ToneLabel::Symbol(Symbol::Zero) => "00",
            ToneLabel::Divider => "div",
            ToneLabel::Unknown => "?",
        }
    }
}

fn within_tolerance(frequency: f64, nominal: f64, tolerance: f64) -> bool {
    (frequency - nominal).abs() <= tolerance * nominal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_bits_mapping() {
        for symbol in Symbol::PRIORITY {
            let [high, low] = symbol.bits();
            assert_eq!(Symbol::from_bits(high, low).unwrap(), symbol);
        }
        assert!(matches!(Symbol::from_bits(2, 0), Err(ModemError::InvalidSymbol)));
        assert!(matches!(Symbol::from_bits(1, 7), Err(ModemError::InvalidSymbol)));
    }

    #[test]
    fn test_classify_nominal_frequencies() {
        assert_eq!(ToneLabel::classify(2000.0, 0.1), ToneLabel::Symbol(Symbol::Three));
        assert_eq!(ToneLabel::classify(1750.0, 0.1), ToneLabel::Symbol(Symbol::Two));
        assert_eq!(ToneLabel::classify(1500.0, 0.1), ToneLabel::Divider);
        assert_eq!(ToneLabel::classify(1250.0, 0.1), ToneLabel::Symbol(Symbol::One));
        assert_eq!(ToneLabel::classify(1000.0, 0.1), ToneLabel::Symbol(Symbol::Zero));
    }

    #[test]
    fn test_classify_tolerance_boundary() {
        assert_eq!(ToneLabel::classify(2000.0 * 1.09, 0.1), ToneLabel::Symbol(Symbol::Three));
        assert_eq!(ToneLabel::classify(2000.0 * 1.11, 0.1), ToneLabel::Unknown);

        assert_eq!(ToneLabel::classify(1000.0 * 1.09, 0.1), ToneLabel::Symbol(Symbol::Zero));
        assert_eq!(ToneLabel::classify(1000.0 * 1.11, 0.1), ToneLabel::Unknown);

        // the divider band is shadowed by 10 above and 01 below
        assert_eq!(ToneLabel::classify(1500.0 * 1.09, 0.1), ToneLabel::Symbol(Symbol::Two));
        assert_eq!(ToneLabel::classify(1500.0 * 0.93, 0.1), ToneLabel::Divider);
        assert_eq!(ToneLabel::classify(1500.0 * 0.91, 0.1), ToneLabel::Symbol(Symbol::One));
    }

    #[test]
    fn test_classify_overlap_priority() {
        // 1850 Hz is inside both the 11 and the 10 band
        assert_eq!(ToneLabel::classify(1850.0, 0.1), ToneLabel::Symbol(Symbol::Three));
        // 1600 Hz is inside both the 10 and the divider band
        assert_eq!(ToneLabel::classify(1600.0, 0.1), ToneLabel::Symbol(Symbol::Two));
        // 1360 Hz is inside both the 01 and the divider band
        assert_eq!(ToneLabel::classify(1360.0, 0.1), ToneLabel::Symbol(Symbol::One));
    }

    #[test]
    fn test_classify_out_of_band() {
        assert_eq!(ToneLabel::classify(0.0, 0.1), ToneLabel::Unknown);
        assert_eq!(ToneLabel::classify(500.0, 0.1), ToneLabel::Unknown);
        assert_eq!(ToneLabel::classify(3000.0, 0.1), ToneLabel::Unknown);
    }
}
