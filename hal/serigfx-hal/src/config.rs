//! Link configuration
//!
//! Baud presets shared by both ends of the link and the startup timeout.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Supported serial baud rates
///
/// Both MCUs must be started with the same preset. `Fallback` exists for
/// boards whose UART cannot reach the faster rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum Baud {
    Fallback = 9_600,
    Min = 115_200,
    Quarter = 250_000,
    Half = 576_000,
    #[default]
    Default = 1_000_000,
    Double = 2_000_000,
    Quad = 4_000_000,
    Max = 6_000_000,
}

impl Baud {
    /// All presets, slowest first
    pub const ALL: [Baud; 8] = [
        Baud::Fallback,
        Baud::Min,
        Baud::Quarter,
        Baud::Half,
        Baud::Default,
        Baud::Double,
        Baud::Quad,
        Baud::Max,
    ];

    /// Bits per second
    pub const fn bits_per_second(self) -> u32 {
        self as u32
    }

    /// Look up a preset by its exact rate
    pub fn from_bits_per_second(rate: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|baud| baud.bits_per_second() == rate)
    }

    /// Approximate byte throughput (8N1 framing, 10 bits per byte)
    pub const fn bytes_per_second(self) -> u32 {
        self.bits_per_second() / 10
    }
}

/// Default time to wait for the transport to come up at startup
pub const DEFAULT_READY_TIMEOUT_MS: u32 = 10_000;

/// Configuration for one end of the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Serial baud rate
    pub baud: Baud,
    /// Upper bound on the startup readiness wait (ms)
    pub ready_timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud: Baud::Default,
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
        }
    }
}

impl LinkConfig {
    /// Configuration at a specific baud rate with the default timeout
    pub const fn with_baud(baud: Baud) -> Self {
        Self {
            baud,
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LinkConfig::default();
        assert_eq!(config.baud, Baud::Default);
        assert_eq!(config.baud.bits_per_second(), 1_000_000);
        assert_eq!(config.ready_timeout_ms, 10_000);
    }

    #[test]
    fn test_baud_lookup() {
        assert_eq!(Baud::from_bits_per_second(250_000), Some(Baud::Quarter));
        assert_eq!(Baud::from_bits_per_second(9_600), Some(Baud::Fallback));
        assert_eq!(Baud::from_bits_per_second(19_200), None);
    }

    #[test]
    fn test_presets_ordered() {
        for pair in Baud::ALL.windows(2) {
            assert!(pair[0].bits_per_second() < pair[1].bits_per_second());
        }
    }
}
