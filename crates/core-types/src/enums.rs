use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// The binary trading signal derived by the crossover strategy.
///
/// Serialized as the integers `0` (flat) and `1` (long).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Signal {
    #[default]
    Flat,
    Long,
}

impl Signal {
    /// Returns the multiplier applied to the unit size (0.0 or 1.0).
    pub fn factor(&self) -> f64 {
        match self {
            Signal::Flat => 0.0,
            Signal::Long => 1.0,
        }
    }

    /// `signal[i] - signal[i-1]`: +1 on entry, -1 on exit, 0 otherwise.
    pub fn transition_from(&self, previous: Signal) -> i8 {
        u8::from(*self) as i8 - u8::from(previous) as i8
    }
}

impl From<Signal> for u8 {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }
}

impl TryFrom<u8> for Signal {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Signal::Flat),
            1 => Ok(Signal::Long),
            other => Err(CoreError::InvalidInput(
                "signal".to_string(),
                format!("expected 0 or 1, got {other}"),
            )),
        }
    }
}
