//! Driver errors

use core::fmt;

/// Every driver operation reports one of these on failure.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus transfer failed (NACK, arbitration loss, HAL timeout)
    I2c,
    /// Frequency does not fit the target register or divider chain
    InvalidFrequency,
    /// Zero reference clock or reference impedance
    InvalidReference,
    /// Sweep increment count above 511
    InvalidIncrements,
    /// Settling cycle count above 511 or unsupported multiplier code
    InvalidSettlingCycles,
    /// Divider outside its valid integer range
    InvalidDivider,
    /// Clock output index above 7
    InvalidOutput,
    /// Value read back differs from the value written
    VerifyMismatch,
    /// Status bit never became valid within the poll budget
    Timeout,
    /// Caller buffer can't hold all sweep points
    BufferFull,
    /// Sample with zero magnitude, no gain factor can be derived
    ZeroMagnitude,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Error::I2c => "I2C transfer failed",
            Error::InvalidFrequency => "frequency out of range",
            Error::InvalidReference => "invalid reference value",
            Error::InvalidIncrements => "number of increments out of range",
            Error::InvalidSettlingCycles => "invalid settling cycles",
            Error::InvalidDivider => "divider out of range",
            Error::InvalidOutput => "invalid clock output",
            Error::VerifyMismatch => "register read back mismatch",
            Error::Timeout => "timed out waiting for status",
            Error::BufferFull => "sample buffer too small",
            Error::ZeroMagnitude => "zero magnitude sample",
        };
        f.write_str(s)
    }
}
