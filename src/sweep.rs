//! Sweep parameters and samples

use core::convert::TryFrom;
use core::f64::consts::PI;

use crate::{constants::*, errors::*};


/// One sweep point as read from the real / imaginary data registers,
/// in ADC counts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComplexSample {
    pub real: i16,
    pub imag: i16,
}

impl ComplexSample {
    /// Stored in the slot whose read failed
    pub const SENTINEL: ComplexSample = ComplexSample { real: -1, imag: -1 };

    #[inline]
    pub fn new(real: i16, imag: i16) -> Self {
        ComplexSample { real, imag }
    }

    /// Decode the four data registers, REAL_DATA_1..IMAG_DATA_2
    #[inline]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        ComplexSample {
            real: i16::from_be_bytes([bytes[0], bytes[1]]),
            imag: i16::from_be_bytes([bytes[2], bytes[3]]),
        }
    }

    /// sqrt(R² + I²)
    pub fn magnitude(self: &Self) -> f64 {
        let re = self.real as f64;
        let im = self.imag as f64;
        libm::sqrt(re * re + im * im)
    }

    /// atan2(I, R) in degrees, (-180, 180]
    pub fn phase_degrees(self: &Self) -> f64 {
        libm::atan2(self.imag as f64, self.real as f64) * 180.0 / PI
    }
}


/// Settling time cycle multiplier, D10..D9 of the settling cycles register
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettlingMultiplier {
    X1 = 0b00,
    X2 = 0b01,
    X4 = 0b11,
}

impl SettlingMultiplier {
    #[inline]
    pub fn factor(self) -> u32 {
        match self {
            SettlingMultiplier::X1 => 1,
            SettlingMultiplier::X2 => 2,
            SettlingMultiplier::X4 => 4,
        }
    }
}


/// Number of output excitation cycles allowed to pass before the ADC
/// samples each point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettlingCycles {
    cycles: u16,
    multiplier: SettlingMultiplier,
}

impl SettlingCycles {
    pub fn new(cycles: u16, multiplier: SettlingMultiplier) -> Result<Self, Error> {
        if cycles > SETTLING_CYCLES_MAX {
            return Err(Error::InvalidSettlingCycles);
        }
        Ok(SettlingCycles { cycles, multiplier })
    }

    #[inline]
    pub fn cycles(self: &Self) -> u16 {
        self.cycles
    }

    #[inline]
    pub fn multiplier(self: &Self) -> SettlingMultiplier {
        self.multiplier
    }

    /// Effective settling time in excitation cycles
    #[inline]
    pub fn total_cycles(self: &Self) -> u32 {
        self.cycles as u32 * self.multiplier.factor()
    }

    /// Packed register word: D8..D0 count, D10..D9 multiplier
    #[inline]
    pub fn word(self: &Self) -> u16 {
        ((self.multiplier as u16) << 9) | self.cycles
    }

    /// NUM_SCYCLES_1, NUM_SCYCLES_2
    #[inline]
    pub fn to_bytes(self: &Self) -> [u8; 2] {
        self.word().to_be_bytes()
    }
}

impl Default for SettlingCycles {
    fn default() -> Self {
        SettlingCycles { cycles: 15, multiplier: SettlingMultiplier::X1 }
    }
}

/// Packed register word, bits above D10 must be clear
impl TryFrom<u16> for SettlingCycles {
    type Error = Error;

    fn try_from(w: u16) -> Result<Self, Error> {
        let multiplier = match (w >> 9) & 0b11 {
            0b00 => SettlingMultiplier::X1,
            0b01 => SettlingMultiplier::X2,
            0b11 => SettlingMultiplier::X4,
            _ => return Err(Error::InvalidSettlingCycles),
        };
        if w >> 11 != 0 {
            return Err(Error::InvalidSettlingCycles);
        }
        SettlingCycles::new(w & 0x1FF, multiplier)
    }
}


/// Frequency sweep description
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepPlan {
    pub start_hz: u32,
    pub increment_hz: u32,
    /// Frequency steps after the start point, 0..=511
    pub increments: u16,
    pub settling: SettlingCycles,
}

impl SweepPlan {
    /// Sample buffer length the sweep needs
    #[inline]
    pub fn points(self: &Self) -> usize {
        self.increments as usize + 1
    }

    /// Excitation frequency of point `index`, `None` past the last point
    /// or when the frequency doesn't fit `u32`
    pub fn frequency_at(self: &Self, index: usize) -> Option<u32> {
        if index >= self.points() {
            return None;
        }
        self.increment_hz
            .checked_mul(index as u32)
            .and_then(|f| f.checked_add(self.start_hz))
    }
}
