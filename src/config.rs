//! Driver configuration

use crate::{constants::*, register::si5351::*};


/// AD5933 driver settings
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Ad5933Config {
    /// Clock the frequency words are computed against, Hz
    pub clock_hz: u32,
    /// Status register reads before a wait gives up with `Error::Timeout`
    pub max_polls: u32,
}

impl Default for Ad5933Config {
    fn default() -> Self {
        Ad5933Config {
            clock_hz: AD5933_INTERNAL_CLOCK,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl Ad5933Config {
    #[inline]
    pub fn clock_hz(mut self, clock_hz: u32) -> Self {
        self.clock_hz = clock_hz;
        self
    }

    #[inline]
    pub fn max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }
}


/// Si5351 driver settings.
/// Defaults match the common 25 MHz breakout with a 10 pF crystal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Si5351Config {
    pub crystal_hz: u32,
    pub crystal_load: CrystalLoad,
    /// PLL A VCO target, Hz
    pub vco_hz: u32,
    /// Drive strength of enabled outputs
    pub drive: DriveStrength,
}

impl Default for Si5351Config {
    fn default() -> Self {
        Si5351Config {
            crystal_hz: SI5351_CRYSTAL_FREQ,
            crystal_load: CrystalLoad::Load10pF,
            vco_hz: SI5351_VCO_FREQ,
            drive: DriveStrength::Drive8mA,
        }
    }
}

impl Si5351Config {
    #[inline]
    pub fn crystal_hz(mut self, crystal_hz: u32) -> Self {
        self.crystal_hz = crystal_hz;
        self
    }

    #[inline]
    pub fn crystal_load(mut self, crystal_load: CrystalLoad) -> Self {
        self.crystal_load = crystal_load;
        self
    }

    #[inline]
    pub fn vco_hz(mut self, vco_hz: u32) -> Self {
        self.vco_hz = vco_hz;
        self
    }

    #[inline]
    pub fn drive(mut self, drive: DriveStrength) -> Self {
        self.drive = drive;
        self
    }
}
