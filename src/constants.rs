//! Constants

/// AD5933 7-bit I2C address
pub const AD5933_ADDRESS: u8 = 0x0D;

/// Si5351 7-bit I2C address
pub const SI5351_ADDRESS: u8 = 0x60;

/// AD5933 internal oscillator frequency
pub const AD5933_INTERNAL_CLOCK: u32 = 16_776_000;

/// Largest value the 24-bit start / increment frequency registers hold
pub const FREQUENCY_WORD_MAX: u32 = 0xFF_FFFF;

/// Number of increments is a 9-bit value
pub const INCREMENTS_MAX: u16 = 511;

/// Settling time cycle count is a 9-bit value
pub const SETTLING_CYCLES_MAX: u16 = 511;

/// Status register polls before giving up on a valid bit
pub const DEFAULT_MAX_POLLS: u32 = 10_000;

/// Si5351 module crystal
pub const SI5351_CRYSTAL_FREQ: u32 = 25_000_000;

/// PLL A target, integer multiple of the crystal
pub const SI5351_VCO_FREQ: u32 = 900_000_000;

/// PLL feedback multisynth integer range (15 + 0/1048575 to 90)
pub const PLL_A_MIN: u32 = 15;
pub const PLL_A_MAX: u32 = 90;

/// Output multisynth divider range
pub const MULTISYNTH_A_MIN: u32 = 4;
pub const MULTISYNTH_A_MAX: u32 = 2048;

/// Largest R divider exponent, R = 2^7 = 128
pub const R_DIV_MAX: u8 = 7;

/// Number of clock outputs (CLK0..CLK7)
pub const SI5351_OUTPUTS: u8 = 8;
