//! Frequency calculations
//!
//! Planning (choosing divider ratios) is kept apart from encoding
//! (packing a ratio into device registers), the encoder already handles
//! fractional ratios.

use crate::{constants::*, errors::*};


/// AD5933 start / increment frequency code.
///
/// Code = (f / (MCLK / 4)) × 2^27, rounded to the nearest integer.
/// Codes that don't fit 24 bits are rejected.
pub fn frequency_word(hz: u32, clock_hz: u32) -> Result<u32, Error> {
    if clock_hz == 0 {
        return Err(Error::InvalidReference);
    }

    let clock = clock_hz as u64;
    let word = (((hz as u64) << 29) + clock / 2) / clock;

    if word > FREQUENCY_WORD_MAX as u64 {
        Err(Error::InvalidFrequency)
    } else {
        Ok(word as u32)
    }
}


/// Divider ratio a + b/c
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ratio {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Ratio {
    /// Integer ratio, b = 0, c = 1
    #[inline]
    pub fn integer(a: u32) -> Self {
        Ratio { a, b: 0, c: 1 }
    }

    /// Multisynth parameters for this ratio:
    /// P1 = 128a + floor(128b/c) − 512
    /// P2 = 128b − c × floor(128b/c)
    /// P3 = c
    ///
    /// The encoding needs a ≥ 4 and c ≠ 0, other ratios are `InvalidDivider`.
    pub fn parameters(self: &Self) -> Result<MultisynthParameters, Error> {
        if self.c == 0 || self.a < MULTISYNTH_A_MIN {
            return Err(Error::InvalidDivider);
        }
        let b128 = 128 * self.b as u64;
        let c = self.c as u64;
        let floor = b128 / c;
        Ok(MultisynthParameters {
            p1: (128 * self.a as u64 + floor - 512) as u32,
            p2: (b128 - c * floor) as u32,
            p3: self.c,
        })
    }
}


/// Encoded multisynth parameters. P1 is 18 bits, P2 and P3 are 20 bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MultisynthParameters {
    pub p1: u32,
    pub p2: u32,
    pub p3: u32,
}

impl MultisynthParameters {
    /// Register block contents, same layout for MSNA/MSNB and MS0..MS5:
    ///
    /// ```text
    /// +0  P3[15:8]
    /// +1  P3[7:0]
    /// +2  R_DIV[6:4] | DIVBY4[3:2] | P1[17:16]
    /// +3  P1[15:8]
    /// +4  P1[7:0]
    /// +5  P3[19:16] | P2[19:16]
    /// +6  P2[15:8]
    /// +7  P2[7:0]
    /// ```
    pub fn to_registers(self: &Self, r_div: OutputDivider) -> [u8; 8] {
        let (p1, p2, p3) = (self.p1, self.p2, self.p3);
        [
            (p3 >> 8) as u8,
            p3 as u8,
            ((r_div as u8) << 4) & 0x70 | ((p1 >> 16) & 0x03) as u8,
            (p1 >> 8) as u8,
            p1 as u8,
            (((p3 >> 16) & 0x0F) << 4) as u8 | ((p2 >> 16) & 0x0F) as u8,
            (p2 >> 8) as u8,
            p2 as u8,
        ]
    }
}


/// Output R divider, R = 2^n
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDivider {
    Div1 = 0,
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
}

impl OutputDivider {
    /// Divider for exponent `n`, `None` above 7
    pub fn from_exponent(n: u8) -> Option<Self> {
        use OutputDivider::*;
        match n {
            0 => Some(Div1),
            1 => Some(Div2),
            2 => Some(Div4),
            3 => Some(Div8),
            4 => Some(Div16),
            5 => Some(Div32),
            6 => Some(Div64),
            7 => Some(Div128),
            _ => None,
        }
    }

    #[inline]
    pub fn exponent(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn value(self) -> u32 {
        1 << (self as u32)
    }
}


/// PLL feedback ratio for a VCO target, integer mode.
/// f VCO = f XTAL × a
pub fn plan_pll(crystal_hz: u32, vco_hz: u32) -> Result<Ratio, Error> {
    if crystal_hz == 0 {
        return Err(Error::InvalidReference);
    }
    let a = vco_hz / crystal_hz;
    if !(PLL_A_MIN ..= PLL_A_MAX).contains(&a) {
        return Err(Error::InvalidDivider);
    }
    Ok(Ratio::integer(a))
}


/// Output multisynth plan
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputPlan {
    pub ratio: Ratio,
    pub r_div: OutputDivider,
}

impl OutputPlan {
    /// Actual output frequency for a given PLL frequency.
    /// f OUT = f VCO / ((a + b/c) × R)
    pub fn frequency_hz(self: &Self, pll_hz: u32) -> u32 {
        let Ratio { a, b, c } = self.ratio;
        let denom = (a as u64 * c as u64 + b as u64) * self.r_div.value() as u64;
        if denom == 0 {
            return 0;
        }
        (pll_hz as u64 * c as u64 / denom) as u32
    }
}


/// Integer output divider for `hz`.
///
/// Starts with R = 1 and doubles R until the multisynth divider a =
/// f VCO / (f OUT × R) drops to 2048 or R reaches 128, so the smallest R
/// that works wins. Fails when the final a is outside [4, 2048].
pub fn plan_output(pll_hz: u32, hz: u32) -> Result<OutputPlan, Error> {
    if hz == 0 {
        return Err(Error::InvalidFrequency);
    }

    let pll = pll_hz as u64;
    let mut r = 0u8;
    let mut a = pll / hz as u64;
    while a > MULTISYNTH_A_MAX as u64 && r < R_DIV_MAX {
        r += 1;
        a = pll / ((hz as u64) << r);
    }

    if a < MULTISYNTH_A_MIN as u64 || a > MULTISYNTH_A_MAX as u64 {
        return Err(Error::InvalidFrequency);
    }

    let r_div = OutputDivider::from_exponent(r).ok_or(Error::InvalidDivider)?;
    Ok(OutputPlan {
        ratio: Ratio::integer(a as u32),
        r_div,
    })
}
