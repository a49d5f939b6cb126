//! AD5933 and Si5351 register maps

/// Bit field within a single 8-bit register
pub trait BitField: Sized {
    /// Register holding the field
    fn register() -> u8;

    /// Number of bits in the bit field
    fn num_bits() -> u8;

    /// Offset from 0
    fn offset() -> u8;

    /// Unshifted field value
    fn bits(self) -> u8;

    #[inline]
    fn mask() -> u8 {
        !(0xFFu16 << Self::num_bits()) as u8
    }

    /// Replace the field in `w`, leaving all other bits untouched
    #[inline]
    fn update(self, w: u8) -> u8 {
        let fbits = (self.bits() & Self::mask()) << Self::offset();
        let rbits = w & !(Self::mask() << Self::offset());
        rbits | fbits
    }
}

/// Generate BitField implementation for a C-like enum
macro_rules! gen_bitfield_enum {
    ($reg:expr, $n:ident, $nb:tt, $off:tt) => {
        impl BitField for $n {
            #[inline] fn register() -> u8 { $reg }
            #[inline] fn num_bits() -> u8 { $nb }
            #[inline] fn offset() -> u8 { $off }
            #[inline] fn bits(self) -> u8 { self as u8 }
        }
    }
}


/// AD5933 registers
pub mod ad5933 {
    use super::BitField;

    /// Control register, D15..D8
    pub const CTRL_1: u8 = 0x80;
    /// Control register, D7..D0
    pub const CTRL_2: u8 = 0x81;

    /// Start frequency, 24 bits MSB first
    pub const START_FREQ_1: u8 = 0x82;
    pub const START_FREQ_2: u8 = 0x83;
    pub const START_FREQ_3: u8 = 0x84;

    /// Frequency increment, 24 bits MSB first
    pub const INC_FREQ_1: u8 = 0x85;
    pub const INC_FREQ_2: u8 = 0x86;
    pub const INC_FREQ_3: u8 = 0x87;

    /// Number of increments, 9 bits
    pub const NUM_INC_1: u8 = 0x88;
    pub const NUM_INC_2: u8 = 0x89;

    /// Number of settling time cycles, 9 bits + multiplier
    pub const NUM_SCYCLES_1: u8 = 0x8A;
    pub const NUM_SCYCLES_2: u8 = 0x8B;

    pub const STATUS: u8 = 0x8F;

    /// Temperature data, 14 bits
    pub const TEMP_DATA_1: u8 = 0x92;
    pub const TEMP_DATA_2: u8 = 0x93;

    /// Real data, 16 bit two's complement
    pub const REAL_DATA_1: u8 = 0x94;
    pub const REAL_DATA_2: u8 = 0x95;

    /// Imaginary data, 16 bit two's complement
    pub const IMAG_DATA_1: u8 = 0x96;
    pub const IMAG_DATA_2: u8 = 0x97;

    /// Address pointer command code. Sets the register a following
    /// receive-byte transfer reads from.
    pub const ADDRESS_POINTER: u8 = 0xB0;

    /// Status register bits
    pub const STATUS_TEMP_VALID: u8 = 0x01;
    pub const STATUS_DATA_VALID: u8 = 0x02;
    pub const STATUS_SWEEP_DONE: u8 = 0x04;


    /// Control register D15..D12 function codes.
    /// The device stays in the selected mode until another one is written.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum ControlFunction {
        NoOperation = 0b0000,
        /// Excite the unknown impedance at the start frequency
        InitStartFrequency = 0b0001,
        /// Begin the sweep after the settling time elapses
        StartSweep = 0b0010,
        IncrementFrequency = 0b0011,
        RepeatFrequency = 0b0100,
        MeasureTemperature = 0b1001,
        PowerDown = 0b1010,
        Standby = 0b1011,
    }
    gen_bitfield_enum!(CTRL_1, ControlFunction, 4, 4);


    /// Output excitation voltage range, D10..D9
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum OutputRange {
        /// Range 1, 2.0 V p-p
        Vpp2000mV = 0b00,
        /// Range 4, 200 mV p-p
        Vpp200mV = 0b01,
        /// Range 3, 400 mV p-p
        Vpp400mV = 0b10,
        /// Range 2, 1.0 V p-p
        Vpp1000mV = 0b11,
    }
    gen_bitfield_enum!(CTRL_1, OutputRange, 2, 1);


    /// Receive stage PGA gain, D8
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum PgaGain {
        X5 = 0,
        X1 = 1,
    }
    gen_bitfield_enum!(CTRL_1, PgaGain, 1, 0);


    /// D4 resets the frequency sweep, register contents are kept
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub enum Reset {
        Clear = 0,
        Set = 1,
    }
    gen_bitfield_enum!(CTRL_2, Reset, 1, 4);


    /// System clock source, D3
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum ClockSource {
        Internal = 0,
        /// Clock applied to the MCLK pin
        External = 1,
    }
    gen_bitfield_enum!(CTRL_2, ClockSource, 1, 3);
}


/// Si5351 registers
pub mod si5351 {
    pub const DEVICE_STATUS: u8 = 0;

    /// Output enable control, one bit per output, 1 = disabled
    pub const OUTPUT_ENABLE: u8 = 3;

    /// CLK0..CLK7 control registers
    pub const CLK0_CONTROL: u8 = 16;

    /// PLL A feedback multisynth (MSNA) parameters, 8 registers
    pub const MSNA_PARAMS: u8 = 26;

    /// MS0 parameters, 8 registers; MSx at `MS0_PARAMS + 8 * x`
    pub const MS0_PARAMS: u8 = 42;

    pub const PLL_RESET: u8 = 177;

    pub const CRYSTAL_LOAD: u8 = 183;

    /// Soft reset of PLL A and PLL B
    pub const PLL_RESET_BOTH: u8 = 0xAC;

    /// CLKx_PDN, output driver powered down
    pub const CLK_POWER_DOWN: u8 = 0x80;

    /// All outputs disabled
    pub const OUTPUTS_DISABLED: u8 = 0xFF;


    /// Crystal load capacitance, bits 7:6 of register 183
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum CrystalLoad {
        Load6pF = 0b01,
        Load8pF = 0b10,
        Load10pF = 0b11,
    }

    impl CrystalLoad {
        #[inline]
        pub fn bits(self) -> u8 {
            (self as u8) << 6
        }
    }


    /// Output driver strength, CLKx_IDRV
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum DriveStrength {
        Drive2mA = 0b00,
        Drive4mA = 0b01,
        Drive6mA = 0b10,
        Drive8mA = 0b11,
    }


    /// CLKx control register contents.
    ///
    /// PLL A is the only multisynth source in use, so MSx_SRC stays 0
    /// and the clock source is always the output's own multisynth.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ClockControl {
        pub powered_down: bool,
        pub integer_mode: bool,
        pub inverted: bool,
        pub drive: DriveStrength,
    }

    impl ClockControl {
        /// MSx as the output source, bits 3:2
        const CLK_SRC_MULTISYNTH: u8 = 0b11 << 2;

        #[inline]
        pub fn bits(self) -> u8 {
            ((self.powered_down as u8) << 7)
                | ((self.integer_mode as u8) << 6)
                | ((self.inverted as u8) << 4)
                | Self::CLK_SRC_MULTISYNTH
                | (self.drive as u8)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::ad5933::*;
    use super::si5351::*;
    use super::BitField;

    #[test]
    fn control_function_replaces_high_nibble_only() {
        let w = 0b1010_0111;
        assert_eq!(ControlFunction::Standby.update(w), 0b1011_0111);
        assert_eq!(ControlFunction::NoOperation.update(w), 0b0000_0111);
    }

    #[test]
    fn range_and_gain_keep_other_bits() {
        let w = 0b1011_0001;
        assert_eq!(OutputRange::Vpp200mV.update(w), 0b1011_0011);
        assert_eq!(OutputRange::Vpp2000mV.update(0xFF), 0b1111_1001);
        assert_eq!(PgaGain::X5.update(w), 0b1011_0000);
        assert_eq!(PgaGain::X1.update(0), 0b0000_0001);
    }

    #[test]
    fn ctrl_2_fields() {
        assert_eq!(ClockSource::External.update(0), 0b0000_1000);
        assert_eq!(Reset::Set.update(0b0000_1000), 0b0001_1000);
        assert_eq!(<Reset as BitField>::register(), CTRL_2);
    }

    #[test]
    fn integer_mode_clock_control() {
        let c = ClockControl {
            powered_down: false,
            integer_mode: true,
            inverted: false,
            drive: DriveStrength::Drive8mA,
        };
        assert_eq!(c.bits(), 0x4F);
        assert_eq!(CrystalLoad::Load10pF.bits(), 0b1100_0000);
    }
}
