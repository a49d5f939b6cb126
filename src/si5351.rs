//! Si5351 clock generator
//!
//! PLL A is locked to a fixed VCO frequency at initialization, every output
//! is an integer multisynth divider of it followed by an R divider.

use crate::{
    config::*,
    constants::*,
    errors::*,
    frequency::*,
    register::si5351::*,
    transport::RegisterBus,
};


/// Si5351 device
pub struct Si5351<I2C> {
    i2c: I2C,
    config: Si5351Config,
}


impl<I2C> Si5351<I2C>
where I2C: RegisterBus,
{
    /// Creates the device (unconfigured, outputs untouched).
    pub fn new(i2c: I2C, config: Si5351Config) -> Self {
        Si5351 { i2c, config }
    }

    /// Gives the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// PLL A frequency the outputs are divided from.
    /// Crystal × integer feedback ratio, equals the VCO target when the
    /// target is a multiple of the crystal. Fails like `initialize` when
    /// the feedback ratio is out of range.
    pub fn pll_hz(self: &Self) -> Result<u32, Error> {
        let ratio = plan_pll(self.config.crystal_hz, self.config.vco_hz)?;
        Ok(self.config.crystal_hz * ratio.a)
    }

    #[inline]
    fn write(self: &mut Self, register: u8, value: u8) -> Result<(), Error> {
        self.i2c.write_register(SI5351_ADDRESS, register, value)
    }

    #[inline]
    fn read(self: &mut Self, register: u8) -> Result<u8, Error> {
        self.i2c.read_register(SI5351_ADDRESS, register)
    }

    /// Writes an 8-register parameter block starting at `base`
    fn write_parameters(self: &mut Self, base: u8, regs: &[u8; 8]) -> Result<(), Error> {
        for (i, r) in regs.iter().enumerate() {
            self.write(base + i as u8, *r)?;
        }
        Ok(())
    }

    fn check_output(output: u8) -> Result<(), Error> {
        if output >= SI5351_OUTPUTS {
            Err(Error::InvalidOutput)
        } else {
            Ok(())
        }
    }

    /// Soft reset of both PLLs, latches new multisynth settings
    pub fn reset_pll(self: &mut Self) -> Result<(), Error> {
        self.write(PLL_RESET, PLL_RESET_BOTH)
    }

    pub fn set_crystal_load(self: &mut Self, load: CrystalLoad) -> Result<(), Error> {
        self.config.crystal_load = load;
        self.write(CRYSTAL_LOAD, load.bits())
    }

    /// Brings the device into a known state:
    /// checks it responds, disables and powers down all outputs, sets the
    /// crystal load, locks PLL A to the VCO target and resets the PLLs.
    pub fn initialize(self: &mut Self) -> Result<(), Error> {
        let ratio = plan_pll(self.config.crystal_hz, self.config.vco_hz)?;

        let status = self.read(DEVICE_STATUS)?;
        debug!("si5351: device status {=u8:x}", status);

        self.write(OUTPUT_ENABLE, OUTPUTS_DISABLED)?;
        for i in 0..SI5351_OUTPUTS {
            self.write(CLK0_CONTROL + i, CLK_POWER_DOWN)?;
        }

        self.set_crystal_load(self.config.crystal_load)?;

        debug!("si5351: PLL A feedback {}", ratio);
        let regs = ratio.parameters()?.to_registers(OutputDivider::Div1);
        self.write_parameters(MSNA_PARAMS, &regs)?;

        self.reset_pll()
    }

    /// Programs output `output` (0..=7) for `hz` and resets the PLL.
    ///
    /// The divider is integer only, the actual output frequency is
    /// `plan.frequency_hz(pll_hz)` for the returned plan. Nothing is
    /// written when either the PLL or the output divider can't be planned.
    pub fn set_output_frequency(self: &mut Self, output: u8, hz: u32) -> Result<OutputPlan, Error> {
        Self::check_output(output)?;
        let plan = plan_output(self.pll_hz()?, hz)?;
        let regs = plan.ratio.parameters()?.to_registers(plan.r_div);
        debug!("si5351: CLK{=u8} {=u32} Hz, {}", output, hz, plan);

        self.write_parameters(MS0_PARAMS + 8 * output, &regs)?;

        let control = ClockControl {
            powered_down: false,
            integer_mode: true,
            inverted: false,
            drive: self.config.drive,
        };
        self.write(CLK0_CONTROL + output, control.bits())?;

        self.reset_pll()?;
        Ok(plan)
    }

    /// Enables or disables output `output` (0..=7), other outputs keep
    /// their state. A cleared bit enables the output.
    pub fn set_output_enabled(self: &mut Self, output: u8, enabled: bool) -> Result<(), Error> {
        Self::check_output(output)?;
        let mut w = self.read(OUTPUT_ENABLE)?;
        if enabled {
            w &= !(1 << output);
        } else {
            w |= 1 << output;
        }
        self.write(OUTPUT_ENABLE, w)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::*;

    fn device() -> Si5351<MockBus> {
        Si5351::new(MockBus::new(), Si5351Config::default())
    }

    #[test]
    fn initialize_sequence() {
        let mut d = device();
        d.initialize().unwrap();
        let w = d.release().writes_to(SI5351_ADDRESS);

        let mut expected = vec![(OUTPUT_ENABLE, 0xFF)];
        for i in 0..8 {
            expected.push((CLK0_CONTROL + i, 0x80));
        }
        expected.push((CRYSTAL_LOAD, 0xC0));
        // a = 36: P1 = 4096, P2 = 0, P3 = 1
        let msna = [0x00, 0x01, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00];
        for (i, r) in msna.iter().enumerate() {
            expected.push((MSNA_PARAMS + i as u8, *r));
        }
        expected.push((PLL_RESET, 0xAC));

        assert_eq!(w, expected);
    }

    #[test]
    fn initialize_fails_without_device() {
        let mut bus = MockBus::new();
        bus.si5351_present = false;
        let mut d = Si5351::new(bus, Si5351Config::default());
        assert_eq!(d.initialize(), Err(Error::I2c));
        assert!(d.release().writes.is_empty());
    }

    #[test]
    fn initialize_rejects_unreachable_vco() {
        let mut d = Si5351::new(MockBus::new(), Si5351Config::default().vco_hz(3_000_000_000));
        assert_eq!(d.initialize(), Err(Error::InvalidDivider));
    }

    #[test]
    fn output_frequency_rejects_unreachable_vco() {
        let mut d = Si5351::new(MockBus::new(), Si5351Config::default().vco_hz(3_000_000_000));
        assert_eq!(d.pll_hz(), Err(Error::InvalidDivider));
        assert_eq!(d.set_output_frequency(0, 1_000_000), Err(Error::InvalidDivider));
        assert!(d.release().writes.is_empty());
    }

    #[test]
    fn output_frequency_registers() {
        let mut d = device();
        let plan = d.set_output_frequency(1, 100_000).unwrap();
        assert_eq!(plan.ratio.a, 1125);
        assert_eq!(plan.r_div, OutputDivider::Div8);

        let bus = d.release();
        let base = (MS0_PARAMS + 8) as usize;
        assert_eq!(&bus.si5351[base..base + 8], &[0x00, 0x01, 0x32, 0x30, 0x80, 0x00, 0x00, 0x00]);
        assert_eq!(bus.si5351[(CLK0_CONTROL + 1) as usize], 0x4F);
        assert_eq!(bus.writes.last(), Some(&(SI5351_ADDRESS, PLL_RESET, 0xAC)));
    }

    #[test]
    fn output_drive_strength_from_config() {
        let config = Si5351Config::default().drive(DriveStrength::Drive2mA);
        let mut d = Si5351::new(MockBus::new(), config);
        d.set_output_frequency(0, 16_000_000).unwrap();
        assert_eq!(d.release().si5351[CLK0_CONTROL as usize], 0x4C);
    }

    #[test]
    fn invalid_outputs_write_nothing() {
        let mut d = device();
        assert_eq!(d.set_output_frequency(8, 1_000_000), Err(Error::InvalidOutput));
        assert_eq!(d.set_output_frequency(0, 1_000), Err(Error::InvalidFrequency));
        assert_eq!(d.set_output_frequency(0, 300_000_000), Err(Error::InvalidFrequency));
        assert_eq!(d.set_output_enabled(8, true), Err(Error::InvalidOutput));
        assert!(d.release().writes.is_empty());
    }

    #[test]
    fn output_enable_is_active_low() {
        let mut bus = MockBus::new();
        bus.si5351[OUTPUT_ENABLE as usize] = 0xFF;
        let mut d = Si5351::new(bus, Si5351Config::default());

        d.set_output_enabled(0, true).unwrap();
        d.set_output_enabled(7, true).unwrap();
        d.set_output_enabled(0, false).unwrap();

        assert_eq!(d.release().si5351[OUTPUT_ENABLE as usize], 0b0111_1111);
    }

    #[test]
    fn pll_frequency() {
        assert_eq!(device().pll_hz(), Ok(900_000_000));
        let d = Si5351::new(MockBus::new(), Si5351Config::default().crystal_hz(27_000_000));
        assert_eq!(d.pll_hz(), Ok(891_000_000));
    }
}
