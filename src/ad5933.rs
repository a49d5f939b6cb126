//! AD5933 impedance converter
//!
//! Every mode change re-reads the control register and replaces only the
//! affected field, the device is the single source of truth for its state.

use crate::{
    config::*,
    constants::*,
    errors::*,
    frequency::frequency_word,
    register::{ad5933::*, BitField},
    sweep::*,
    transport::RegisterBus,
};


/// Power modes, selected through the control function field
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    On,
    Standby,
    PowerDown,
}

impl PowerMode {
    fn control_function(self) -> ControlFunction {
        match self {
            PowerMode::On => ControlFunction::NoOperation,
            PowerMode::Standby => ControlFunction::Standby,
            PowerMode::PowerDown => ControlFunction::PowerDown,
        }
    }
}


/// Temperature register to degrees Celsius.
///
/// 14-bit two's complement, 1/32 °C per LSB:
/// positive = code / 32, negative = (code − 16384) / 32
pub fn decode_temperature(raw: u16) -> f32 {
    let code = (raw & 0x3FFF) as i32;
    let t = if code & 0x2000 == 0 { code } else { code - 16384 };
    t as f32 / 32.0
}


/// AD5933 device
pub struct Ad5933<I2C> {
    i2c: I2C,
    clock_hz: u32,
    max_polls: u32,
}


impl<I2C> Ad5933<I2C>
where I2C: RegisterBus,
{
    /// Creates the driver, nothing is written to the device.
    pub fn new(i2c: I2C, config: Ad5933Config) -> Self {
        Ad5933 {
            i2c,
            clock_hz: config.clock_hz,
            max_polls: config.max_polls,
        }
    }

    /// Gives the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Clock the frequency words are currently computed against
    #[inline]
    pub fn reference_clock(self: &Self) -> u32 {
        self.clock_hz
    }

    /// Overrides the reference clock rate, e.g. when MCLK is fed from the
    /// Si5351. Only affects frequency words written after this call.
    pub fn set_reference_clock(self: &mut Self, hz: u32) -> Result<(), Error> {
        if hz == 0 {
            return Err(Error::InvalidReference);
        }
        debug!("ad5933: reference clock {=u32} Hz", hz);
        self.clock_hz = hz;
        Ok(())
    }

    /// Switches to the external MCLK input running at `hz`.
    pub fn use_external_clock(self: &mut Self, hz: u32) -> Result<(), Error> {
        if hz == 0 {
            return Err(Error::InvalidReference);
        }
        self.set_clock_source(ClockSource::External)?;
        self.set_reference_clock(hz)
    }


    #[inline]
    fn write(self: &mut Self, register: u8, value: u8) -> Result<(), Error> {
        self.i2c.write_register(AD5933_ADDRESS, register, value)
    }

    /// Reads go through the address pointer command followed by a
    /// receive byte transfer.
    #[inline]
    fn read(self: &mut Self, register: u8) -> Result<u8, Error> {
        self.i2c.write_register(AD5933_ADDRESS, ADDRESS_POINTER, register)?;
        let mut buf = [0u8; 1];
        self.i2c.receive(AD5933_ADDRESS, &mut buf)?;
        Ok(buf[0])
    }

    /// Read-modify-write of a single field
    fn modify<F>(self: &mut Self, field: F) -> Result<(), Error>
    where F: BitField,
    {
        let w = self.read(F::register())?;
        self.write(F::register(), field.update(w))
    }

    fn write_frequency(self: &mut Self, first: u8, hz: u32) -> Result<(), Error> {
        let word = frequency_word(hz, self.clock_hz)?;
        let [_, hi, mid, lo] = word.to_be_bytes();
        self.write(first, hi)?;
        self.write(first + 1, mid)?;
        self.write(first + 2, lo)
    }


    /// Raw register read, for diagnostics
    pub fn read_register(self: &mut Self, register: u8) -> Result<u8, Error> {
        self.read(register)
    }

    pub fn read_status(self: &mut Self) -> Result<u8, Error> {
        self.read(STATUS)
    }

    /// Both control registers, CTRL_1 in the high byte
    pub fn read_control(self: &mut Self) -> Result<u16, Error> {
        let hi = self.read(CTRL_1)?;
        let lo = self.read(CTRL_2)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Writes the control function, keeping range and gain bits.
    pub fn set_control_mode(self: &mut Self, function: ControlFunction) -> Result<(), Error> {
        trace!("ad5933: control {}", function);
        self.modify(function)
    }

    pub fn set_power_mode(self: &mut Self, mode: PowerMode) -> Result<(), Error> {
        self.set_control_mode(mode.control_function())
    }

    /// Resets the frequency sweep state machine. Programmed frequencies,
    /// increments and settling cycles are kept.
    ///
    /// The bit is cleared again afterwards, later read-modify-writes of
    /// CTRL_2 would otherwise repeat the reset.
    pub fn reset(self: &mut Self) -> Result<(), Error> {
        self.modify(Reset::Set)?;
        self.modify(Reset::Clear)
    }

    pub fn set_clock_source(self: &mut Self, source: ClockSource) -> Result<(), Error> {
        self.modify(source)
    }

    pub fn set_temperature_measurement(self: &mut Self, enable: bool) -> Result<(), Error> {
        if enable {
            self.set_control_mode(ControlFunction::MeasureTemperature)
        } else {
            self.set_control_mode(ControlFunction::NoOperation)
        }
    }

    pub fn set_pga_gain(self: &mut Self, gain: PgaGain) -> Result<(), Error> {
        self.modify(gain)
    }

    pub fn set_output_range(self: &mut Self, range: OutputRange) -> Result<(), Error> {
        self.modify(range)
    }


    /// Start frequency, 24-bit code written MSB first.
    /// Computed against the current reference clock.
    pub fn set_start_frequency(self: &mut Self, hz: u32) -> Result<(), Error> {
        self.write_frequency(START_FREQ_1, hz)
    }

    /// Frequency step between sweep points
    pub fn set_increment_frequency(self: &mut Self, hz: u32) -> Result<(), Error> {
        self.write_frequency(INC_FREQ_1, hz)
    }

    /// Number of frequency steps after the start point, 0..=511
    pub fn set_number_of_increments(self: &mut Self, n: u16) -> Result<(), Error> {
        if n > INCREMENTS_MAX {
            return Err(Error::InvalidIncrements);
        }
        let [hi, lo] = n.to_be_bytes();
        self.write(NUM_INC_1, hi)?;
        self.write(NUM_INC_2, lo)
    }

    pub fn number_of_increments(self: &mut Self) -> Result<u16, Error> {
        let hi = self.read(NUM_INC_1)?;
        let lo = self.read(NUM_INC_2)?;
        Ok(u16::from_be_bytes([hi & 0x01, lo]))
    }

    /// Writes the settling cycles and reads both bytes back, any difference
    /// is reported as `VerifyMismatch`.
    pub fn set_settling_cycles(self: &mut Self, settling: SettlingCycles) -> Result<(), Error> {
        let [hi, lo] = settling.to_bytes();
        self.write(NUM_SCYCLES_1, hi)?;
        self.write(NUM_SCYCLES_2, lo)?;

        let rb = [self.read(NUM_SCYCLES_1)?, self.read(NUM_SCYCLES_2)?];
        if rb != [hi, lo] {
            warn!("ad5933: settling cycles read back {=[u8]:x}, wrote {=[u8]:x}", &rb[..], &[hi, lo][..]);
            return Err(Error::VerifyMismatch);
        }
        Ok(())
    }

    /// Programs all sweep registers.
    ///
    /// A sweep whose last point can't be coded against the current
    /// reference clock is rejected before anything is written.
    pub fn configure_sweep(self: &mut Self, plan: &SweepPlan) -> Result<(), Error> {
        let last = plan
            .frequency_at(plan.increments as usize)
            .ok_or(Error::InvalidFrequency)?;
        frequency_word(last, self.clock_hz)?;

        debug!(
            "ad5933: sweep {=u32}..{=u32} Hz, {=u16} steps, settling {=u32} cycles",
            plan.start_hz,
            last,
            plan.increments,
            plan.settling.total_cycles(),
        );
        self.set_start_frequency(plan.start_hz)?;
        self.set_increment_frequency(plan.increment_hz)?;
        self.set_number_of_increments(plan.increments)?;
        self.set_settling_cycles(plan.settling)
    }


    /// One status check, `WouldBlock` until every bit of `mask` is set.
    pub fn poll_status(self: &mut Self, mask: u8) -> nb::Result<(), Error> {
        let status = self.read_status()?;
        if status & mask == mask {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Blocks on `poll_status` for at most `max_polls` reads.
    fn wait_status(self: &mut Self, mask: u8) -> Result<(), Error> {
        for _ in 0..self.max_polls {
            match self.poll_status(mask) {
                Ok(()) => return Ok(()),
                Err(nb::Error::WouldBlock) => continue,
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        warn!("ad5933: status {=u8:x} not set after {=u32} polls", mask, self.max_polls);
        Err(Error::Timeout)
    }

    /// Runs a temperature conversion, °C
    pub fn measure_temperature(self: &mut Self) -> Result<f32, Error> {
        self.set_control_mode(ControlFunction::MeasureTemperature)?;
        self.wait_status(STATUS_TEMP_VALID)?;
        let hi = self.read(TEMP_DATA_1)?;
        let lo = self.read(TEMP_DATA_2)?;
        Ok(decode_temperature(u16::from_be_bytes([hi, lo])))
    }

    /// Waits for valid data and reads the real / imaginary registers.
    pub fn read_complex_sample(self: &mut Self) -> Result<ComplexSample, Error> {
        self.wait_status(STATUS_DATA_VALID)?;
        Ok(ComplexSample::from_bytes([
            self.read(REAL_DATA_1)?,
            self.read(REAL_DATA_2)?,
            self.read(IMAG_DATA_1)?,
            self.read(IMAG_DATA_2)?,
        ]))
    }

    /// Measures the current point again
    pub fn repeat_frequency(self: &mut Self) -> Result<(), Error> {
        self.set_control_mode(ControlFunction::RepeatFrequency)
    }

    /// Runs the programmed sweep, one sample per point.
    ///
    /// Standby → initialize with start frequency → start sweep, then a
    /// sample is read and the frequency incremented until the device
    /// reports the sweep complete, and the device goes back to standby.
    ///
    /// Returns the number of samples written. Fails with `BufferFull` before
    /// touching the device when `samples` is shorter than the programmed
    /// number of points. A failed read leaves `ComplexSample::SENTINEL` in
    /// its slot, earlier samples stay in place.
    pub fn frequency_sweep(self: &mut Self, samples: &mut [ComplexSample]) -> Result<usize, Error> {
        let points = self.number_of_increments()? as usize + 1;
        if points > samples.len() {
            warn!("ad5933: {=usize} sweep points, buffer holds {=usize}", points, samples.len());
            return Err(Error::BufferFull);
        }

        self.set_power_mode(PowerMode::Standby)?;
        self.set_control_mode(ControlFunction::InitStartFrequency)?;
        self.set_control_mode(ControlFunction::StartSweep)?;

        let mut n = 0;
        while self.read_status()? & STATUS_SWEEP_DONE == 0 {
            let slot = samples.get_mut(n).ok_or(Error::BufferFull)?;
            match self.read_complex_sample() {
                Ok(s) => *slot = s,
                Err(e) => {
                    *slot = ComplexSample::SENTINEL;
                    return Err(e);
                }
            }
            n += 1;
            self.set_control_mode(ControlFunction::IncrementFrequency)?;
        }

        debug!("ad5933: sweep done, {=usize} points", n);
        self.set_power_mode(PowerMode::Standby)?;
        Ok(n)
    }
}
