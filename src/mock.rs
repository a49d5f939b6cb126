//! Register file simulation of both chips behind one I2C bus, for tests.

use embedded_hal::blocking::i2c::{Read, Write};

use crate::constants::*;
use crate::register::ad5933 as ad;
use crate::sweep::ComplexSample;


#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Nack;

pub struct MockBus {
    pub ad5933: [u8; 256],
    pub si5351: [u8; 256],
    ad5933_pointer: u8,
    si5351_pointer: u8,
    /// Register writes in bus order: (device, register, value)
    pub writes: Vec<(u8, u8, u8)>,
    /// Returned one per sweep point, zeros once exhausted
    pub samples: Vec<ComplexSample>,
    point: usize,
    /// TEMP_DATA_1/2 contents after a temperature command
    pub temperature: u16,
    /// Status bits never become valid
    pub stalled: bool,
    /// Keeps producing points past the programmed count
    pub overrun: bool,
    pub si5351_present: bool,
    /// Reads of this AD5933 register NACK
    pub fail_read: Option<u8>,
    /// Writes to this AD5933 register store the given value instead
    pub corrupt: Option<(u8, u8)>,
}

impl MockBus {
    pub fn new() -> Self {
        MockBus {
            ad5933: [0; 256],
            si5351: [0; 256],
            ad5933_pointer: 0,
            si5351_pointer: 0,
            writes: Vec::new(),
            samples: Vec::new(),
            point: 0,
            temperature: 0,
            stalled: false,
            overrun: false,
            si5351_present: true,
            fail_read: None,
            corrupt: None,
        }
    }

    pub fn with_samples(samples: &[ComplexSample]) -> Self {
        let mut bus = MockBus::new();
        bus.samples = samples.to_vec();
        bus
    }

    /// Writes to one device, in order
    pub fn writes_to(&self, address: u8) -> Vec<(u8, u8)> {
        self.writes
            .iter()
            .filter(|w| w.0 == address)
            .map(|w| (w.1, w.2))
            .collect()
    }

    /// Control function codes written to the AD5933, in order
    pub fn control_functions(&self) -> Vec<u8> {
        self.writes_to(AD5933_ADDRESS)
            .iter()
            .filter(|w| w.0 == ad::CTRL_1)
            .map(|w| w.1 >> 4)
            .collect()
    }

    fn sweep_points(&self) -> usize {
        let n = (((self.ad5933[ad::NUM_INC_1 as usize] & 0x01) as usize) << 8)
            | self.ad5933[ad::NUM_INC_2 as usize] as usize;
        n + 1
    }

    fn load_point(&mut self) {
        if self.stalled {
            return;
        }
        let status = ad::STATUS as usize;
        if self.overrun || self.point < self.sweep_points() {
            let s = self.samples.get(self.point).copied().unwrap_or_default();
            let re = s.real.to_be_bytes();
            let im = s.imag.to_be_bytes();
            self.ad5933[ad::REAL_DATA_1 as usize] = re[0];
            self.ad5933[ad::REAL_DATA_2 as usize] = re[1];
            self.ad5933[ad::IMAG_DATA_1 as usize] = im[0];
            self.ad5933[ad::IMAG_DATA_2 as usize] = im[1];
            self.ad5933[status] = ad::STATUS_DATA_VALID;
        } else {
            self.ad5933[status] = ad::STATUS_SWEEP_DONE;
        }
    }

    fn ad5933_write(&mut self, register: u8, value: u8) {
        let value = match self.corrupt {
            Some((r, v)) if r == register => v,
            _ => value,
        };
        self.ad5933[register as usize] = value;
        if register != ad::CTRL_1 {
            return;
        }

        let status = ad::STATUS as usize;
        match value >> 4 {
            0b0001 => {
                self.point = 0;
                self.ad5933[status] = 0;
            }
            0b0010 | 0b0100 => self.load_point(),
            0b0011 => {
                self.point += 1;
                self.load_point();
            }
            0b1001 => {
                if !self.stalled {
                    let t = self.temperature.to_be_bytes();
                    self.ad5933[ad::TEMP_DATA_1 as usize] = t[0];
                    self.ad5933[ad::TEMP_DATA_2 as usize] = t[1];
                    self.ad5933[status] |= ad::STATUS_TEMP_VALID;
                }
            }
            0b1010 | 0b1011 => self.ad5933[status] = 0,
            _ => {}
        }
    }
}

impl Write for MockBus {
    type Error = Nack;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Nack> {
        match (address, bytes) {
            (AD5933_ADDRESS, [ad::ADDRESS_POINTER, register]) => {
                self.ad5933_pointer = *register;
                Ok(())
            }
            (AD5933_ADDRESS, [register, value]) => {
                self.writes.push((address, *register, *value));
                self.ad5933_write(*register, *value);
                Ok(())
            }
            (SI5351_ADDRESS, _) if !self.si5351_present => Err(Nack),
            (SI5351_ADDRESS, [register]) => {
                self.si5351_pointer = *register;
                Ok(())
            }
            (SI5351_ADDRESS, [register, value]) => {
                self.writes.push((address, *register, *value));
                self.si5351[*register as usize] = *value;
                Ok(())
            }
            _ => Err(Nack),
        }
    }
}

impl Read for MockBus {
    type Error = Nack;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Nack> {
        match address {
            AD5933_ADDRESS => {
                if self.fail_read == Some(self.ad5933_pointer) {
                    return Err(Nack);
                }
                for (i, b) in buffer.iter_mut().enumerate() {
                    *b = self.ad5933[self.ad5933_pointer as usize + i];
                }
                Ok(())
            }
            SI5351_ADDRESS if self.si5351_present => {
                for (i, b) in buffer.iter_mut().enumerate() {
                    *b = self.si5351[self.si5351_pointer as usize + i];
                }
                Ok(())
            }
            _ => Err(Nack),
        }
    }
}
