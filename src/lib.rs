#![cfg_attr(not(test), no_std)]

//! [AD5933](https://www.analog.com/en/products/ad5933.html) impedance
//! converter and [Si5351](https://www.skyworksinc.com/en/Products/Timing/CMOS-Clock-Generators/Si5351A-B-GT)
//! clock generator drivers.
//!
//! Both chips sit on one I2C bus, the Si5351 can supply the AD5933's MCLK.
//!
//! ```ignore
//! let mut clock = Si5351::new(i2c_a, Si5351Config::default());
//! clock.initialize()?;
//! clock.set_output_frequency(0, 4_000_000)?;
//! clock.set_output_enabled(0, true)?;
//!
//! let mut analyzer = Ad5933::new(i2c_b, Ad5933Config::default());
//! analyzer.use_external_clock(4_000_000)?;
//! analyzer.configure_sweep(&SweepPlan {
//!     start_hz: 1_000,
//!     increment_hz: 100,
//!     increments: 99,
//!     settling: SettlingCycles::new(15, SettlingMultiplier::X1)?,
//! })?;
//!
//! let mut samples = [ComplexSample::default(); 100];
//! let mut coefficients = [CalibrationCoefficient::default(); 100];
//! analyzer.calibrate(&mut samples, &mut coefficients, 1_000.0)?;
//! ```

// must go first, defines the logging macros
mod fmt;

pub mod constants;
pub mod errors;
pub mod register;
pub mod transport;
pub mod config;
pub mod frequency;
pub mod sweep;
pub mod ad5933;
pub mod si5351;
pub mod calibration;

#[cfg(test)]
mod mock;

pub use crate::{
    ad5933::{Ad5933, PowerMode},
    calibration::{CalibrationCoefficient, Measurement},
    config::{Ad5933Config, Si5351Config},
    errors::Error,
    si5351::Si5351,
    sweep::{ComplexSample, SettlingCycles, SettlingMultiplier, SweepPlan},
    transport::RegisterBus,
};
