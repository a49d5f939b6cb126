//! Gain factor / phase calibration against a known impedance

use crate::{ad5933::Ad5933, errors::*, sweep::ComplexSample, transport::RegisterBus};


/// Calibration of one sweep point
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CalibrationCoefficient {
    /// (1 / Z ref) / |sample|
    pub gain_factor: f64,
    /// System phase, degrees
    pub phase_degrees: f64,
}

/// Calibrated measurement of one sweep point
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Measurement {
    pub impedance_ohms: f64,
    pub phase_degrees: f64,
}

impl CalibrationCoefficient {
    /// Coefficient from a sample taken across `reference_ohms`.
    ///
    /// A (0, 0) sample gives no usable gain factor and is rejected
    /// with `ZeroMagnitude`.
    pub fn from_sample(sample: ComplexSample, reference_ohms: f64) -> Result<Self, Error> {
        if !(reference_ohms > 0.0) {
            return Err(Error::InvalidReference);
        }
        let magnitude = sample.magnitude();
        if magnitude == 0.0 {
            return Err(Error::ZeroMagnitude);
        }
        Ok(CalibrationCoefficient {
            gain_factor: (1.0 / reference_ohms) / magnitude,
            phase_degrees: sample.phase_degrees(),
        })
    }

    /// Applies the calibration to a sample of an unknown impedance:
    /// |Z| = 1 / (gain factor × |sample|), phase = sample phase − system phase
    pub fn measure(self: &Self, sample: ComplexSample) -> Result<Measurement, Error> {
        let magnitude = sample.magnitude();
        if magnitude == 0.0 {
            return Err(Error::ZeroMagnitude);
        }
        Ok(Measurement {
            impedance_ohms: 1.0 / (self.gain_factor * magnitude),
            phase_degrees: sample.phase_degrees() - self.phase_degrees,
        })
    }
}


impl<I2C> Ad5933<I2C>
where I2C: RegisterBus,
{
    /// Sweeps across a reference impedance of `reference_ohms` and derives
    /// one coefficient per point.
    ///
    /// Raw samples are left in `samples`. Returns the number of points.
    /// A `coefficients` buffer shorter than the programmed sweep fails with
    /// `BufferFull` before the sweep starts.
    pub fn calibrate(
        self: &mut Self,
        samples: &mut [ComplexSample],
        coefficients: &mut [CalibrationCoefficient],
        reference_ohms: f64,
    ) -> Result<usize, Error> {
        if !(reference_ohms > 0.0) {
            return Err(Error::InvalidReference);
        }

        let points = self.number_of_increments()? as usize + 1;
        if coefficients.len() < points {
            return Err(Error::BufferFull);
        }

        let n = self.frequency_sweep(samples)?;
        if coefficients.len() < n {
            return Err(Error::BufferFull);
        }

        for (c, s) in coefficients.iter_mut().zip(samples[..n].iter()) {
            *c = CalibrationCoefficient::from_sample(*s, reference_ohms)?;
        }
        debug!("ad5933: calibrated {=usize} points", n);
        Ok(n)
    }
}
