//! Battery voltage reader
//!
//! Samples one ADC channel wired to the battery through a resistor divider
//! and maps the voltage linearly onto a 0–100 % scale. It is an optional
//! calibration input and is independent of the energy model.
//!
//! # Wiring
//! The battery (3.3–4.2 V for a 1S `LiPo`) is above the ADC's 3.3 V range,
//! so it is halved by a divider before the pin:
//!
//! ```text
//! Battery+ --- [R1 100k] --- ADC pin --- [R2 100k] --- GND
//! ```
//!
//! `divider_ratio` is `(R1 + R2) / R2`.
//!
//! # Example
//!
//! ```ignore
//! # use power_estimator::battery::{BatteryConfig, BatteryMonitor};
//! let mut battery = BatteryMonitor::new(adc_channel);
//! let reading = battery.sample()?;
//! info!("Battery: {}V ({}%)", reading.voltage, reading.percentage);
//! ```

use crate::Error;

/// One raw sample from an analog channel
///
/// The crate does not assume any HAL's ADC API; implement this for the
/// channel the divider is wired to.
pub trait AdcChannel {
    /// ADC error type
    type Error;

    /// Take one conversion
    ///
    /// # Errors
    /// Returns the HAL's error if the conversion fails
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// Async counterpart of [`AdcChannel`]
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncAdcChannel {
    /// ADC error type
    type Error;

    /// Take one conversion
    ///
    /// # Errors
    /// Returns the HAL's error if the conversion fails
    async fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// Divider, reference and threshold settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryConfig {
    /// Full-scale ADC count (4095 for 12-bit)
    pub adc_max: u16,
    /// ADC reference voltage (V)
    pub reference_voltage: f32,
    /// Divider ratio `(R1 + R2) / R2`
    pub divider_ratio: f32,
    /// Battery voltage reported as 0 % (V)
    pub empty_voltage: f32,
    /// Battery voltage reported as 100 % (V)
    pub full_voltage: f32,
    /// Minimum time between periodic samples (ms)
    pub check_interval_ms: u64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self::LIPO_1S
    }
}

impl BatteryConfig {
    /// Single-cell `LiPo` behind a 1:2 divider on a 12-bit, 3.3 V ADC
    pub const LIPO_1S: Self = Self {
        adc_max: 4095,
        reference_voltage: 3.3,
        divider_ratio: 2.0,
        empty_voltage: 3.3,
        full_voltage: 4.2,
        check_interval_ms: 30_000,
    };

    /// Create a configuration for a different divider or chemistry
    ///
    /// The ADC is assumed 12-bit with a 3.3 V reference and the periodic
    /// check interval is 30 s; adjust the fields directly otherwise.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the divider ratio is not positive or the
    /// thresholds are not strictly ordered
    pub const fn new(
        divider_ratio: f32,
        empty_voltage: f32,
        full_voltage: f32,
    ) -> Result<Self, Error<()>> {
        let config = Self {
            divider_ratio,
            empty_voltage,
            full_voltage,
            ..Self::LIPO_1S
        };
        match config.validate() {
            Ok(()) => Ok(config),
            Err(e) => Err(e),
        }
    }

    /// Check the settings
    ///
    /// # Errors
    /// Returns `InvalidConfig` on a zero ADC range, a non-positive reference
    /// or divider, or thresholds that are not finite and strictly ordered
    pub const fn validate(&self) -> Result<(), Error<()>> {
        if self.adc_max == 0 {
            return Err(Error::InvalidConfig);
        }
        if !(self.reference_voltage > 0.0 && self.reference_voltage <= f32::MAX) {
            return Err(Error::InvalidConfig);
        }
        if !(self.divider_ratio > 0.0 && self.divider_ratio <= f32::MAX) {
            return Err(Error::InvalidConfig);
        }
        if !(self.empty_voltage >= 0.0 && self.full_voltage <= f32::MAX) {
            return Err(Error::InvalidConfig);
        }
        if !(self.full_voltage > self.empty_voltage) {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// Battery voltage for a raw ADC count (V)
    pub fn voltage_from_raw(&self, raw: u16) -> f32 {
        f32::from(raw) / f32::from(self.adc_max) * self.reference_voltage * self.divider_ratio
    }

    /// State of charge for a battery voltage, clamped to 0–100 %
    ///
    /// Linear between the thresholds and truncated towards zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percentage_for(&self, voltage: f32) -> u8 {
        let percentage = (voltage - self.empty_voltage) / (self.full_voltage - self.empty_voltage)
            * 100.0;
        // NaN saturates to 0 in the cast
        percentage.clamp(0.0, 100.0) as u8
    }
}

/// One battery observation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryReading {
    /// Battery voltage (V)
    pub voltage: f32,
    /// State of charge (%)
    pub percentage: u8,
    /// Voltage lost since the first reading (V)
    pub drop: f32,
}

/// Battery voltage reader with first-reading baseline and rate limiting
pub struct BatteryMonitor<A> {
    adc: A,
    config: BatteryConfig,
    initial_voltage: Option<f32>,
    current_voltage: Option<f32>,
    last_check_ms: Option<u64>,
}

impl<A> BatteryMonitor<A> {
    /// Create a reader with the default 1S `LiPo` settings
    pub const fn new(adc: A) -> Self {
        Self {
            adc,
            config: BatteryConfig::LIPO_1S,
            initial_voltage: None,
            current_voltage: None,
            last_check_ms: None,
        }
    }

    /// Create a reader with custom settings
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration does not validate
    pub fn with_config(adc: A, config: BatteryConfig) -> Result<Self, Error<()>> {
        config.validate()?;
        Ok(Self {
            adc,
            config,
            initial_voltage: None,
            current_voltage: None,
            last_check_ms: None,
        })
    }

    /// State of charge for `voltage` under this reader's thresholds (%)
    pub fn percentage(&self, voltage: f32) -> u8 {
        self.config.percentage_for(voltage)
    }

    /// Most recent sampled voltage (V)
    pub const fn current_voltage(&self) -> Option<f32> {
        self.current_voltage
    }

    /// First sampled voltage (V)
    pub const fn initial_voltage(&self) -> Option<f32> {
        self.initial_voltage
    }

    /// Voltage lost between the first and the most recent sample (V)
    pub fn voltage_drop(&self) -> Option<f32> {
        Some(self.initial_voltage? - self.current_voltage?)
    }

    /// Active configuration
    pub const fn config(&self) -> &BatteryConfig {
        &self.config
    }

    /// Consume the reader and return the ADC channel
    pub fn release(self) -> A {
        self.adc
    }

    fn is_due(&self, now_ms: u64) -> bool {
        self.last_check_ms
            .is_none_or(|last| now_ms.saturating_sub(last) > self.config.check_interval_ms)
    }

    fn record(&mut self, voltage: f32) -> BatteryReading {
        let initial = *self.initial_voltage.get_or_insert(voltage);
        self.current_voltage = Some(voltage);

        let reading = BatteryReading {
            voltage,
            percentage: self.config.percentage_for(voltage),
            drop: initial - voltage,
        };

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Battery: {}V ({}%, drop {}V)",
            reading.voltage,
            reading.percentage,
            reading.drop
        );

        reading
    }
}

#[cfg(not(feature = "async"))]
impl<A> BatteryMonitor<A>
where
    A: AdcChannel,
{
    /// Read the battery voltage without recording it (V)
    ///
    /// # Errors
    /// Returns `Adc` if the conversion fails
    pub fn read_voltage(&mut self) -> Result<f32, Error<A::Error>> {
        let raw = self.adc.read_raw()?;
        Ok(self.config.voltage_from_raw(raw))
    }

    /// Average `samples` conversions, waiting `settle_us` between them (V)
    ///
    /// # Errors
    /// Returns `InvalidConfig` for zero samples, or `Adc` if any conversion
    /// fails
    pub fn read_voltage_averaged<D>(
        &mut self,
        delay: &mut D,
        samples: u8,
        settle_us: u32,
    ) -> Result<f32, Error<A::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        if samples == 0 {
            return Err(Error::InvalidConfig);
        }

        let mut sum = 0.0_f32;
        for i in 0..samples {
            if i > 0 {
                delay.delay_us(settle_us);
            }
            sum += self.read_voltage()?;
        }
        Ok(sum / f32::from(samples))
    }

    /// Read and record the battery voltage
    ///
    /// The first successful sample becomes the baseline for the reported
    /// drop.
    ///
    /// # Errors
    /// Returns `Adc` if the conversion fails
    pub fn sample(&mut self) -> Result<BatteryReading, Error<A::Error>> {
        let voltage = self.read_voltage()?;
        Ok(self.record(voltage))
    }

    /// Sample only if the check interval has passed since the last sample
    ///
    /// The first call always samples.
    ///
    /// # Errors
    /// Returns `Adc` if the conversion fails; the interval is not restarted
    pub fn sample_if_due(&mut self, now_ms: u64) -> Result<Option<BatteryReading>, Error<A::Error>> {
        if !self.is_due(now_ms) {
            return Ok(None);
        }
        let reading = self.sample()?;
        self.last_check_ms = Some(now_ms);
        Ok(Some(reading))
    }
}

#[cfg(feature = "async")]
impl<A> BatteryMonitor<A>
where
    A: AsyncAdcChannel,
{
    /// Read the battery voltage without recording it (V)
    ///
    /// # Errors
    /// Returns `Adc` if the conversion fails
    pub async fn read_voltage(&mut self) -> Result<f32, Error<A::Error>> {
        let raw = self.adc.read_raw().await?;
        Ok(self.config.voltage_from_raw(raw))
    }

    /// Average `samples` conversions, waiting `settle_us` between them (V)
    ///
    /// # Errors
    /// Returns `InvalidConfig` for zero samples, or `Adc` if any conversion
    /// fails
    pub async fn read_voltage_averaged<D>(
        &mut self,
        delay: &mut D,
        samples: u8,
        settle_us: u32,
    ) -> Result<f32, Error<A::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        if samples == 0 {
            return Err(Error::InvalidConfig);
        }

        let mut sum = 0.0_f32;
        for i in 0..samples {
            if i > 0 {
                delay.delay_us(settle_us).await;
            }
            sum += self.read_voltage().await?;
        }
        Ok(sum / f32::from(samples))
    }

    /// Read and record the battery voltage
    ///
    /// # Errors
    /// Returns `Adc` if the conversion fails
    pub async fn sample(&mut self) -> Result<BatteryReading, Error<A::Error>> {
        let voltage = self.read_voltage().await?;
        Ok(self.record(voltage))
    }

    /// Sample only if the check interval has passed since the last sample
    ///
    /// # Errors
    /// Returns `Adc` if the conversion fails; the interval is not restarted
    pub async fn sample_if_due(
        &mut self,
        now_ms: u64,
    ) -> Result<Option<BatteryReading>, Error<A::Error>> {
        if !self.is_due(now_ms) {
            return Ok(None);
        }
        let reading = self.sample().await?;
        self.last_check_ms = Some(now_ms);
        Ok(Some(reading))
    }
}
