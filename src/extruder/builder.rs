//! Builder pattern for ExtruderAxis.

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::config::{validate_extruder, ExtruderConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::machine::{HaltSignal, StepTicker};
use crate::motion::BlockHandle;
use crate::motor::StepperMotor;
use crate::sensor::{AngleInput, AngleSensor};
use crate::ultrasonic::{NoUltrasonic, UltrasonicGenerator};

use super::ExtruderAxis;

/// Builder for creating ExtruderAxis instances.
pub struct ExtruderAxisBuilder<M, T, H, B, S, D, U = NoUltrasonic>
where
    M: StepperMotor,
    T: StepTicker,
    H: HaltSignal,
    B: BlockHandle,
    S: AngleInput,
    D: DelayNs,
    U: UltrasonicGenerator,
{
    stepper: Option<M>,
    ticker: Option<T>,
    halt: Option<H>,
    sensor: Option<S>,
    delay: Option<D>,
    ultrasonic: Option<U>,
    name: Option<String<32>>,
    config: Option<ExtruderConfig>,
    _block: PhantomData<B>,
}

impl<M, T, H, B, S, D, U> Default for ExtruderAxisBuilder<M, T, H, B, S, D, U>
where
    M: StepperMotor,
    T: StepTicker,
    H: HaltSignal,
    B: BlockHandle,
    S: AngleInput,
    D: DelayNs,
    U: UltrasonicGenerator,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M, T, H, B, S, D, U> ExtruderAxisBuilder<M, T, H, B, S, D, U>
where
    M: StepperMotor,
    T: StepTicker,
    H: HaltSignal,
    B: BlockHandle,
    S: AngleInput,
    D: DelayNs,
    U: UltrasonicGenerator,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            stepper: None,
            ticker: None,
            halt: None,
            sensor: None,
            delay: None,
            ultrasonic: None,
            name: None,
            config: None,
            _block: PhantomData,
        }
    }

    /// Set the feed stepper.
    pub fn stepper(mut self, stepper: M) -> Self {
        self.stepper = Some(stepper);
        self
    }

    /// Set the step ticker.
    pub fn ticker(mut self, ticker: T) -> Self {
        self.ticker = Some(ticker);
        self
    }

    /// Set the halt signal.
    pub fn halt(mut self, halt: H) -> Self {
        self.halt = Some(halt);
        self
    }

    /// Set the analog input of the angle sensor.
    pub fn sensor(mut self, sensor: S) -> Self {
        self.sensor = Some(sensor);
        self
    }

    /// Set the delay used while homing.
    pub fn delay(mut self, delay: D) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the ultrasonic generator. Required when the configuration names an enable pin.
    pub fn ultrasonic(mut self, generator: U) -> Self {
        self.ultrasonic = Some(generator);
        self
    }

    /// Set the instance name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = String::try_from(name).ok();
        self
    }

    /// Configure from an ExtruderConfig.
    pub fn from_extruder_config(mut self, config: &ExtruderConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    /// Configure from SystemConfig by extruder name.
    pub fn from_config(self, config: &SystemConfig, extruder_name: &str) -> Result<Self> {
        let extruder = config.extruder(extruder_name).ok_or_else(|| {
            Error::Config(ConfigError::ExtruderNotFound(
                String::try_from(extruder_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.name(extruder_name).from_extruder_config(&extruder))
    }

    /// Build the ExtruderAxis.
    ///
    /// # Errors
    ///
    /// Returns an error if a collaborator or the configuration is missing, or if the
    /// configuration fails validation.
    pub fn build(self) -> Result<ExtruderAxis<M, T, H, B, S, D, U>> {
        let config = self
            .config
            .ok_or(Error::Config(ConfigError::MissingComponent("configuration")))?;
        validate_extruder(&config)?;

        let stepper = self
            .stepper
            .ok_or(Error::Config(ConfigError::MissingComponent("stepper")))?;
        let ticker = self
            .ticker
            .ok_or(Error::Config(ConfigError::MissingComponent("ticker")))?;
        let halt = self
            .halt
            .ok_or(Error::Config(ConfigError::MissingComponent("halt")))?;
        let sensor = self
            .sensor
            .ok_or(Error::Config(ConfigError::MissingComponent("sensor")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingComponent("delay")))?;
        if config.ultrasonic_enable_pin.is_some() && self.ultrasonic.is_none() {
            return Err(Error::Config(ConfigError::MissingComponent("ultrasonic")));
        }

        let name = self
            .name
            .unwrap_or_else(|| String::try_from("extruder").unwrap_or_default());

        let sensor = AngleSensor::new(sensor, config.angle_sensor_pin.as_str());

        log::debug!(
            "building extruder '{}' (id {}, {} steps/mm, {} steps/deg)",
            name,
            config.identifier,
            config.steps_per_mm,
            config.steps_per_angle
        );

        Ok(ExtruderAxis::from_parts(
            name,
            &config,
            stepper,
            ticker,
            halt,
            sensor,
            delay,
            self.ultrasonic,
        ))
    }
}
