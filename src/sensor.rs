//! Analog angle sensor on the feed shaft.

use heapless::String;

use crate::config::truncated;

/// Raw reading source of an analog input channel.
pub trait AngleInput {
    /// Latest raw converter reading. Larger means closer to the sensor's peak.
    fn read_raw(&mut self) -> i32;
}

impl<F: FnMut() -> i32> AngleInput for F {
    fn read_raw(&mut self) -> i32 {
        self()
    }
}

/// Angle sensor bound to a named input channel.
#[derive(Debug)]
pub struct AngleSensor<S: AngleInput> {
    input: S,
    pin: String<32>,
}

impl<S: AngleInput> AngleSensor<S> {
    /// Bind `input` to the channel named `pin`. Names past 32 bytes are truncated.
    pub fn new(input: S, pin: &str) -> Self {
        let pin: String<32> = truncated(pin);
        log::debug!("angle sensor on pin {}", pin);
        Self { input, pin }
    }

    /// Latest raw reading.
    #[inline]
    pub fn raw_value(&mut self) -> i32 {
        self.input.read_raw()
    }

    /// Name of the input channel.
    pub fn pin(&self) -> &str {
        self.pin.as_str()
    }

    /// Release the underlying input.
    pub fn into_inner(self) -> S {
        self.input
    }
}
