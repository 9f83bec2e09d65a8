//! Ultrasonic generator attached to a tool head.
//!
//! `M50`/`M51` switch the generator on and off; `M52`, `M53` and `M54` report its
//! ready, status and fault lines.

use embedded_hal::digital::{InputPin, OutputPin};

/// Control and status lines of an ultrasonic generator.
pub trait UltrasonicGenerator {
    /// Drive the enable line.
    fn set_enabled(&mut self, enabled: bool);

    /// Level of the ready line.
    fn is_ready(&mut self) -> bool;

    /// Level of the status line.
    fn is_active(&mut self) -> bool;

    /// Level of the fault line.
    fn has_fault(&mut self) -> bool;
}

/// Placeholder for tools without a generator. Every line reads low.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoUltrasonic;

impl UltrasonicGenerator for NoUltrasonic {
    fn set_enabled(&mut self, _enabled: bool) {}

    fn is_ready(&mut self) -> bool {
        false
    }

    fn is_active(&mut self) -> bool {
        false
    }

    fn has_fault(&mut self) -> bool {
        false
    }
}

/// Generator wired to one output and three input pins.
///
/// Pin errors are logged; a line that cannot be read reports low.
#[derive(Debug)]
pub struct UltrasonicPins<EN, IN>
where
    EN: OutputPin,
    IN: InputPin,
{
    enable: EN,
    ready: IN,
    status: IN,
    fault: IN,
}

impl<EN, IN> UltrasonicPins<EN, IN>
where
    EN: OutputPin,
    IN: InputPin,
{
    /// Bind the enable output and the ready, status and fault inputs.
    pub fn new(enable: EN, ready: IN, status: IN, fault: IN) -> Self {
        Self {
            enable,
            ready,
            status,
            fault,
        }
    }

    /// Release the pins.
    pub fn release(self) -> (EN, IN, IN, IN) {
        (self.enable, self.ready, self.status, self.fault)
    }

    fn read(pin: &mut IN, line: &str) -> bool {
        match pin.is_high() {
            Ok(level) => level,
            Err(e) => {
                log::warn!("ultrasonic {} line unreadable: {:?}", line, e);
                false
            }
        }
    }
}

impl<EN, IN> UltrasonicGenerator for UltrasonicPins<EN, IN>
where
    EN: OutputPin,
    IN: InputPin,
{
    fn set_enabled(&mut self, enabled: bool) {
        let result = if enabled {
            self.enable.set_high()
        } else {
            self.enable.set_low()
        };
        if let Err(e) = result {
            log::warn!("ultrasonic enable line failed: {:?}", e);
        }
    }

    fn is_ready(&mut self) -> bool {
        Self::read(&mut self.ready, "ready")
    }

    fn is_active(&mut self) -> bool {
        Self::read(&mut self.status, "status")
    }

    fn has_fault(&mut self) -> bool {
        Self::read(&mut self.fault, "fault")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_no_ultrasonic_reads_low() {
        let mut generator = NoUltrasonic;
        generator.set_enabled(true);
        assert!(!generator.is_ready());
        assert!(!generator.is_active());
        assert!(!generator.has_fault());
    }

    #[test]
    fn test_pins_drive_and_read_lines() {
        let enable = PinMock::new(&[
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ]);
        let ready = PinMock::new(&[Transaction::get(State::High)]);
        let status = PinMock::new(&[Transaction::get(State::Low)]);
        let fault = PinMock::new(&[Transaction::get(State::High)]);

        let mut generator = UltrasonicPins::new(enable, ready, status, fault);
        generator.set_enabled(true);
        assert!(generator.is_ready());
        assert!(!generator.is_active());
        assert!(generator.has_fault());
        generator.set_enabled(false);

        let (mut enable, mut ready, mut status, mut fault) = generator.release();
        enable.done();
        ready.done();
        status.done();
        fault.done();
    }
}
