//! GPIO pin abstractions
//!
//! The GPU raises a readiness line once its receiver is running; the CPU
//! samples it before streaming commands.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Drive the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

/// Adapter from `embedded-hal` 1.0 digital pins
///
/// Pin errors read as low and are otherwise ignored: a readiness line that
/// cannot be read is treated as "not ready".
#[derive(Debug)]
pub struct HalPin<P>(pub P);

impl<P> HalPin<P> {
    /// Wrap an `embedded-hal` pin
    pub const fn new(pin: P) -> Self {
        Self(pin)
    }

    /// Unwrap the inner pin
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: embedded_hal::digital::OutputPin> OutputPin for HalPin<P> {
    fn set_high(&mut self) {
        let _ = embedded_hal::digital::OutputPin::set_high(&mut self.0);
    }

    fn set_low(&mut self) {
        let _ = embedded_hal::digital::OutputPin::set_low(&mut self.0);
    }
}

impl<P: embedded_hal::digital::InputPin> InputPin for HalPin<P> {
    fn is_high(&mut self) -> bool {
        embedded_hal::digital::InputPin::is_high(&mut self.0).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct MockLine {
        high: bool,
        fail: bool,
    }

    #[derive(Debug)]
    struct LineFault;

    impl embedded_hal::digital::Error for LineFault {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl ErrorType for MockLine {
        type Error = LineFault;
    }

    impl embedded_hal::digital::InputPin for MockLine {
        fn is_high(&mut self) -> Result<bool, LineFault> {
            if self.fail {
                Err(LineFault)
            } else {
                Ok(self.high)
            }
        }

        fn is_low(&mut self) -> Result<bool, LineFault> {
            embedded_hal::digital::InputPin::is_high(self).map(|high| !high)
        }
    }

    struct MockOutput {
        high: bool,
    }

    impl ErrorType for MockOutput {
        type Error = Infallible;
    }

    impl embedded_hal::digital::OutputPin for MockOutput {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn test_input_adapter() {
        let mut pin = HalPin::new(MockLine {
            high: true,
            fail: false,
        });
        assert!(pin.is_high());
        assert!(!pin.is_low());
    }

    #[test]
    fn test_input_error_reads_low() {
        let mut pin = HalPin::new(MockLine {
            high: true,
            fail: true,
        });
        assert!(!pin.is_high());
    }

    #[test]
    fn test_output_set_state() {
        let mut pin = HalPin::new(MockOutput { high: false });
        pin.set_state(true);
        assert!(pin.0.high);
        pin.set_state(false);
        assert!(!pin.into_inner().high);
    }
}
