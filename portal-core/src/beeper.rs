//! Buzzer state machine
//!
//! The buzzer is either silent, sounding continuously, or running a
//! sequence of beep cycles. A cycle is an on phase followed by an off
//! phase; a zero on time gives silent cycles that only take time. Phase
//! changes happen on [`Beeper::tick`].

use portal_hal::PwmOutput;

use crate::clock;

/// Default tone frequency in Hz
pub const DEFAULT_FREQUENCY_HZ: u32 = 2000;

/// Default duty cycle in percent
pub const DEFAULT_DUTY_PERCENT: u8 = 50;

/// Beep cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    On,
    Off,
}

/// Buzzer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Silent
    Idle,
    /// Sounding until switched off
    Continuous,
    /// Running beep cycles
    Cycling {
        /// Cycles left, including the current one
        remaining: u8,
        /// Current phase
        phase: Phase,
        /// End of the current phase
        deadline: u32,
        /// On time per cycle in ms
        on_ms: u32,
        /// Off time per cycle in ms
        off_ms: u32,
    },
}

/// Buzzer driver on top of a PWM tone output
#[derive(Debug)]
pub struct Beeper<P: PwmOutput> {
    pwm: P,
    mode: Mode,
    frequency_hz: u32,
    duty_percent: u8,
}

impl<P: PwmOutput> Beeper<P> {
    /// Create a silent beeper and program the tone parameters
    pub fn new(mut pwm: P, frequency_hz: u32, duty_percent: u8) -> Self {
        pwm.disable();
        pwm.set_frequency(frequency_hz);
        pwm.set_duty_percent(duty_percent);
        Self {
            pwm,
            mode: Mode::Idle,
            frequency_hz,
            duty_percent,
        }
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Tone frequency in Hz
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Duty cycle in percent
    pub fn duty_percent(&self) -> u8 {
        self.duty_percent
    }

    /// True while the tone is being driven
    pub fn is_sounding(&self) -> bool {
        self.pwm.is_enabled()
    }

    /// Underlying output
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    /// Change the tone frequency; takes effect immediately
    pub fn set_frequency(&mut self, hz: u32) {
        self.frequency_hz = hz;
        self.pwm.set_frequency(hz);
    }

    /// Change the duty cycle; takes effect immediately
    pub fn set_duty(&mut self, percent: u8) {
        self.duty_percent = percent;
        self.pwm.set_duty_percent(percent);
    }

    /// Sound until [`Beeper::off`], cancelling any beep sequence
    pub fn on(&mut self) {
        self.mode = Mode::Continuous;
        self.pwm.enable();
    }

    /// Silence and cancel any beep sequence
    pub fn off(&mut self) {
        self.mode = Mode::Idle;
        self.pwm.disable();
    }

    /// Start `cycles` beep cycles at `now`
    ///
    /// Zero cycles leaves the current mode untouched.
    pub fn beep(&mut self, cycles: u8, on_ms: u32, off_ms: u32, now: u32) {
        if cycles == 0 {
            return;
        }
        let (phase, length) = if on_ms > 0 {
            self.pwm.enable();
            (Phase::On, on_ms)
        } else {
            self.pwm.disable();
            (Phase::Off, off_ms)
        };
        self.mode = Mode::Cycling {
            remaining: cycles,
            phase,
            deadline: clock::after(now, length),
            on_ms,
            off_ms,
        };
    }

    /// Advance the beep sequence to `now`
    pub fn tick(&mut self, now: u32) {
        while let Mode::Cycling {
            remaining,
            phase,
            deadline,
            on_ms,
            off_ms,
        } = self.mode
        {
            if !clock::reached(now, deadline) {
                return;
            }

            let (remaining, next) = match phase {
                Phase::On if off_ms > 0 => (remaining, Phase::Off),
                _ => (remaining - 1, Phase::On),
            };
            if remaining == 0 {
                self.off();
                return;
            }

            let (phase, length) = match next {
                Phase::On if on_ms > 0 => (Phase::On, on_ms),
                _ => (Phase::Off, off_ms),
            };
            match phase {
                Phase::On => self.pwm.enable(),
                Phase::Off => self.pwm.disable(),
            }
            if length == 0 {
                // Neither phase takes time
                self.off();
                return;
            }
            self.mode = Mode::Cycling {
                remaining,
                phase,
                deadline: clock::after(deadline, length),
                on_ms,
                off_ms,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Tone {
        frequency: u32,
        duty: u8,
        enabled: bool,
        enables: usize,
    }

    impl PwmOutput for Tone {
        fn set_frequency(&mut self, hz: u32) {
            self.frequency = hz;
        }

        fn set_duty_percent(&mut self, percent: u8) {
            self.duty = percent;
        }

        fn enable(&mut self) {
            if !self.enabled {
                self.enables += 1;
            }
            self.enabled = true;
        }

        fn disable(&mut self) {
            self.enabled = false;
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }
    }

    fn beeper() -> Beeper<Tone> {
        Beeper::new(Tone::default(), DEFAULT_FREQUENCY_HZ, DEFAULT_DUTY_PERCENT)
    }

    #[test]
    fn test_new_programs_tone() {
        let beeper = beeper();
        assert_eq!(beeper.pwm().frequency, DEFAULT_FREQUENCY_HZ);
        assert_eq!(beeper.pwm().duty, DEFAULT_DUTY_PERCENT);
        assert!(!beeper.is_sounding());
    }

    #[test]
    fn test_on_off() {
        let mut beeper = beeper();
        beeper.on();
        assert!(beeper.is_sounding());
        beeper.tick(1_000_000);
        assert!(beeper.is_sounding());
        beeper.off();
        assert!(!beeper.is_sounding());
        assert_eq!(beeper.mode(), Mode::Idle);
    }

    #[test]
    fn test_cycles() {
        let mut beeper = beeper();
        beeper.beep(2, 128, 256, 0);
        assert!(beeper.is_sounding());

        beeper.tick(127);
        assert!(beeper.is_sounding());
        beeper.tick(128);
        assert!(!beeper.is_sounding());
        beeper.tick(384);
        assert!(beeper.is_sounding());
        beeper.tick(512);
        assert!(!beeper.is_sounding());
        assert!(matches!(beeper.mode(), Mode::Cycling { remaining: 1, .. }));
        beeper.tick(768);
        assert_eq!(beeper.mode(), Mode::Idle);
        assert_eq!(beeper.pwm().enables, 2);
    }

    #[test]
    fn test_late_tick_catches_up() {
        let mut beeper = beeper();
        beeper.beep(3, 128, 128, 0);
        beeper.tick(10_000);
        assert_eq!(beeper.mode(), Mode::Idle);
        assert!(!beeper.is_sounding());
    }

    #[test]
    fn test_zero_on_time_is_silent() {
        let mut beeper = beeper();
        beeper.beep(2, 0, 128, 0);
        assert!(!beeper.is_sounding());
        beeper.tick(128);
        assert!(!beeper.is_sounding());
        assert!(matches!(beeper.mode(), Mode::Cycling { remaining: 1, .. }));
        beeper.tick(256);
        assert_eq!(beeper.mode(), Mode::Idle);
        assert_eq!(beeper.pwm().enables, 0);
    }

    #[test]
    fn test_off_cancels_cycles() {
        let mut beeper = beeper();
        beeper.beep(5, 128, 128, 0);
        beeper.off();
        beeper.tick(128);
        assert!(!beeper.is_sounding());
        assert_eq!(beeper.mode(), Mode::Idle);
    }

    #[test]
    fn test_zero_cycles_ignored() {
        let mut beeper = beeper();
        beeper.on();
        beeper.beep(0, 128, 128, 0);
        assert_eq!(beeper.mode(), Mode::Continuous);
    }

    #[test]
    fn test_parameters_apply_immediately() {
        let mut beeper = beeper();
        beeper.set_frequency(4_000);
        beeper.set_duty(25);
        assert_eq!(beeper.pwm().frequency, 4_000);
        assert_eq!(beeper.pwm().duty, 25);
        assert_eq!(beeper.frequency_hz(), 4_000);
    }
}
