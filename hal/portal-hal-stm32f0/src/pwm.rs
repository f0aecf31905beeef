//! Buzzer tone on a timer PWM channel

use embassy_stm32::time::Hertz;
use embassy_stm32::timer::simple_pwm::SimplePwm;
use embassy_stm32::timer::{Channel, GeneralInstance4Channel};
use portal_hal::PwmOutput;

/// One channel of a [`SimplePwm`] timer driving the piezo
pub struct PwmTone<'d, T: GeneralInstance4Channel> {
    pwm: SimplePwm<'d, T>,
    channel: Channel,
    frequency: u32,
    duty: u8,
    enabled: bool,
}

impl<'d, T: GeneralInstance4Channel> PwmTone<'d, T> {
    /// Wrap a configured timer; the output starts disabled
    pub fn new(pwm: SimplePwm<'d, T>, channel: Channel) -> Self {
        let mut tone = Self {
            pwm,
            channel,
            frequency: 0,
            duty: 50,
            enabled: false,
        };
        tone.pwm.channel(channel).disable();
        tone
    }

    fn apply(&mut self) {
        let mut ch = self.pwm.channel(self.channel);
        if self.enabled && self.frequency > 0 {
            ch.set_duty_cycle_percent(self.duty);
            ch.enable();
        } else {
            ch.disable();
        }
    }
}

impl<T: GeneralInstance4Channel> PwmOutput for PwmTone<'_, T> {
    fn set_frequency(&mut self, hz: u32) {
        self.frequency = hz;
        if hz > 0 {
            self.pwm.set_frequency(Hertz(hz));
        }
        self.apply();
    }

    fn set_duty_percent(&mut self, percent: u8) {
        self.duty = percent.min(100);
        self.apply();
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.apply();
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.apply();
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
