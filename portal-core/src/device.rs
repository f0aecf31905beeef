//! Command handler
//!
//! Maps decoded requests onto the screen, the buzzer and the board
//! outputs.

use portal_display::{LineLayout, RenderError, Screen};
use portal_hal::{OutputPin, PwmOutput};
use portal_protocol::command::{BEEP_STEP_MS, FREQUENCY_STEP_HZ, LINE_CONTENT_LEN};
use portal_protocol::{BuzzerCtrl, BuzzerParam, CommandHandler, Language, Version};

use crate::beeper::Beeper;

/// Everything the host can drive
#[derive(Debug)]
pub struct Device<P: PwmOutput, B: OutputPin, L: OutputPin> {
    screen: Screen,
    beeper: Beeper<P>,
    backlight: B,
    led: L,
    keys: u8,
    version: Version,
    now: u32,
    render_error: Option<RenderError>,
}

impl<P: PwmOutput, B: OutputPin, L: OutputPin> Device<P, B, L> {
    /// Assemble the device; the backlight and LED start off
    pub fn new(
        layout: LineLayout,
        language: Language,
        beeper: Beeper<P>,
        mut backlight: B,
        mut led: L,
        version: Version,
    ) -> Self {
        backlight.set_low();
        led.set_low();
        Self {
            screen: Screen::new(layout, language),
            beeper,
            backlight,
            led,
            keys: 0,
            version,
            now: 0,
            render_error: None,
        }
    }

    /// Rendered screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Rendered screen, for direct drawing
    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Buzzer state machine
    pub fn beeper(&self) -> &Beeper<P> {
        &self.beeper
    }

    /// Backlight output
    pub fn backlight(&self) -> &B {
        &self.backlight
    }

    /// External LED output
    pub fn led(&self) -> &L {
        &self.led
    }

    /// Key mask reported to the host
    pub fn keys(&self) -> u8 {
        self.keys
    }

    /// Update the key mask reported to the host
    pub fn set_keys(&mut self, keys: u8) {
        self.keys = keys;
    }

    /// Advance time-driven state to `now`
    pub fn tick(&mut self, now: u32) {
        self.now = now;
        self.beeper.tick(now);
    }

    /// Take the error of the last rejected line write
    pub fn take_render_error(&mut self) -> Option<RenderError> {
        self.render_error.take()
    }
}

impl<P: PwmOutput, B: OutputPin, L: OutputPin> CommandHandler for Device<P, B, L> {
    fn read_keys(&mut self, led: bool) -> u8 {
        self.led.set_state(led);
        self.keys
    }

    fn write_line(&mut self, line: u8, content: &[u8; LINE_CONTENT_LEN]) {
        if let Err(e) = self.screen.put_line(content, line as usize) {
            self.render_error = Some(e);
        }
    }

    fn set_backlight(&mut self, on: bool) {
        self.backlight.set_state(on);
    }

    fn clear(&mut self) {
        self.screen.clear();
    }

    fn set_language(&mut self, language: Language) {
        self.screen.set_language(language);
    }

    fn version(&self) -> u16 {
        self.version.word()
    }

    fn buzzer_param(&mut self, param: BuzzerParam) {
        match param {
            BuzzerParam::Frequency(code) => self.beeper.set_frequency(code as u32 * FREQUENCY_STEP_HZ),
            BuzzerParam::Duty(percent) => self.beeper.set_duty(percent),
        }
    }

    fn buzzer_ctrl(&mut self, ctrl: BuzzerCtrl) {
        match ctrl {
            BuzzerCtrl::Off => self.beeper.off(),
            BuzzerCtrl::On => self.beeper.on(),
            BuzzerCtrl::Beep { cycles, on, off } => self.beeper.beep(
                cycles,
                on as u32 * BEEP_STEP_MS,
                off as u32 * BEEP_STEP_MS,
                self.now,
            ),
        }
    }
}
