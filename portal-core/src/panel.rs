//! Display board event loop
//!
//! [`Panel`] owns the protocol broker, the device state and the drain
//! cursor. The firmware feeds it [`Event`]s from a single task and acts on
//! the returned [`Output`]; nothing in here blocks or needs interrupts.

use portal_display::{Controller, Drain, DrainStatus, LineLayout, RenderError};
use portal_hal::{OutputPin, PwmOutput};
use portal_protocol::{Broker, CommandHandler, Version};

use crate::beeper::Beeper;
use crate::clock;
use crate::config::PanelConfig;
use crate::device::Device;
use crate::event::{Event, Output};
use crate::keys::Debouncer;

/// Single owner of all display board state
#[derive(Debug)]
pub struct Panel<P: PwmOutput, B: OutputPin, L: OutputPin> {
    broker: Broker,
    device: Device<P, B, L>,
    drain: Drain,
    debouncer: Debouncer,
    blink_ms: u32,
    next_blink: u32,
    now: u32,
}

impl<P: PwmOutput, B: OutputPin, L: OutputPin> Panel<P, B, L> {
    /// Build the panel from its configuration
    ///
    /// An invalid layout falls back to the default one; the boot QR code
    /// is drawn if configured.
    pub fn new(config: &PanelConfig, pwm: P, backlight: B, led: L) -> Self {
        let layout = config.layout().unwrap_or_default();
        let beeper = Beeper::new(pwm, config.buzzer.frequency_hz, config.buzzer.duty_percent);
        let mut device = Device::new(
            layout,
            config.display.language,
            beeper,
            backlight,
            led,
            config.firmware.version(),
        );
        device.set_backlight(config.display.backlight);

        if let Some(version) = config.display.boot_qr {
            // Out-of-range offsets leave the screen blank
            let _ = device
                .screen_mut()
                .put_qr(version, config.display.qr_offset as usize, 0);
        }

        Self {
            broker: Broker::new(),
            device,
            drain: Drain::new(),
            debouncer: Debouncer::new(config.keys.debounce_ms),
            blink_ms: config.display.blink_ms.max(1),
            next_blink: config.display.blink_ms,
            now: 0,
        }
    }

    /// Process one event
    pub fn handle(&mut self, event: Event) -> Output {
        match event {
            Event::ByteReceived(byte) => {
                let received = self.broker.receive(byte, &mut self.device);
                Output {
                    tx: received.tx,
                    receipt: received.receipt,
                    dropped: received.dropped,
                    render_error: self.device.take_render_error(),
                    keys: None,
                }
            }
            Event::ByteSent => Output {
                tx: self.broker.byte_sent(),
                ..Output::default()
            },
            Event::Tick(now) => {
                self.now = now;
                self.device.tick(now);
                if clock::reached(now, self.next_blink) {
                    self.next_blink = clock::after(now, self.blink_ms);
                    self.device.screen_mut().blink_tick();
                }
                let keys = self.update_keys(None);
                Output {
                    keys,
                    ..Output::default()
                }
            }
            Event::Keys(raw) => Output {
                keys: self.update_keys(Some(raw)),
                ..Output::default()
            },
        }
    }

    /// Send at most one framebuffer column to the controller
    pub fn step<C: Controller>(&mut self, ctrl: &mut C) -> Result<DrainStatus, C::Error> {
        self.drain.step(self.device.screen().framebuffer(), ctrl)
    }

    /// Send one complete dirty page; `false` if nothing was dirty
    pub fn flush<C: Controller>(&mut self, ctrl: &mut C) -> Result<bool, C::Error> {
        self.drain.flush_page(self.device.screen().framebuffer(), ctrl)
    }

    /// True if the controller is behind the framebuffer
    pub fn is_dirty(&self) -> bool {
        self.drain.is_dirty(self.device.screen().framebuffer())
    }

    /// Draw a QR code, replacing the current content
    pub fn show_qr(&mut self, version: u8, offset: usize) -> Result<(), RenderError> {
        self.device.screen_mut().put_qr(version, offset, 0)
    }

    /// Device state
    pub fn device(&self) -> &Device<P, B, L> {
        &self.device
    }

    /// Protocol broker
    pub fn broker(&self) -> &Broker {
        &self.broker
    }

    /// Line layout in use
    pub fn layout(&self) -> &LineLayout {
        self.device.screen().layout()
    }

    /// Version reported to the host
    pub fn version(&self) -> Version {
        Version::from_word(self.device.version())
    }

    /// Time of the last tick
    pub fn now(&self) -> u32 {
        self.now
    }

    fn update_keys(&mut self, raw: Option<u8>) -> Option<u8> {
        let changed = match raw {
            Some(raw) => self.debouncer.sample(raw, self.now),
            None => self.debouncer.update(self.now),
        };
        if let Some(keys) = changed {
            self.device.set_keys(keys);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::tests::Tone;
    use crate::keys;
    use portal_display::{COLUMNS, PAGES};
    use portal_hal::gpio::LatchedPin;
    use portal_protocol::frame::{decode, encode_to_vec};
    use portal_protocol::{Status, LINE_CONTENT_LEN};

    type TestPanel = Panel<Tone, LatchedPin, LatchedPin>;

    /// Controller that counts what it is sent
    #[derive(Default)]
    struct Counter {
        commands: usize,
        data: usize,
    }

    impl Controller for Counter {
        type Error = ();

        fn write_command(&mut self, _command: u8) -> Result<(), ()> {
            self.commands += 1;
            Ok(())
        }

        fn write_data(&mut self, _data: u8) -> Result<(), ()> {
            self.data += 1;
            Ok(())
        }
    }

    fn panel() -> TestPanel {
        Panel::new(
            &PanelConfig::default(),
            Tone::default(),
            LatchedPin::new(),
            LatchedPin::new(),
        )
    }

    /// Feed a request and collect the complete response
    fn exchange(panel: &mut TestPanel, pn: u8, id: u8, payload: &[u8]) -> heapless::Vec<u8, 64> {
        let request = encode_to_vec(pn, id, payload).unwrap();
        let mut out = heapless::Vec::new();
        for &byte in request.iter() {
            let output = panel.handle(Event::ByteReceived(byte));
            if let Some(first) = output.tx {
                out.push(first).unwrap();
                while let Some(next) = panel.handle(Event::ByteSent).tx {
                    out.push(next).unwrap();
                }
            }
        }
        out
    }

    fn flush_all(panel: &mut TestPanel) -> usize {
        let mut ctrl = Counter::default();
        let mut pages = 0;
        while panel.flush(&mut ctrl).unwrap() {
            pages += 1;
        }
        // Page select and display enable around every page
        assert_eq!(ctrl.data, pages * COLUMNS);
        assert_eq!(ctrl.commands, pages * (2 * COLUMNS + 2));
        pages
    }

    #[test]
    fn test_get_version_round_trip() {
        let mut panel = panel();
        let out = exchange(&mut panel, 0x11, 6, &[]);
        let frame = decode(&out).unwrap();
        assert_eq!(frame.packet_number, 0x11);
        assert_eq!(frame.command, 6 | Status::NoError.bits());
        assert_eq!(frame.payload.as_slice(), &[0x00, 0x8A]);
    }

    #[test]
    fn test_write_line_marks_pages_dirty() {
        let mut panel = panel();
        assert_eq!(flush_all(&mut panel), PAGES);
        assert!(!panel.is_dirty());

        let mut payload = [b' '; LINE_CONTENT_LEN + 1];
        payload[0] = 1;
        payload[3] = b'A';
        let out = exchange(&mut panel, 1, 2, &payload);
        assert_eq!(decode(&out).unwrap().command, 2 | Status::NoError.bits());

        // Line 1 covers rows 12..24, pages 1 and 2
        assert!(panel.is_dirty());
        assert_eq!(flush_all(&mut panel), 2);

        // Same content again changes nothing
        exchange(&mut panel, 2, 2, &payload);
        assert!(!panel.is_dirty());
    }

    #[test]
    fn test_invalid_line_reported() {
        let mut panel = panel();
        let mut payload = [b' '; LINE_CONTENT_LEN + 1];
        payload[0] = 9;
        let request = encode_to_vec(3, 2, &payload).unwrap();
        let mut error = None;
        for &byte in request.iter() {
            let output = panel.handle(Event::ByteReceived(byte));
            error = error.or(output.render_error);
        }
        assert_eq!(error, Some(RenderError::InvalidLine));
    }

    #[test]
    fn test_keys_reach_read_keys() {
        let mut panel = panel();
        panel.handle(Event::Tick(100));
        let output = panel.handle(Event::Keys(keys::OPEN | keys::LOOPBACK));
        assert_eq!(output.keys, Some(keys::OPEN | keys::LOOPBACK));

        let out = exchange(&mut panel, 4, 1, &[1]);
        let frame = decode(&out).unwrap();
        assert_eq!(frame.payload.as_slice(), &[keys::OPEN | keys::LOOPBACK]);
        assert!(panel.device().led().is_set_high());

        // Release only after the debounce delay
        panel.handle(Event::Keys(keys::LOOPBACK));
        assert_eq!(panel.handle(Event::Tick(108)).keys, None);
        assert_eq!(panel.handle(Event::Tick(116)).keys, Some(keys::LOOPBACK));
    }

    #[test]
    fn test_blink_follows_ticks() {
        let mut panel = panel();
        let mut payload = [b' '; LINE_CONTENT_LEN + 1];
        payload[0] = 0;
        payload[3] = 0x89;
        exchange(&mut panel, 5, 2, &payload);
        assert!(panel.device().screen().blinker().is_active());
        flush_all(&mut panel);

        panel.handle(Event::Tick(992));
        assert!(!panel.is_dirty());
        panel.handle(Event::Tick(1000));
        assert!(panel.device().screen().blinker().hidden());
        assert!(panel.is_dirty());

        panel.handle(Event::Tick(1992));
        assert!(panel.device().screen().blinker().hidden());
        panel.handle(Event::Tick(2000));
        assert!(!panel.device().screen().blinker().hidden());
    }

    #[test]
    fn test_boot_qr_until_first_line() {
        let mut config = PanelConfig::default();
        config.display.boot_qr = Some(4);
        config.display.qr_offset = 41;
        let mut panel = Panel::new(&config, Tone::default(), LatchedPin::new(), LatchedPin::new());
        assert!(panel.device().screen().qr_shown());
        assert!(panel.device().backlight().is_set_high());

        let mut payload = [b' '; LINE_CONTENT_LEN + 1];
        payload[3] = b'X';
        exchange(&mut panel, 6, 2, &payload);
        assert!(!panel.device().screen().qr_shown());
    }

    #[test]
    fn test_show_qr_and_accessors() {
        let mut panel = panel();
        assert_eq!(panel.version().word(), 0x008A);
        assert_eq!(panel.layout(), &LineLayout::default());
        flush_all(&mut panel);

        panel.handle(Event::Tick(40));
        assert_eq!(panel.now(), 40);

        assert_eq!(panel.show_qr(5, 100), Err(RenderError::InvalidOffset));
        assert!(!panel.is_dirty());
        assert_eq!(panel.show_qr(5, 0), Ok(()));
        assert!(panel.device().screen().qr_shown());
        assert_eq!(flush_all(&mut panel), PAGES);

        // Response streaming shows up on the broker
        let request = encode_to_vec(8, 6, &[]).unwrap();
        let mut first = None;
        for &byte in request.iter() {
            first = first.or(panel.handle(Event::ByteReceived(byte)).tx);
        }
        assert!(first.is_some());
        assert!(panel.broker().is_transmitting());
    }

    #[test]
    fn test_buzzer_beep_over_ticks() {
        let mut panel = panel();
        panel.handle(Event::Tick(0));
        // One cycle: 128 ms on, 128 ms off
        exchange(&mut panel, 7, 8, &[0x81, 1, 1]);
        assert!(panel.device().beeper().is_sounding());
        panel.handle(Event::Tick(128));
        assert!(!panel.device().beeper().is_sounding());
    }
}
