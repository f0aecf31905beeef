//! Events consumed by the panel

use portal_display::RenderError;
use portal_protocol::Receipt;

/// Input to [`crate::Panel::handle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A byte arrived on the serial link
    ByteReceived(u8),
    /// The transport finished sending the last byte handed to it
    ByteSent,
    /// Periodic tick carrying the current time in milliseconds
    Tick(u32),
    /// Raw key levels sampled from the front panel
    Keys(u8),
}

impl Event {
    /// Check if this event comes from the serial link
    pub fn is_serial(&self) -> bool {
        matches!(self, Event::ByteReceived(_) | Event::ByteSent)
    }
}

/// What the firmware has to act on after an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Output {
    /// Next byte to hand to the transport
    pub tx: Option<u8>,
    /// A request finished
    pub receipt: Option<Receipt>,
    /// A frame was dropped without response
    pub dropped: bool,
    /// A line write was rejected by the renderer
    pub render_error: Option<RenderError>,
    /// The debounced key mask changed
    pub keys: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_events() {
        assert!(Event::ByteReceived(0x02).is_serial());
        assert!(Event::ByteSent.is_serial());
        assert!(!Event::Tick(8).is_serial());
        assert!(!Event::Keys(0x01).is_serial());
    }
}
