//! PWM tone output
//!
//! The buzzer is a piezo driven by a single timer channel.

/// PWM channel used as a tone generator
pub trait PwmOutput {
    /// Set the output frequency in Hz
    ///
    /// A frequency of 0 keeps the output silent until a non-zero
    /// frequency is configured.
    fn set_frequency(&mut self, hz: u32);

    /// Set the duty cycle in percent (0-100)
    fn set_duty_percent(&mut self, percent: u8);

    /// Start driving the output
    fn enable(&mut self);

    /// Stop driving the output
    fn disable(&mut self);

    /// Check if the output is currently driven
    fn is_enabled(&self) -> bool;
}
