//! Display controller interface
//!
//! The renderer only ever emits single command or data bytes. The command
//! set of the UC1601s is collected in [`uc1601`].

/// Byte-oriented LCD controller
pub trait Controller {
    /// Error type for bus operations
    type Error;

    /// Send a command byte
    fn write_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send a display data byte
    fn write_data(&mut self, data: u8) -> Result<(), Self::Error>;

    /// Set the contrast (bias potentiometer)
    fn set_contrast(&mut self, value: u8) -> Result<(), Self::Error> {
        self.write_command(uc1601::SET_BIAS_POT)?;
        self.write_command(value)
    }

    /// Force every pixel on, or return to showing display memory
    fn set_all_pixels_on(&mut self, on: bool) -> Result<(), Self::Error> {
        self.write_command(if on {
            uc1601::ALL_PIXELS_ON
        } else {
            uc1601::ALL_PIXELS_OFF
        })
    }
}

/// UC1601s command bytes
pub mod uc1601 {
    /// Column address, low nibble
    pub const SET_COLUMN_LSB: u8 = 0x00;
    /// Column address, high nibble
    pub const SET_COLUMN_MSB: u8 = 0x10;
    /// Temperature compensation -0.05 %/°C
    pub const SET_TEMP_COMPENSATION: u8 = 0x24;
    /// Scroll line 0
    pub const SET_SCROLL_LINE: u8 = 0x40;
    /// Bias potentiometer, followed by the value byte
    pub const SET_BIAS_POT: u8 = 0x81;
    /// RAM address control: page increment, wrap around
    pub const SET_RAM_ADDRESS: u8 = 0x8D;
    /// Frame rate 80 fps
    pub const SET_FRAME_RATE: u8 = 0xA0;
    /// Show display memory
    pub const ALL_PIXELS_OFF: u8 = 0xA4;
    /// Force all pixels on
    pub const ALL_PIXELS_ON: u8 = 0xA5;
    /// Non-inverted display
    pub const SET_NORMAL: u8 = 0xA6;
    /// Display disabled
    pub const DISPLAY_OFF: u8 = 0xAE;
    /// Display enabled
    pub const DISPLAY_ON: u8 = 0xAF;
    /// Page address
    pub const SET_PAGE: u8 = 0xB0;
    /// Mapping control: mirror X
    pub const SET_MAPPING: u8 = 0xC2;
    /// System reset
    pub const SYSTEM_RESET: u8 = 0xE2;
    /// Bias ratio 1/8
    pub const SET_BIAS_RATIO: u8 = 0xEA;

    /// Power-up sequence, sent after the reset pulse
    pub const INIT_SEQUENCE: [u8; 10] = [
        SYSTEM_RESET,
        SET_SCROLL_LINE,
        SET_RAM_ADDRESS,
        SET_FRAME_RATE,
        ALL_PIXELS_OFF,
        SET_NORMAL,
        DISPLAY_OFF,
        SET_MAPPING,
        SET_BIAS_RATIO,
        SET_TEMP_COMPENSATION,
    ];
}
