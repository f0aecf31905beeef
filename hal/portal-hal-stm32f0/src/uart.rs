//! UART support for STM32F0
//!
//! Maps the link settings onto the embassy USART configuration and
//! flattens its errors.

use embassy_stm32::usart::{
    Config, DataBits as UsartDataBits, Error as UsartError, Parity as UsartParity,
    StopBits as UsartStopBits,
};
use portal_hal::uart::{DataBits, Parity, StopBits, UartConfig};

/// Build the embassy USART configuration for the host link
pub fn usart_config(link: &UartConfig) -> Config {
    let mut config = Config::default();
    config.baudrate = link.baudrate;
    config.data_bits = match link.data_bits {
        DataBits::Seven => UsartDataBits::DataBits7,
        DataBits::Eight => UsartDataBits::DataBits8,
        DataBits::Nine => UsartDataBits::DataBits9,
    };
    config.parity = match link.parity {
        Parity::None => UsartParity::ParityNone,
        Parity::Even => UsartParity::ParityEven,
        Parity::Odd => UsartParity::ParityOdd,
    };
    config.stop_bits = match link.stop_bits {
        StopBits::One => UsartStopBits::STOP1,
        StopBits::Two => UsartStopBits::STOP2,
    };
    config
}

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too small
    BufferTooSmall,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            UsartError::BufferTooLong => UartBusError::BufferTooSmall,
            _ => UartBusError::Other,
        }
    }
}
