//! Portal Display Firmware
//!
//! Firmware for the gate controller display board (STM32F042K6 with a
//! UC1601s 128x48 LCD). The main controller drives it over the ASCII-hex
//! serial protocol.
//!
//! One task owns the [`Panel`]; the UART, tick and button tasks only
//! forward [`Event`]s to it through a channel.

#![no_std]
#![no_main]

mod buttons;
mod uc1601;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Input, Level, Output as GpioOutput, OutputType, Pull, Speed};
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::{TIM3, USART2};
use embassy_stm32::time::Hertz;
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::timer::Channel as TimerChannel;
use embassy_stm32::usart::{self, RingBufferedUartRx, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Delay, Duration, Instant, Ticker, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::buttons::Buttons;
use crate::uc1601::Uc1601;
use portal_core::config::{parse_config, PanelConfig};
use portal_core::{Event, Output, Panel};
use portal_hal::word::WordBusConfig;
use portal_hal::UartConfig;
use portal_hal_stm32f0::{
    usart_config, ActiveLowInput, BitBangBus, PushPull, PwmTone, UartBusError,
};

bind_interrupts!(struct Irqs {
    USART2 => usart::InterruptHandler<USART2>;
});

/// Board configuration, checked by the build script
const PANEL_TOML: &str = include_str!("../panel.toml");

type Board = Panel<PwmTone<'static, TIM3>, PushPull<'static>, PushPull<'static>>;
type Lcd = Uc1601<BitBangBus<'static, Delay>, PushPull<'static>>;

/// Events for the panel task
static EVENTS: Channel<CriticalSectionRawMutex, Event, 32> = Channel::new();

/// Response bytes for the UART TX task
static TX_BYTES: Channel<CriticalSectionRawMutex, u8, 4> = Channel::new();

/// DMA ring for the UART receiver
static RX_RING: StaticCell<[u8; 64]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Portal Display Firmware starting...");

    let p = embassy_stm32::init(Default::default());

    let config = match parse_config(PANEL_TOML) {
        Ok(config) => config,
        Err(e) => {
            error!("panel.toml rejected: {}, using defaults", e);
            PanelConfig::default()
        }
    };
    let version = config.firmware.version();
    info!("Firmware {}.{}.{}", version.major, version.minor, version.build);

    // LCD serial bus (PA5=SCK, PA7=SDA, PA4=CS, PB1=RST)
    let bus = BitBangBus::new(
        GpioOutput::new(p.PA5, Level::Low, Speed::High),
        GpioOutput::new(p.PA7, Level::Low, Speed::High),
        GpioOutput::new(p.PA4, Level::High, Speed::High),
        Delay,
        WordBusConfig::default(),
    );
    let reset = PushPull::new(GpioOutput::new(p.PB1, Level::Low, Speed::Low));
    let lcd = Uc1601::new(bus, reset);

    // Buzzer on TIM3 CH1 (PA6)
    let pwm = SimplePwm::new(
        p.TIM3,
        Some(PwmPin::new(p.PA6, OutputType::PushPull)),
        None,
        None,
        None,
        Hertz(config.buzzer.frequency_hz.max(1)),
        CountingMode::EdgeAlignedUp,
    );
    let tone = PwmTone::new(pwm, TimerChannel::Ch1);

    // Backlight (PA8) and external LED (PB4)
    let backlight = PushPull::new(GpioOutput::new(p.PA8, Level::Low, Speed::Low));
    let led = PushPull::new(GpioOutput::new(p.PB4, Level::Low, Speed::Low));

    let panel = Panel::new(&config, tone, backlight, led);

    // Host link (PA2=TX, PA3=RX)
    let link = UartConfig {
        baudrate: config.serial.baudrate,
        ..UartConfig::default()
    };
    let uart = unwrap!(Uart::new(
        p.USART2,
        p.PA3, // RX
        p.PA2, // TX
        Irqs,
        p.DMA1_CH4,
        p.DMA1_CH5,
        usart_config(&link),
    ));
    let (tx, rx) = uart.split();
    let rx = rx.into_ring_buffered(RX_RING.init([0; 64]));

    // Buttons (PA0=open, PA1=stop, PB0=close, PB3=loopback)
    let buttons = Buttons::new(
        ActiveLowInput::new(Input::new(p.PA0, Pull::Up)),
        ActiveLowInput::new(Input::new(p.PA1, Pull::Up)),
        ActiveLowInput::new(Input::new(p.PB0, Pull::Up)),
        ActiveLowInput::new(Input::new(p.PB3, Pull::Up)),
    );

    // Spawn tasks
    spawner.spawn(unwrap!(panel_task(panel, lcd, config.display.contrast)));
    spawner.spawn(unwrap!(uart_rx_task(rx)));
    spawner.spawn(unwrap!(uart_tx_task(tx)));
    spawner.spawn(unwrap!(tick_task(config.timing.tick_ms)));
    spawner.spawn(unwrap!(button_task(buttons)));

    info!("All tasks spawned");
}

/// Panel task - owns all display board state
///
/// Pending events are handled first; while the LCD is behind the
/// framebuffer one column is sent per pass.
#[embassy_executor::task]
async fn panel_task(mut panel: Board, mut lcd: Lcd, contrast: u8) {
    info!("Panel task started");

    if lcd.init(contrast).await.is_err() {
        error!("Failed to initialize LCD");
    } else {
        info!("LCD initialized");
    }

    loop {
        let event = if panel.is_dirty() {
            EVENTS.try_receive().ok()
        } else {
            Some(EVENTS.receive().await)
        };

        match event {
            Some(event) => {
                if event.is_serial() {
                    trace!("{}", event);
                }
                dispatch(panel.handle(event));
            }
            None => {
                if panel.step(&mut lcd).is_err() {
                    warn!("LCD write failed");
                }
                yield_now().await;
            }
        }
    }
}

/// Act on the outcome of one event
fn dispatch(output: Output) {
    if let Some(byte) = output.tx {
        if TX_BYTES.try_send(byte).is_err() {
            warn!("TX queue full, response byte lost");
        }
    }

    if let Some(receipt) = output.receipt {
        match receipt.error {
            Some(error) => warn!(
                "Request {=u8:#04x} cmd {=u8:#04x} rejected: {}",
                receipt.packet_number, receipt.command, error
            ),
            None => debug!(
                "Request {=u8:#04x} cmd {=u8:#04x}: {}",
                receipt.packet_number, receipt.command, receipt.status
            ),
        }
    }

    if output.dropped {
        warn!("Frame dropped without response");
    }

    if let Some(error) = output.render_error {
        warn!("Line write rejected: {}", error);
    }

    if let Some(keys) = output.keys {
        debug!("Keys: {=u8:#04x}", keys);
    }
}

/// UART receive task - forwards every byte to the panel
#[embassy_executor::task]
async fn uart_rx_task(mut rx: RingBufferedUartRx<'static>) {
    info!("UART RX task started");

    let mut buf = [0u8; 16];

    loop {
        match rx.read(&mut buf).await {
            Ok(len) => {
                for &byte in &buf[..len] {
                    EVENTS.send(Event::ByteReceived(byte)).await;
                }
            }
            Err(e) => {
                warn!("UART read error: {}", UartBusError::from(e));
                Timer::after(Duration::from_millis(10)).await;
            }
        }
    }
}

/// UART transmit task - sends response bytes one at a time
#[embassy_executor::task]
async fn uart_tx_task(mut tx: usart::UartTx<'static, Async>) {
    info!("UART TX task started");

    loop {
        let byte = TX_BYTES.receive().await;
        if let Err(e) = tx.write(&[byte]).await {
            warn!("UART write error: {}", UartBusError::from(e));
        }
        EVENTS.send(Event::ByteSent).await;
    }
}

/// Tick task - drives buzzer timing, blinking and key release
#[embassy_executor::task]
async fn tick_task(tick_ms: u32) {
    info!("Tick task started, period {} ms", tick_ms);

    let mut ticker = Ticker::every(Duration::from_millis(tick_ms as u64));

    loop {
        ticker.next().await;
        // Wraps after ~49 days; deadlines compare with wrapping arithmetic
        let now = Instant::now().as_millis() as u32;
        EVENTS.send(Event::Tick(now)).await;
    }
}

/// Button task - reports raw key changes
#[embassy_executor::task]
async fn button_task(mut buttons: Buttons<'static>) {
    info!("Button task started, keys {=u8:#04x}", buttons.mask());

    EVENTS.send(Event::Keys(buttons.mask())).await;

    loop {
        if let Some(raw) = buttons.poll().await {
            trace!("Raw keys: {=u8:#04x}", raw);
            EVENTS.send(Event::Keys(raw)).await;
        }
    }
}
