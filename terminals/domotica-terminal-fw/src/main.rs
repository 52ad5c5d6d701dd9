//! Domotica Wall Terminal Firmware
//!
//! Firmware for the STM32F042 wall terminals. Samples a resistor-ladder
//! keypad and a trimmer, and answers the central unit's polls over RS-485.
//!
//! A single loop waits for whichever comes first: the next bus byte or the
//! next sample instant. The debounce delay only moves the sample instant,
//! so polls are answered while a button is being debounced.

#![no_std]
#![no_main]

mod config;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_stm32::adc::{self, Adc};
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::peripherals::{ADC1, USART2};
use embassy_stm32::usart::{self, BufferedUart};
use embassy_time::{Duration, Instant, Timer};
use embedded_io_async::Read;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use domotica_core::terminal::{AnalogKeypad, ButtonClassifier, TerminalResponder, TrimmerTracker};
use domotica_hal::adc::to_10bit;
use domotica_hal::uart::UartConfig;
use domotica_hal_stm32f0::uart::to_stm32_config;
use domotica_hal_stm32f0::{Rs485Terminal, UartBusError};
use domotica_protocol::DeviceId;

#[cfg(feature = "keypad-tuner")]
use domotica_core::terminal::AdcMeanTracker;

use crate::config::{terminal_config, ADC_BITS, BAUDRATE, DEVICE_ID};

bind_interrupts!(struct Irqs {
    USART2 => usart::BufferedInterruptHandler<USART2>;
    ADC1_COMP => adc::InterruptHandler<ADC1>;
});

static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let config = terminal_config();
    info!("Domotica terminal {} starting...", DEVICE_ID);

    let p = embassy_stm32::init(Default::default());

    // Setup RS-485 (PA2=TX, PA3=RX, PA1=DE on F042K6)
    let line = UartConfig::with_baudrate(BAUDRATE);
    let uart_config = to_stm32_config(&line).unwrap_or_default();
    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; 16]);

    let uart = BufferedUart::new(p.USART2, p.PA3, p.PA2, tx_buf, rx_buf, Irqs, uart_config).unwrap();
    let (tx, mut rx) = uart.split();
    let de = Output::new(p.PA1, Level::Low, Speed::Low);
    let mut port = Rs485Terminal::new(tx, de, line);

    // Setup analog inputs (PA0=keypad ladder, PA4=trimmer)
    let mut adc = Adc::new(p.ADC1, Irqs);
    let mut keypad_pin = p.PA0;
    let mut trimmer_pin = p.PA4;

    let device = DeviceId::masked(config.device_id);
    let keypad = AnalogKeypad::new(config.keypad.clone());
    let mut classifier = ButtonClassifier::new(config.held_threshold);
    let mut trimmer = TrimmerTracker::new(config.trimmer_detect);
    let mut responder = TerminalResponder::new(device, config.lock_ms);

    #[cfg(feature = "keypad-tuner")]
    let mut tuner = AdcMeanTracker::new();

    let sample_period = Duration::from_millis(config.sample_period_ms as u64);
    let debounce = Duration::from_millis(config.debounce_ms as u64);
    let mut next_sample = Instant::now();
    let mut byte = [0u8; 1];

    info!("Terminal ready at {} baud", BAUDRATE);

    loop {
        match select(rx.read(&mut byte), Timer::at(next_sample)).await {
            Either::First(Ok(0)) => {}
            Either::First(Ok(_)) => {
                let now_ms = Instant::now().as_millis();
                let Some(reply) = responder.respond(byte[0], now_ms, &mut classifier, &mut trimmer)
                else {
                    continue;
                };
                match port.transmit(&reply).await {
                    Ok(()) => debug!("Replied {:02x}", reply),
                    Err(e) => warn!("Reply failed: {:?}", e),
                }
            }
            Either::First(Err(e)) => {
                warn!("UART read error: {:?}", UartBusError::from(e));
            }
            Either::Second(()) => {
                let now = Instant::now();
                let key_sample = to_10bit(adc.read(&mut keypad_pin).await, ADC_BITS);
                let trimmer_sample = to_10bit(adc.read(&mut trimmer_pin).await, ADC_BITS);

                #[cfg(feature = "keypad-tuner")]
                if key_sample < config.keypad.valid_edge {
                    tuner.push(key_sample);
                    if tuner.count() >= config::TUNER_WINDOW {
                        if let Some(mean) = tuner.take_mean() {
                            info!("Keypad mean over {} samples: {}", config::TUNER_WINDOW, mean);
                        }
                    }
                }

                let detection = keypad.read_button(key_sample);
                if let Some((button, state)) = classifier.update(detection) {
                    debug!("Button {} {:?}", button.number(), state);
                }

                let moved = trimmer.update(trimmer_sample);
                if moved {
                    trace!("Trimmer at {}", trimmer.value());
                }

                if detection.is_some() || moved {
                    responder.note_activity(now.as_millis());
                }

                next_sample = now + if detection.is_some() { debounce } else { sample_period };
            }
        }
    }
}
