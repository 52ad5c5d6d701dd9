//! Domotica - Central Unit Firmware
//!
//! Main firmware binary for the RP2040 central unit. Polls the wall
//! terminals over RS-485 and drives the lighting zones.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART1;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{self, BufferedInterruptHandler, Uart};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use domotica_core::dispatch::ZoneDispatcher;
use domotica_core::polling::PollingEngine;
use domotica_drivers::adapters::{EhOutputPin, EhPwm};
use domotica_hal::uart::UartConfig;
use domotica_hal_rp2040::pwm::zone_config;
use domotica_hal_rp2040::uart::to_rp_config;
use domotica_hal_rp2040::Rs485Master;

use crate::actuation::QueueActuator;
use crate::channels::DIM_CHANNEL;

// Heap allocator for installation parsing
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

mod actuation;
mod board;
mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 32]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Domotica central unit starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let installation = match config::load_installation() {
        Ok(installation) => installation,
        Err(e) => {
            error!("No usable installation: {:?}", e);
            loop {
                embassy_time::Timer::after_secs(60).await;
            }
        }
    };

    // Setup RS-485 bus (UART1 TX=GPIO20, RX=GPIO21, DE=GPIO22)
    let line = UartConfig::with_baudrate(installation.bus.baudrate);
    let uart_config = to_rp_config(&line).unwrap_or_else(|| {
        warn!("Unsupported line settings, using 8N1");
        uart::Config::default()
    });

    let tx_buf = TX_BUF.init([0u8; 32]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART1, p.PIN_20, p.PIN_21, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    let de = Output::new(p.PIN_22, Level::Low);
    let port = Rs485Master::new(tx, rx, de, line);

    info!("RS-485 initialized at {} baud", line.baudrate);

    // Setup dimmer outputs (GPIO0..GPIO11)
    let slices = [
        Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, zone_config()),
        Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, zone_config()),
        Pwm::new_output_ab(p.PWM_SLICE2, p.PIN_4, p.PIN_5, zone_config()),
        Pwm::new_output_ab(p.PWM_SLICE3, p.PIN_6, p.PIN_7, zone_config()),
        Pwm::new_output_ab(p.PWM_SLICE4, p.PIN_8, p.PIN_9, zone_config()),
        Pwm::new_output_ab(p.PWM_SLICE5, p.PIN_10, p.PIN_11, zone_config()),
    ];
    let pwm_outputs = slices
        .into_iter()
        .flat_map(|slice| {
            let (a, b) = slice.split();
            [a, b]
        })
        .flatten()
        .map(EhPwm::new);
    let dimmers = board::bind_dimmers(&installation.zones, pwm_outputs);

    // Setup relay outputs (GPIO12..GPIO19)
    let relay_outputs = [
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_13, Level::Low),
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_17, Level::Low),
        Output::new(p.PIN_18, Level::Low),
        Output::new(p.PIN_19, Level::Low),
    ]
    .map(EhOutputPin::new);
    let relays = board::bind_relays(&installation.zones, relay_outputs);

    info!("Zone outputs initialized");

    let engine = PollingEngine::new(installation.bus);
    let dispatcher = ZoneDispatcher::new(
        installation.zones,
        installation.keymap,
        installation.dimming,
    );
    let actuator = QueueActuator::new(DIM_CHANNEL.sender(), relays);

    // Spawn tasks
    spawner.spawn(tasks::dimmer_task(dimmers)).unwrap();
    spawner
        .spawn(tasks::bus_poll_task(port, engine, dispatcher, actuator))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
