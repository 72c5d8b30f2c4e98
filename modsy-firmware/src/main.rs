//! Modsy - Garment Carousel Firmware
//!
//! Main firmware binary for RP2040-based carousel controllers. Three
//! stepper-driven mounts are aligned to looks published in a remote store,
//! reached through a network bridge on UART0.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use modsy_core::motion::{Carousel, Mount};
use modsy_core::poller::CommandPoller;
use modsy_hal_rp2040::{mount_coils, PinBank};

use crate::config::CAROUSEL;
use crate::store::UartStore;

mod config;
mod store;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Modsy firmware starting...");

    let p = embassy_rp::init(Default::default());
    let (mut bank, link) = PinBank::from_peripherals(p);

    if let Err(e) = CAROUSEL.validate() {
        error!("Invalid configuration: {:?}", e);
        return;
    }

    // Mount order: superior, inferior, calçado
    let mut coils = [None, None, None];
    for mount in Mount::ALL {
        match mount_coils(&mut bank, CAROUSEL.mount(mount)) {
            Ok(c) => coils[mount.index()] = Some(c),
            Err(e) => {
                error!("Mount {} pins unavailable: {:?}", mount.key(), e);
                return;
            }
        }
    }
    let [Some(upper), Some(lower), Some(footwear)] = coils else {
        return;
    };

    let mut carousel = Carousel::from_coils([upper, lower, footwear], CAROUSEL.stepper);
    carousel.release_all();
    info!("Motors initialized, all mounts at slot 1");

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = CAROUSEL.link.baudrate;

    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(link.uart, link.tx, link.rx, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for bridge communication");

    let store = UartStore::new(tx, rx, CAROUSEL.link);
    let poller = CommandPoller::new(store, carousel, CAROUSEL.poll);

    spawner.spawn(tasks::poller_task(poller)).unwrap();
    info!("Waiting for commands");
}
