//! Bus polling task
//!
//! Owns the RS-485 port and the zone dispatcher. Polls terminals in
//! round-robin order and turns their reports into zone commands.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::Timer;

use domotica_core::dispatch::{Trigger, ZoneChange, ZoneDispatcher};
use domotica_core::polling::{PollOutcome, PollingEngine};
use domotica_core::traits::ActuationError;
use domotica_hal_rp2040::Rs485Master;

use crate::actuation::QueueActuator;

/// Polls between two statistics reports
const STATS_INTERVAL: u32 = 1000;

pub type BusPort = Rs485Master<'static, BufferedUartTx, BufferedUartRx>;

#[embassy_executor::task]
pub async fn bus_poll_task(
    mut port: BusPort,
    mut engine: PollingEngine,
    mut dispatcher: ZoneDispatcher,
    mut actuator: QueueActuator,
) {
    info!(
        "Bus poll task started: {} terminals",
        engine.terminal_count()
    );

    if !engine.is_enabled() {
        warn!("No terminals configured, bus polling disabled");
        loop {
            Timer::after_secs(60).await;
        }
    }

    loop {
        match engine.poll(&mut port).await {
            Ok(PollOutcome::Report { device, report }) => {
                debug!(
                    "Terminal {}: buttons={=u8:#x} trimmer={}",
                    device.get(),
                    report.buttons.raw(),
                    report.trimmer
                );
                match dispatcher.handle_report(device, &report, &mut actuator) {
                    Ok(changes) => {
                        for change in &changes {
                            log_change(change);
                        }
                    }
                    Err(e) => warn!("Report rejected: {:?}", e),
                }
            }
            Ok(PollOutcome::Idle { .. }) | Ok(PollOutcome::Disabled) => {}
            Err(e) => warn!("Poll of terminal {} failed: {:?}", e.device().get(), e),
        }

        let stats = engine.stats();
        if stats.polls % STATS_INTERVAL == 0 {
            info!(
                "Bus: {} polls, {} reports, {} errors",
                stats.polls,
                stats.reports,
                stats.errors()
            );
        }
    }
}

fn log_change(change: &ZoneChange) {
    match change.trigger {
        Trigger::Button { button, state } => debug!(
            "Terminal {} button {} {:?}: zone {} {}",
            change.device.get(),
            button.number(),
            state,
            change.zone.get(),
            if change.enabled { "on" } else { "off" }
        ),
        Trigger::Trimmer { value } => debug!(
            "Terminal {} trimmer {}: zone {} duty {}",
            change.device.get(),
            value,
            change.zone.get(),
            change.duty
        ),
    }

    match change.result {
        Ok(()) => {}
        Err(ActuationError::QueueFull) => {
            warn!("Dimmer queue full, zone {} command dropped", change.zone.get())
        }
        Err(e) => warn!("Zone {} not actuated: {:?}", change.zone.get(), e),
    }
}
