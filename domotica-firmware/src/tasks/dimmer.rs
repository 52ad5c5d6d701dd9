//! Dimmer task
//!
//! Owns the PWM outputs. Applies fade requests from the bus task and
//! advances running fades at a fixed tick.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};

use crate::board::Dimmers;
use crate::channels::{DimCommand, DIM_CHANNEL};

/// Fade update interval in milliseconds
pub const FADE_TICK_MS: u32 = 10;

#[embassy_executor::task]
pub async fn dimmer_task(mut dimmers: Dimmers) {
    info!("Dimmer task started");

    let mut ticker = Ticker::every(Duration::from_millis(FADE_TICK_MS as u64));

    loop {
        if !dimmers.is_fading() {
            // Nothing to animate, sleep until the next request
            let cmd = DIM_CHANNEL.receive().await;
            apply(&mut dimmers, cmd);
            ticker.reset();
            continue;
        }

        match select(DIM_CHANNEL.receive(), ticker.next()).await {
            Either::First(cmd) => apply(&mut dimmers, cmd),
            Either::Second(()) => {
                dimmers.update(FADE_TICK_MS);
            }
        }
    }
}

fn apply(dimmers: &mut Dimmers, cmd: DimCommand) {
    trace!(
        "Fade zone {} to {} over {}ms",
        cmd.zone.get(),
        cmd.duty,
        cmd.fade_ms
    );
    if let Err(e) = dimmers.start_fade(cmd.zone, cmd.duty, cmd.fade_ms) {
        warn!("Zone {} has no dimmer output: {:?}", cmd.zone.get(), e);
    }
}
