//! Serial receive task
//!
//! Reads bytes from the host UART and runs them through the relay. Every
//! byte is decoded, dispatched and reported before the next one. State the
//! report channel could not take is retried until the USB task catches up.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{Duration, Timer};
use embedded_io_async::Read;

use kmrelay_core::{DropReason, Outcome, Relay, RelayConfig};

use crate::transport::ChannelSink;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Delay between attempts to deliver pending reports
const RETRY_INTERVAL: Duration = Duration::from_millis(1);

/// Serial RX task - decodes frames from the host and drives HID output
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx, config: RelayConfig) {
    info!("Serial RX task started ({} baud)", config.baud_rate);

    let mut relay = Relay::new(&config, ChannelSink);
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let read = if relay.dispatcher().output().has_pending() {
            match select(rx.read(&mut buf), Timer::after(RETRY_INTERVAL)).await {
                Either::First(read) => read,
                Either::Second(()) => {
                    flush_reports(&mut relay);
                    continue;
                }
            }
        } else {
            rx.read(&mut buf).await
        };

        match read {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    handle_outcome(relay.feed(byte));
                }
                flush_reports(&mut relay);
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
                Timer::after(Duration::from_millis(10)).await;
            }
        }
    }
}

fn handle_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Pending => {}
        Outcome::Accepted(cmd) => {
            trace!("Applied {:?}", cmd);
        }
        Outcome::Unreported(cmd) => {
            debug!("Applied {:?}, report pending", cmd);
        }
        Outcome::Dropped(DropReason::Framing) => {
            // Line noise between frames
        }
        Outcome::Dropped(reason) => {
            debug!("Frame dropped: {:?}", reason);
        }
    }
}

/// Send batched state and retry reports the channel rejected
fn flush_reports(relay: &mut Relay<ChannelSink>) {
    let output = relay.dispatcher_mut().output_mut();
    if output.has_pending() && output.flush().is_err() {
        trace!("Reports still pending");
    }
}
