use std::time::Duration;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::carousel::{Carousel, LayoutMeasurer};
use crate::events::Interaction;

/// Drives a mounted carousel: one `tick` per frame, input applied between frames.
///
/// The carousel is owned by this task alone. Cancelling the token unmounts it,
/// which releases the page scroll lock if the overlay was open.
pub async fn run<M: LayoutMeasurer>(
    mut carousel: Carousel<M>,
    mut commands: Receiver<Interaction>,
    cancel: CancellationToken,
    frame_interval: Duration,
) -> Result<()> {
    let mut frames = interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut commands_open = true;
    info!(
        interval = %humantime::format_duration(frame_interval),
        "carousel frame loop started"
    );

    loop {
        select! {
            _ = cancel.cancelled() => break,

            at = frames.tick() => {
                let report = carousel.tick(at.into_std());
                trace!(?report, "frame");
            }

            cmd = commands.recv(), if commands_open => match cmd {
                Some(interaction) => carousel.handle(interaction, Instant::now().into_std()),
                None => {
                    debug!("interaction channel closed; carousel keeps animating");
                    commands_open = false;
                }
            },
        }
    }

    carousel.unmount();
    Ok(())
}
