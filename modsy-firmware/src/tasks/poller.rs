//! Command poller task
//!
//! Runs the control loop forever: one poll iteration, log what happened,
//! pause, repeat. Motors, store reads and store writes all happen on this
//! task, one after another.

use defmt::*;
use embassy_time::Delay;

use modsy_core::motion::Mount;
use modsy_core::poller::{CommandPoller, MountReport, PollOutcome};
use modsy_hal_rp2040::MountCoils;

use crate::store::UartStore;

/// The poller as wired on the board
pub type BoardPoller = CommandPoller<UartStore, MountCoils>;

#[embassy_executor::task]
pub async fn poller_task(mut poller: BoardPoller) {
    info!("Command poller started");
    let mut delay = Delay;

    loop {
        let outcome = poller.tick(&mut delay).await;
        log_outcome(&outcome);
    }
}

fn log_outcome(outcome: &PollOutcome) {
    match *outcome {
        PollOutcome::Idle => trace!("No pending command"),
        PollOutcome::LookRejected { status_written } => {
            warn!("Invalid look value, marked erro (written: {})", status_written);
        }
        PollOutcome::LookNotFound { look, status_written } => {
            warn!("Look {} not found (concluido written: {})", look.get(), status_written);
        }
        PollOutcome::LookAligned {
            look,
            mounts,
            status_written,
        } => {
            for mount in Mount::ALL {
                log_mount(mount, &mounts[mount.index()]);
            }
            info!("Look {} aligned (concluido written: {})", look.get(), status_written);
        }
        PollOutcome::SectionIgnored => warn!("Unknown section in command, left pending"),
        PollOutcome::SectionDeferred { mount } => {
            warn!("Could not mark section {} em_andamento, retrying later", mount.key());
        }
        PollOutcome::SectionRotated {
            mount,
            slot,
            status_written,
        } => {
            info!(
                "Section {} now at slot {} (concluido written: {})",
                mount.key(),
                slot.get(),
                status_written
            );
        }
    }
}

fn log_mount(mount: Mount, report: &MountReport) {
    match *report {
        MountReport::Rotated { from, to, revolutions } => {
            info!(
                "Mount {}: slot {} -> {} ({} revolutions)",
                mount.key(),
                from.get(),
                to.get(),
                revolutions
            );
        }
        MountReport::Skipped(reason) => debug!("Mount {} skipped: {:?}", mount.key(), reason),
    }
}
