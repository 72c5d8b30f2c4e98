//! Command poller
//!
//! The top-level control loop. Each iteration checks the look channel,
//! then the section channel, services at most one pending command and
//! pauses. Everything happens in sequence on the caller's task: store
//! reads and writes, then motor moves, then the status write.
//!
//! Look channel:
//!
//! ```text
//! pendente --look ok--> em_andamento (best effort) --> rotate mounts --> concluido
//! pendente --bad look-> erro
//! ```
//!
//! Section channel:
//!
//! ```text
//! pendente --known secao--> em_andamento (retried) --> rotate 1 slot --> concluido
//! pendente --unknown secao or em_andamento never stored--> left pendente
//! ```

pub mod outcome;

pub use outcome::{MountReport, PollOutcome};

use embedded_hal_async::delay::DelayNs;

use crate::config::PollConfig;
use crate::motion::{revolutions_needed, Carousel, Mount, MOUNT_COUNT};
use crate::remote::{self, paths, MAX_DOCUMENT_LEN};
use crate::resolver::{self, MountTarget, SkipReason};
use crate::state::{CommandStatus, LookCommand, LookIndex, SectionCommand};
use crate::traits::{CoilDriver, RemoteStore};

/// Owns the store handle and the motors for the lifetime of the program
pub struct CommandPoller<S, C> {
    store: S,
    carousel: Carousel<C>,
    config: PollConfig,
}

impl<S: RemoteStore, C: CoilDriver> CommandPoller<S, C> {
    pub fn new(store: S, carousel: Carousel<C>, config: PollConfig) -> Self {
        Self {
            store,
            carousel,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn carousel(&self) -> &Carousel<C> {
        &self.carousel
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// One iteration followed by its pause
    pub async fn tick<D: DelayNs>(&mut self, delay: &mut D) -> PollOutcome {
        let outcome = self.poll_once(delay).await;
        delay
            .delay_ms(self.config.pause_after(outcome.serviced_command()))
            .await;
        outcome
    }

    /// One iteration without the trailing pause
    ///
    /// The section channel is only read when the look channel has nothing
    /// pending.
    pub async fn poll_once<D: DelayNs>(&mut self, delay: &mut D) -> PollOutcome {
        if let Some(command) = self.pending_look().await {
            return match command.look {
                Some(look) => self.service_look(look, delay).await,
                None => PollOutcome::LookRejected {
                    status_written: self.set_status(paths::LOOK_COMMAND_STATUS, CommandStatus::Failed).await,
                },
            };
        }

        if let Some(command) = self.pending_section().await {
            return match command.section {
                Some(mount) => self.service_section(mount, delay).await,
                None => PollOutcome::SectionIgnored,
            };
        }

        PollOutcome::Idle
    }

    async fn pending_look(&mut self) -> Option<LookCommand> {
        let mut buf = [0u8; MAX_DOCUMENT_LEN];
        let body = remote::fetch(&mut self.store, paths::LOOK_COMMAND, &mut buf).await?;
        LookCommand::decode(body).ok().filter(LookCommand::is_pending)
    }

    async fn pending_section(&mut self) -> Option<SectionCommand> {
        let mut buf = [0u8; MAX_DOCUMENT_LEN];
        let body = remote::fetch(&mut self.store, paths::SECTION_COMMAND, &mut buf).await?;
        SectionCommand::decode(body).ok().filter(SectionCommand::is_pending)
    }

    async fn service_look<D: DelayNs>(&mut self, look: LookIndex, delay: &mut D) -> PollOutcome {
        // Advisory only; the look runs even if the app never sees it
        self.set_status(paths::LOOK_COMMAND_STATUS, CommandStatus::InProgress)
            .await;

        let resolved = match resolver::resolve_look(&mut self.store, look).await {
            Ok(resolved) => resolved,
            Err(_) => {
                let status_written = self
                    .set_status(paths::LOOK_COMMAND_STATUS, CommandStatus::Completed)
                    .await;
                return PollOutcome::LookNotFound { look, status_written };
            }
        };

        let mut mounts = [MountReport::Skipped(SkipReason::RoleMissing); MOUNT_COUNT];
        for mount in Mount::ALL {
            mounts[mount.index()] = match resolved.target(mount) {
                MountTarget::Present(target) => {
                    let from = self.carousel.slot(mount);
                    let revolutions = revolutions_needed(from, target);
                    let to = self.carousel.rotate(mount, revolutions, delay).await;
                    MountReport::Rotated { from, to, revolutions }
                }
                MountTarget::Absent(reason) => MountReport::Skipped(reason),
            };
        }

        let status_written = self
            .set_status(paths::LOOK_COMMAND_STATUS, CommandStatus::Completed)
            .await;
        PollOutcome::LookAligned {
            look,
            mounts,
            status_written,
        }
    }

    async fn service_section<D: DelayNs>(&mut self, mount: Mount, delay: &mut D) -> PollOutcome {
        let mut started = false;
        for _ in 0..self.config.status_write_attempts {
            if self
                .set_status(paths::SECTION_COMMAND_STATUS, CommandStatus::InProgress)
                .await
            {
                started = true;
                break;
            }
            delay.delay_ms(self.config.status_retry_backoff_ms).await;
        }
        if !started {
            return PollOutcome::SectionDeferred { mount };
        }

        let slot = self.carousel.rotate(mount, 1, delay).await;
        let status_written = self
            .set_status(paths::SECTION_COMMAND_STATUS, CommandStatus::Completed)
            .await;
        PollOutcome::SectionRotated {
            mount,
            slot,
            status_written,
        }
    }

    async fn set_status(&mut self, path: &str, status: CommandStatus) -> bool {
        remote::write_status(&mut self.store, path, status).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepperConfig;
    use crate::motion::Slot;
    use crate::testing::{CountingDelay, MockStore, RecordingCoils};
    use embassy_futures::block_on;

    const LOOK_STATUS: &str = paths::LOOK_COMMAND_STATUS;
    const SECTION_STATUS: &str = paths::SECTION_COMMAND_STATUS;

    fn poller(store: MockStore) -> CommandPoller<MockStore, RecordingCoils> {
        let carousel = Carousel::from_coils(
            Default::default(),
            StepperConfig {
                steps_per_revolution: 16,
                step_delay_ms: 0,
            },
        );
        CommandPoller::new(store, carousel, PollConfig::default())
    }

    fn slot(n: u8) -> Slot {
        Slot::new(n).unwrap()
    }

    fn energized(poller: &CommandPoller<MockStore, RecordingCoils>, mount: Mount) -> usize {
        poller.carousel().stepper(mount).coils().energize_count
    }

    #[test]
    fn test_idle_when_nothing_published() {
        let mut poller = poller(MockStore::new());
        let mut delay = CountingDelay::default();

        assert_eq!(block_on(poller.tick(&mut delay)), PollOutcome::Idle);
        assert!(poller.store().writes.is_empty());
        assert_eq!(poller.store().reads, [paths::LOOK_COMMAND, paths::SECTION_COMMAND]);
        assert_eq!(delay.pauses, [1000]);
    }

    #[test]
    fn test_look_aligns_upper_mount() {
        let store = MockStore::new()
            .with(paths::LOOK_COMMAND, r#"{"look":"2","status":"pendente"}"#)
            .with("/posicoesRoupas/look2", r#"{"superior":"shirtA"}"#)
            .with("/mapaPecas/shirtA/posicao", "\"3\"");
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        let outcome = block_on(poller.tick(&mut delay));

        assert_eq!(
            outcome,
            PollOutcome::LookAligned {
                look: LookIndex::new(2).unwrap(),
                mounts: [
                    MountReport::Rotated {
                        from: slot(1),
                        to: slot(3),
                        revolutions: 2,
                    },
                    MountReport::Skipped(SkipReason::RoleMissing),
                    MountReport::Skipped(SkipReason::RoleMissing),
                ],
                status_written: true,
            }
        );
        assert_eq!(poller.carousel().slot(Mount::Upper), slot(3));
        assert_eq!(poller.carousel().slot(Mount::Lower), Slot::HOME);
        assert_eq!(energized(&poller, Mount::Upper), 2 * 16 + 2);
        assert_eq!(energized(&poller, Mount::Lower), 0);
        assert_eq!(energized(&poller, Mount::Footwear), 0);
        assert_eq!(
            poller.store().written(LOOK_STATUS),
            ["\"em_andamento\"", "\"concluido\""]
        );
        assert!(!poller.store().reads.iter().any(|p| p == paths::SECTION_COMMAND));
        assert_eq!(delay.pauses, [2000]);
    }

    #[test]
    fn test_look_on_target_mount_turns_full_cycle() {
        let store = MockStore::new()
            .with(paths::LOOK_COMMAND, r#"{"look":"1","status":"pendente"}"#)
            .with("/posicoesRoupas/look1", r#"{"inferior":"jeans"}"#)
            .with("/mapaPecas/jeans/posicao", "1");
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        let outcome = block_on(poller.poll_once(&mut delay));

        let PollOutcome::LookAligned { mounts, .. } = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(
            mounts[Mount::Lower.index()],
            MountReport::Rotated {
                from: slot(1),
                to: slot(1),
                revolutions: 4,
            }
        );
    }

    #[test]
    fn test_look_in_progress_write_failure_is_ignored() {
        let store = MockStore::new()
            .with(paths::LOOK_COMMAND, r#"{"look":"2","status":"pendente"}"#)
            .with("/posicoesRoupas/look2", r#"{"superior":"shirtA"}"#)
            .with("/mapaPecas/shirtA/posicao", "3")
            .failing_writes(1);
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        let outcome = block_on(poller.poll_once(&mut delay));

        assert!(matches!(outcome, PollOutcome::LookAligned { status_written: true, .. }));
        assert_eq!(poller.carousel().slot(Mount::Upper), slot(3));
        assert_eq!(
            poller.store().written(LOOK_STATUS),
            ["\"em_andamento\"", "\"concluido\""]
        );
    }

    #[test]
    fn test_completed_command_takes_no_action() {
        let store = MockStore::new()
            .with(paths::LOOK_COMMAND, r#"{"look":"2","status":"concluido"}"#)
            .with(paths::SECTION_COMMAND, r#"{"secao":"superior","status":"concluido"}"#);
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        assert_eq!(block_on(poller.tick(&mut delay)), PollOutcome::Idle);
        assert!(poller.store().writes.is_empty());
        assert_eq!(poller.carousel().slots(), [Slot::HOME; MOUNT_COUNT]);
        assert_eq!(delay.pauses, [1000]);
    }

    #[test]
    fn test_invalid_look_marks_error() {
        let store = MockStore::new()
            .with(paths::LOOK_COMMAND, r#"{"look":"5","status":"pendente"}"#)
            .with(paths::SECTION_COMMAND, r#"{"secao":"superior","status":"pendente"}"#);
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        let outcome = block_on(poller.tick(&mut delay));

        assert_eq!(outcome, PollOutcome::LookRejected { status_written: true });
        assert_eq!(poller.store().written(LOOK_STATUS), ["\"erro\""]);
        assert!(poller.store().written(SECTION_STATUS).is_empty());
        for mount in Mount::ALL {
            assert_eq!(energized(&poller, mount), 0);
        }
        assert_eq!(delay.pauses, [2000]);
    }

    #[test]
    fn test_look_not_found_completes_without_motion() {
        let store = MockStore::new().with(paths::LOOK_COMMAND, r#"{"look":"4","status":"pendente"}"#);
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        let outcome = block_on(poller.poll_once(&mut delay));

        assert_eq!(
            outcome,
            PollOutcome::LookNotFound {
                look: LookIndex::new(4).unwrap(),
                status_written: true,
            }
        );
        assert_eq!(
            poller.store().written(LOOK_STATUS),
            ["\"em_andamento\"", "\"concluido\""]
        );
        assert_eq!(poller.carousel().slots(), [Slot::HOME; MOUNT_COUNT]);
    }

    #[test]
    fn test_section_rotates_one_slot() {
        let store = MockStore::new().with(
            paths::SECTION_COMMAND,
            "{\"secao\":\"calçado\",\"status\":\"pendente\",\"timestamp\":1729000000000}",
        );
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        let outcome = block_on(poller.tick(&mut delay));

        assert_eq!(
            outcome,
            PollOutcome::SectionRotated {
                mount: Mount::Footwear,
                slot: slot(2),
                status_written: true,
            }
        );
        assert_eq!(
            poller.store().written(SECTION_STATUS),
            ["\"em_andamento\"", "\"concluido\""]
        );
        assert_eq!(energized(&poller, Mount::Footwear), 16 + 1);
        assert_eq!(delay.pauses, [2000]);
    }

    #[test]
    fn test_section_retries_in_progress_write() {
        let store = MockStore::new()
            .with(paths::SECTION_COMMAND, r#"{"secao":"superior","status":"pendente"}"#)
            .failing_writes(2);
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        let outcome = block_on(poller.tick(&mut delay));

        assert!(matches!(outcome, PollOutcome::SectionRotated { mount: Mount::Upper, .. }));
        assert_eq!(
            poller.store().written(SECTION_STATUS),
            ["\"em_andamento\"", "\"em_andamento\"", "\"em_andamento\"", "\"concluido\""]
        );
        assert_eq!(delay.pauses, [1000, 1000, 2000]);
    }

    #[test]
    fn test_section_all_writes_failing_never_rotates() {
        let store = MockStore::new()
            .with(paths::SECTION_COMMAND, r#"{"secao":"inferior","status":"pendente"}"#)
            .failing_writes(3);
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        let outcome = block_on(poller.tick(&mut delay));

        assert_eq!(outcome, PollOutcome::SectionDeferred { mount: Mount::Lower });
        assert_eq!(poller.store().written(SECTION_STATUS).len(), 3);
        assert_eq!(energized(&poller, Mount::Lower), 0);
        assert_eq!(poller.carousel().slot(Mount::Lower), Slot::HOME);
        assert_eq!(delay.pauses, [1000, 1000, 1000, 2000]);
    }

    #[test]
    fn test_unknown_section_left_pending() {
        let store = MockStore::new().with(paths::SECTION_COMMAND, r#"{"secao":"chapeu","status":"pendente"}"#);
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        assert_eq!(block_on(poller.tick(&mut delay)), PollOutcome::SectionIgnored);
        assert!(poller.store().writes.is_empty());
        assert_eq!(delay.pauses, [2000]);
    }

    #[test]
    fn test_unreachable_store_is_idle() {
        let store = MockStore::new()
            .with(paths::LOOK_COMMAND, r#"{"look":"1","status":"pendente"}"#)
            .failing_reads();
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        assert_eq!(block_on(poller.tick(&mut delay)), PollOutcome::Idle);
        assert!(poller.store().writes.is_empty());
    }

    #[test]
    fn test_positions_carry_across_commands() {
        let store = MockStore::new()
            .with(paths::LOOK_COMMAND, r#"{"look":"3","status":"pendente"}"#)
            .with("/posicoesRoupas/look3", r#"{"superior":"a","inferior":"b"}"#)
            .with("/mapaPecas/a/posicao", "4")
            .with("/mapaPecas/b/posicao", "2");
        let mut poller = poller(store);
        let mut delay = CountingDelay::default();

        block_on(poller.poll_once(&mut delay));
        assert_eq!(poller.carousel().slots(), [slot(4), slot(2), Slot::HOME]);

        // Same look again: each mount loops back to where it is
        let outcome = block_on(poller.poll_once(&mut delay));
        let PollOutcome::LookAligned { mounts, .. } = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert!(matches!(mounts[0], MountReport::Rotated { revolutions: 4, .. }));
        assert!(matches!(mounts[1], MountReport::Rotated { revolutions: 4, .. }));
        assert_eq!(poller.carousel().slots(), [slot(4), slot(2), Slot::HOME]);
    }
}
