//! PIN entry controller.
//!
//! Owns the fixed-size digit buffer and the cursor, and exposes the only
//! transitions allowed on them. Presentational components never touch the
//! buffer directly; they read a [`PinSnapshot`] and report key presses.
//!
//! The cursor doubles as the count of entered digits:
//!
//! ```text
//! Empty(0) --enter--> Partial(1..3) --enter--> Full(4)
//!    ^                                           |
//!    +----------- erase / delayed reset ---------+
//! ```
//!
//! Out-of-range requests (entering past full, erasing past empty, submitting
//! an incomplete PIN) are silent no-ops.

use std::time::Duration;

use pinpad_types::{ResetPolicy, SessionId};
use pinpad_util::DEFAULT_RESET_DELAY_MS;
use tracing::{debug, trace};

/// Number of slots in the PIN buffer.
pub const PIN_LENGTH: usize = 4;

/// Result of an entry transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Out of range; buffer and cursor are unchanged.
    Ignored,
    /// The buffer changed.
    Applied,
    /// The buffer changed and the pending delayed reset was invalidated.
    AppliedAndCancelledReset,
}

/// Produced by a successful [`PinEntryController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Joined buffer contents.
    pub pin: String,
    /// Token the delayed reset must present to [`PinEntryController::apply_reset`].
    pub session: SessionId,
    /// How long to wait before resetting.
    pub delay: Duration,
}

/// Read-only view of the controller handed to presentational components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSnapshot {
    pub slots: [Option<char>; PIN_LENGTH],
    pub cursor: usize,
    pub success: bool,
}

impl PinSnapshot {
    pub fn is_complete(&self) -> bool {
        self.cursor == PIN_LENGTH
    }

    /// Index of the next slot to fill, `None` when the buffer is full.
    pub fn active_slot(&self) -> Option<usize> {
        (self.cursor < PIN_LENGTH).then_some(self.cursor)
    }
}

/// Tunables for the delayed reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSettings {
    pub delay: Duration,
    pub policy: ResetPolicy,
}

impl Default for ResetSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_RESET_DELAY_MS),
            policy: ResetPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PinEntryController {
    slots: [Option<char>; PIN_LENGTH],
    cursor: usize,
    success: bool,
    pending_reset: Option<SessionId>,
    last_session: SessionId,
    settings: ResetSettings,
}

impl PinEntryController {
    pub fn new(settings: ResetSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Writes `token` into the next free slot. Any token is accepted; the
    /// keypad only ever supplies its fixed labels.
    pub fn enter_digit(&mut self, token: char) -> EntryOutcome {
        if self.cursor >= PIN_LENGTH {
            trace!("PIN buffer full; ignoring entry");
            return EntryOutcome::Ignored;
        }
        self.slots[self.cursor] = Some(token);
        self.cursor += 1;
        self.after_edit()
    }

    /// Clears the most recently filled slot.
    pub fn erase(&mut self) -> EntryOutcome {
        if self.cursor == 0 {
            trace!("PIN buffer empty; ignoring erase");
            return EntryOutcome::Ignored;
        }
        self.cursor -= 1;
        self.slots[self.cursor] = None;
        self.after_edit()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor == PIN_LENGTH
    }

    /// Accepts the full PIN, raises the success flag and arms a new reset
    /// session. Returns `None` while incomplete. Submitting again before the
    /// reset fires supersedes the pending session.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.is_complete() {
            return None;
        }
        if let Some(previous) = self.pending_reset {
            debug!(%previous, "Resubmitted during reset delay; superseding pending reset");
        }
        let session = self.last_session.next();
        self.last_session = session;
        self.pending_reset = Some(session);
        self.success = true;
        debug!(%session, "PIN submitted; reset scheduled");
        Some(Submission {
            pin: self.joined(),
            session,
            delay: self.settings.delay,
        })
    }

    /// Applies the delayed reset armed for `session`. Stale or cancelled
    /// sessions leave the state untouched and return `false`.
    pub fn apply_reset(&mut self, session: SessionId) -> bool {
        if self.pending_reset != Some(session) {
            debug!(%session, "Ignoring stale reset");
            return false;
        }
        self.slots = [None; PIN_LENGTH];
        self.cursor = 0;
        self.success = false;
        self.pending_reset = None;
        true
    }

    pub fn snapshot(&self) -> PinSnapshot {
        PinSnapshot {
            slots: self.slots,
            cursor: self.cursor,
            success: self.success,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    fn joined(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    fn after_edit(&mut self) -> EntryOutcome {
        match (self.pending_reset, self.settings.policy) {
            (Some(session), ResetPolicy::CancelOnEdit) => {
                debug!(%session, "Edit during reset delay; cancelling pending reset");
                self.pending_reset = None;
                self.success = false;
                EntryOutcome::AppliedAndCancelledReset
            }
            _ => EntryOutcome::Applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(tokens: &str) -> PinEntryController {
        let mut controller = PinEntryController::default();
        for token in tokens.chars() {
            controller.enter_digit(token);
        }
        controller
    }

    fn as_strings(controller: &PinEntryController) -> Vec<String> {
        controller.slots.iter().map(|slot| slot.map(String::from).unwrap_or_default()).collect()
    }

    #[test]
    fn entering_four_digits_completes_the_pin() {
        let controller = filled("1234");
        assert!(controller.is_complete());
        assert_eq!(controller.cursor, 4);
        assert_eq!(as_strings(&controller), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn fifth_entry_is_ignored() {
        let mut controller = filled("1234");
        let before = controller.snapshot();
        assert_eq!(controller.enter_digit('9'), EntryOutcome::Ignored);
        assert_eq!(controller.enter_digit('0'), EntryOutcome::Ignored);
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn cursor_never_exceeds_length() {
        let mut controller = PinEntryController::default();
        for (index, token) in "0123456789.".chars().enumerate() {
            let outcome = controller.enter_digit(token);
            assert_eq!(outcome != EntryOutcome::Ignored, index < PIN_LENGTH);
            assert!(controller.cursor <= PIN_LENGTH);
        }
    }

    #[test]
    fn erase_on_empty_is_ignored() {
        let mut controller = PinEntryController::default();
        for _ in 0..3 {
            assert_eq!(controller.erase(), EntryOutcome::Ignored);
        }
        assert_eq!(controller.cursor, 0);
        assert_eq!(&controller.slots, &[None; PIN_LENGTH]);
    }

    #[test]
    fn erasing_back_to_empty() {
        let mut controller = filled("12");
        controller.erase();
        controller.erase();
        assert_eq!(controller.cursor, 0);
        assert_eq!(as_strings(&controller), vec!["", "", "", ""]);
    }

    #[test]
    fn enter_then_erase_round_trips_from_any_cursor() {
        for prefix in ["", "1", "12", "123"] {
            let mut controller = filled(prefix);
            let before = controller.snapshot();
            for token in ['5', '.', '0'] {
                controller.enter_digit(token);
                controller.erase();
                assert_eq!(controller.snapshot(), before);
            }
        }
    }

    #[test]
    fn slots_past_cursor_stay_empty() {
        let mut controller = filled("987");
        controller.erase();
        controller.enter_digit('1');
        controller.erase();
        controller.erase();
        let snapshot = controller.snapshot();
        assert!(snapshot.slots[snapshot.cursor..].iter().all(Option::is_none));
        assert!(snapshot.slots[..snapshot.cursor].iter().all(Option::is_some));
    }

    #[test]
    fn complete_iff_four_net_entries() {
        let mut controller = filled("123");
        assert!(!controller.is_complete());
        controller.enter_digit('4');
        assert!(controller.is_complete());
        controller.erase();
        assert!(!controller.is_complete());
        controller.enter_digit('.');
        assert!(controller.is_complete());
    }

    #[test]
    fn non_digit_tokens_are_accepted() {
        let controller = filled(".0.0");
        assert!(controller.is_complete());
        assert_eq!(controller.joined(), ".0.0");
    }

    #[test]
    fn active_slot_tracks_cursor() {
        assert_eq!(filled("").snapshot().active_slot(), Some(0));
        assert_eq!(filled("12").snapshot().active_slot(), Some(2));
        assert_eq!(filled("1234").snapshot().active_slot(), None);
    }

    #[test]
    fn submit_while_incomplete_is_ignored() {
        let mut controller = filled("123");
        assert_eq!(controller.submit(), None);
        assert!(!controller.is_success());
        assert_eq!(controller.pending_reset, None);
    }

    #[test]
    fn submit_then_reset_returns_to_empty() {
        let mut controller = filled("1234");
        let submission = controller.submit().expect("complete PIN submits");
        assert_eq!(submission.pin, "1234");
        assert_eq!(submission.delay, Duration::from_millis(1500));
        assert!(controller.is_success());

        assert!(controller.apply_reset(submission.session));
        assert_eq!(controller.cursor, 0);
        assert_eq!(&controller.slots, &[None; PIN_LENGTH]);
        assert!(!controller.is_success());
        assert_eq!(controller.pending_reset, None);
    }

    #[test]
    fn resubmit_during_delay_supersedes_pending_reset() {
        let mut controller = filled("1234");
        let first = controller.submit().unwrap();
        let second = controller.submit().expect("full buffer submits again");
        assert_eq!(second.pin, "1234");
        assert_ne!(first.session, second.session);
        assert_eq!(controller.pending_reset, Some(second.session));

        // The superseded timer is stale; only the latest one resets.
        assert!(!controller.apply_reset(first.session));
        assert!(controller.is_complete());
        assert!(controller.is_success());
        assert!(controller.apply_reset(second.session));
        assert_eq!(controller.cursor, 0);
    }

    #[test]
    fn sessions_are_unique_per_submit() {
        let mut controller = filled("1234");
        let first = controller.submit().unwrap();
        controller.apply_reset(first.session);
        for token in "5678".chars() {
            controller.enter_digit(token);
        }
        let second = controller.submit().unwrap();
        assert_ne!(first.session, second.session);
        assert!(!controller.apply_reset(first.session));
        assert!(controller.is_complete());
    }

    #[test]
    fn editing_cancels_pending_reset_by_default() {
        let mut controller = filled("1234");
        let submission = controller.submit().unwrap();
        assert_eq!(controller.erase(), EntryOutcome::AppliedAndCancelledReset);
        assert!(!controller.is_success());
        assert_eq!(controller.pending_reset, None);

        controller.enter_digit('7');
        assert!(!controller.apply_reset(submission.session));
        assert_eq!(as_strings(&controller), vec!["1", "2", "3", "7"]);
    }

    #[test]
    fn clobber_policy_resets_over_new_entry() {
        let mut controller = PinEntryController::new(ResetSettings {
            delay: Duration::from_millis(10),
            policy: ResetPolicy::Clobber,
        });
        for token in "1234".chars() {
            controller.enter_digit(token);
        }
        let submission = controller.submit().unwrap();
        assert_eq!(submission.delay, Duration::from_millis(10));
        assert_eq!(controller.erase(), EntryOutcome::Applied);
        assert!(controller.is_success());

        assert!(controller.apply_reset(submission.session));
        assert_eq!(controller.cursor, 0);
        assert!(!controller.is_success());
    }

    #[test]
    fn machine_is_reusable_after_reset() {
        let mut controller = PinEntryController::default();
        for round in 0..3 {
            for token in "2468".chars() {
                controller.enter_digit(token);
            }
            let submission = controller.submit().unwrap_or_else(|| panic!("round {round} submits"));
            assert!(controller.apply_reset(submission.session));
        }
        assert_eq!(controller.snapshot().cursor, 0);
    }
}
