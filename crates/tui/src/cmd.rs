//! Execution of non-visual effects.
//!
//! The runtime hands every batch of effects to [`run_from_effects`]. Effects
//! that talk to collaborators outside the screen (the PIN sink and the reset
//! timer) are executed here; navigation effects are handed back to the
//! runtime, which owns the views.

use std::time::Duration;

use pinpad_types::{Effect, SessionId};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::app::App;

/// Receives the joined PIN once per successful submit.
pub trait PinSink {
    fn pin_set(&mut self, pin: &str);
}

/// Default sink: surfaces the submission through `tracing`. The digits are
/// only written at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPinSink;

impl PinSink for LogPinSink {
    fn pin_set(&mut self, pin: &str) {
        info!(length = pin.chars().count(), "PIN set");
        debug!(pin, "PIN set");
    }
}

/// The single cancellable delayed reset.
///
/// Arming replaces any previous timer; the session travels with the deadline
/// so the controller can still reject a reset for a session it no longer
/// expects.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResetTimer {
    armed: Option<(SessionId, Instant)>,
}

impl ResetTimer {
    pub fn arm(&mut self, session: SessionId, delay: Duration, now: Instant) {
        self.armed = Some((session, now + delay));
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.map(|(_, deadline)| deadline)
    }

    /// Disarms and returns the session when its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<SessionId> {
        match self.armed {
            Some((session, deadline)) if deadline <= now => {
                self.armed = None;
                Some(session)
            }
            _ => None,
        }
    }
}

/// Effects the runtime still has to apply after [`run_from_effects`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandBatch {
    /// `ShowModal`, `CloseModal` and `Exit`, in their original order.
    pub navigation: Vec<Effect>,
}

impl CommandBatch {
    pub fn wants_exit(&self) -> bool {
        self.navigation.contains(&Effect::Exit)
    }
}

pub fn run_from_effects(app: &mut App, timer: &mut ResetTimer, effects: Vec<Effect>) -> CommandBatch {
    let mut batch = CommandBatch::default();
    for effect in effects {
        match effect {
            Effect::PinSubmitted(pin) => app.ctx.pin_sink.pin_set(&pin),
            Effect::ScheduleReset { session, delay } => {
                debug!(%session, delay_ms = delay.as_millis() as u64, "Arming reset timer");
                timer.arm(session, delay, Instant::now());
            }
            Effect::CancelReset => {
                debug!("Cancelling reset timer");
                timer.cancel();
            }
            navigation @ (Effect::ShowModal(_) | Effect::CloseModal | Effect::Exit) => batch.navigation.push(navigation),
        }
    }
    batch
}
