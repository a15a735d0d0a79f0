//! Application state and logic for the Pinpad TUI.
//!
//! `App` owns every piece of mutable state on the screen. Components turn
//! input into `Msg`s, `App::update` applies them to the PIN entry controller
//! and answers with the `Effect`s the runtime must carry out (notifying the
//! PIN sink, arming or cancelling the delayed reset, opening the dialog).

use pinpad_types::{Effect, KeypadKey, Modal, Msg};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::TuiConfig;
use crate::cmd::{LogPinSink, PinSink};
use crate::ui::components::common::{ConfirmationModalOpts, ConfirmationModalState, ModalButton};
use crate::ui::components::pin_entry::{EntryOutcome, PinEntryState};
use crate::ui::theme::{self, Theme, theme_helpers::ButtonType};

pub const ALERT_TITLE: &str = "PIN Set Successfully";
pub const ALERT_MESSAGE: &str = "Your PIN has been set successfully.";

/// Cross-cutting shared context owned by the App.
pub struct SharedCtx {
    /// Active color theme
    pub theme: Box<dyn Theme>,
    /// Canonical id of the active theme
    pub theme_id: &'static str,
    /// Receives the joined PIN on every successful submit
    pub pin_sink: Box<dyn PinSink>,
}

impl SharedCtx {
    pub fn new(preferred_theme: Option<&str>, pin_sink: Box<dyn PinSink>) -> Self {
        let loaded = theme::load(preferred_theme);
        debug!(theme = loaded.definition.id, "Theme selected");
        Self {
            theme: loaded.theme,
            theme_id: loaded.definition.id,
            pin_sink,
        }
    }
}

impl std::fmt::Debug for SharedCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCtx").field("theme_id", &self.theme_id).finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct App {
    /// Shared, cross-cutting context (theme, PIN sink)
    pub ctx: SharedCtx,
    /// PIN buffer, cursor and keypad navigation
    pub pin_entry: PinEntryState,
    /// Content of the acknowledgment dialog
    pub confirmation_modal_state: ConfirmationModalState,
    /// Focus ring rebuilt before every render
    pub focus: Focus,
    /// Modal currently shown above the screen
    pub open_modal: Option<Modal>,
    /// Frame of the success pulse
    pub pulse_idx: usize,

    container_focus: FocusFlag,
}

impl App {
    pub fn new(config: &TuiConfig) -> Self {
        Self::with_sink(config, Box::new(LogPinSink))
    }

    pub fn with_sink(config: &TuiConfig, pin_sink: Box<dyn PinSink>) -> Self {
        let mut app = Self {
            ctx: SharedCtx::new(config.theme.as_deref(), pin_sink),
            pin_entry: PinEntryState::new(config.reset, config.mask_digits),
            confirmation_modal_state: ConfirmationModalState::default(),
            focus: Focus::default(),
            open_modal: None,
            pulse_idx: 0,
            container_focus: FocusFlag::named("app"),
        };
        app.focus = FocusBuilder::build_for(&app);
        app.focus.focus(&app.pin_entry.f_keypad);
        app
    }

    /// Whether a visible animation is running (the success pulse).
    pub fn is_animating(&self) -> bool {
        self.pin_entry.controller().is_success()
    }

    /// Applies a message and returns the effects the runtime must execute.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.is_animating() {
                    self.pulse_idx = self.pulse_idx.wrapping_add(1);
                } else {
                    self.pulse_idx = 0;
                }
                Vec::new()
            }
            Msg::Resize(..) => Vec::new(),
            Msg::KeypadPressed(key) => {
                let controller = self.pin_entry.controller_mut();
                let outcome = match key {
                    KeypadKey::Digit(token) => controller.enter_digit(*token),
                    KeypadKey::Erase => controller.erase(),
                };
                if outcome == EntryOutcome::AppliedAndCancelledReset {
                    self.pulse_idx = 0;
                    return vec![Effect::CancelReset];
                }
                Vec::new()
            }
            Msg::SubmitRequested => {
                let Some(submission) = self.pin_entry.controller_mut().submit() else {
                    return Vec::new();
                };
                self.show_pin_set_alert();
                vec![
                    Effect::PinSubmitted(submission.pin),
                    Effect::ScheduleReset {
                        session: submission.session,
                        delay: submission.delay,
                    },
                    Effect::ShowModal(Modal::PinSetAlert),
                ]
            }
            Msg::ResetElapsed(session) => {
                if self.pin_entry.controller_mut().apply_reset(*session) {
                    info!(%session, "PIN entry reset");
                    self.pulse_idx = 0;
                }
                Vec::new()
            }
            Msg::AlertDismissed => vec![Effect::CloseModal],
        }
    }

    /// Fills the dialog state with the acknowledgment copy.
    pub fn show_pin_set_alert(&mut self) {
        self.confirmation_modal_state.update_opts(ConfirmationModalOpts {
            buttons: vec![ModalButton::new("OK", ButtonType::Primary)],
            title: Some(ALERT_TITLE.to_string()),
            message: Some(ALERT_MESSAGE.to_string()),
        });
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        if self.open_modal.is_some() {
            builder.widget(&self.confirmation_modal_state);
        } else {
            builder.widget(&self.pin_entry);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
