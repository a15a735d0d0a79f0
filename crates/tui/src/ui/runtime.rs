//! Runtime: unified event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop that handles input, the reset timer and the
//!   success pulse.
//! - Route keys to the focused component and execute returned `Effect`s.
//! - Render only after something visible changed.
//!
//! Ticking
//! - Fast interval (100 ms) only while the success pulse is running; long
//!   interval (5 s) when idle.
//! - The delayed reset is not a tick: the loop sleeps until the armed
//!   deadline and then feeds `Msg::ResetElapsed` for that session.
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pinpad_types::{Effect, Msg};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::TuiConfig;
use crate::app::App;
use crate::cmd::{self, ResetTimer};
use crate::ui::main_component::MainView;

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);

    std::thread::spawn(move || {
        let sixteen_ms = Duration::from_millis(16);
        let mut last_mouse_move = Instant::now();
        loop {
            match event::poll(sixteen_ms) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    tracing::warn!("Failed to poll events: {}", e);
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    // Throttle mouse move events to once per 16 ms.
                    let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_move.elapsed() < sixteen_ms {
                            continue;
                        }
                        last_mouse_move = Instant::now();
                    }
                    if let Err(e) = sender.blocking_send(event) {
                        tracing::warn!("Failed to send event: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to read event: {}", e);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = FocusBuilder::rebuild_for(app, Some(old_focus));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => app.update(&Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Resolves once the armed reset deadline has passed; never resolves when
/// nothing is armed.
async fn reset_deadline_elapsed(deadline: Option<time::Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Feeds `Msg::ResetElapsed` for the armed session once it is due.
fn fire_due_reset(app: &mut App, reset_timer: &mut ResetTimer) -> Option<Vec<Effect>> {
    let session = reset_timer.take_due(time::Instant::now())?;
    debug!(%session, "Reset timer elapsed");
    Some(app.update(&Msg::ResetElapsed(session)))
}

/// Executes effects until none are left. Returns `true` when the app should exit.
fn process_effects(app: &mut App, main_view: &mut MainView, reset_timer: &mut ResetTimer, effects: Vec<Effect>) -> bool {
    let batch = cmd::run_from_effects(app, reset_timer, effects);
    if batch.wants_exit() {
        return true;
    }
    for effect in batch.navigation {
        match effect {
            Effect::ShowModal(modal) => main_view.set_open_modal_kind(app, Some(modal)),
            Effect::CloseModal => main_view.set_open_modal_kind(app, None),
            _ => {}
        }
    }
    false
}

/// Entry point for the TUI runtime: sets up the terminal, spawns the input
/// producer, runs the event loop, and performs cleanup on exit.
pub async fn run_app(config: TuiConfig) -> Result<()> {
    let mut app = App::new(&config);
    let mut main_view = MainView::default();
    let mut reset_timer = ResetTimer::default();

    let mut terminal = setup_terminal()?;
    let mut input_receiver = spawn_input_thread();
    info!(theme = app.ctx.theme_id, "PIN entry screen started");

    // Ticking strategy: fast while animating, very slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    loop {
        let needs_animation = app.is_animating();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let reset_deadline = reset_timer.deadline();
        let mut needs_render = false;
        let mut effects = Vec::new();
        tokio::select! {
            // Terminal input events
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; break out to shut down cleanly.
                    break;
                };
                if let Event::Key(key_event) = event
                    && key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break;
                }
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
                needs_render = true;
            }

            // Delayed reset after a successful submit
            _ = reset_deadline_elapsed(reset_deadline), if reset_deadline.is_some() => {
                if let Some(reset_effects) = fire_due_reset(&mut app, &mut reset_timer) {
                    effects.extend(reset_effects);
                    needs_render = true;
                }
            }

            // Periodic animation tick
            _ = ticker.tick() => {
                effects.extend(app.update(&Msg::Tick));
                needs_render = needs_animation;
            }

            // Handle Ctrl+C
            _ = signal::ctrl_c() => { break; }
        }

        if !effects.is_empty() {
            needs_render = true;
            if process_effects(&mut app, &mut main_view, &mut reset_timer, effects) {
                break;
            }
        }

        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    info!("PIN entry screen closed");
    cleanup_terminal(&mut terminal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use pinpad_types::{KeypadKey, Modal};

    #[test]
    fn submit_opens_alert_and_close_returns_focus() {
        let mut app = test_app();
        let mut main_view = MainView::default();
        let mut timer = ResetTimer::default();
        for token in "2468".chars() {
            app.update(&Msg::KeypadPressed(KeypadKey::Digit(token)));
        }

        let effects = app.update(&Msg::SubmitRequested);
        assert!(!process_effects(&mut app, &mut main_view, &mut timer, effects));
        assert_eq!(app.open_modal, Some(Modal::PinSetAlert));
        assert!(main_view.modal_view.is_some());
        assert!(timer.deadline().is_some());

        let effects = app.update(&Msg::AlertDismissed);
        assert!(!process_effects(&mut app, &mut main_view, &mut timer, effects));
        assert_eq!(app.open_modal, None);
        assert!(main_view.modal_view.is_none());
        assert!(app.pin_entry.is_keypad_focused());
    }

    fn submit(app: &mut App, main_view: &mut MainView, timer: &mut ResetTimer) {
        let effects = app.update(&Msg::SubmitRequested);
        assert!(!process_effects(app, main_view, timer, effects));
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_reset_clears_the_pin_after_the_delay() {
        let mut app = test_app();
        let mut main_view = MainView::default();
        let mut timer = ResetTimer::default();
        for token in "1357".chars() {
            app.update(&Msg::KeypadPressed(KeypadKey::Digit(token)));
        }
        submit(&mut app, &mut main_view, &mut timer);
        let deadline = timer.deadline();
        assert!(deadline.is_some());

        time::advance(Duration::from_millis(1499)).await;
        assert!(fire_due_reset(&mut app, &mut timer).is_none());
        assert!(app.pin_entry.snapshot().success);

        reset_deadline_elapsed(deadline).await;
        assert!(fire_due_reset(&mut app, &mut timer).is_some());
        let snapshot = app.pin_entry.snapshot();
        assert_eq!(snapshot.cursor, 0);
        assert_eq!(snapshot.slots, [None; 4]);
        assert!(!snapshot.success);
        assert_eq!(timer.deadline(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn resubmit_pushes_the_reset_back() {
        let mut app = test_app();
        let mut main_view = MainView::default();
        let mut timer = ResetTimer::default();
        for token in "1357".chars() {
            app.update(&Msg::KeypadPressed(KeypadKey::Digit(token)));
        }
        submit(&mut app, &mut main_view, &mut timer);
        time::advance(Duration::from_millis(1000)).await;
        let effects = app.update(&Msg::AlertDismissed);
        process_effects(&mut app, &mut main_view, &mut timer, effects);
        submit(&mut app, &mut main_view, &mut timer);
        assert_eq!(app.open_modal, Some(Modal::PinSetAlert));

        // Past the first deadline, short of the second.
        time::advance(Duration::from_millis(600)).await;
        assert!(fire_due_reset(&mut app, &mut timer).is_none());
        assert!(app.pin_entry.snapshot().is_complete());

        reset_deadline_elapsed(timer.deadline()).await;
        assert!(fire_due_reset(&mut app, &mut timer).is_some());
        assert_eq!(app.pin_entry.snapshot().cursor, 0);
    }

    #[test]
    fn exit_effect_stops_the_loop() {
        let mut app = test_app();
        let mut main_view = MainView::default();
        let mut timer = ResetTimer::default();
        assert!(process_effects(&mut app, &mut main_view, &mut timer, vec![Effect::Exit]));
    }

    #[test]
    fn resize_is_accepted_without_effects() {
        let mut app = test_app();
        let mut main_view = MainView::default();
        assert!(handle_input_event(&mut app, &mut main_view, Event::Resize(80, 24)).is_empty());
        assert!(handle_input_event(&mut app, &mut main_view, Event::FocusLost).is_empty());
    }
}
