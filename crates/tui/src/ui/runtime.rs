//! Runtime: event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop over terminal input, background task
//!   completions, the animation ticker and Ctrl+C.
//! - Route input to `MainView` and hand returned `Effect`s to `cmd`.
//!
//! Event Loop Strategy
//! - A dedicated OS thread blocks on `crossterm::event::read()` and forwards
//!   events over a channel.
//! - Smart ticking: fast interval (100 ms) only while an upload is
//!   outstanding so the spinner animates; long interval (5 s) when idle.
//! - Effects are executed as soon as the message that produced them has been
//!   handled, so the copied-marker timer starts at the moment of the copy.
//! - Every message is handled to completion before the next one is taken.
use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

use crate::app::{App, Effect, Msg, SharedCtx};
use crate::cmd;
use crate::ui::components::Component;
use crate::ui::main_component::MainView;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
///
/// Mouse movement is dropped here; nothing on screen reacts to hover.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Mouse(mouse)) if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) => {}
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to read terminal event");
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture, DisableBracketedPaste)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Term, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();
        main_view.render(frame, area, app);
    })?;
    Ok(())
}

fn is_quit_key(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

/// Route one terminal event. Key releases and repeats are ignored.
fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Paste(text) => {
            // Dropping a file onto most terminals pastes its path.
            app.path_input.set_input(text.trim().trim_matches(['\'', '"']));
            main_view.handle_message(app, Msg::SelectPath)
        }
        _ => Vec::new(),
    }
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop, and restores the terminal whether or not the loop failed.
pub async fn run_app(ctx: SharedCtx, initial_path: Option<String>) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::default();
    let mut app = App::new(ctx);

    let mut effects = Vec::new();
    if let Some(path) = initial_path {
        app.path_input.set_input(path);
        effects.extend(main_view.handle_message(&mut app, Msg::SelectPath));
    }

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &mut main_view, &mut input_receiver, effects).await;
    cleanup_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Term,
    app: &mut App,
    main_view: &mut MainView,
    input_receiver: &mut mpsc::Receiver<Event>,
    mut effects: Vec<Effect>,
) -> Result<()> {
    let mut pending: FuturesUnordered<JoinHandle<Msg>> = FuturesUnordered::new();
    pending.extend(cmd::run_effects(&app.ctx.service, std::mem::take(&mut effects)));

    // Ticking strategy: fast while animating, very slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(terminal, app, main_view)?;

    loop {
        let needs_animation = app.generator.is_uploading();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let needs_render;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input thread is gone; shut down cleanly.
                    break;
                };
                if is_quit_key(&event) {
                    break;
                }
                effects.extend(handle_input_event(app, main_view, event));
                needs_render = true;
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(app, Msg::Tick));
                needs_render = needs_animation;
            }

            Some(joined) = pending.next(), if !pending.is_empty() => {
                match joined {
                    Ok(msg) => effects.extend(main_view.handle_message(app, msg)),
                    Err(error) => tracing::error!(%error, "background task failed"),
                }
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if !effects.is_empty() {
            pending.extend(cmd::run_effects(&app.ctx.service, std::mem::take(&mut effects)));
        }

        if needs_render {
            render(terminal, app, main_view)?;
        }
    }

    Ok(())
}
