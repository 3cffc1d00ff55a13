use crate::app::{HostHandle, ShutdownReason};
use crate::error::Result;
use crate::gesture::{HitRegion, InputEvent, KeyInput};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::stdout;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Terminal front-end: mouse clicks and keys become host input events
pub struct TerminalInput {
    host: HostHandle,
    cancellation_token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl TerminalInput {
    pub fn new(host: HostHandle) -> Self {
        Self {
            host,
            cancellation_token: CancellationToken::new(),
            task: None,
        }
    }

    /// Start listening for terminal input
    pub fn start(&mut self) -> Result<()> {
        info!(
            target: "dreamreel::input",
            "Terminal input active: click = gesture, ctrl+click = fullscreen, space = mute, \
             i = diagnostics, n = next, t = tap, 3 = three-finger tap, q/Esc = quit"
        );

        enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), EnableMouseCapture) {
            warn!(target: "dreamreel::input", "Mouse capture unavailable: {}", e);
        }

        let host = self.host.clone();
        let cancellation_token = self.cancellation_token.clone();

        // crossterm polling blocks, so it lives on the blocking pool
        self.task = Some(task::spawn_blocking(move || {
            loop {
                if cancellation_token.is_cancelled() {
                    debug!(target: "dreamreel::input", "Terminal input handler stopping");
                    break;
                }

                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => match event::read() {
                        Ok(event) => {
                            for input in translate(&event) {
                                if !host.send_input(input) {
                                    debug!(target: "dreamreel::input", "Host gone, input handler exiting");
                                    return;
                                }
                            }
                        }
                        Err(e) => warn!(target: "dreamreel::input", "Failed to read terminal event: {}", e),
                    },
                    Ok(false) => {}
                    Err(e) => {
                        error!(target: "dreamreel::input", "Error polling terminal events: {}", e);
                        host.request_shutdown(ShutdownReason::Error(e.to_string()));
                        break;
                    }
                }
            }
        }));

        Ok(())
    }

    /// Stop the handler and restore the terminal
    pub async fn stop(&mut self) -> Result<()> {
        info!(target: "dreamreel::input", "Stopping terminal input handler");
        self.cancellation_token.cancel();

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(target: "dreamreel::input", "Terminal input task ended abnormally: {}", e);
            }
        }

        let _ = execute!(stdout(), DisableMouseCapture);
        disable_raw_mode()?;
        debug!(target: "dreamreel::input", "Raw mode disabled");
        Ok(())
    }
}

/// Map one terminal event to the input events it stands for
pub fn translate(event: &Event) -> Vec<InputEvent> {
    match event {
        Event::Mouse(mouse) => translate_mouse(mouse).into_iter().collect(),
        Event::Key(key) if key.kind == KeyEventKind::Press => translate_key(key),
        _ => Vec::new(),
    }
}

fn translate_mouse(mouse: &MouseEvent) -> Option<InputEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerClick {
            modifier: mouse
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER),
            region: HitRegion::Surface,
        }),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Vec<InputEvent> {
    let button = |region| InputEvent::PointerClick {
        modifier: false,
        region,
    };

    match key.code {
        KeyCode::Char(' ') => vec![InputEvent::Key(KeyInput::Space)],
        KeyCode::Esc => vec![InputEvent::Key(KeyInput::Escape)],
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            vec![InputEvent::Key(KeyInput::Escape)]
        }
        KeyCode::Char('n') => vec![button(HitRegion::AdvanceButton)],
        KeyCode::Char('o') => vec![button(HitRegion::InfoButton)],
        KeyCode::Char('l') => vec![button(HitRegion::ExternalLinkButton)],
        KeyCode::Char('t') => vec![InputEvent::touch_start(1), InputEvent::touch_end(0)],
        KeyCode::Char('3') => vec![
            InputEvent::touch_start(1),
            InputEvent::touch_start(3),
            InputEvent::touch_end(0),
        ],
        KeyCode::Char(c) => vec![InputEvent::Key(KeyInput::Char(c))],
        _ => {
            debug!(target: "dreamreel::input", "Ignoring key {:?}", key.code);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn click(modifiers: KeyModifiers) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row: 5,
            modifiers,
        })
    }

    #[test]
    fn test_left_click_maps_to_surface_click() {
        assert_eq!(translate(&click(KeyModifiers::NONE)), vec![InputEvent::click()]);
        assert_eq!(
            translate(&click(KeyModifiers::CONTROL)),
            vec![InputEvent::PointerClick {
                modifier: true,
                region: HitRegion::Surface,
            }]
        );
    }

    #[test]
    fn test_keys_map_to_inputs() {
        assert_eq!(
            translate(&key(KeyCode::Char(' '), KeyModifiers::NONE)),
            vec![InputEvent::Key(KeyInput::Space)]
        );
        assert_eq!(
            translate(&key(KeyCode::Char('q'), KeyModifiers::NONE)),
            vec![InputEvent::Key(KeyInput::Char('q'))]
        );
        assert_eq!(
            translate(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            vec![InputEvent::Key(KeyInput::Escape)]
        );
        assert_eq!(
            translate(&key(KeyCode::Char('n'), KeyModifiers::NONE)),
            vec![InputEvent::PointerClick {
                modifier: false,
                region: HitRegion::AdvanceButton,
            }]
        );
        assert_eq!(translate(&key(KeyCode::Char('3'), KeyModifiers::NONE)).len(), 3);
    }

    #[test]
    fn test_release_events_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(translate(&release).is_empty());
        assert!(translate(&Event::FocusGained).is_empty());
    }
}
