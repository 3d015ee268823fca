//! Terminal driver that mounts image views and pumps their events.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, TerminalOptions, Viewport};
use tokio::sync::mpsc;
use tracing::info;

use crate::domain::entities::LoadState;
use crate::infrastructure::config::ViewConfig;
use crate::infrastructure::image::{ImageLoadedEvent, ImageLoader};

use super::widgets::ImageView;

/// How a mounted view ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    /// The image is displayed.
    Loaded,
    /// The placeholder is displayed.
    Failed,
    /// The user quit before the load finished.
    Cancelled,
}

impl std::fmt::Display for ViewOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Mounts image views inline in the terminal, one after another.
pub struct App {
    loader: Arc<ImageLoader>,
    view_config: ViewConfig,
}

impl App {
    /// Creates the driver.
    #[must_use]
    pub fn new(loader: Arc<ImageLoader>, view_config: ViewConfig) -> Self {
        Self {
            loader,
            view_config,
        }
    }

    /// Mounts `1 + repeat` fresh views of `url`, each until it settles or
    /// the user quits.
    ///
    /// # Errors
    /// Returns error if the terminal cannot be set up or drawn.
    pub async fn run(&self, url: &str, repeat: u32) -> Result<Vec<ViewOutcome>> {
        let mut outcomes = Vec::new();

        for mount in 0..=repeat {
            let mut terminal = ratatui::try_init_with_options(TerminalOptions {
                viewport: Viewport::Inline(self.view_config.height),
            })?;
            let outcome = self.mount(&mut terminal, url).await;
            ratatui::restore();

            let outcome = outcome?;
            info!(mount, outcome = %outcome, "View settled");
            outcomes.push(outcome);
            if outcome == ViewOutcome::Cancelled {
                break;
            }
        }

        Ok(outcomes)
    }

    async fn mount(&self, terminal: &mut DefaultTerminal, url: &str) -> Result<ViewOutcome> {
        let (tx, mut rx) = mpsc::unbounded_channel::<ImageLoadedEvent>();
        let mut input = EventStream::new();
        let mut ticker = tokio::time::interval(Duration::from_millis(
            self.view_config.spinner_interval_ms.max(1),
        ));

        let mut view = ImageView::new(url, self.view_config.width, self.view_config.height)
            .with_corner_radius(self.view_config.corner_radius);
        view.on_appear(&self.loader, &tx);

        loop {
            terminal.draw(|frame| frame.render_widget(&view, frame.area()))?;

            match view.state() {
                LoadState::Loaded(_) => return Ok(ViewOutcome::Loaded),
                LoadState::Failed => return Ok(ViewOutcome::Failed),
                LoadState::Idle | LoadState::Loading => {}
            }

            tokio::select! {
                Some(event) = rx.recv() => {
                    view.apply(event);
                }
                _ = ticker.tick() => view.tick(),
                Some(Ok(Event::Key(key))) = input.next() => {
                    if is_quit(key) {
                        view.on_disappear(&self.loader);
                        return Ok(ViewOutcome::Cancelled);
                    }
                }
            }
        }
    }
}

fn is_quit(key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(KeyCode::Esc, KeyModifiers::NONE, true ; "escape")]
    #[test_case(KeyCode::Char('q'), KeyModifiers::NONE, true ; "q")]
    #[test_case(KeyCode::Char('c'), KeyModifiers::CONTROL, true ; "ctrl_c")]
    #[test_case(KeyCode::Char('c'), KeyModifiers::NONE, false ; "plain_c")]
    #[test_case(KeyCode::Enter, KeyModifiers::NONE, false ; "enter")]
    fn test_quit_keys(code: KeyCode, modifiers: KeyModifiers, expected: bool) {
        assert_eq!(is_quit(KeyEvent::new(code, modifiers)), expected);
    }

    #[test]
    fn test_release_is_not_quit() {
        let mut key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(!is_quit(key));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ViewOutcome::Cancelled.to_string(), "cancelled");
    }
}
