// App state and main event loop.
// Holds one card per profile plus the console, dispatches lookups, and handles keyboard input.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::console::ConsoleBuffer;
use crate::error::ProfileError;
use crate::github::ProfileBundle;
use crate::service::ProfileService;
use crate::ui;
use crate::view::ProfileView;

/// Result of one profile lookup, tagged with the card and load it belongs to.
#[derive(Debug)]
pub struct ProfileUpdate {
    pub index: usize,
    /// Load generation of the card when the lookup started.
    pub generation: u64,
    pub result: Result<ProfileBundle, ProfileError>,
}

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Profile(usize),
    Console,
}

/// Main application state.
pub struct App {
    service: ProfileService,
    /// One card per requested username, in command-line order.
    pub cards: Vec<ProfileView>,
    /// Per-card load counter; updates from earlier loads are dropped.
    generations: Vec<u64>,
    /// Currently active tab.
    pub active_tab: Tab,
    /// Vertical scroll of the README pane.
    pub readme_scroll: u16,
    pub console: ConsoleBuffer,
    /// Console messages already seen, for the unread badge.
    console_seen: usize,
    /// Whether the app should exit.
    pub should_quit: bool,
    updates_tx: UnboundedSender<ProfileUpdate>,
    updates_rx: UnboundedReceiver<ProfileUpdate>,
}

impl App {
    pub fn new(service: ProfileService, usernames: &[String], console: ConsoleBuffer) -> Self {
        let (updates_tx, updates_rx) = unbounded_channel();
        Self {
            service,
            cards: usernames.iter().map(|u| ProfileView::loading(u)).collect(),
            generations: vec![0; usernames.len()],
            active_tab: Tab::Profile(0),
            readme_scroll: 0,
            console,
            console_seen: 0,
            should_quit: false,
            updates_tx,
            updates_rx,
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.service.cache_enabled()
    }

    /// Start lookups for every card.
    pub fn load_all(&mut self) {
        for index in 0..self.cards.len() {
            self.load(index);
        }
    }

    /// Start a lookup for one card. The result arrives through the update channel.
    fn load(&mut self, index: usize) {
        let Some((username, generation)) = self.begin_load(index) else {
            return;
        };

        let service = self.service.clone();
        let tx = self.updates_tx.clone();
        tokio::spawn(async move {
            let result = service.get_profile(&username).await;
            let _ = tx.send(ProfileUpdate {
                index,
                generation,
                result,
            });
        });
    }

    /// Reset a card to loading and start its next load generation.
    fn begin_load(&mut self, index: usize) -> Option<(String, u64)> {
        let card = self.cards.get_mut(index)?;
        let generation = self.generations.get_mut(index)?;
        *generation += 1;
        let username = card.username.clone();
        *card = ProfileView::loading(&username);
        Some((username, *generation))
    }

    /// Drop cached data for the active card and fetch it again.
    pub fn reload_active(&mut self) {
        if let Tab::Profile(index) = self.active_tab {
            if let Some(card) = self.cards.get(index) {
                self.service.invalidate(&card.username);
                self.readme_scroll = 0;
                self.load(index);
            }
        }
    }

    /// Apply finished lookups to their cards.
    pub fn drain_updates(&mut self) {
        while let Ok(update) = self.updates_rx.try_recv() {
            self.apply_update(update);
        }
    }

    /// Render a finished lookup, unless the card has been reloaded since.
    pub fn apply_update(&mut self, update: ProfileUpdate) {
        if self.generations.get(update.index) != Some(&update.generation) {
            log::debug!("Dropped superseded lookup for card {}", update.index);
            return;
        }
        if let Some(card) = self.cards.get_mut(update.index) {
            if let Err(e) = &update.result {
                log::error!("GitHub profile error for {}: {}", card.username, e);
            }
            *card = ProfileView::from_result(&card.username, &update.result);
        }
    }

    /// Tabs in display order.
    pub fn tabs(&self) -> Vec<Tab> {
        (0..self.cards.len())
            .map(Tab::Profile)
            .chain(std::iter::once(Tab::Console))
            .collect()
    }

    pub fn next_tab(&mut self) {
        let tabs = self.tabs();
        let pos = tabs.iter().position(|t| *t == self.active_tab).unwrap_or(0);
        self.select_tab(tabs[(pos + 1) % tabs.len()]);
    }

    pub fn prev_tab(&mut self) {
        let tabs = self.tabs();
        let pos = tabs.iter().position(|t| *t == self.active_tab).unwrap_or(0);
        self.select_tab(tabs[(pos + tabs.len() - 1) % tabs.len()]);
    }

    fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.readme_scroll = 0;
        self.clear_console_badge_if_viewing();
    }

    /// Number of console messages not yet seen.
    pub fn console_unread(&self) -> usize {
        self.console.total().saturating_sub(self.console_seen)
    }

    /// Clear console badge when viewing console tab.
    fn clear_console_badge_if_viewing(&mut self) {
        if self.active_tab == Tab::Console {
            self.console_seen = self.console.total();
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.drain_updates();
            self.clear_console_badge_if_viewing();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.next_tab(),
            KeyCode::BackTab | KeyCode::Left => self.prev_tab(),
            KeyCode::Char('r') => self.reload_active(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.readme_scroll = self.readme_scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.readme_scroll = self.readme_scroll.saturating_sub(1);
            }
            _ => {}
        }
    }
}
