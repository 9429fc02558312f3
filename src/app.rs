//! Application state and event handling for basket

use crate::config::Config;
use crate::groceries::{load_items, save_items, BlobStore, FileBlobStore, ItemStore};
use crate::services::recipe::{self, ChatBackend, RecipeError, UreqBackend};
use crate::services::reminder::{self, DesktopNotifier, Notifier};
use crate::types::FlashMessage;
use crate::ui::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::{mpsc, Arc};

/// Chat transport shared with the recipe worker thread
pub type SharedBackend = Arc<dyn ChatBackend + Send + Sync>;

/// Seconds a flash message stays in the status bar
const FLASH_SECS: u64 = 3;

/// Main application state
pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub theme: Theme,
    pub popup: PopupState,
    pub flash_message: Option<FlashMessage>,

    // List
    pub store: ItemStore,
    /// Index into the sorted view
    pub selected: usize,
    pub input_mode: bool,
    pub input_buffer: String,

    // Recipe request (busy flag + result channel)
    pub recipe_loading: bool,
    /// User stopped waiting; the worker is still running and its result is dropped
    pub recipe_abandoned: bool,
    recipe_rx: Option<mpsc::Receiver<Result<String, RecipeError>>>,

    storage: Box<dyn BlobStore>,
    notifier: Box<dyn Notifier>,
    backend: SharedBackend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupState {
    None,
    ConfirmDelete { id: String, text: String },
    ConfirmClear { count: usize },
    Message { title: String, message: String, scroll: usize },
    Error { title: String, message: String },
}

impl App {
    /// Wire the real storage, notifier and HTTP transport from config
    pub fn from_config(config: Config) -> Result<Self> {
        let storage = FileBlobStore::default_location()?;
        tracing::debug!(dir = ?storage.dir(), "using item storage");
        let notifier = DesktopNotifier::new(config.notifications_enabled);
        let backend: SharedBackend = Arc::new(UreqBackend::new(config.request_timeout_secs));
        Ok(Self::new(config, Box::new(storage), Box::new(notifier), backend))
    }

    pub fn new(
        config: Config,
        storage: Box<dyn BlobStore>,
        notifier: Box<dyn Notifier>,
        backend: SharedBackend,
    ) -> Self {
        let theme = Theme::from_name(config.theme);
        let store = ItemStore::from_items(load_items(storage.as_ref()));

        Self {
            should_quit: false,
            config,
            theme,
            popup: PopupState::None,
            flash_message: None,
            store,
            selected: 0,
            input_mode: false,
            input_buffer: String::new(),
            recipe_loading: false,
            recipe_abandoned: false,
            recipe_rx: None,
            storage,
            notifier,
            backend,
        }
    }

    pub fn show_flash(&mut self, msg: &str, is_error: bool) {
        self.flash_message = Some(FlashMessage::new(msg.to_string(), is_error));
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.popup = PopupState::Error {
            title: title.to_string(),
            message: message.to_string(),
        };
    }

    fn show_message(&mut self, title: &str, message: &str) {
        self.popup = PopupState::Message {
            title: title.to_string(),
            message: message.to_string(),
            scroll: 0,
        };
    }

    /// Write the whole list back to storage
    fn persist(&self) {
        save_items(self.storage.as_ref(), self.store.items());
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.store.len().saturating_sub(1));
    }

    /// Id of the item under the cursor in the sorted view
    pub fn selected_id(&self) -> Option<String> {
        self.store
            .sorted()
            .get(self.selected)
            .map(|item| item.id.clone())
    }

    /// Called from the main loop every tick
    pub fn update_timers(&mut self) -> Result<()> {
        if let Some(msg) = &self.flash_message {
            if msg.is_expired(FLASH_SECS) {
                self.flash_message = None;
            }
        }
        self.poll_recipe();
        Ok(())
    }

    // ── List actions ──

    fn submit_input(&mut self) {
        if self.store.add(&self.input_buffer).is_some() {
            self.persist();
            self.input_buffer.clear();
            self.input_mode = false;
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            if self.store.toggle(&id) {
                self.persist();
            }
        }
    }

    fn request_delete(&mut self) {
        if let Some(id) = self.selected_id() {
            let text = self
                .store
                .get(&id)
                .map(|item| item.text.clone())
                .unwrap_or_default();
            self.popup = PopupState::ConfirmDelete { id, text };
        }
    }

    fn request_clear(&mut self) {
        let count = self.store.completed_count();
        if count == 0 {
            self.show_flash("No completed items to clear", false);
            return;
        }
        self.popup = PopupState::ConfirmClear { count };
    }

    fn confirm_popup(&mut self) {
        match std::mem::replace(&mut self.popup, PopupState::None) {
            PopupState::ConfirmDelete { id, .. } => {
                if self.store.delete(&id) {
                    self.persist();
                    self.clamp_selection();
                    self.show_flash("Item deleted", false);
                }
            }
            PopupState::ConfirmClear { .. } => {
                let removed = self.store.clear_completed();
                if removed > 0 {
                    self.persist();
                    self.clamp_selection();
                    self.show_flash(&format!("Cleared {} completed", removed), false);
                }
            }
            other => self.popup = other,
        }
    }

    // ── Recipe ──

    /// Kick off the recipe request in a background thread (non-blocking).
    pub fn start_recipe(&mut self) {
        if self.recipe_loading {
            let msg = if self.recipe_abandoned {
                "Previous recipe request is still finishing"
            } else {
                "A recipe is already being generated"
            };
            self.show_flash(msg, true);
            return;
        }

        let ingredients = self.store.open_texts();
        let settings = self.config.recipe_settings();
        if let Err(e) = recipe::validate(&settings, &ingredients) {
            self.show_error(e.title(), &e.to_string());
            return;
        }

        self.recipe_loading = true;
        let (tx, rx) = mpsc::channel();
        self.recipe_rx = Some(rx);
        let backend = Arc::clone(&self.backend);

        std::thread::spawn(move || {
            let result = recipe::generate_recipe(backend.as_ref(), &settings, &ingredients);
            let _ = tx.send(result);
        });
    }

    /// Poll for the recipe result (non-blocking).
    pub fn poll_recipe(&mut self) {
        let Some(rx) = &self.recipe_rx else {
            return;
        };
        let received = rx.try_recv();
        if self.recipe_abandoned && !matches!(received, Err(mpsc::TryRecvError::Empty)) {
            tracing::debug!("dropping result of abandoned recipe request");
            self.finish_recipe();
            return;
        }
        match received {
            Ok(Ok(text)) => {
                self.finish_recipe();
                self.show_message("Recipe Idea!", &text);
            }
            Ok(Err(e)) => {
                self.finish_recipe();
                self.show_error(e.title(), &e.to_string());
            }
            Err(mpsc::TryRecvError::Empty) => {
                // Still loading
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::error!("recipe worker exited without a result");
                self.finish_recipe();
                let e = RecipeError::Failed;
                self.show_error(e.title(), &e.to_string());
            }
        }
    }

    fn finish_recipe(&mut self) {
        self.recipe_loading = false;
        self.recipe_abandoned = false;
        self.recipe_rx = None;
    }

    /// Spinner shown: a request is running and someone is waiting for it
    pub fn recipe_waiting(&self) -> bool {
        self.recipe_loading && !self.recipe_abandoned
    }

    /// Stop waiting for the in-flight request. The busy flag stays set until
    /// the worker reports back; its result is then dropped.
    fn abandon_recipe(&mut self) {
        self.recipe_abandoned = true;
        self.show_flash("Recipe request abandoned", false);
    }

    // ── Reminder ──

    fn schedule_reminder(&mut self) {
        match reminder::schedule_reminder(self.notifier.as_ref()) {
            Ok(()) => self.show_message("Reminder Scheduled", &reminder::scheduled_message()),
            Err(e) => self.show_error(e.title(), &e.to_string()),
        }
    }

    fn cycle_theme(&mut self) {
        self.config.theme = self.config.theme.next();
        self.theme = Theme::from_name(self.config.theme);
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save config: {:#}", e);
            self.show_flash(
                &format!("Theme: {} (not saved: {:#})", self.config.theme.as_str(), e),
                true,
            );
            return;
        }
        self.show_flash(&format!("Theme: {}", self.config.theme.as_str()), false);
    }

    // ── Keys ──

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Popups capture all keys
        match &mut self.popup {
            PopupState::ConfirmDelete { .. } | PopupState::ConfirmClear { .. } => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => self.confirm_popup(),
                    KeyCode::Char('n') | KeyCode::Esc => self.popup = PopupState::None,
                    _ => {}
                }
                return Ok(());
            }
            PopupState::Message {
                message, scroll, ..
            } => {
                let last_line = message.lines().count().saturating_sub(1);
                match key.code {
                    KeyCode::Char('j') | KeyCode::Down => *scroll = (*scroll + 1).min(last_line),
                    KeyCode::Char('k') | KeyCode::Up => *scroll = scroll.saturating_sub(1),
                    KeyCode::Char('o') | KeyCode::Enter | KeyCode::Esc => {
                        self.popup = PopupState::None
                    }
                    _ => {}
                }
                return Ok(());
            }
            PopupState::Error { .. } => {
                if matches!(
                    key.code,
                    KeyCode::Char('o') | KeyCode::Enter | KeyCode::Esc
                ) {
                    self.popup = PopupState::None;
                }
                return Ok(());
            }
            PopupState::None => {}
        }

        // Text input captures ALL keys
        if self.input_mode {
            match key.code {
                KeyCode::Esc => self.input_mode = false,
                KeyCode::Enter => self.submit_input(),
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Char(c) => self.input_buffer.push(c),
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('i') | KeyCode::Char('a') => self.input_mode = true,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < self.store.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.store.len().saturating_sub(1)
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
            KeyCode::Char('c') => self.request_clear(),
            KeyCode::Char('r') => self.start_recipe(),
            KeyCode::Char('n') => self.schedule_reminder(),
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Esc if self.recipe_waiting() => self.abandon_recipe(),
            _ => {}
        }
        Ok(())
    }
}
