use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::debug;

use crate::controller::{Completion, Controller, Pending};
use crate::gateway::{self, HttpNoteStore, NoteStore};
use crate::input::{self, Action, Gesture, HitMap, Screen};
use crate::ui;

/// How long to wait for input before checking for finished requests.
const TICK: Duration = Duration::from_millis(50);

pub struct App {
    controller: Controller,
    store: Arc<dyn NoteStore>,
    hits: HitMap,
    replies_tx: mpsc::Sender<Completion>,
    replies: mpsc::Receiver<Completion>,
}

impl App {
    pub fn new(api_url: &str) -> App {
        App::with_store(Arc::new(HttpNoteStore::new(api_url)))
    }

    pub fn with_store(store: Arc<dyn NoteStore>) -> App {
        let (replies_tx, replies) = mpsc::channel();
        App {
            controller: Controller::new(),
            store,
            hits: HitMap::default(),
            replies_tx,
            replies,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> std::io::Result<()> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        let result = self.event_loop(terminal);
        execute!(stdout(), DisableBracketedPaste, DisableMouseCapture)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> std::io::Result<()> {
        loop {
            self.drain_replies();
            terminal.draw(|f| ui::draw(f, &self.controller, &mut self.hits))?;

            if !event::poll(TICK)? {
                continue;
            }
            let event = event::read()?;
            if self.handle_event(&event) {
                return Ok(());
            }
        }
    }

    /// Routes one terminal event. Returns true when the user asked to quit.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        let screen = Screen::from(self.controller.mode());
        match input::action(screen, &self.hits, event) {
            Action::Quit => return true,
            Action::Intent(intent) => {
                let pending = self.controller.dispatch(intent);
                self.submit(pending);
            }
            Action::Edit => {
                if let Some(draft) = self.controller.draft_mut() {
                    draft.handle_event(event);
                }
            }
            Action::Ignore => {}
        }
        false
    }

    /// Routes a finished multi-contact gesture. Returns true when the host
    /// should suppress its own handling of it.
    pub fn handle_gesture(&mut self, gesture: Gesture) -> bool {
        let outcome = input::gesture_intent(Screen::from(self.controller.mode()), gesture);
        if let Some(intent) = outcome.intent {
            let pending = self.controller.dispatch(intent);
            self.submit(pending);
        }
        outcome.suppress_default
    }

    /// Applies every reply that has arrived so far.
    pub fn drain_replies(&mut self) {
        while let Ok(done) = self.replies.try_recv() {
            let next = self.controller.complete(done);
            self.submit(next);
        }
    }

    fn submit(&self, pending: Option<Pending>) {
        let Some(Pending { ticket, request }) = pending else {
            return;
        };
        debug!(ticket, ?request, "sending request");

        let store = Arc::clone(&self.store);
        let replies = self.replies_tx.clone();
        thread::spawn(move || {
            let reply = gateway::execute(store.as_ref(), request);
            if replies.send(Completion { ticket, reply }).is_err() {
                debug!(ticket, "app closed before reply arrived");
            }
        });
    }
}
