use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::controller::{Intent, Mode};

/// What the event loop should do with a terminal event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Intent(Intent),
    /// Hand the event to the draft editor.
    Edit,
    Quit,
    Ignore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Write,
    Browse,
    View,
}

impl From<&Mode> for Screen {
    fn from(mode: &Mode) -> Self {
        match mode {
            Mode::Write => Screen::Write,
            Mode::Browse(_) => Screen::Browse,
            Mode::View(_) => Screen::View,
        }
    }
}

/// Clickable regions recorded by the last render.
#[derive(Clone, Debug, Default)]
pub struct HitMap {
    targets: Vec<(Rect, Intent)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn add(&mut self, area: Rect, intent: Intent) {
        self.targets.push((area, intent));
    }

    pub fn at(&self, column: u16, row: u16) -> Option<Intent> {
        let position = Position::new(column, row);
        self.targets
            .iter()
            .find(|(area, _)| area.contains(position))
            .map(|(_, intent)| *intent)
    }
}

pub fn action(screen: Screen, hits: &HitMap, event: &Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => key_action(screen, key),
        Event::Mouse(mouse) => mouse_action(screen, hits, mouse),
        Event::Paste(_) if screen == Screen::Write => Action::Edit,
        _ => Action::Ignore,
    }
}

fn key_action(screen: Screen, key: &KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('s') if screen == Screen::Write => return Action::Intent(Intent::Commit),
            KeyCode::Char('b') => return Action::Intent(Intent::RequestBrowse),
            KeyCode::Char('n') => return Action::Intent(Intent::Compose),
            _ => {}
        }
    }

    match screen {
        Screen::Write => Action::Edit,
        Screen::Browse | Screen::View => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::Intent(Intent::Move(1)),
            KeyCode::Char('k') | KeyCode::Up => Action::Intent(Intent::Move(-1)),
            KeyCode::PageDown if screen == Screen::View => Action::Intent(Intent::Move(10)),
            KeyCode::PageUp if screen == Screen::View => Action::Intent(Intent::Move(-10)),
            KeyCode::Enter | KeyCode::Char('l') if screen == Screen::Browse => {
                Action::Intent(Intent::OpenSelected)
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => Action::Intent(Intent::Back),
            KeyCode::Char('n') => Action::Intent(Intent::Compose),
            _ => Action::Ignore,
        },
    }
}

fn mouse_action(screen: Screen, hits: &HitMap, mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => hits
            .at(mouse.column, mouse.row)
            .map_or(Action::Ignore, Action::Intent),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            let direction = if mouse.kind == MouseEventKind::ScrollUp {
                Swipe::Up
            } else {
                Swipe::Down
            };
            if mouse.modifiers.contains(KeyModifiers::CONTROL) {
                wheel_intent(screen, direction).map_or(Action::Ignore, Action::Intent)
            } else if screen == Screen::Write {
                Action::Ignore
            } else {
                Action::Intent(Intent::Move(if direction == Swipe::Up { -1 } else { 1 }))
            }
        }
        _ => Action::Ignore,
    }
}

/// Modifier+wheel maps like a two finger swipe: up commits, down browses.
pub fn wheel_intent(screen: Screen, direction: Swipe) -> Option<Intent> {
    match direction {
        Swipe::Up if screen == Screen::Write => Some(Intent::Commit),
        Swipe::Up => None,
        Swipe::Down => Some(Intent::RequestBrowse),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Swipe {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Swipe { contacts: u8, direction: Swipe },
    Tap { contacts: u8 },
}

impl Gesture {
    pub fn contacts(&self) -> u8 {
        match *self {
            Gesture::Swipe { contacts, .. } | Gesture::Tap { contacts } => contacts,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureOutcome {
    pub intent: Option<Intent>,
    /// The host must not scroll or zoom for this gesture.
    pub suppress_default: bool,
}

pub fn gesture_intent(screen: Screen, gesture: Gesture) -> GestureOutcome {
    let intent = match gesture {
        Gesture::Swipe {
            contacts: 2,
            direction,
        } => wheel_intent(screen, direction),
        Gesture::Tap { contacts: 3 } => Some(Intent::NewFolder),
        _ => None,
    };
    GestureOutcome {
        intent,
        suppress_default: matches!(gesture.contacts(), 2 | 3),
    }
}

/// Vertical travel, in host units, below which a touch counts as a tap.
pub const SWIPE_THRESHOLD: f32 = 30.0;

/// Follows one multi-contact touch from first contact to release.
#[derive(Clone, Debug, Default)]
pub struct TouchTracker {
    start_y: Option<f32>,
    last_y: f32,
    contacts: u8,
}

impl TouchTracker {
    /// Records the centroid of the current contacts. Returns true when the
    /// host default should be suppressed for this touch.
    pub fn touch(&mut self, contacts: u8, y: f32) -> bool {
        if self.start_y.is_none() {
            self.start_y = Some(y);
        }
        self.contacts = self.contacts.max(contacts);
        self.last_y = y;
        matches!(self.contacts, 2 | 3)
    }

    /// Finishes the touch and classifies it.
    pub fn release(&mut self) -> Option<Gesture> {
        let start = self.start_y.take()?;
        let contacts = std::mem::take(&mut self.contacts);
        let travel = self.last_y - start;

        Some(if travel <= -SWIPE_THRESHOLD {
            Gesture::Swipe {
                contacts,
                direction: Swipe::Up,
            }
        } else if travel >= SWIPE_THRESHOLD {
            Gesture::Swipe {
                contacts,
                direction: Swipe::Down,
            }
        } else {
            Gesture::Tap { contacts }
        })
    }
}
