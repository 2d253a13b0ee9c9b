use tracing::{debug, info, warn};

use crate::draft::Draft;
use crate::gateway::{Reply, Request};

/// A logical user intent, whichever device it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Commit,
    RequestBrowse,
    /// Reserved for folder creation, accepted but does nothing yet.
    NewFolder,
    Compose,
    Back,
    /// Moves the list highlight, or scrolls the note in View.
    Move(i32),
    OpenSelected,
    OpenAt(usize),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FolderView {
    pub name: String,
    pub notes: Vec<String>,
    pub selected: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Browse {
    pub folders: Vec<String>,
    pub selected: usize,
    /// `Some` once a folder has been drilled into.
    pub folder: Option<FolderView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewing {
    /// The drilled listing Back returns to.
    pub browse: Browse,
    pub filename: String,
    pub body: String,
    pub scroll: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Write,
    Browse(Browse),
    View(Viewing),
}

/// A request the controller wants run, tagged so its reply can be matched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pending {
    pub ticket: u64,
    pub request: Request,
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: u64,
    pub reply: Reply,
}

pub struct Controller {
    mode: Mode,
    draft: Draft,
    /// Ticket of the in-flight write, if any.
    saving: Option<u64>,
    /// Ticket of the navigation load the current screen is waiting on.
    awaiting: Option<u64>,
    next_ticket: u64,
    /// Last folder listing the store returned, shown until a fetch replaces it.
    folders: Vec<String>,
}

impl Default for Controller {
    fn default() -> Self {
        Controller::new()
    }
}

impl Controller {
    pub fn new() -> Controller {
        Controller {
            mode: Mode::Write,
            draft: Draft::default(),
            saving: None,
            awaiting: None,
            next_ticket: 0,
            folders: Vec::new(),
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// The draft is only editable while writing.
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self.mode {
            Mode::Write => Some(&mut self.draft),
            _ => None,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn dispatch(&mut self, intent: Intent) -> Option<Pending> {
        match intent {
            Intent::Commit => self.commit(),
            Intent::RequestBrowse => match self.mode {
                Mode::Browse(_) => None,
                _ => Some(self.enter_browse(0)),
            },
            Intent::NewFolder => {
                debug!("new folder gesture received, not implemented");
                None
            }
            Intent::Compose => {
                if !matches!(self.mode, Mode::Write) {
                    self.awaiting = None;
                    self.mode = Mode::Write;
                }
                None
            }
            Intent::Back => self.back(),
            Intent::Move(delta) => {
                self.move_by(delta);
                None
            }
            Intent::OpenSelected => {
                let index = match &self.mode {
                    Mode::Browse(Browse {
                        folder: Some(folder),
                        ..
                    }) => folder.selected,
                    Mode::Browse(browse) => browse.selected,
                    _ => return None,
                };
                self.open(index)
            }
            Intent::OpenAt(index) => self.open(index),
        }
    }

    /// Applies a finished request. May return a follow-up request.
    pub fn complete(&mut self, done: Completion) -> Option<Pending> {
        if let Reply::Written(result) = done.reply {
            if self.saving != Some(done.ticket) {
                debug!(ticket = done.ticket, "ignoring unexpected write reply");
                return None;
            }
            self.saving = None;
            return match result {
                Ok(()) => {
                    info!("note saved");
                    self.draft.clear();
                    Some(self.enter_browse(0))
                }
                Err(e) => {
                    warn!("failed to save note: {e}");
                    None
                }
            };
        }

        if self.awaiting != Some(done.ticket) {
            debug!(ticket = done.ticket, "discarding stale reply");
            return None;
        }
        self.awaiting = None;

        let mut opened = None;
        match (done.reply, &mut self.mode) {
            (Reply::Folders(result), Mode::Browse(browse)) if browse.folder.is_none() => {
                match result {
                    Ok(folders) => {
                        debug!(count = folders.len(), "folders loaded");
                        self.folders.clone_from(&folders);
                        browse.folders = folders;
                        browse.selected = browse.selected.min(browse.folders.len().saturating_sub(1));
                    }
                    Err(e) => warn!("failed to fetch folders: {e}"),
                }
            }
            (Reply::Notes { folder, result }, Mode::Browse(browse)) => {
                if let Some(view) = browse.folder.as_mut().filter(|v| v.name == folder) {
                    view.notes = result.unwrap_or_else(|e| {
                        warn!("failed to fetch notes: {e}");
                        Vec::new()
                    });
                    view.selected = 0;
                }
            }
            (
                Reply::Note {
                    folder,
                    filename,
                    result,
                },
                Mode::Browse(browse),
            ) if browse.folder.as_ref().is_some_and(|v| v.name == folder) => {
                let body = result.unwrap_or_else(|e| {
                    warn!("failed to fetch note: {e}");
                    String::new()
                });
                opened = Some(Viewing {
                    browse: std::mem::take(browse),
                    filename,
                    body,
                    scroll: 0,
                });
            }
            (reply, _) => debug!(?reply, "reply does not match current screen"),
        }
        if let Some(viewing) = opened {
            self.mode = Mode::View(viewing);
        }
        None
    }

    fn commit(&mut self) -> Option<Pending> {
        if !matches!(self.mode, Mode::Write) || self.saving.is_some() {
            return None;
        }
        let Some(note) = self.draft.parse() else {
            debug!("draft needs a folder, a filename and a body line");
            return None;
        };
        let pending = self.issue(Request::WriteNote(note));
        self.saving = Some(pending.ticket);
        Some(pending)
    }

    fn back(&mut self) -> Option<Pending> {
        match &mut self.mode {
            Mode::View(viewing) => {
                let browse = std::mem::take(&mut viewing.browse);
                self.awaiting = None;
                self.mode = Mode::Browse(browse);
                None
            }
            Mode::Browse(browse) if browse.folder.is_some() => {
                let selected = browse.selected;
                Some(self.enter_browse(selected))
            }
            _ => None,
        }
    }

    fn open(&mut self, index: usize) -> Option<Pending> {
        let Mode::Browse(browse) = &mut self.mode else {
            return None;
        };
        if let Some(view) = browse.folder.as_mut() {
            let filename = view.notes.get(index)?.clone();
            view.selected = index;
            let folder = view.name.clone();
            return Some(self.load(Request::ReadNote { folder, filename }));
        }

        let name = browse.folders.get(index)?.clone();
        browse.selected = index;
        browse.folder = Some(FolderView {
            name: name.clone(),
            ..FolderView::default()
        });
        Some(self.load(Request::ListNotes { folder: name }))
    }

    fn move_by(&mut self, delta: i32) {
        match &mut self.mode {
            Mode::Write => {}
            Mode::Browse(browse) => match &mut browse.folder {
                Some(view) => view.selected = step(view.selected, delta, view.notes.len()),
                None => browse.selected = step(browse.selected, delta, browse.folders.len()),
            },
            Mode::View(viewing) => {
                let last = viewing.body.lines().count().saturating_sub(1);
                let last = u16::try_from(last).unwrap_or(u16::MAX);
                viewing.scroll = viewing.scroll.saturating_add_signed(delta as i16).min(last);
            }
        }
    }

    /// Switches to the folder list, showing the last known folders while a
    /// fresh listing is fetched.
    fn enter_browse(&mut self, selected: usize) -> Pending {
        self.mode = Mode::Browse(Browse {
            folders: self.folders.clone(),
            selected: selected.min(self.folders.len().saturating_sub(1)),
            folder: None,
        });
        self.load(Request::ListFolders)
    }

    /// Issues a request the current screen waits on, superseding any earlier one.
    fn load(&mut self, request: Request) -> Pending {
        let pending = self.issue(request);
        self.awaiting = Some(pending.ticket);
        pending
    }

    fn issue(&mut self, request: Request) -> Pending {
        self.next_ticket += 1;
        Pending {
            ticket: self.next_ticket,
            request,
        }
    }
}

/// Moves a list highlight, wrapping at both ends.
fn step(current: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as i64 + delta as i64).rem_euclid(len as i64) as usize
}
