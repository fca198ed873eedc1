use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use margin_workshop_engine::annotations::{AnnotationId, AnnotationKind};
use margin_workshop_engine::records::{Comment, CommentRecord};
use margin_workshop_engine::sidebar::{CommentFilter, KindFilter, Thread, commenters, threads};
use margin_workshop_engine::toolbar::ToolbarAction;
use margin_workshop_engine::{ManuscriptFile, Participation, WorkshopState, io};
use ratatui::widgets::ListState;
use std::path::PathBuf;
use uuid::Uuid;

use crate::selection::{anchor_selection, line_col, offset_at};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Files,
    Manuscript,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Comment,
    Reply(AnnotationId),
    Search,
}

/// The manuscript being reviewed and the reviewer's cursor in it.
pub struct OpenManuscript {
    pub file: ManuscriptFile,
    pub content: String,
    pub state: WorkshopState,
    /// Char offset of the caret.
    pub caret: usize,
    /// Other end of the selection, while one is being made.
    pub mark: Option<usize>,
}

impl OpenManuscript {
    fn content_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Re-anchor the caret/mark selection against the current render.
    fn update_selection(&mut self) {
        let anchor = self.mark.and_then(|mark| {
            let segments = self.state.render(&self.content);
            anchor_selection(&self.content, &segments, self.caret, mark)
        });
        self.state.set_selection(anchor);
    }
}

pub struct App {
    pub manuscripts_path: PathBuf,
    pub files: Vec<ManuscriptFile>,
    pub file_list_state: ListState,
    pub open: Option<OpenManuscript>,
    pub focus: Focus,
    pub mode: InputMode,
    pub input: String,
    pub filter: CommentFilter,
    pub show_stats: bool,
    pub status: Option<String>,
    /// Index into the open manuscript's commenters while showing one reviewer.
    author_focus: Option<usize>,
    reviewer: Option<String>,
    participation: Participation,
}

impl App {
    pub fn new(manuscripts_path: PathBuf, reviewer: Option<String>) -> Result<Self> {
        let files = io::scan_manuscripts(&manuscripts_path)?;

        let mut app = Self {
            manuscripts_path,
            files,
            file_list_state: ListState::default(),
            open: None,
            focus: Focus::Files,
            mode: InputMode::Normal,
            input: String::new(),
            filter: CommentFilter::default(),
            show_stats: false,
            status: None,
            author_focus: None,
            reviewer,
            participation: Participation::reviewer(),
        };

        if !app.files.is_empty() {
            app.file_list_state.select(Some(0));
            app.open_selected();
        }

        Ok(app)
    }

    /// Visible threads for the open manuscript, filters applied.
    pub fn visible_threads(&self) -> Vec<Thread<'_>> {
        match &self.open {
            Some(open) => self.filter.apply(threads(open.state.comments())),
            None => Vec::new(),
        }
    }

    /// Handle one key press. Returns false when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(false);
        }

        match self.mode {
            InputMode::Normal => return Ok(self.handle_normal_key(key)),
            _ => self.handle_input_key(key),
        }
        Ok(true)
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Files => Focus::Manuscript,
                    Focus::Manuscript => Focus::Files,
                };
            }
            KeyCode::Char('/') => {
                self.input = self.filter.query.clone();
                self.mode = InputMode::Search;
            }
            KeyCode::Char('f') => self.cycle_kind_filter(),
            KeyCode::Char('i') => self.show_stats = !self.show_stats,
            KeyCode::Char('u') => self.cycle_author_filter(),
            KeyCode::Char('x') => self.export_themes(),
            KeyCode::Char('n') => self.step_active(true),
            KeyCode::Char('p') => self.step_active(false),
            KeyCode::Char('r') => self.toggle_resolved(),
            KeyCode::Char('d') => self.delete_active(),
            KeyCode::Char('a') => self.begin_reply(),
            _ => match self.focus {
                Focus::Files => self.handle_files_key(key),
                Focus::Manuscript => self.handle_manuscript_key(key),
            },
        }
        true
    }

    fn handle_files_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.next_file(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_file(),
            KeyCode::Enter | KeyCode::Right => self.focus = Focus::Manuscript,
            _ => {}
        }
    }

    fn handle_manuscript_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.move_caret(|open| open.caret.saturating_sub(1)),
            KeyCode::Right => self.move_caret(|open| (open.caret + 1).min(open.content_len())),
            KeyCode::Up => self.move_caret(|open| {
                let (line, col) = line_col(&open.content, open.caret);
                match line {
                    0 => 0,
                    _ => offset_at(&open.content, line - 1, col),
                }
            }),
            KeyCode::Down => self.move_caret(|open| {
                let (line, col) = line_col(&open.content, open.caret);
                offset_at(&open.content, line + 1, col)
            }),
            KeyCode::Home => self.move_caret(|open| {
                let (line, _) = line_col(&open.content, open.caret);
                offset_at(&open.content, line, 0)
            }),
            KeyCode::End => self.move_caret(|open| {
                let (line, _) = line_col(&open.content, open.caret);
                offset_at(&open.content, line, usize::MAX)
            }),
            KeyCode::Char('v') => self.toggle_mark(),
            KeyCode::Char('h') => self.begin_draft(ToolbarAction::Highlight),
            KeyCode::Char('s') => self.begin_draft(ToolbarAction::Strikethrough),
            KeyCode::Char('c') => self.begin_comment(),
            KeyCode::Enter => self.activate_at_caret(),
            KeyCode::Esc => self.cancel(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.mode == InputMode::Search {
                    self.filter.query.clear();
                }
                self.input.clear();
                self.mode = InputMode::Normal;
            }
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                self.input.pop();
                self.sync_search();
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.sync_search();
            }
            _ => {}
        }
    }

    fn sync_search(&mut self) {
        if self.mode == InputMode::Search {
            self.filter.query = self.input.clone();
        }
    }

    // ============ Files ============

    fn next_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + 1) % self.files.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.open_selected();
    }

    fn previous_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(0) | None => self.files.len() - 1,
            Some(i) => i - 1,
        };
        self.file_list_state.select(Some(i));
        self.open_selected();
    }

    fn open_selected(&mut self) {
        let Some(file) = self
            .file_list_state
            .selected()
            .and_then(|i| self.files.get(i))
            .cloned()
        else {
            return;
        };

        let loaded = io::read_manuscript(file.relative_path(), &self.manuscripts_path)
            .and_then(|content| {
                io::load_comments(&file, &self.manuscripts_path).map(|comments| (content, comments))
            });

        match loaded {
            Ok((content, comments)) => {
                log::debug!("opened {} with {} comments", file.piece_id(), comments.len());
                self.open = Some(OpenManuscript {
                    file,
                    content,
                    state: WorkshopState::new(comments, self.participation),
                    caret: 0,
                    mark: None,
                });
                self.filter.hidden_authors.clear();
                self.author_focus = None;
                self.status = None;
            }
            Err(e) => {
                log::error!("failed to open {}: {e}", file.piece_id());
                self.open = None;
                self.status = Some(format!("Error opening {}: {e}", file.display_name()));
            }
        }
    }

    // ============ Selection and drafts ============

    fn move_caret(&mut self, to: impl FnOnce(&OpenManuscript) -> usize) {
        if let Some(open) = &mut self.open {
            open.caret = to(open);
            open.update_selection();
        }
    }

    fn toggle_mark(&mut self) {
        if let Some(open) = &mut self.open {
            open.mark = match open.mark {
                Some(_) => None,
                None => Some(open.caret),
            };
            open.update_selection();
        }
    }

    fn begin_draft(&mut self, action: ToolbarAction) {
        let Some(open) = &mut self.open else {
            return;
        };
        if open.state.begin_draft(action.kind()) {
            self.status = Some(format!("{} draft: press c to comment", action.label()));
        } else {
            self.status = Some("Select some text first (v to mark)".to_string());
        }
    }

    fn begin_comment(&mut self) {
        if self.open.as_ref().is_some_and(|o| o.state.draft().is_some()) {
            self.input.clear();
            self.mode = InputMode::Comment;
        } else {
            self.status = Some("Highlight (h) or strike (s) a selection first".to_string());
        }
    }

    fn cancel(&mut self) {
        if let Some(open) = &mut self.open {
            open.state.cancel_draft();
            open.mark = None;
            open.update_selection();
        }
        self.status = None;
    }

    fn activate_at_caret(&mut self) {
        let Some(open) = &mut self.open else {
            return;
        };
        let target = open
            .state
            .render(&open.content)
            .iter()
            .find(|s| s.span().start <= open.caret && open.caret < s.span().end)
            .and_then(|s| s.as_highlight().map(|h| h.target.clone()));
        if let Some(target) = target {
            open.state.activate(&target);
        }
    }

    // ============ Comments ============

    fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        let mode = std::mem::replace(&mut self.mode, InputMode::Normal);
        let Some(open) = &mut self.open else {
            return;
        };

        let request = match &mode {
            InputMode::Comment => open.state.finalize_draft(open.file.piece_id(), None, &text),
            InputMode::Reply(parent) => open.state.reply(parent, open.file.piece_id(), &text),
            InputMode::Search | InputMode::Normal => return,
        };

        let Some(request) = request else {
            self.status = Some(unsaved_reason(&open.state, &mode, &text).to_string());
            return;
        };

        let record: CommentRecord = request.into_record(
            Uuid::new_v4().to_string(),
            self.reviewer.clone(),
            Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        match Comment::from_record(record) {
            Ok(comment) => {
                let id = comment.id.clone();
                open.state.insert_local(comment);
                if open.state.comment(&id).is_some_and(|c| !c.is_reply()) {
                    open.state.set_active(Some(id));
                }
                open.mark = None;
                self.save("Comment saved");
            }
            Err(e) => self.status = Some(format!("Could not save comment: {e}")),
        }
    }

    fn begin_reply(&mut self) {
        let Some(open) = &self.open else {
            return;
        };
        match open.state.active_id() {
            Some(id) => {
                let id = id.clone();
                self.input.clear();
                self.mode = InputMode::Reply(id);
            }
            None => self.status = Some("Choose a comment first (n/p)".to_string()),
        }
    }

    fn step_active(&mut self, forward: bool) {
        if let Some(open) = &mut self.open
            && let Some(id) = open.state.step_active(forward).cloned()
            && let Some(span) = open.state.comment(&id).and_then(|c| c.span)
        {
            open.caret = span.start;
            open.mark = None;
            open.update_selection();
        }
    }

    fn toggle_resolved(&mut self) {
        let Some(open) = &mut self.open else {
            return;
        };
        let Some(id) = open.state.active_id().cloned() else {
            return;
        };
        match open.state.toggle_resolved(&id) {
            Some(true) => self.save("Marked resolved"),
            Some(false) => self.save("Reopened"),
            None => {}
        }
    }

    fn delete_active(&mut self) {
        let Some(open) = &mut self.open else {
            return;
        };
        if let Some(id) = open.state.active_id().cloned()
            && open.state.remove(&id)
        {
            self.save("Comment deleted");
        }
    }

    fn cycle_kind_filter(&mut self) {
        self.filter.kind = match self.filter.kind {
            KindFilter::All => KindFilter::Only(AnnotationKind::Highlight),
            KindFilter::Only(AnnotationKind::Highlight) => {
                KindFilter::Only(AnnotationKind::Strikethrough)
            }
            KindFilter::Only(_) => KindFilter::All,
        };
    }

    /// Step through "only this reviewer" for each commenter, then back to everyone.
    fn cycle_author_filter(&mut self) {
        let Some(open) = &self.open else {
            return;
        };
        let authors = commenters(open.state.comments());
        if authors.is_empty() {
            self.status = Some("No reviewers to filter by".to_string());
            return;
        }

        let next = match self.author_focus {
            None => Some(0),
            Some(i) if i + 1 < authors.len() => Some(i + 1),
            Some(_) => None,
        };
        self.filter.hidden_authors.clear();
        self.status = Some(match next {
            Some(i) => {
                for author in authors.iter().filter(|a| **a != authors[i]) {
                    self.filter.toggle_author(author);
                }
                format!("Showing comments by {}", authors[i])
            }
            None => "Showing all reviewers".to_string(),
        });
        self.author_focus = next;
    }

    fn export_themes(&mut self) {
        let Some(open) = &self.open else {
            return;
        };
        match io::export_themes(&open.file, &self.manuscripts_path, open.state.comments()) {
            Ok(path) => {
                let name = path.file_name().map_or_else(
                    || path.display().to_string(),
                    |n| n.to_string_lossy().into_owned(),
                );
                self.status = Some(format!("Exported feedback themes to {name}"));
            }
            Err(e) => {
                log::error!("failed to export themes for {}: {e}", open.file.piece_id());
                self.status = Some(format!("Export failed: {e}"));
            }
        }
    }

    fn save(&mut self, done: &str) {
        let Some(open) = &self.open else {
            return;
        };
        match io::save_comments(&open.file, &self.manuscripts_path, open.state.comments()) {
            Ok(()) => self.status = Some(done.to_string()),
            Err(e) => {
                log::error!("failed to save comments for {}: {e}", open.file.piece_id());
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }
}

/// Why a comment or reply request could not be built.
fn unsaved_reason(state: &WorkshopState, mode: &InputMode, text: &str) -> &'static str {
    if text.trim().is_empty() {
        return "Nothing to save: comment text is empty";
    }
    match mode {
        InputMode::Reply(parent) => match state.comment(parent) {
            None => "That comment no longer exists",
            Some(c) if c.is_reply() => "Replies go on top-level comments only",
            Some(c) if c.is_resolved => "Thread is resolved: reopen it (r) to reply",
            Some(_) => "Replies are closed for this workshop",
        },
        _ if state.draft().is_none() => "Highlight (h) or strike (s) a selection first",
        _ => "This workshop is closed to new comments",
    }
}
