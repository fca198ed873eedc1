use margin_workshop_engine::analytics::{engagement, feedback_themes, word_count};
use margin_workshop_engine::anchoring::Rect as AnchorRect;
use margin_workshop_engine::annotations::AnnotationKind;
use margin_workshop_engine::overlay::{Presentation, Segment};
use margin_workshop_engine::sidebar::{KindFilter, commenters};
use margin_workshop_engine::toolbar::{ToolbarAction, ToolbarLayout, toolbar_position};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Focus, InputMode, OpenManuscript};
use crate::selection::line_col;

/// Toolbar size in terminal cells.
const TOOLBAR: ToolbarLayout = ToolbarLayout {
    width: 24.0,
    height: 1.0,
    margin: 0.0,
};

pub fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(50),
            Constraint::Percentage(30),
        ])
        .split(rows[0]);

    render_files(f, app, columns[0]);
    render_manuscript(f, app, columns[1]);
    if app.show_stats {
        render_stats(f, app, columns[2]);
    } else {
        render_sidebar(f, app, columns[2]);
    }
    render_input(f, app, rows[1]);
    render_help(f, app, rows[2]);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn render_files(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .files
        .iter()
        .map(|file| ListItem::new(Line::from(file.relative_path().as_str().to_string())))
        .collect();

    let list = List::new(items)
        .block(pane_block("Manuscripts".to_string(), app.focus == Focus::Files))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(list, area, &mut app.file_list_state);
}

fn highlight_style(presentation: Presentation, kind: AnnotationKind) -> Style {
    let style = match presentation {
        Presentation::Draft => Style::default().bg(Color::Cyan).fg(Color::Black),
        Presentation::Selected => Style::default()
            .bg(Color::LightYellow)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
        Presentation::Resolved => Style::default().fg(Color::DarkGray),
        Presentation::Unresolved => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    match kind {
        AnnotationKind::Strikethrough => style.add_modifier(Modifier::CROSSED_OUT),
        _ => style,
    }
}

/// Lines of styled runs: segment styling plus caret and marked selection.
fn manuscript_lines<'a>(open: &OpenManuscript, segments: &[Segment<'a>]) -> Vec<Line<'a>> {
    let selected = open
        .mark
        .map(|mark| open.caret.min(mark)..open.caret.max(mark));

    let mut lines = Vec::new();
    let mut spans: Vec<Span<'a>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    let mut offset = 0;

    for segment in segments {
        let base = match segment.as_highlight() {
            Some(h) => highlight_style(h.presentation(), h.kind),
            None => Style::default(),
        };
        for ch in segment.text().chars() {
            let mut style = base;
            if selected.as_ref().is_some_and(|r| r.contains(&offset)) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if offset == open.caret {
                style = style.add_modifier(Modifier::REVERSED);
            }

            if ch == '\n' {
                if offset == open.caret {
                    flush(&mut spans, &mut run, run_style);
                    spans.push(Span::styled(" ", style));
                }
                flush(&mut spans, &mut run, run_style);
                lines.push(Line::from(std::mem::take(&mut spans)));
            } else {
                if style != run_style {
                    flush(&mut spans, &mut run, run_style);
                    run_style = style;
                }
                run.push(ch);
            }
            offset += 1;
        }
    }
    flush(&mut spans, &mut run, run_style);
    if offset == open.caret {
        spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
    }
    lines.push(Line::from(spans));
    lines
}

fn flush<'a>(spans: &mut Vec<Span<'a>>, run: &mut String, style: Style) {
    if !run.is_empty() {
        spans.push(Span::styled(std::mem::take(run), style));
    }
}

fn render_manuscript(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Manuscript;
    let Some(open) = &app.open else {
        let placeholder = Paragraph::new("Select a manuscript to review")
            .block(pane_block("Manuscript".to_string(), focused));
        f.render_widget(placeholder, area);
        return;
    };

    let segments = open.state.render(&open.content);
    let lines = manuscript_lines(open, &segments);

    let block = pane_block(open.file.display_name().to_string(), focused);
    let inner = block.inner(area);
    let (caret_line, _) = line_col(&open.content, open.caret);
    let scroll = caret_line.saturating_sub(inner.height.saturating_sub(1) as usize) as u16;

    f.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);

    // Toolbar floats above a live selection once it is anchored
    if let Some(anchor) = open.state.selection()
        && open.state.draft().is_none()
    {
        render_toolbar(f, inner, scroll, anchor.rect);
    }
}

fn render_toolbar(f: &mut Frame, pane: Rect, scroll: u16, selection: AnchorRect) {
    if pane.width == 0 || pane.height == 0 {
        return;
    }
    let pos = toolbar_position(selection, TOOLBAR);

    // Content coordinates to screen cells, kept inside the pane
    let top = (pos.top - scroll as f32 + pane.y as f32)
        .max(pane.y as f32)
        .min((pane.y + pane.height).saturating_sub(1) as f32);
    let width = (TOOLBAR.width as u16).min(pane.width);
    let left = (pos.left + pane.x as f32)
        .max(pane.x as f32)
        .min((pane.x + pane.width - width) as f32);
    let area = Rect::new(left as u16, top as u16, width, 1);

    let labels: Vec<Span> = ToolbarAction::ALL
        .iter()
        .flat_map(|action| {
            let key = match action {
                ToolbarAction::Highlight => "h",
                ToolbarAction::Strikethrough => "s",
            };
            [
                Span::styled(format!(" {key}"), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(" {} ", action.label())),
            ]
        })
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Line::from(labels)).style(Style::default().bg(Color::Blue).fg(Color::White)),
        area,
    );
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let threads = app.visible_threads();
    let active = app.open.as_ref().and_then(|o| o.state.active_id());

    let items: Vec<ListItem> = threads
        .iter()
        .map(|thread| {
            let root = thread.root;
            let author = root.author_id.as_deref().unwrap_or("anonymous");
            let marker = if root.is_resolved { "✓" } else { "●" };
            let kind = match root.kind {
                AnnotationKind::Strikethrough => " [strike]",
                _ => "",
            };

            let mut lines = vec![Line::from(vec![
                Span::raw(format!("{marker} ")),
                Span::styled(author.to_string(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(kind, Style::default().fg(Color::Magenta)),
                Span::raw(format!(": {}", root.content)),
            ])];
            if !root.selected_text.is_empty() {
                lines.push(Line::styled(
                    format!("  \u{201c}{}\u{201d}", root.selected_text),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.extend(thread.replies.iter().map(|reply| {
                Line::from(format!(
                    "  ↳ {}: {}",
                    reply.author_id.as_deref().unwrap_or("anonymous"),
                    reply.content
                ))
            }));
            ListItem::new(lines)
        })
        .collect();

    let filter = match app.filter.kind {
        KindFilter::All => String::new(),
        KindFilter::Only(kind) => format!(" [{kind}]"),
    };
    let title = format!("Comments ({}){filter}", threads.len());

    let mut state = ListState::default();
    state.select(active.and_then(|id| threads.iter().position(|t| t.id() == id)));

    let list = List::new(items)
        .block(pane_block(title, false))
        .highlight_style(Style::default().bg(Color::DarkGray));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_stats(f: &mut Frame, app: &App, area: Rect) {
    let block = pane_block("Workshop stats".to_string(), false);
    let Some(open) = &app.open else {
        f.render_widget(block, area);
        return;
    };

    let comments = open.state.comments();
    let stats = engagement(comments);
    let mut lines = vec![
        Line::from(format!("Words: {}", word_count(&open.content))),
        Line::from(format!("Comments: {}", stats.comments)),
        Line::from(format!("Replies: {}", stats.replies)),
        Line::from(format!("Reviewers: {}", stats.commenters)),
        Line::from(format!(
            "Resolved: {} ({}%)",
            stats.resolved,
            stats.resolved_percentage()
        )),
        Line::default(),
        Line::styled("Feedback themes", Style::default().add_modifier(Modifier::BOLD)),
    ];
    let themes = feedback_themes(comments);
    if themes.is_empty() {
        lines.push(Line::styled("  none yet", Style::default().fg(Color::DarkGray)));
    }
    lines.extend(
        themes
            .iter()
            .map(|t| Line::from(format!("  {} {} ({}%)", t.name, t.mentions, t.percentage))),
    );

    lines.push(Line::default());
    lines.push(Line::styled("Reviewers", Style::default().add_modifier(Modifier::BOLD)));
    lines.extend(commenters(comments).into_iter().map(|author| {
        if app.filter.hidden_authors.contains(author) {
            Line::styled(format!("  {author} (hidden)"), Style::default().fg(Color::DarkGray))
        } else {
            Line::from(format!("  {author}"))
        }
    }));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.mode {
        InputMode::Normal => match &app.status {
            Some(status) => Line::styled(status.clone(), Style::default().fg(Color::Yellow)),
            None => Line::default(),
        },
        InputMode::Comment => Line::from(format!("Comment: {}_", app.input)),
        InputMode::Reply(id) => Line::from(format!("Reply to {id}: {}_", app.input)),
        InputMode::Search => Line::from(format!("Search: {}_", app.input)),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let help = match (&app.mode, app.focus) {
        (InputMode::Normal, Focus::Files) => {
            "q: Quit | ↑/k ↓/j: Files | Tab: Manuscript | n/p: Comments | r: Resolve | d: Delete | a: Reply | /: Search | f: Type | u: Reviewer | i: Stats | x: Export themes"
        }
        (InputMode::Normal, Focus::Manuscript) => {
            "←→↑↓: Caret | v: Mark | h: Highlight | s: Strike | c: Comment | Enter: Open comment | Esc: Cancel | Tab: Files"
        }
        _ => "Enter: Save | Esc: Cancel",
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn renders_manuscript_and_comment_thread() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("story.txt"), "The quick brown fox").unwrap();
        std::fs::write(
            dir.path().join("story.txt.comments.json"),
            r#"[{"id": "c1", "author_id": "bo", "content": "Nice verb",
                "selection_json": {"text": "quick", "start": 4, "end": 9}}]"#,
        )
        .unwrap();
        let mut app = App::new(dir.path().to_path_buf(), None).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(screen.contains("The quick brown fox"));
        assert!(screen.contains("bo: Nice verb"));
        assert!(screen.contains("Comments (1)"));
    }

    #[test]
    fn stats_list_reviewers_and_hidden_ones() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("story.txt"), "The quick brown fox").unwrap();
        std::fs::write(
            dir.path().join("story.txt.comments.json"),
            r#"[{"id": "c1", "author_id": "bo", "content": "Nice verb"},
                {"id": "c2", "author_id": "cy", "content": "Slow pacing"}]"#,
        )
        .unwrap();
        let mut app = App::new(dir.path().to_path_buf(), None).unwrap();
        app.show_stats = true;
        app.filter.toggle_author("cy");

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(screen.contains("Reviewers: 2"));
        assert!(screen.contains("cy (hidden)"));
        assert!(screen.contains("Plot Structure 1 (100%)"));
    }
}
