use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::{Line, ToSpan},
    widgets::{Block, List, ListItem, Paragraph, Wrap},
};

use crate::controller::{Browse, Controller, Intent, Mode, Viewing};
use crate::input::HitMap;

const PLACEHOLDER: [&str; 3] = ["folder", "filename.txt", "content..."];

pub fn draw(frame: &mut Frame, controller: &Controller, hits: &mut HitMap) {
    hits.clear();
    match controller.mode() {
        Mode::Write => render_write(frame, controller, hits),
        Mode::Browse(browse) => match &browse.folder {
            None => render_folders(frame, browse, controller.is_loading(), hits),
            Some(_) => render_notes(frame, browse, controller.is_loading(), hits),
        },
        Mode::View(viewing) => render_view(frame, viewing, hits),
    }
}

fn render_write(frame: &mut Frame, controller: &Controller, hits: &mut HitMap) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(3), Constraint::Length(3), Constraint::Length(1)])
        .split(frame.area());

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);

    let draft = controller.draft();
    let editor_block = Block::bordered()
        .title("New note")
        .border_style(Style::new().yellow());

    let height = layout[0].height.saturating_sub(2) as usize;
    let width = layout[0].width.max(3) - 3;
    let row_scroll = (draft.row() + 1).saturating_sub(height.max(1));
    let col_scroll = draft.current().visual_scroll(width as usize);

    let editor = if draft.is_empty() {
        Paragraph::new(PLACEHOLDER.map(|l| Line::from(l).dark_gray()).to_vec())
    } else {
        Paragraph::new(draft.lines().map(Line::from).collect::<Vec<_>>())
            .scroll((row_scroll as u16, col_scroll as u16))
    };
    frame.render_widget(editor.block(editor_block), layout[0]);

    let x = draft.current().visual_cursor().max(col_scroll) - col_scroll + 1;
    let y = draft.row() - row_scroll + 1;
    frame.set_cursor_position((layout[0].x + x as u16, layout[0].y + y as u16));

    let save = if controller.is_saving() {
        button("Saving...").dim()
    } else {
        button("Save").green()
    };
    frame.render_widget(save, buttons[0]);
    frame.render_widget(button("Browse"), buttons[1]);
    hits.add(buttons[0], Intent::Commit);
    hits.add(buttons[1], Intent::RequestBrowse);

    let help_message = Line::from_iter([
        "Ctrl+S".bold().yellow(),
        " save, ".to_span(),
        "Ctrl+B".bold().yellow(),
        " browse, ".to_span(),
        "Ctrl+Q".bold().yellow(),
        " quit. First line is the folder, second the filename.".to_span(),
    ])
    .centered();
    frame.render_widget(help_message, layout[2]);
}

fn render_folders(frame: &mut Frame, browse: &Browse, loading: bool, hits: &mut HitMap) {
    let (header, body, footer) = screen_layout(frame.area());
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Min(1), Constraint::Length(9)])
        .split(header);

    frame.render_widget(Line::from("Folders").bold(), header_layout[0]);
    frame.render_widget(Line::from("[+ New]").green().bold(), header_layout[1]);
    hits.add(header_layout[1], Intent::Compose);

    let title = if loading { "Folders (loading)" } else { "Folders" };
    render_listing(
        frame,
        body,
        title,
        &browse.folders,
        browse.selected,
        "No folders yet. Create your first note!",
        hits,
    );

    let help_message = Line::from_iter([
        "j/k".bold().yellow(),
        " move, ".to_span(),
        "Enter".bold().yellow(),
        " open, ".to_span(),
        "n".bold().yellow(),
        " new note, ".to_span(),
        "q".bold().yellow(),
        " quit".to_span(),
    ])
    .centered();
    frame.render_widget(help_message, footer);
}

fn render_notes(frame: &mut Frame, browse: &Browse, loading: bool, hits: &mut HitMap) {
    let Some(folder) = &browse.folder else {
        return;
    };
    let (header, body, footer) = screen_layout(frame.area());
    let back = render_header(frame, header, &folder.name);
    hits.add(back, Intent::Back);

    let title = if loading {
        format!("{} (loading)", folder.name)
    } else {
        folder.name.clone()
    };
    render_listing(
        frame,
        body,
        &title,
        &folder.notes,
        folder.selected,
        "No notes in this folder",
        hits,
    );

    let help_message = Line::from_iter([
        "j/k".bold().yellow(),
        " move, ".to_span(),
        "Enter".bold().yellow(),
        " read, ".to_span(),
        "Esc".bold().yellow(),
        " back, ".to_span(),
        "n".bold().yellow(),
        " new note".to_span(),
    ])
    .centered();
    frame.render_widget(help_message, footer);
}

fn render_view(frame: &mut Frame, viewing: &Viewing, hits: &mut HitMap) {
    let (header, body, footer) = screen_layout(frame.area());
    let back = render_header(frame, header, &viewing.filename);
    hits.add(back, Intent::Back);

    let note = Paragraph::new(viewing.body.as_str())
        .wrap(Wrap { trim: false })
        .scroll((viewing.scroll, 0))
        .block(Block::bordered().border_set(border::THICK));
    frame.render_widget(note, body);

    let help_message = Line::from_iter([
        "j/k".bold().yellow(),
        " scroll, ".to_span(),
        "Esc".bold().yellow(),
        " back, ".to_span(),
        "n".bold().yellow(),
        " new note".to_span(),
    ])
    .centered();
    frame.render_widget(help_message, footer);
}

fn screen_layout(area: Rect) -> (Rect, Rect, Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    (layout[0], layout[1], layout[2])
}

/// Draws a back button and a title, returns the button's area.
fn render_header(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Length(8), Constraint::Min(1)])
        .split(area);
    frame.render_widget(Line::from("← Back").gray(), layout[0]);
    frame.render_widget(Line::from(title).bold().centered(), layout[1]);
    layout[0]
}

fn render_listing(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: &[String],
    selected: usize,
    empty: &str,
    hits: &mut HitMap,
) {
    let block = Block::bordered().title(title).border_set(border::THICK);

    if items.is_empty() {
        frame.render_widget(Paragraph::new(empty.dark_gray()).block(block), area);
        return;
    }

    let inner = block.inner(area);
    let visible = inner.height.max(1) as usize;
    let offset = (selected + 1).saturating_sub(visible);

    let list_items = items.iter().enumerate().skip(offset).map(|(i, name)| {
        let item = ListItem::new(Line::from(name.as_str()));
        if i == selected {
            item.black().on_white()
        } else {
            item
        }
    });

    for (row, index) in (offset..items.len()).take(visible).enumerate() {
        let line = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        hits.add(line, Intent::OpenAt(index));
    }

    frame.render_widget(List::new(list_items).block(block), area);
}

fn button(label: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(label).bold().centered()).block(Block::bordered())
}
