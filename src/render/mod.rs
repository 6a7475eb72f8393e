// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! User interface rendering logic.
//!
//! This module handles the translation of the [`AppState`] into a full
//! terminal frame: a window with a title, a path bar, the icon grid (or an
//! empty-folder placeholder), a status bar and, when open, the context menu
//! drawn on top.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`render_frame`] function, a pure function
//! of the state, called on every state change. It draws into `ratatui`
//! buffers; [`write_frame`] then repaints every row, background first and
//! the menu overlay last. There is no diffing against the previous frame.
//!
//! Frame rows, top to bottom:
//!
//! * `0`: top border with the centered title
//! * `1`: path bar
//! * `2`: separator
//! * `3`: spacer
//! * `4..height - 2`: grid or placeholder, padded with empty rows
//! * `height - 2`: status bar
//! * `height - 1`: bottom border

mod ansi;
mod grid;
pub(crate) mod icons;
pub(crate) mod menu;

use std::{
    io::{self, Write},
    path::{Component, Path},
    time::Instant,
};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate},
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    symbols::line,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::{
    layout::{self, LayoutInfo},
    render::icons::ICON_EMPTY,
    state::{AppState, StatusLevel},
    theme::Theme,
    util::format::{format_size, truncate_end, truncate_start},
};

pub(crate) use grid::render_file_grid;

const TITLE: &str = " deskfm ";
const PATH_SEPARATOR: &str = " › ";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
const EMPTY_TEXT: &str = "This folder is empty";

/// A fully rendered frame.
///
/// The background covers the whole terminal. The overlay, when present, is
/// positioned at the menu's screen coordinates.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub(crate) background: Buffer,
    pub(crate) overlay: Option<Buffer>,
}

/// Renders the whole screen for the given state.
///
/// `now` decides whether the status message has expired.
pub(crate) fn render_frame(state: &AppState, theme: &Theme, now: Instant) -> Frame {
    let viewport = &state.viewport;
    let size = viewport.terminal_size;
    let mut buf = Buffer::empty(Rect::new(0, 0, size.width, size.height));

    if size.width >= 2 && size.height >= 2 {
        draw_window(&mut buf, theme);
        draw_path_bar(&mut buf, &viewport.current_path, theme);

        let layout = viewport.layout();
        if viewport.entries.is_empty() {
            draw_placeholder(&mut buf, &layout, theme);
        } else {
            let grid = render_file_grid(
                &viewport.entries,
                state.selection.index(),
                &layout,
                usize::from(size.width),
                viewport.scroll_offset,
                theme,
            );
            draw_grid(&mut buf, &grid, &layout);
        }

        draw_status_bar(&mut buf, state, theme, now);
    }

    Frame {
        background: buf,
        overlay: menu::render_context_menu(&state.context_menu, size, theme),
    }
}

/// Writes a frame to the terminal, background first and overlay last.
pub(crate) fn write_frame<W: Write>(out: &mut W, frame: &Frame, clear: bool) -> io::Result<()> {
    queue!(out, BeginSynchronizedUpdate)?;
    if clear {
        queue!(out, Clear(ClearType::All))?;
    }

    let background = &frame.background;
    for y in background.area.top()..background.area.bottom() {
        queue!(out, MoveTo(background.area.x, y), Print(ansi::buffer_line(background, y)))?;
    }
    if let Some(overlay) = &frame.overlay {
        for y in overlay.area.top()..overlay.area.bottom() {
            queue!(out, MoveTo(overlay.area.x, y), Print(ansi::buffer_line(overlay, y)))?;
        }
    }

    queue!(out, EndSynchronizedUpdate)?;
    out.flush()
}

pub(crate) fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn draw_window(buf: &mut Buffer, theme: &Theme) {
    let area = buf.area;
    let border = Style::new().fg(theme.window_border_colour);

    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Line::from(TITLE).centered())
        .title_style(Style::new().fg(theme.title_colour).bold())
        .render(area, buf);

    let separator_row = to_u16(layout::HEADER_HEIGHT - 1);
    if separator_row < area.bottom() - 1 {
        buf.set_string(area.x, separator_row, line::VERTICAL_RIGHT, border);
        buf.set_string(
            area.x + 1,
            separator_row,
            line::HORIZONTAL.repeat(usize::from(area.width) - 2),
            border,
        );
        buf.set_string(area.right() - 1, separator_row, line::VERTICAL_LEFT, border);
    }
}

// Rows of the grid past the content area are cut off rather than drawn over
// the status bar.
fn draw_grid(buf: &mut Buffer, grid: &Buffer, layout: &LayoutInfo) {
    let content = content_area(buf.area, layout).intersection(grid.area);
    for y in content.top()..content.bottom() {
        for x in content.left()..content.right() {
            buf[(x, y)] = grid[(x, y)].clone();
        }
    }
}

/// The area between the side borders from the first content row down to the
/// status bar.
fn content_area(area: Rect, layout: &LayoutInfo) -> Rect {
    let top = to_u16(layout.content_start_row);
    let bottom = to_u16(layout.content_end_row).min(area.bottom().saturating_sub(1));
    Rect::new(
        area.x + 1,
        top,
        area.width.saturating_sub(2),
        bottom.saturating_sub(top),
    )
    .intersection(area)
}

/// Path components as display segments, root first.
fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::RootDir => Some("/".to_string()),
            Component::Prefix(prefix) => {
                Some(prefix.as_os_str().to_string_lossy().into_owned())
            }
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            Component::CurDir | Component::ParentDir => None,
        })
        .collect()
}

// Segments and separators get their own colours. The path is cut from the
// left when too long, so the innermost directory stays visible.
fn draw_path_bar(buf: &mut Buffer, path: &Path, theme: &Theme) {
    let area = buf.area;
    let row = 1;
    if row >= area.bottom() - 1 || area.width < 4 {
        return;
    }

    let available = usize::from(area.width) - 4;
    let text = truncate_start(&path_segments(path).join(PATH_SEPARATOR), available);

    let segment = Style::new().fg(theme.path_segment_colour);
    let separator = Style::new().fg(theme.path_separator_colour);
    let mut spans = Vec::new();
    for (i, part) in text.split(PATH_SEPARATOR).enumerate() {
        if i > 0 {
            spans.push(Span::styled(PATH_SEPARATOR, separator));
        }
        spans.push(Span::styled(part.to_string(), segment));
    }

    Paragraph::new(Line::from(spans)).render(Rect::new(2, row, to_u16(available), 1), buf);
}

fn draw_placeholder(buf: &mut Buffer, layout: &LayoutInfo, theme: &Theme) {
    let content = content_area(buf.area, layout);
    if content.is_empty() {
        return;
    }

    let lines = vec![
        Line::from(ICON_EMPTY),
        Line::default(),
        Line::from(truncate_end(EMPTY_TEXT, usize::from(content.width))),
    ];
    let height = to_u16(lines.len()).min(content.height);
    let top = content.y + (content.height - height) / 2;

    Paragraph::new(lines)
        .centered()
        .style(Style::new().fg(theme.placeholder_colour))
        .render(Rect::new(content.x, top, content.width, height), buf);
}

fn draw_status_bar(buf: &mut Buffer, state: &AppState, theme: &Theme, now: Instant) {
    let area = buf.area;
    if usize::from(area.height) < layout::HEADER_HEIGHT + 2 {
        return;
    }
    let row = Rect::new(area.x + 1, area.bottom() - 2, area.width - 2, 1);

    let (text, colour) = match state.status.as_deref() {
        Some(status) if !status.is_expired(now) => {
            let colour = match status.level {
                StatusLevel::Info => theme.status_colour,
                StatusLevel::Error => theme.status_error_colour,
            };
            (status.text.clone(), colour)
        }
        _ => (status_summary(state), theme.status_colour),
    };

    Paragraph::new(truncate_end(&text, usize::from(row.width)))
        .centered()
        .style(Style::new().fg(colour))
        .render(row, buf);
}

/// "i/n items" for a selection, with its type, size and date, or "n items".
fn status_summary(state: &AppState) -> String {
    let total = state.viewport.entries.len();
    let noun = if total == 1 { "item" } else { "items" };

    match (state.selection.index(), state.selection.entry()) {
        (Some(index), Some(entry)) => {
            let mut parts = vec![
                format!("{}/{total} {noun}", index + 1),
                icons::icon_for(entry).label.to_string(),
            ];
            if let Some(size) = entry.size {
                parts.push(format_size(size));
            }
            if let Some(modified) = entry.modified_at {
                parts.push(modified.format(DATE_FORMAT).to_string());
            }
            parts.join("  ·  ")
        }
        _ => format!("{total} {noun}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{path::PathBuf, rc::Rc, time::Duration};

    use unicode_width::UnicodeWidthStr;

    use crate::{
        model::{FileEntry, Position, TerminalSize},
        render::ansi::plain_line,
        state::{ContextMenuState, SelectionState, StatusMessage, ViewportState},
    };

    fn state_with(size: TerminalSize, entries: Vec<FileEntry>) -> AppState {
        let mut state = AppState::initial(PathBuf::from("/home/user/projects"), size);
        let layout = layout::calculate_layout(size);
        state.viewport = Rc::new(ViewportState {
            entries: entries.into(),
            items_per_row: layout.items_per_row,
            total_rows: layout.total_rows,
            ..(*state.viewport).clone()
        });
        state
    }

    fn entries(n: usize) -> Vec<FileEntry> {
        let mut entries = vec![FileEntry::directory("/home/user/projects", "src")];
        entries.extend((1..n).map(|i| FileEntry::file("/home/user/projects", &format!("file{i}.rs"))));
        entries
    }

    fn plain(frame: &Frame) -> Vec<String> {
        let area = frame.background.area;
        (area.top()..area.bottom())
            .map(|y| plain_line(&frame.background, y))
            .collect()
    }

    #[test]
    fn test_every_line_is_terminal_width() {
        for (w, h) in [(80, 24), (120, 40), (33, 12), (20, 8)] {
            let size = TerminalSize::new(w, h);
            let mut state = state_with(size, entries(9));
            state.selection = Rc::new(SelectionState::select(&state.viewport.entries, 0));

            let frame = render_frame(&state, &Theme::default(), Instant::now());
            let lines = plain(&frame);
            assert_eq!(lines.len(), usize::from(h));
            for line in &lines {
                assert_eq!(line.width(), usize::from(w), "{w}x{h}: {line:?}");
            }
        }
    }

    #[test]
    fn test_frame_structure() {
        let size = TerminalSize::new(80, 24);
        let state = state_with(size, entries(3));
        let lines = plain(&render_frame(&state, &Theme::default(), Instant::now()));

        assert!(lines[0].starts_with('╭') && lines[0].contains("deskfm"));
        assert!(lines[1].contains("/ › home › user › projects"));
        assert!(lines[2].starts_with('├') && lines[2].ends_with('┤'));
        assert!(lines[6].contains("src"));
        assert!(lines[6].contains("file1.rs"));
        assert_eq!(lines[22].trim_matches(|c| c == '│' || c == ' '), "3 items");
        assert!(lines[23].starts_with('╰'));
        assert!(lines[10..22].iter().all(|l| l.starts_with('│') && l.ends_with('│')));
    }

    #[test]
    fn test_short_terminal_keeps_status_bar_clear_of_grid() {
        let size = TerminalSize::new(80, 10);
        let state = state_with(size, entries(5));
        let lines = plain(&render_frame(&state, &Theme::default(), Instant::now()));

        assert!(lines[6].contains("file1.rs"));
        assert_eq!(lines[8].trim_matches(|c| c == '│' || c == ' '), "5 items");
        assert!(lines[9].starts_with('╰') && lines[9].ends_with('╯'));
    }

    #[test]
    fn test_empty_directory_shows_placeholder() {
        let size = TerminalSize::new(80, 24);
        let state = state_with(size, Vec::new());
        let lines = plain(&render_frame(&state, &Theme::default(), Instant::now()));

        assert!(lines.iter().any(|l| l.contains("This folder is empty")));
        assert!(lines[22].contains("0 items"));

        let layout = state.viewport.layout();
        for y in layout.content_start_row..22 {
            for x in 0..80 {
                assert_eq!(layout::get_item_index_from_position(x, y, &layout, 0), None);
            }
        }
    }

    #[test]
    fn test_status_bar_describes_selection() {
        let size = TerminalSize::new(80, 24);
        let mut state = state_with(size, entries(4));
        state.selection = Rc::new(SelectionState::select(&state.viewport.entries, 2));

        let lines = plain(&render_frame(&state, &Theme::default(), Instant::now()));
        assert!(lines[22].contains("3/4 items"));
        assert!(lines[22].contains("Source"));
        assert!(lines[22].contains("0 B"));
    }

    #[test]
    fn test_status_message_until_expiry() {
        let size = TerminalSize::new(80, 24);
        let mut state = state_with(size, entries(2));
        let now = Instant::now();
        state.status = Some(Rc::new(StatusMessage {
            text: "Permission denied".to_string(),
            level: StatusLevel::Error,
            expires_at: now + Duration::from_secs(3),
        }));

        let theme = Theme::default();
        let frame = render_frame(&state, &theme, now);
        assert!(plain(&frame)[22].contains("Permission denied"));
        let x = frame.background.area.width / 2;
        assert_eq!(frame.background[(x, 22)].fg, theme.status_error_colour);

        let later = now + Duration::from_secs(4);
        let lines = plain(&render_frame(&state, &theme, later));
        assert!(lines[22].contains("2 items"));
    }

    #[test]
    fn test_long_path_keeps_innermost_directory() {
        let size = TerminalSize::new(30, 12);
        let mut state = state_with(size, Vec::new());
        state.viewport = Rc::new(ViewportState {
            current_path: PathBuf::from("/very/long/path/that/does/not/fit/deepest"),
            ..(*state.viewport).clone()
        });

        let lines = plain(&render_frame(&state, &Theme::default(), Instant::now()));
        assert!(lines[1].contains('…'));
        assert!(lines[1].contains("deepest"));
        assert_eq!(lines[1].width(), 30);
    }

    #[test]
    fn test_menu_overlay_is_written_last() {
        let size = TerminalSize::new(80, 24);
        let mut state = state_with(size, entries(2));
        state.context_menu = Rc::new(ContextMenuState {
            visible: true,
            position: Position::new(78, 23),
            target: None,
        });

        let frame = render_frame(&state, &Theme::default(), Instant::now());
        let overlay = frame.overlay.as_ref().unwrap();
        assert_eq!(overlay.area.height, 4);
        assert_eq!((overlay.area.right(), overlay.area.bottom()), (80, 24));

        let mut out = Vec::new();
        write_frame(&mut out, &frame, false).unwrap();
        let written = String::from_utf8(out).unwrap();
        let background_end = written.rfind("items").unwrap();
        let overlay_start = written.find("Paste").unwrap();
        assert!(overlay_start > background_end);
        assert!(written.ends_with("\x1b[?2026l"));
    }
}
