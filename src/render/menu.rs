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

//! The context menu overlay.
//!
//! The menu is drawn after the rest of the frame, at absolute positions, on
//! top of whatever is already on screen. Its box is moved left and up as far
//! as needed to stay fully on screen.
//!
//! Geometry is shared with pointer handling, so a click is always tested
//! against exactly the box that was drawn.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols::line,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    events::MenuAction,
    model::TerminalSize,
    render::to_u16,
    state::ContextMenuState,
    theme::Theme,
};

const MIN_WIDTH: usize = 20;

/// Border, one space each side and at least three between label and
/// shortcut.
const PADDING: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuItem {
    Action {
        label: &'static str,
        shortcut: &'static str,
        action: MenuAction,
    },
    Separator,
}

const fn item(label: &'static str, shortcut: &'static str, action: MenuAction) -> MenuItem {
    MenuItem::Action {
        label,
        shortcut,
        action,
    }
}

const ENTRY_MENU: &[MenuItem] = &[
    item("Open", "Enter", MenuAction::Open),
    item("Open with editor", "E", MenuAction::OpenWithEditor),
    MenuItem::Separator,
    item("Copy", "C", MenuAction::Copy),
    item("Cut", "X", MenuAction::Cut),
    item("Paste", "V", MenuAction::Paste),
    MenuItem::Separator,
    item("Delete", "Del", MenuAction::Delete),
    MenuItem::Separator,
    item("Refresh", "R", MenuAction::Refresh),
];

const EMPTY_SPACE_MENU: &[MenuItem] = &[
    item("Paste", "V", MenuAction::Paste),
    item("Refresh", "R", MenuAction::Refresh),
];

/// The items offered for a menu, depending on what it was opened over.
pub(crate) fn menu_items(menu: &ContextMenuState) -> &'static [MenuItem] {
    if menu.target.is_some() {
        ENTRY_MENU
    } else {
        EMPTY_SPACE_MENU
    }
}

/// The on-screen box of a menu, after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MenuGeometry {
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl MenuGeometry {
    pub(crate) fn contains(&self, x: usize, y: usize) -> bool {
        (self.x..self.x + self.width).contains(&x) && (self.y..self.y + self.height).contains(&y)
    }

    /// The action under a screen cell, if any. Borders and separators have
    /// none.
    pub(crate) fn action_at(&self, items: &[MenuItem], x: usize, y: usize) -> Option<MenuAction> {
        if !self.contains(x, y) || x == self.x || x + 1 == self.x + self.width || y == self.y {
            return None;
        }
        match items.get(y - self.y - 1)? {
            MenuItem::Action { action, .. } => Some(*action),
            MenuItem::Separator => None,
        }
    }
}

pub(crate) fn menu_geometry(menu: &ContextMenuState, size: TerminalSize) -> MenuGeometry {
    let items = menu_items(menu);
    let natural = items
        .iter()
        .map(|item| match item {
            MenuItem::Action {
                label, shortcut, ..
            } => label.width() + shortcut.width() + PADDING,
            MenuItem::Separator => 0,
        })
        .max()
        .unwrap_or(0)
        .max(MIN_WIDTH);

    let term_width = usize::from(size.width);
    let term_height = usize::from(size.height);
    let width = natural.min(term_width);
    let height = (items.len() + 2).min(term_height);

    MenuGeometry {
        x: usize::from(menu.position.x).min(term_width.saturating_sub(width)),
        y: usize::from(menu.position.y).min(term_height.saturating_sub(height)),
        width,
        height,
    }
}

/// The menu box, drawn into a buffer whose area is its clamped position on
/// screen, or nothing when the menu is hidden.
pub(crate) fn render_context_menu(
    menu: &ContextMenuState,
    size: TerminalSize,
    theme: &Theme,
) -> Option<Buffer> {
    if !menu.visible {
        return None;
    }

    let items = menu_items(menu);
    let geometry = menu_geometry(menu, size);
    if geometry.width < 2 || geometry.height < 2 {
        return None;
    }

    let area = Rect::new(
        to_u16(geometry.x),
        to_u16(geometry.y),
        to_u16(geometry.width),
        to_u16(geometry.height),
    );
    let mut buf = Buffer::empty(area);

    let background = Style::new().bg(theme.menu_bg);
    let border = background.fg(theme.menu_border_colour);
    let label_style = background.fg(theme.menu_label_colour);
    let shortcut_style = background.fg(theme.menu_shortcut_colour);

    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(background)
        .render(area, &mut buf);

    let inner = geometry.width.saturating_sub(4);
    for (i, item) in items.iter().enumerate().take(geometry.height - 2) {
        let y = area.y + 1 + to_u16(i);
        match item {
            MenuItem::Action {
                label, shortcut, ..
            } => {
                let gap = inner.saturating_sub(label.width() + shortcut.width());
                let row = Line::from(vec![
                    Span::styled(*label, label_style),
                    Span::raw(" ".repeat(gap)),
                    Span::styled(*shortcut, shortcut_style),
                ]);
                Paragraph::new(row).render(Rect::new(area.x + 2, y, to_u16(inner), 1), &mut buf);
            }
            MenuItem::Separator => {
                let right = area.right() - 1;
                buf.set_string(area.x, y, line::VERTICAL_RIGHT, border);
                buf.set_string(area.x + 1, y, line::HORIZONTAL.repeat(geometry.width - 2), border);
                buf.set_string(right, y, line::VERTICAL_LEFT, border);
            }
        }
    }

    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        model::{FileEntry, Position},
        render::ansi::plain_line,
    };

    fn menu_at(x: u16, y: u16, target: Option<FileEntry>) -> ContextMenuState {
        ContextMenuState {
            visible: true,
            position: Position::new(x, y),
            target,
        }
    }

    #[test]
    fn test_menu_is_clamped_on_screen() {
        let size = TerminalSize::new(80, 24);
        let menu = menu_at(78, 23, Some(FileEntry::file("/tmp", "a.txt")));
        let geometry = menu_geometry(&menu, size);

        assert!(geometry.width >= MIN_WIDTH);
        assert_eq!(geometry.height, ENTRY_MENU.len() + 2);
        assert!(geometry.x + geometry.width <= 80);
        assert!(geometry.y + geometry.height <= 24);
        assert_eq!(geometry.x, 80 - geometry.width);
        assert_eq!(geometry.y, 24 - geometry.height);

        let buf = render_context_menu(&menu, size, &Theme::default()).unwrap();
        assert_eq!(
            buf.area,
            Rect::new(
                to_u16(geometry.x),
                to_u16(geometry.y),
                to_u16(geometry.width),
                to_u16(geometry.height)
            )
        );
        assert!(buf.area.right() <= 80 && buf.area.bottom() <= 24);
    }

    #[test]
    fn test_menu_fits_its_longest_entry() {
        let menu = menu_at(0, 0, Some(FileEntry::file("/tmp", "a.txt")));
        let geometry = menu_geometry(&menu, TerminalSize::new(80, 24));
        assert_eq!(geometry.width, "Open with editor".len() + "E".len() + PADDING);
        assert_eq!((geometry.x, geometry.y), (0, 0));
    }

    #[test]
    fn test_empty_space_menu() {
        let menu = menu_at(10, 5, None);
        let geometry = menu_geometry(&menu, TerminalSize::new(80, 24));
        assert_eq!(geometry.width, MIN_WIDTH);
        assert_eq!(geometry.height, 4);

        let items = menu_items(&menu);
        assert_eq!(geometry.action_at(items, 12, 6), Some(MenuAction::Paste));
        assert_eq!(geometry.action_at(items, 12, 7), Some(MenuAction::Refresh));
        // Borders and cells outside the box.
        assert_eq!(geometry.action_at(items, 10, 6), None);
        assert_eq!(geometry.action_at(items, 12, 5), None);
        assert_eq!(geometry.action_at(items, 12, 8), None);
        assert_eq!(geometry.action_at(items, 40, 6), None);
    }

    #[test]
    fn test_separators_have_no_action() {
        let menu = menu_at(0, 0, Some(FileEntry::file("/tmp", "a.txt")));
        let geometry = menu_geometry(&menu, TerminalSize::new(80, 24));
        let items = menu_items(&menu);
        assert_eq!(geometry.action_at(items, 3, 3), None);
        assert_eq!(geometry.action_at(items, 3, 4), Some(MenuAction::Copy));
    }

    #[test]
    fn test_hidden_menu_renders_nothing() {
        let menu = ContextMenuState::default();
        assert!(render_context_menu(&menu, TerminalSize::new(80, 24), &Theme::default()).is_none());
    }

    #[test]
    fn test_menu_rows() {
        let menu = menu_at(0, 0, Some(FileEntry::file("/tmp", "a.txt")));
        let buf = render_context_menu(&menu, TerminalSize::new(80, 24), &Theme::default()).unwrap();
        let width = buf.area.width;

        assert_eq!(plain_line(&buf, 0), format!("╭{}╮", "─".repeat(usize::from(width) - 2)));
        let open = plain_line(&buf, 1);
        assert!(open.starts_with("│ Open "));
        assert!(open.ends_with(" Enter │"));
        assert!(plain_line(&buf, 3).starts_with("├─"));
        assert!(plain_line(&buf, 3).ends_with("─┤"));
        assert!(plain_line(&buf, 11).starts_with('╰'));
    }
}
