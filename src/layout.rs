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

//! Icon grid geometry.
//!
//! Pure functions mapping the terminal size to a grid of fixed-size icon
//! cells, and translating between item indices and screen cells. Nothing here
//! holds state; the store caches the last computed row/column counts, but
//! this module is the only place they are derived.
//!
//! Screen coordinates are absolute and 0-based. The window frame occupies
//! column 0 and the last column, items start at column
//! [`CONTENT_LEFT`], and grid rows run from `content_start_row` up to (not
//! including) `content_end_row`, where the status bar begins.

use std::ops::Range;

use crate::model::TerminalSize;

pub(crate) const ITEM_WIDTH: usize = 13;
pub(crate) const ITEM_HEIGHT: usize = 5;
pub(crate) const HEADER_HEIGHT: usize = 3;
pub(crate) const FOOTER_HEIGHT: usize = 2;

/// Side borders plus one column of padding on each side.
const HORIZONTAL_CHROME: usize = 4;

/// Top and bottom window borders.
const VERTICAL_BORDERS: usize = 2;

/// First screen column an item may occupy.
pub(crate) const CONTENT_LEFT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LayoutInfo {
    pub(crate) items_per_row: usize,
    pub(crate) total_rows: usize,
    pub(crate) item_width: usize,
    pub(crate) item_height: usize,
    pub(crate) content_start_row: usize,
    /// First row below the content area. On short terminals this cuts
    /// through the last grid row.
    pub(crate) content_end_row: usize,
}

impl LayoutInfo {
    /// Number of items that fit on screen at once.
    pub(crate) fn capacity(&self) -> usize {
        self.items_per_row * self.total_rows
    }
}

/// Screen cell of an item's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ItemPosition {
    pub(crate) x: usize,
    pub(crate) y: usize,
}

/// Derives the grid geometry for a terminal.
///
/// Terminals too small for a single cell still get a 1x1 grid.
pub(crate) fn calculate_layout(size: TerminalSize) -> LayoutInfo {
    let available_width = usize::from(size.width).saturating_sub(HORIZONTAL_CHROME);
    let available_height = usize::from(size.height)
        .saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT + VERTICAL_BORDERS);

    let content_start_row = HEADER_HEIGHT + 1;

    LayoutInfo {
        items_per_row: (available_width / ITEM_WIDTH).max(1),
        total_rows: (available_height / ITEM_HEIGHT).max(1),
        item_width: ITEM_WIDTH,
        item_height: ITEM_HEIGHT,
        content_start_row,
        content_end_row: usize::from(size.height)
            .saturating_sub(FOOTER_HEIGHT)
            .max(content_start_row),
    }
}

/// Top-left screen cell of the item at `index`, relative to the first
/// visible row.
pub(crate) fn get_item_position(index: usize, layout: &LayoutInfo) -> ItemPosition {
    let row = index / layout.items_per_row;
    let col = index % layout.items_per_row;

    ItemPosition {
        x: col * layout.item_width + CONTENT_LEFT,
        y: layout.content_start_row + row * layout.item_height,
    }
}

/// Maps a screen cell back to the item drawn there.
///
/// Returns `None` above or left of the content area, right of the last
/// column, or past the last item.
pub(crate) fn get_item_index_from_position(
    x: usize,
    y: usize,
    layout: &LayoutInfo,
    total_items: usize,
) -> Option<usize> {
    if y < layout.content_start_row || x < CONTENT_LEFT {
        return None;
    }

    let col = (x - CONTENT_LEFT) / layout.item_width;
    let row = (y - layout.content_start_row) / layout.item_height;
    if col >= layout.items_per_row {
        return None;
    }

    let index = row * layout.items_per_row + col;
    (index < total_items).then_some(index)
}

/// Maps a pointer position to an item index, taking scrolling into account.
///
/// Only the visible rows are clickable; the status bar and filler rows below
/// the grid never resolve to an item.
pub(crate) fn resolve_pointer_index(
    x: usize,
    y: usize,
    layout: &LayoutInfo,
    total_items: usize,
    scroll_offset: usize,
) -> Option<usize> {
    if y >= layout.content_end_row {
        return None;
    }
    let local = get_item_index_from_position(x, y, layout, usize::MAX)?;
    if local / layout.items_per_row >= layout.total_rows {
        return None;
    }

    let index = local + scroll_offset * layout.items_per_row;
    (index < total_items).then_some(index)
}

/// Indices visible when the grid is scrolled down by `scroll_offset` rows.
pub(crate) fn get_visible_items(
    total_items: usize,
    scroll_offset: usize,
    layout: &LayoutInfo,
) -> Range<usize> {
    let start = (scroll_offset * layout.items_per_row).min(total_items);
    let end = (start + layout.capacity()).min(total_items);
    start..end
}

/// The smallest change to `scroll_offset` that brings `index` on screen.
pub(crate) fn get_scroll_offset_for_item(
    index: usize,
    scroll_offset: usize,
    layout: &LayoutInfo,
) -> usize {
    let row = index / layout.items_per_row;

    if row < scroll_offset {
        row
    } else if row > scroll_offset + layout.total_rows - 1 {
        row + 1 - layout.total_rows
    } else {
        scroll_offset
    }
}

/// Largest useful scroll offset for `total_items`.
pub(crate) fn max_scroll_offset(total_items: usize, layout: &LayoutInfo) -> usize {
    let rows = total_items.div_ceil(layout.items_per_row);
    rows.saturating_sub(layout.total_rows)
}
