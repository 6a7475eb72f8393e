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

//! Visual styling and color configuration for the desktop.
//!
//! This module defines the application's color palette and the mapping from
//! a file's semantic category to the color its icon and label are drawn in.

use ratatui::style::Color;

use crate::render::icons::Category;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Theme {
    pub(crate) window_border_colour: Color,
    pub(crate) title_colour: Color,
    pub(crate) path_segment_colour: Color,
    pub(crate) path_separator_colour: Color,
    pub(crate) status_colour: Color,
    pub(crate) status_error_colour: Color,
    pub(crate) selection_fg: Color,
    pub(crate) selection_bg: Color,
    pub(crate) menu_border_colour: Color,
    pub(crate) menu_label_colour: Color,
    pub(crate) menu_shortcut_colour: Color,
    pub(crate) menu_bg: Color,
    pub(crate) placeholder_colour: Color,
}

impl Default for Theme {
    // Returns the standard application theme.
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    // Constructs the default theme.
    pub(crate) const fn default_theme() -> Self {
        Self {
            window_border_colour: Color::Rgb(102, 102, 102),
            title_colour: Color::Rgb(250, 189, 47),
            path_segment_colour: Color::Rgb(179, 157, 219),
            path_separator_colour: Color::Rgb(102, 102, 102),
            status_colour: Color::Rgb(162, 161, 166),
            status_error_colour: Color::Rgb(239, 83, 80),
            selection_fg: Color::Rgb(255, 255, 255),
            selection_bg: Color::Rgb(48, 79, 254),
            menu_border_colour: Color::Rgb(162, 161, 166),
            menu_label_colour: Color::Rgb(255, 255, 255),
            menu_shortcut_colour: Color::Rgb(162, 161, 166),
            menu_bg: Color::Rgb(50, 30, 60),
            placeholder_colour: Color::Rgb(162, 161, 166),
        }
    }

    /// Returns the color used for entries of the given category.
    pub(crate) const fn category_colour(&self, category: Category) -> Color {
        match category {
            Category::Directory => Color::Rgb(255, 215, 0),
            Category::Code => Color::Rgb(129, 199, 132),
            Category::Image => Color::Rgb(240, 98, 146),
            Category::Audio => Color::Rgb(77, 208, 225),
            Category::Video => Color::Rgb(255, 138, 101),
            Category::Archive => Color::Rgb(161, 136, 127),
            Category::Document => Color::Rgb(144, 202, 249),
            Category::Data => Color::Rgb(206, 147, 216),
            Category::Other => Color::Rgb(224, 224, 224),
        }
    }
}
