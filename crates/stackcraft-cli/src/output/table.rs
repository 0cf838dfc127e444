//! Table formatting utilities.

use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table as ComfyTable, presets};

/// Table builder for formatted output
pub struct Table {
    inner: ComfyTable,
    colors_enabled: bool,
}

impl Table {
    /// Create a new table with the default (borderless) style
    pub fn new() -> Self {
        let colors_enabled = crate::output::colors_enabled();
        let mut table = ComfyTable::new();
        table.load_preset(presets::NOTHING);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        Self { inner: table, colors_enabled }
    }

    /// Set the table headers
    pub fn headers<I, T>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| {
                let mut cell = Cell::new(h.as_ref());
                if self.colors_enabled {
                    cell = cell.add_attribute(Attribute::Bold);
                }
                cell
            })
            .collect();
        self.inner.set_header(cells);
        self
    }

    /// Add a row to the table
    pub fn row<I, T>(&mut self, row: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        self.inner.add_row(row);
        self
    }

    /// Add a row with styled cells
    pub fn styled_row(&mut self, cells: Vec<Cell>) -> &mut Self {
        self.inner.add_row(cells);
        self
    }

    /// Create a success-styled cell
    pub fn success_cell(&self, text: impl std::fmt::Display) -> Cell {
        let mut cell = Cell::new(text);
        if self.colors_enabled {
            cell = cell.fg(Color::Green);
        }
        cell
    }

    /// Create an error-styled cell
    pub fn error_cell(&self, text: impl std::fmt::Display) -> Cell {
        let mut cell = Cell::new(text);
        if self.colors_enabled {
            cell = cell.fg(Color::Red);
        }
        cell
    }

    /// Create a warning-styled cell
    pub fn warning_cell(&self, text: impl std::fmt::Display) -> Cell {
        let mut cell = Cell::new(text);
        if self.colors_enabled {
            cell = cell.fg(Color::Yellow);
        }
        cell
    }

    /// Create a cell with right alignment
    pub fn right_cell(&self, text: impl std::fmt::Display) -> Cell {
        Cell::new(text).set_alignment(CellAlignment::Right)
    }

    /// Render the table to a string
    pub fn render(&self) -> String {
        self.inner.to_string()
    }

    /// Print the table to stdout
    pub fn print(&self) {
        println!("{}", self.inner);
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}
