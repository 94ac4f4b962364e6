//! Output sink for rendered results.
//!
//! [`Output`] is the only way the renderer writes anything. [`Printer`]
//! implements it over any [`io::Write`]: stdout in the CLI, a `Vec<u8>` in
//! tests.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::CoreError;

/// Presentation format for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain-text columns.
    #[default]
    Text,
    /// Bordered table.
    Table,
    /// Pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(CoreError::Config(format!(
                "invalid output format '{s}' (expected text, json, or table)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Destination for rendered output.
pub trait Output {
    /// Selected presentation format.
    fn format(&self) -> OutputFormat;

    /// Whether output should be machine-readable JSON.
    fn is_json(&self) -> bool {
        self.format() == OutputFormat::Json
    }

    /// Write text verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn print(&mut self, text: &str) -> Result<(), CoreError>;

    /// Write a table with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> Result<(), CoreError>;

    /// Write `value` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying writer fails.
    fn print_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CoreError>;
}

/// [`Output`] over an [`io::Write`].
#[derive(Debug)]
pub struct Printer<W> {
    writer: W,
    format: OutputFormat,
    color: bool,
}

impl Printer<io::Stdout> {
    /// Printer writing to standard output.
    #[must_use]
    pub fn stdout(format: OutputFormat, color: bool) -> Self {
        Self::new(io::stdout(), format, color)
    }
}

impl<W: Write> Printer<W> {
    /// Wrap `writer`. `color` enables ANSI styling of table headers in text mode.
    pub const fn new(writer: W, format: OutputFormat, color: bool) -> Self {
        Self {
            writer,
            format,
            color,
        }
    }

    /// Consume the printer and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_plain(&mut self, headers: &[&str], rows: &[Vec<String>], widths: &[usize]) -> io::Result<()> {
        let header_cells: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
        let header = join_padded(&header_cells, widths, "  ");
        if self.color {
            writeln!(self.writer, "\x1b[1m{header}\x1b[0m")?;
        } else {
            writeln!(self.writer, "{header}")?;
        }
        for row in rows {
            writeln!(self.writer, "{}", join_padded(row, widths, "  "))?;
        }
        Ok(())
    }

    fn write_boxed(&mut self, headers: &[&str], rows: &[Vec<String>], widths: &[usize]) -> io::Result<()> {
        let rule: String = widths.iter().fold(String::from("+"), |mut acc, w| {
            acc.push_str(&"-".repeat(w + 2));
            acc.push('+');
            acc
        });
        let header_cells: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();

        writeln!(self.writer, "{rule}")?;
        writeln!(self.writer, "{}", boxed_row(&header_cells, widths))?;
        writeln!(self.writer, "{rule}")?;
        for row in rows {
            writeln!(self.writer, "{}", boxed_row(row, widths))?;
        }
        writeln!(self.writer, "{rule}")
    }
}

impl<W: Write> Output for Printer<W> {
    fn format(&self) -> OutputFormat {
        self.format
    }

    fn print(&mut self, text: &str) -> Result<(), CoreError> {
        self.writer.write_all(text.as_bytes())?;
        Ok(())
    }

    fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> Result<(), CoreError> {
        let widths = column_widths(headers, rows);
        match self.format {
            OutputFormat::Table => self.write_boxed(headers, rows, &widths)?,
            OutputFormat::Text | OutputFormat::Json => self.write_plain(headers, rows, &widths)?,
        }
        Ok(())
    }

    fn print_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

/// Display width of each column, covering the header and every row.
fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let w = cell.width();
            match widths.get_mut(i) {
                Some(current) => *current = (*current).max(w),
                None => widths.push(w),
            }
        }
    }
    widths
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{cell}{}", " ".repeat(fill))
}

fn join_padded(cells: &[String], widths: &[usize], sep: &str) -> String {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, w)| pad(cells.get(i).map_or("", String::as_str), *w))
        .collect::<Vec<_>>()
        .join(sep);
    line.trim_end().to_string()
}

fn boxed_row(cells: &[String], widths: &[usize]) -> String {
    let inner = widths
        .iter()
        .enumerate()
        .map(|(i, w)| pad(cells.get(i).map_or("", String::as_str), *w))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("| {inner} |")
}
