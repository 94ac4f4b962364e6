//! Presentation of search results.

use crate::CoreError;
use crate::output::Output;

use super::model::{FileMatch, MatchSet, MessageMatch, SearchResult};
use super::normalize::{format_provider_timestamp, format_unix_seconds, truncate};

const MESSAGE_HEADERS: &[&str] = &["CHANNEL", "USER", "TIMESTAMP", "TEXT"];
const FILE_HEADERS: &[&str] = &["NAME", "TYPE", "USER", "CREATED", "TITLE"];

const MESSAGE_TEXT_WIDTH: usize = 60;
const FILE_NAME_WIDTH: usize = 30;
const FILE_TITLE_WIDTH: usize = 40;

/// Write `result` to `out` in the sink's format.
///
/// JSON output is the whole result envelope, untouched. Text and table output
/// print a summary line, one row per match, and a paging footer; an empty page
/// prints a single "no results" line instead.
///
/// # Errors
///
/// Returns an error if serialization or the sink fails.
pub fn render<O: Output>(result: &SearchResult, query: &str, out: &mut O) -> Result<(), CoreError> {
    if out.is_json() {
        return out.print_json(result);
    }

    let noun = result.kind().noun();
    if result.is_empty() {
        return out.print(&format!("No {noun} found for \"{query}\"\n"));
    }

    out.print(&format!(
        "Found {} {noun} matching \"{query}\"\n\n",
        result.total()
    ))?;
    match result {
        SearchResult::Messages(set) => out.table(MESSAGE_HEADERS, &message_rows(set))?,
        SearchResult::Files(set) => out.table(FILE_HEADERS, &file_rows(set))?,
    }

    let paging = result.paging();
    out.print(&format!(
        "\nPage {} of {} (showing {} of {} results)\n",
        paging.page,
        paging.pages,
        result.len(),
        paging.total
    ))
}

fn message_rows(set: &MatchSet<MessageMatch>) -> Vec<Vec<String>> {
    set.matches
        .iter()
        .map(|m| {
            vec![
                m.channel.name.clone(),
                m.username.clone(),
                format_provider_timestamp(&m.ts),
                truncate(&m.text, MESSAGE_TEXT_WIDTH),
            ]
        })
        .collect()
}

fn file_rows(set: &MatchSet<FileMatch>) -> Vec<Vec<String>> {
    set.matches
        .iter()
        .map(|f| {
            vec![
                truncate(&f.name, FILE_NAME_WIDTH),
                f.filetype.clone(),
                f.user.clone(),
                format_unix_seconds(f.created),
                truncate(&f.title, FILE_TITLE_WIDTH),
            ]
        })
        .collect()
}
