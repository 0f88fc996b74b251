//! Readers for the plain text inputs.
//!
//! A missing file reads as absent. Any other I/O failure is reported to the
//! sink as [`Event::SourceUnreadable`] and also reads as absent.

use std::fmt::Display;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use crate::events::{Event, EventSink};

fn read_source(path: &Path, sink: &dyn EventSink) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            sink.record(&Event::SourceUnreadable {
                path: path.to_path_buf(),
                error: e.to_string(),
            });
            None
        }
    }
}

/// Every non-blank line, trimmed, in file order
pub fn read_list(path: &Path, sink: &dyn EventSink) -> Vec<String> {
    read_source(path, sink)
        .map(|content| parse_list(&content))
        .unwrap_or_default()
}

/// The trimmed first line; an empty first line counts as absent
pub fn read_first_line(path: &Path, sink: &dyn EventSink) -> Option<String> {
    read_source(path, sink).and_then(|content| parse_first_line(&content))
}

pub fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_first_line(content: &str) -> Option<String> {
    content
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

/// Parse an optional numeric value, substituting `default` when it is absent.
///
/// A value that fails to parse, or that `accept` rejects, is reported as
/// [`Event::InvalidValue`] and also yields `default`.
pub fn parse_or_default<T>(
    item: &'static str,
    raw: Option<&str>,
    default: T,
    accept: impl Fn(&T) -> bool,
    sink: &dyn EventSink,
) -> T
where
    T: FromStr + Display,
{
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if accept(&value) => value,
        _ => {
            sink.record(&Event::InvalidValue {
                item,
                raw: raw.to_string(),
                fallback: default.to_string(),
            });
            default
        }
    }
}
