//! Output file naming.
//!
//! Turns arbitrary track titles into names that are safe on every common
//! filesystem, and builds the final output path for a track.
//!
//! # Rules
//! A name is kept as is when it is non-empty, at most 255 characters, has no
//! `< > : " / \ | ? *` or control characters, is not a reserved device name
//! (`con`, `prn`, `aux`, `nul`, `com0`-`com9`, `lpt0`-`lpt9`, any case) and
//! is not `.` or `..`. Otherwise forbidden characters become `_`, reserved
//! names are wrapped as `_name_`, and `.` / `..` become `_` / `__`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Maximum file name length, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a whole file name, extension included, in bytes.
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Name used when a title is empty.
pub const EMPTY_NAME_PLACEHOLDER: &str = "untitled";

/// What to do when two tracks map to the same output file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Later tracks replace earlier files with the same name
    #[default]
    Overwrite,
    /// Append ` (2)`, ` (3)`, ... until the name is free
    Suffix,
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || (c as u32) < 0x20
}

fn is_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "con" | "prn" | "aux" | "nul" => true,
        _ => {
            let bytes = lower.as_bytes();
            bytes.len() == 4
                && (lower.starts_with("com") || lower.starts_with("lpt"))
                && bytes[3].is_ascii_digit()
        }
    }
}

/// Whether a name can be used as a file name unchanged.
pub fn is_valid_filename(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_NAME_LEN
        && !name.chars().any(is_forbidden)
        && !is_reserved(name)
        && name != "."
        && name != ".."
}

/// Map an arbitrary title to a filesystem-safe name.
///
/// Total and idempotent: the result is always a valid name.
pub fn sanitize_filename(name: &str) -> String {
    if name.is_empty() {
        return EMPTY_NAME_PLACEHOLDER.to_string();
    }
    if is_valid_filename(name) {
        return name.to_string();
    }

    let replaced: String = name
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    let renamed = if is_reserved(&replaced) {
        format!("_{}_", replaced)
    } else if replaced == "." {
        "_".to_string()
    } else if replaced == ".." {
        "__".to_string()
    } else {
        replaced
    };

    if renamed.chars().count() > MAX_NAME_LEN {
        renamed.chars().take(MAX_NAME_LEN).collect()
    } else {
        renamed
    }
}

/// Join `stem` and `tail`, cutting the stem on a character boundary so the
/// result fits in [`MAX_FILE_NAME_BYTES`].
fn file_name(stem: &str, tail: &str) -> String {
    let budget = MAX_FILE_NAME_BYTES.saturating_sub(tail.len());
    let mut end = stem.len().min(budget);
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &stem[..end], tail)
}

/// Build the output path for a track title.
///
/// The file name, extension and any collision suffix included, never exceeds
/// [`MAX_FILE_NAME_BYTES`]. `taken` holds the paths already produced during
/// this run; with [`CollisionPolicy::Suffix`] those and existing files are
/// skipped.
pub fn output_path(
    dir: &Path,
    title: &str,
    extension: &str,
    policy: CollisionPolicy,
    taken: &HashSet<PathBuf>,
) -> PathBuf {
    let stem = sanitize_filename(title);
    let first = dir.join(file_name(&stem, &format!(".{}", extension)));

    match policy {
        CollisionPolicy::Overwrite => first,
        CollisionPolicy::Suffix => {
            let mut candidate = first;
            let mut n = 2;
            while candidate.exists() || taken.contains(&candidate) {
                candidate = dir.join(file_name(&stem, &format!(" ({}).{}", n, extension)));
                n += 1;
            }
            candidate
        }
    }
}
