//! Log file naming
//!
//! Cards are formatted FAT, so names must fit 8.3: at most 8 characters
//! bytes before the extension. A name is the prefix followed by a decimal
//! index, and the prefix gives up one byte for every extra index digit.
//! Multi-byte characters are never split, so such a prefix may come out shorter.
//!
//! | index    | prefix bytes |
//! |----------|--------------|
//! | 0-9      | 7            |
//! | 10-99    | 6            |
//! | 100-999  | 5            |
//!
//! Index 1000 and up are never used.

use crate::error::LogError;
use crate::format::LogFormat;
use crate::storage::Storage;

/// Bytes available before the extension
pub const BASE_NAME_LEN: usize = 8;

/// First index that no longer fits
pub const MAX_INDEX: u32 = 1000;

/// Prefix bytes available for `index`, or `None` past the last index
pub fn prefix_budget(index: u32) -> Option<usize> {
    match index {
        0..=9 => Some(7),
        10..=99 => Some(6),
        100..=999 => Some(5),
        _ => None,
    }
}

/// Base file name (no directory) for `prefix` at `index`
pub fn candidate_name(prefix: &str, index: u32, format: LogFormat) -> Option<String> {
    let budget = prefix_budget(index)?;
    let mut end = budget.min(prefix.len());
    while !prefix.is_char_boundary(end) {
        end -= 1;
    }
    Some(format!("{}{}.{}", &prefix[..end], index, format.extension()))
}

/// Find the first unused name under `root_dir`.
///
/// Returns the full path. Candidates are probed in index order, so this costs
/// one `exists` call per file already present.
pub fn allocate<S: Storage>(
    storage: &mut S,
    root_dir: &str,
    prefix: &str,
    format: LogFormat,
) -> Result<String, LogError> {
    (0..MAX_INDEX)
        .filter_map(|index| candidate_name(prefix, index, format))
        .map(|name| format!("{}/{}", root_dir, name))
        .find(|path| !storage.exists(path))
        .ok_or_else(|| LogError::FileAllocationExhausted {
            prefix: prefix.to_string(),
        })
}
