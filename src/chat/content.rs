use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tokio::fs;

use super::ChatError;

pub const PREVIEW_WORDS: usize = 500;

/// First [`PREVIEW_WORDS`] words, with `...` appended when the text is longer.
pub fn preview_text(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut preview = words
        .iter()
        .take(PREVIEW_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > PREVIEW_WORDS {
        preview.push_str("...");
    }
    preview
}

/// Single-component file name for a page: spaces and path separators become
/// `_`, and leading dots are dropped.
pub fn download_filename(page: &str) -> String {
    let stem: String = page
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim_start_matches('.');
    let stem = if stem.is_empty() { "page" } else { stem };
    format!("{}_wikipedia.txt", stem)
}

/// Write `text` to `dir/{download_filename(page)}`, creating `dir` if needed.
pub async fn save_text(dir: &Path, page: &str, text: &str) -> Result<PathBuf, ChatError> {
    let name = download_filename(page);
    let path = dir.join(&name);
    if path.parent() != Some(dir) || path.file_name() != Some(OsStr::new(&name)) {
        return Err(ChatError::InvalidFileName(name));
    }

    fs::create_dir_all(dir).await?;
    fs::write(&path, text).await?;
    log::info!("Saved article text to {}", path.display());
    Ok(path)
}
