//! Text filter over relative keys.

use assetver_entity::file::FileVersion;

/// Files whose relative key contains `filter_text`, ignoring case.
///
/// Order is preserved; an empty filter returns every file.
pub fn filter_files(files: &[FileVersion], filter_text: &str) -> Vec<FileVersion> {
    if filter_text.is_empty() {
        return files.to_vec();
    }
    let needle = filter_text.to_lowercase();
    files
        .iter()
        .filter(|f| f.relative_key.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
