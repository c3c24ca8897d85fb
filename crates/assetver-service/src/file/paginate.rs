//! Page slicing over a filtered file list.

use assetver_core::types::pagination::{PageRequest, PageResponse};
use assetver_entity::file::FileVersion;

/// Slice one page out of `files`. Out-of-range page indexes are clamped into
/// `1..=page_count`; the response reports the page actually returned.
pub fn paginate(files: &[FileVersion], request: PageRequest) -> PageResponse<FileVersion> {
    PageResponse::from_slice(files, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetver_entity::file::ManifestEntry;

    fn files(n: usize) -> Vec<FileVersion> {
        (0..n)
            .map(|i| {
                FileVersion::from_manifest(&ManifestEntry {
                    relative_key: format!("f{i:03}"),
                    version_id: "v".to_string(),
                    size: None,
                    last_modified: None,
                    etag: None,
                    is_archived: false,
                })
            })
            .collect()
    }

    #[test]
    fn test_page_count_for_101_files() {
        let all = files(101);
        let page = paginate(&all, PageRequest::new(6, 20).unwrap());
        assert_eq!(page.total_pages, 6);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].relative_key, "f100");
        assert!(!page.has_next);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let all = files(45);
        let page = paginate(&all, PageRequest::new(9, 20).unwrap());
        assert_eq!(page.page, 3);
        assert_eq!(page.requested_page, 9);
        assert!(page.was_clamped());
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn test_empty_list_has_one_empty_page() {
        let page = paginate(&[], PageRequest::new(1, 10).unwrap());
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }
}
