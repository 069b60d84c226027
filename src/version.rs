use crate::scanner::FolderMatch;

/// Next number in the sequence, zero-padded to at least `padding` digits.
///
/// Versions compare as integers. With no versioned matches the sequence starts at 1.
pub fn resolve_next(matches: &[FolderMatch], padding: usize) -> String {
    let next = matches
        .iter()
        .filter_map(|m| m.version)
        .max()
        // widened so the successor of u64::MAX is still one higher
        .map_or(1, |max| u128::from(max) + 1);
    format!("{next:0padding$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(values: &[u64]) -> Vec<FolderMatch> {
        values
            .iter()
            .map(|v| FolderMatch {
                name: format!("v{v}"),
                version: Some(*v),
            })
            .collect()
    }

    #[test]
    fn empty_scan_starts_at_one() {
        assert_eq!(resolve_next(&[], 0), "1");
        assert_eq!(resolve_next(&[], 3), "001");
    }

    #[test]
    fn unversioned_matches_start_at_one() {
        let matches = vec![FolderMatch {
            name: "2023_01".into(),
            version: None,
        }];
        assert_eq!(resolve_next(&matches, 0), "1");
    }

    #[test]
    fn ordering_is_numeric() {
        assert_eq!(resolve_next(&versions(&[9, 10, 11]), 0), "12");
        assert_eq!(resolve_next(&versions(&[11, 9, 10]), 0), "12");
    }

    #[test]
    fn largest_version_still_advances() {
        assert_eq!(resolve_next(&versions(&[u64::MAX]), 0), "18446744073709551616");
    }

    #[test]
    fn padding_never_truncates() {
        assert_eq!(resolve_next(&versions(&[2]), 2), "03");
        assert_eq!(resolve_next(&versions(&[999]), 2), "1000");
    }
}
