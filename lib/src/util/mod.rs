mod macros;
mod copy;

pub use macros::*;
pub use copy::*;

/// Keeps only alphanumeric characters, lowercased. Used to derive file names
/// from free-form titles.
///
/// ```
/// use corner::util::normalize_key;
///
/// assert_eq!(normalize_key("Song, Pt. 2!"), "songpt2");
/// assert_eq!(normalize_key("  Sigur Rós "), "sigurrós");
/// ```
pub fn normalize_key(string: &str) -> String {
    string.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns `true` if `name` has an extension equal to one of `exts`, ignoring
/// ASCII case.
pub fn has_extension(name: &str, exts: &[&str]) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => exts.iter().any(|e| ext.eq_ignore_ascii_case(e)),
        None => false,
    }
}

#[cfg(test)]
mod key_tests {
    use crate::util::{has_extension, normalize_key};

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Jane Doe"), "janedoe");
        assert_eq!(normalize_key("AM/FM (Deluxe)"), "amfmdeluxe");
        assert_eq!(normalize_key("!!!"), "");
        assert_eq!(normalize_key("Björk"), "björk");
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("a.JPG", &["jpg", "jpeg"]));
        assert!(has_extension("c.jpeg", &["jpg", "jpeg"]));
        assert!(has_extension("x.tar.Jpeg", &["jpg", "jpeg"]));
        assert!(!has_extension("b.png", &["jpg", "jpeg"]));
        assert!(!has_extension("jpg", &["jpg", "jpeg"]));
        assert!(has_extension(".jpg", &["jpg", "jpeg"]));
    }
}
