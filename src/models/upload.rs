//! Upload filename rules.

use unicode_normalization::UnicodeNormalization;

/// Whether `filename` has an extension in `allowed`.
///
/// The extension is the text after the last dot, compared case-insensitively.
/// A name without a dot is never allowed.
pub fn allowed_file(filename: &str, allowed: &[String]) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Reduce a client-supplied filename to a safe, flat file name.
///
/// The name is NFKD-normalized and whatever is still non-ASCII afterwards is
/// dropped, so accented letters keep their base letter. Path separators
/// become spaces, runs of whitespace become a single `_`, anything outside
/// `[A-Za-z0-9_.-]` is removed and leading/trailing `.` and `_` are
/// stripped. A name that ends up empty becomes `upload`.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_ascii_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()]
    }

    #[test]
    fn test_allowed_file() {
        let allowed = defaults();
        assert!(allowed_file("roof.png", &allowed));
        assert!(allowed_file("ROOF.JPG", &allowed));
        assert!(allowed_file("archive.tar.jpeg", &allowed));
        assert!(!allowed_file("roof.gif", &allowed));
        assert!(!allowed_file("png", &allowed));
        assert!(!allowed_file("roof.", &allowed));
        assert!(!allowed_file("roof.png.exe", &allowed));
    }

    #[test]
    fn test_secure_filename_plain() {
        assert_eq!(secure_filename("roof.png"), "roof.png");
        assert_eq!(secure_filename("My Roof 2.jpg"), "My_Roof_2.jpg");
    }

    #[test]
    fn test_secure_filename_strips_paths() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\roof.png"), "C_Users_me_roof.png");
        assert_eq!(secure_filename("/tmp/x.png"), "tmp_x.png");
    }

    #[test]
    fn test_secure_filename_drops_unsafe_chars() {
        assert_eq!(secure_filename("ro*of?.png"), "roof.png");
        assert_eq!(secure_filename("  .hidden.png  "), "hidden.png");
    }

    #[test]
    fn test_secure_filename_folds_accents() {
        assert_eq!(secure_filename("dächer.png"), "dacher.png");
        assert_eq!(secure_filename("Séville toit.JPG"), "Seville_toit.JPG");
        assert_eq!(secure_filename("\u{FB01}le.png"), "file.png");
    }

    #[test]
    fn test_secure_filename_empty_fallback() {
        assert_eq!(secure_filename(""), "upload");
        assert_eq!(secure_filename("..."), "upload");
        assert_eq!(secure_filename("日本"), "upload");
    }
}
