use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating SQL identifiers we interpolate (table names)
    /// Must start with a lowercase letter or underscore, then lowercase alphanumerics or underscores
    /// - Valid: "files", "storage_files", "_uploads2"
    /// - Invalid: "Files", "2files", "files-v2", "public.files", "files; drop"
    pub static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_regex_valid() {
        assert!(IDENTIFIER_REGEX.is_match("files"));
        assert!(IDENTIFIER_REGEX.is_match("storage_files"));
        assert!(IDENTIFIER_REGEX.is_match("_uploads2"));
        assert!(IDENTIFIER_REGEX.is_match("f"));
    }

    #[test]
    fn test_identifier_regex_invalid() {
        assert!(!IDENTIFIER_REGEX.is_match("")); // empty
        assert!(!IDENTIFIER_REGEX.is_match("Files")); // uppercase
        assert!(!IDENTIFIER_REGEX.is_match("2files")); // leading digit
        assert!(!IDENTIFIER_REGEX.is_match("files-v2")); // hyphen
        assert!(!IDENTIFIER_REGEX.is_match("public.files")); // schema qualified
        assert!(!IDENTIFIER_REGEX.is_match("files; drop table x")); // injection
        assert!(!IDENTIFIER_REGEX.is_match(&"a".repeat(64))); // longer than postgres allows
    }
}
