//! Label escaping and number formatting for writing Newick strings.
//!
//! Labels are written verbatim unless they contain a character that would
//! end or break an unquoted Newick label, in which case they are wrapped in
//! single quotes with internal single quotes doubled. Parsing such an
//! escaped label with the [ByteParser](crate::parser::ByteParser) yields the
//! original label again.

/// Characters that cannot occur in an unquoted Newick label.
const SPECIAL_CHARS: &[char] = &[
    ' ', ',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\'',
];

/// Checks if a label has to be quoted to be written as Newick label.
///
/// # Examples
/// ```
/// # use phylovec::parser::utils::needs_quotes;
/// assert!(!needs_quotes("Pukeko")); // Also known as Australasian Swamphen
/// assert!(needs_quotes("Pu[ke]ko"));
/// assert!(needs_quotes("Australasian Swamphen"));
/// assert!(!needs_quotes("Australasian_Swamphen"));
/// assert!(needs_quotes("Baillon's_Crake"));
/// assert!(needs_quotes(""));
/// ```
pub fn needs_quotes(label: &str) -> bool {
    label.is_empty() || label.contains(SPECIAL_CHARS)
}

/// Escapes a label for use in a Newick string.
///
/// # Examples
/// ```
/// # use phylovec::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Australasian_Swamphen"), "Australasian_Swamphen");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if needs_quotes(label) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}

/// Formats a branch length in the shortest form that parses back to the
/// same value, switching to exponent notation for very small or very large
/// magnitudes.
///
/// # Examples
/// ```
/// # use phylovec::parser::utils::format_branch_length;
/// assert_eq!(format_branch_length(1.0), "1");
/// assert_eq!(format_branch_length(0.25), "0.25");
/// assert_eq!(format_branch_length(0.0), "0");
/// assert_eq!(format_branch_length(1e-7), "1e-7");
/// assert_eq!(format_branch_length(1e-320), "1e-320");
/// assert_eq!(format_branch_length(2.5e20), "2.5e20");
/// ```
pub fn format_branch_length(length: f64) -> String {
    let magnitude = length.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        format!("{:e}", length)
    } else {
        length.to_string()
    }
}
