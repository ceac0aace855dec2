//! Output file naming

/// Characters that cannot appear in a file name on any supported platform
const INVALID_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Builds the output file name of one view
///
/// The stem is `{document}-{view type} - {view}`. Braces and characters that
/// are invalid in file names are replaced with `_`.
///
/// # Examples
///
/// ```
/// use dwgbatch::core::export::export_file_name;
///
/// assert_eq!(
///     export_file_name("rac_basic", "3D View", "{3D}", "dwg"),
///     "rac_basic-3D View - _3D_.dwg"
/// );
/// ```
pub fn export_file_name(document: &str, view_type: &str, view: &str, extension: &str) -> String {
    let stem = format!("{document}-{view_type} - {view}");
    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c == '{' || c == '}' || c.is_control() || INVALID_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    format!("{sanitized}.{extension}")
}
