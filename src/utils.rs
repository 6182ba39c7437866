use crate::results::PdfReference;

/// Turns anchor text into a display name by replacing every `/` with `_`
pub fn display_name(text: &str) -> String {
    text.replace('/', "_")
}

/// File name a reference is saved under.
///
/// The display name with its whitespace collapsed to single spaces, unless
/// that cannot name a file inside the output directory; then the last path
/// segment of the URL is used instead.
pub fn file_name_for(reference: &PdfReference) -> String {
    let name = collapse_whitespace(&reference.display_name);
    if is_usable_file_name(&name) {
        return name;
    }

    let fallback = reference
        .url
        .rsplit('/')
        .next()
        .map(|segment| collapse_whitespace(&display_name(segment)))
        .filter(|name| is_usable_file_name(name))
        .unwrap_or_else(|| "download.pdf".to_string());

    ::log::debug!(
        "Link text {:?} is not a usable file name, saving {} as {}",
        reference.display_name,
        reference.url,
        fallback
    );
    fallback
}

/// Trims and collapses runs of whitespace, including newlines, to one space
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_usable_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control)
}
