/// Turn a sheet key or display name into a safe file stem.
///
/// Letters, digits, '-' and '_' are kept, spaces become '_', everything else is dropped.
pub fn sanitize_file_stem(name: &str) -> Option<String> {
    let mut slug = String::new();

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
            slug.push(ch);
        } else if ch == ' ' {
            slug.push('_');
        }
    }

    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}
