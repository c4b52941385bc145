//! Record name normalization
//!
//! Every name comparison in the crate goes through [`full_name`] first, so
//! `"www"`, `"www.example.com"` and `"www.example.com."` all address the
//! same record inside the zone `example.com`.

/// Returns `text` with exactly one trailing dot.
pub fn ensure_dot(text: &str) -> String {
    format!("{}.", text.trim_end_matches('.'))
}

/// Expands `name` to a fully qualified name ending with a dot.
///
/// - `"@"` and `""` denote the zone apex
/// - a name ending in `.` is already absolute and is only dot-normalized
/// - a name that already ends with the zone is completed with the trailing dot
/// - any other name is relative and gets the zone appended
///
/// Applying the function to its own output returns the output unchanged.
pub fn full_name(domain: &str, name: &str) -> String {
    let zone = domain.trim().trim_end_matches('.');
    let name = name.trim();

    if name.is_empty() || name == "@" {
        return format!("{zone}.");
    }
    if name.ends_with('.') {
        return ensure_dot(name);
    }
    if in_zone(zone, name) {
        format!("{name}.")
    } else {
        format!("{name}.{zone}.")
    }
}

/// Strips the zone apex from `name`.
///
/// The apex itself becomes `"@"`. Names outside of the zone are returned in
/// full form without the trailing dot.
pub fn relative_name(domain: &str, name: &str) -> String {
    let zone = domain.trim().trim_end_matches('.');
    let full = full_name(domain, name);
    let full = full.trim_end_matches('.');

    if full.eq_ignore_ascii_case(zone) {
        return "@".to_string();
    }
    match full.len().checked_sub(zone.len() + 1) {
        Some(cut) if in_zone(zone, full) => full[..cut].to_string(),
        _ => full.to_string(),
    }
}

/// Whether `a` and `b` address the same name inside the zone.
pub fn names_match(domain: &str, a: &str, b: &str) -> bool {
    full_name(domain, a) == full_name(domain, b)
}

fn in_zone(zone: &str, name: &str) -> bool {
    if name.eq_ignore_ascii_case(zone) {
        return true;
    }
    let Some(prefix_len) = name.len().checked_sub(zone.len() + 1) else {
        return false;
    };
    name.is_char_boundary(prefix_len)
        && name[prefix_len..].starts_with('.')
        && name[prefix_len + 1..].eq_ignore_ascii_case(zone)
}
