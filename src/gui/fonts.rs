use font_kit::source::SystemSource;

/// Font family names installed on the system, sorted case-insensitively.
///
/// Returns an empty list when the font source cannot be queried; the font
/// selector then only offers the tool default.
pub fn system_font_families() -> Vec<String> {
    match SystemSource::new().all_families() {
        Ok(families) => normalize_families(families),
        Err(_) => Vec::new(),
    }
}

fn normalize_families(mut families: Vec<String>) -> Vec<String> {
    families.retain(|family| !family.trim().is_empty());
    families.sort_by_key(|family| family.to_lowercase());
    families.dedup();
    families
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_families() {
        let families = vec![
            "Noto Sans".to_string(),
            "DejaVu Sans".to_string(),
            "".to_string(),
            "dejavu serif".to_string(),
            "Noto Sans".to_string(),
        ];
        assert_eq!(
            normalize_families(families),
            vec!["DejaVu Sans", "dejavu serif", "Noto Sans"]
        );
    }
}
