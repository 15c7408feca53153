/// Turns a raw tag like `corn_stover` or `fermentation.cofermentation` into
/// display text (`Corn Stover`, `Fermentation Cofermentation`).
pub fn display_tag(tag: &str) -> String {
    tag.replace(['_', '.'], " ")
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn truncate_chars(text: &str, limit: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= limit {
        return text.to_owned();
    }

    let mut truncated = text.chars().take(limit).collect::<String>();
    truncated.truncate(truncated.trim_end().len());
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_tag_spaces_and_capitalizes() {
        assert_eq!(display_tag("corn_stover"), "Corn Stover");
        assert_eq!(
            display_tag("fermentation.COFERMENTATION"),
            "Fermentation Cofermentation"
        );
        assert_eq!(display_tag("a__b"), "A  B");
        assert_eq!(display_tag(""), "");
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_chars("  short  ", 10), "short");
        assert_eq!(truncate_chars("abcdef ghij", 7), "abcdef…");
        assert_eq!(truncate_chars("ééééé", 3), "ééé…");
    }
}
