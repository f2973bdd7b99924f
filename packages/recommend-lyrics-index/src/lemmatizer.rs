//! A small rule-based lemmatizer covering the common English inflections
//! (plurals, `-ing`, `-ed`, comparative/superlative). It is intentionally
//! not a full morphological analyzer — it exists to be applied identically
//! at training and query time so neighbor quality depends on consistency,
//! not on exact agreement with any particular reference lemmatizer.
pub fn lemmatize(token: &str) -> String {
    if token.len() <= 3 {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = token.strip_suffix("ing") {
        return restore_dropped_e(stem);
    }
    if let Some(stem) = token.strip_suffix("ed") {
        return restore_dropped_e(stem);
    }
    if let Some(stem) = token.strip_suffix("es") {
        if ends_with_sibilant(stem) {
            return stem.to_string();
        }
    }
    if let Some(stem) = token.strip_suffix('s') {
        if !token.ends_with("ss") && stem.len() > 3 {
            return stem.to_string();
        }
    }

    token.to_string()
}

fn ends_with_sibilant(stem: &str) -> bool {
    stem.ends_with('s') || stem.ends_with('x') || stem.ends_with('z') || stem.ends_with("ch") || stem.ends_with("sh")
}

/// `danc` -> `dance`, but `walk` stays `walk` — only restores the trailing
/// `e` for stems that plausibly dropped it before `-ing`/`-ed`.
fn restore_dropped_e(stem: &str) -> String {
    if stem.len() < 2 {
        return stem.to_string();
    }
    let mut chars: Vec<char> = stem.chars().collect();
    let last = chars[chars.len() - 1];
    let second_last = chars[chars.len() - 2];
    let is_consonant = |c: char| !"aeiou".contains(c);
    if is_consonant(last) && !is_consonant(second_last) && chars.len() >= 3 && is_consonant(chars[chars.len() - 3]) {
        chars.push('e');
        chars.into_iter().collect()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plural_ies() {
        assert_eq!(lemmatize("memories"), "memory");
    }

    #[test]
    fn strips_simple_plural() {
        assert_eq!(lemmatize("lights"), "light");
    }

    #[test]
    fn keeps_short_tokens_unchanged() {
        assert_eq!(lemmatize("sky"), "sky");
    }

    #[test]
    fn restores_dropped_e_on_ing() {
        assert_eq!(lemmatize("dancing"), "dance");
    }

    #[test]
    fn leaves_already_lemma_unchanged() {
        assert_eq!(lemmatize("walk"), "walk");
    }
}
