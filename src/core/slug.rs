//! ASCII slugs for cross-reference labels.

use crate::data::transliteration::TRANSLITERATION;

/// Reduce a LaTeX heading title to its visible words.
///
/// Formatting commands that take an argument (`\emph{..}`, `\textit[..]{..}`)
/// lose their name but keep the argument text; bare control words such as
/// `\LaTeX` keep their letters. Braces vanish, `~` becomes a space and control
/// symbols (`\&`) keep their symbol.
pub fn plain_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut chars = title.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if chars.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                    let mut word = String::new();
                    while let Some(&c) = chars.peek() {
                        if !c.is_ascii_alphabetic() {
                            break;
                        }
                        word.push(c);
                        chars.next();
                    }
                    while chars.peek().is_some_and(|c| *c == ' ') {
                        chars.next();
                    }
                    if !matches!(chars.peek(), Some('{') | Some('[')) {
                        out.push_str(&word);
                    }
                    out.push(' ');
                } else if let Some(sym) = chars.next() {
                    out.push(sym);
                }
            }
            '[' | ']' | '{' | '}' => {}
            '~' => out.push(' '),
            _ => out.push(ch),
        }
    }
    out
}

/// ASCII, dash-separated slug. Never empty: a title without any usable
/// character becomes `x`.
pub fn slugify(text: &str) -> String {
    let mut ascii = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            ascii.push(ch);
        } else if let Some(rep) = TRANSLITERATION.get(&ch) {
            ascii.push_str(rep);
        }
    }

    let mut out = String::with_capacity(ascii.len());
    let mut pending_dash = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if out.is_empty() {
        "x".to_string()
    } else {
        out
    }
}

/// Slug of a heading title as written in the source.
pub fn heading_slug(title: &str) -> String {
    slugify(&plain_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn umlauts_expand() {
        assert_eq!(slugify("Überblick"), "ueberblick");
        assert_eq!(slugify("Straße der Größe"), "strasse-der-groesse");
    }

    #[test]
    fn iast_diacritics_drop() {
        assert_eq!(slugify("Bhagavān Kṛṣṇa"), "bhagavan-krsna");
        assert_eq!(slugify("Śrī Īśopaniṣad"), "sri-isopanisad");
    }

    #[test]
    fn punctuation_collapses_and_trims() {
        assert_eq!(slugify("  What's  New?! (2nd ed.) "), "what-s-new-2nd-ed");
    }

    #[test]
    fn empty_slug_falls_back() {
        assert_eq!(slugify(""), "x");
        assert_eq!(slugify("—"), "x");
        assert_eq!(slugify("中文"), "x");
    }

    #[test]
    fn plain_title_drops_formatting_commands() {
        assert_eq!(heading_slug("The \\emph{Gītā} Today"), "the-gita-today");
        assert_eq!(heading_slug("Using \\LaTeX~well"), "using-latex-well");
        assert_eq!(heading_slug("Q \\& A"), "q-a");
    }
}
