//! Normalization rules.
//!
//! Both sides of every comparison (configured keys/patterns and profile input)
//! go through the same function, so matching stays symmetric.

/// Normalize a categorical value or place name.
///
/// Lowercase, accents folded, trimmed, internal whitespace collapsed.
pub fn normalize_key(s: &str) -> String {
    let folded: String = s.chars().map(fold_char).collect();
    collapse_whitespace(&folded)
}

/// Normalize free-text legal-form input.
///
/// On top of `normalize_key`:
/// - dots are removed (`s.r.l.` -> `srl`)
/// - other punctuation becomes a separator
/// - runs of single-letter tokens are joined (`s r l` -> `srl`)
pub fn normalize_legal_form(s: &str) -> String {
    let mut cleaned = String::with_capacity(s.len());
    for ch in s.chars() {
        let ch = fold_char(ch);
        if ch == '.' {
            continue;
        }
        if ch.is_alphanumeric() || ch.is_whitespace() {
            cleaned.push(ch);
        } else {
            cleaned.push(' ');
        }
    }

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let mut j = i;
        while j < tokens.len() && tokens[j].chars().count() == 1 {
            j += 1;
        }
        if j - i >= 2 {
            out.push(tokens[i..j].concat());
            i = j;
        } else {
            out.push(tokens[i].to_string());
            i += 1;
        }
    }
    out.join(" ")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold_char(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ä' | 'À' | 'Á' | 'Â' | 'Ä' => 'a',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ò' | 'ó' | 'ô' | 'ö' | 'Ò' | 'Ó' | 'Ô' | 'Ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => 'u',
        '’' | '‘' => '\'',
        other => other.to_lowercase().next().unwrap_or(other),
    }
}
