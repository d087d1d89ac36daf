//! Glob matching for cache keys.
//!
//! Follows the dialect the redis `KEYS` command understands so the memory
//! backend and redis agree on which keys a pattern selects:
//!
//! - `*` matches any sequence of characters, including none
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]` and `[^a-z]` match one character from a class
//! - `\` escapes the following character

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use ipvault_core::cache::pattern_matches;
///
/// assert!(pattern_matches("resource-1", "resource-1"));
/// assert!(pattern_matches("resources_and_pagination*", "resources_and_pagination-1-10-"));
/// assert!(pattern_matches("resource-?", "resource-7"));
/// assert!(!pattern_matches("resource-?", "resource-10"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    let (mut p, mut k) = (0, 0);
    // Pattern index right after the last `*` and the key index it resumed at.
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        if pattern.get(p) == Some(&'*') {
            backtrack = Some((p + 1, k));
            p += 1;
            continue;
        }

        if p < pattern.len() {
            if let Some(width) = match_token(&pattern[p..], key[k]) {
                p += width;
                k += 1;
                continue;
            }
        }

        // Mismatch: let the last `*` swallow one more character.
        match backtrack {
            Some((star_p, star_k)) => {
                p = star_p;
                k = star_k + 1;
                backtrack = Some((star_p, star_k + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Matches the token at the start of `pattern` against one character.
///
/// Returns the number of pattern characters the token spans on success.
fn match_token(pattern: &[char], c: char) -> Option<usize> {
    match pattern[0] {
        '?' => Some(1),
        '\\' if pattern.len() > 1 => (pattern[1] == c).then_some(2),
        '[' => match class_end(pattern) {
            Some(end) => class_contains(&pattern[1..end], c).then_some(end + 1),
            // Unterminated class: the bracket is a literal.
            None => (c == '[').then_some(1),
        },
        literal => (literal == c).then_some(1),
    }
}

/// Index of the `]` closing the class opened at `pattern[0]`.
fn class_end(pattern: &[char]) -> Option<usize> {
    let mut i = 1;
    while i < pattern.len() {
        match pattern[i] {
            '\\' => i += 2,
            ']' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn class_contains(class: &[char], c: char) -> bool {
    let (negated, class) = match class.split_first() {
        Some(('^', rest)) => (true, rest),
        _ => (false, class),
    };

    let mut found = false;
    let mut i = 0;
    while i < class.len() {
        let mut lo = class[i];
        if lo == '\\' && i + 1 < class.len() {
            i += 1;
            lo = class[i];
        }

        if i + 2 < class.len() && class[i + 1] == '-' {
            let hi = class[i + 2];
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            found |= (lo..=hi).contains(&c);
            i += 3;
        } else {
            found |= lo == c;
            i += 1;
        }
    }

    found != negated
}
