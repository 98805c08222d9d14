//! Spam-safe rewriting of user-supplied free text.

/// Flagged words and their replacements. `None` deletes the word.
const DENYLIST: &[(&str, Option<&str>)] = &[
    ("free", Some("no-cost")),
    ("gift", Some("present")),
    ("win", Some("receive")),
    ("winner", Some("recipient")),
    ("prize", Some("reward")),
    ("cash", Some("funds")),
    ("claim", Some("redeem")),
    ("urgent", None),
    ("guaranteed", None),
];

/// Rewrite `input` into its spam-safe form.
///
/// Runs of whitespace collapse to single spaces, denylisted whole words
/// are replaced (or deleted when no synonym exists), and characters
/// outside word characters, whitespace, and `. , ! ? -` are stripped.
/// The passes run in that order because a substitution can introduce
/// characters the stripping pass must still see. The result is stable
/// under repeated application.
pub fn sanitize(input: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for token in input.split_whitespace() {
        if let Some(word) = rewrite_token(token) {
            words.push(word);
        }
    }

    let substituted = words.join(" ");
    let stripped: String = substituted.chars().filter(|&c| is_allowed(c)).collect();

    // Stripping can reopen whitespace runs ("a @ b" becomes "a  b").
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric()
        || c == '_'
        || c.is_whitespace()
        || matches!(c, '.' | ',' | '!' | '?' | '-')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Apply the denylist to a single whitespace-delimited token.
///
/// Matching is whole-word: leading and trailing punctuation is peeled off
/// and the remaining core is compared case-insensitively, so "Free!" is
/// rewritten while "freedom" is left alone. A word with no synonym is
/// deleted together with its attached punctuation.
fn rewrite_token(token: &str) -> Option<String> {
    let Some(core_start) = token.find(is_word_char) else {
        // Pure punctuation; left for the stripping pass.
        return Some(token.to_string());
    };
    let last = token.rfind(is_word_char).unwrap_or(core_start);
    let core_end = last + token[last..].chars().next().map_or(0, char::len_utf8);

    let prefix = &token[..core_start];
    let core = &token[core_start..core_end];
    let suffix = &token[core_end..];

    let lowered = core.to_lowercase();
    for (flagged, replacement) in DENYLIST {
        if lowered == *flagged {
            return replacement.map(|r| format!("{}{}{}", prefix, r, suffix));
        }
    }
    Some(token.to_string())
}
