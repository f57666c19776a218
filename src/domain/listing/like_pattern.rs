//! `LIKE` patterns built from user text.
//!
//! User text is always escaped; only [`LikePattern::wildcard`] contributes an
//! unescaped `%`.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    AnyRun,
}

/// A pattern for the store's case-insensitive `LIKE` matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikePattern {
    pieces: Vec<Piece>,
}

impl LikePattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends text matched literally.
    pub fn literal(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.pieces.push(Piece::Literal(text));
        }
        self
    }

    /// Appends `%`.
    pub fn wildcard(mut self) -> Self {
        self.pieces.push(Piece::AnyRun);
        self
    }

    /// Appends `%` when `enabled` is set.
    pub fn wildcard_if(self, enabled: bool) -> Self {
        if enabled { self.wildcard() } else { self }
    }

    pub fn has_wildcard(&self) -> bool {
        self.pieces.iter().any(|p| matches!(p, Piece::AnyRun))
    }

    /// Renders the pattern with `\` as the escape character.
    pub fn to_like(&self) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(&escape_like(text)),
                Piece::AnyRun => out.push('%'),
            }
        }
        out
    }
}

/// Escapes `\`, `%` and `_` so they match themselves.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("100%_off\\"), "100\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_pattern_with_wildcard() {
        let pattern = LikePattern::new()
            .literal("shop")
            .wildcard()
            .literal(".example.com");

        assert!(pattern.has_wildcard());
        assert_eq!(pattern.to_like(), "shop%.example.com");
    }

    #[test]
    fn test_pattern_escapes_user_text_but_not_wildcard() {
        let pattern = LikePattern::new().literal("a_b%").wildcard_if(true);
        assert_eq!(pattern.to_like(), "a\\_b\\%%");
    }

    #[test]
    fn test_wildcard_if_false_is_noop() {
        let pattern = LikePattern::new().literal("x").wildcard_if(false);
        assert!(!pattern.has_wildcard());
        assert_eq!(pattern.to_like(), "x");
    }
}
