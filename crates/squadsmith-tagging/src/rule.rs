//! Declarative pattern rules and the generic matcher that evaluates them.
//!
//! A rule is data, not code: a primary pattern plus optional context constraints.
//! The `regex` engine has no look-around, so context that would otherwise be expressed
//! as a look-behind or look-ahead is a separate regex checked against a bounded window
//! of text around the primary match:
//!
//! - `near`: a pattern that **must** occur within `window` bytes before or after
//!   the match, without leaving the sentence holding the match (e.g. an ally keyword
//!   for team-wide tags)
//! - `forbid_before`: a pattern that must **not** match the window ending where the
//!   match starts (anchor it with `$`, e.g. negations like "does not")
//! - `forbid_after`: a pattern that must **not** match the window starting where the
//!   match ends (anchor it with `^`)
//!
//! The matcher scans every occurrence of the primary pattern and returns the first
//! one that satisfies all constraints, so a negated sentence does not hide a later
//! affirmative one.

use regex::Regex;

use crate::TagError;

/// Ally/team keywords required by every team-wide rule.
pub const ALLY_CONTEXT: &str = r"\b(?:all allies|other allies|allies|ally|allied|teammates?|friendly units?|your team|own team|whole team|entire team|party members?)\b";

/// Negation immediately preceding a match.
pub const NEGATION_BEFORE: &str =
    r"(?:\b(?:does|do|did|will|can|could|would)\s+not|\b(?:doesn't|don't|won't|cannot|can't|never|no))\s*$";

/// A pattern with optional context constraints, as written in the rule table.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub pattern: &'static str,
    pub near: Option<ContextSpec>,
    pub forbid_before: Option<ContextSpec>,
    pub forbid_after: Option<ContextSpec>,
}

/// A context pattern and the window (in bytes) it is checked against.
#[derive(Debug, Clone, Copy)]
pub struct ContextSpec {
    pub pattern: &'static str,
    pub window: usize,
}

impl RuleSpec {
    #[must_use]
    pub const fn new(pattern: &'static str) -> Self {
        Self {
            pattern,
            near: None,
            forbid_before: None,
            forbid_after: None,
        }
    }

    /// Team-wide rule: requires [`ALLY_CONTEXT`] within `window` of the match.
    #[must_use]
    pub const fn team(pattern: &'static str, window: usize) -> Self {
        Self::new(pattern).near(ALLY_CONTEXT, window)
    }

    #[must_use]
    pub const fn near(mut self, pattern: &'static str, window: usize) -> Self {
        self.near = Some(ContextSpec { pattern, window });
        self
    }

    #[must_use]
    pub const fn forbid_before(mut self, pattern: &'static str, window: usize) -> Self {
        self.forbid_before = Some(ContextSpec { pattern, window });
        self
    }

    #[must_use]
    pub const fn forbid_after(mut self, pattern: &'static str, window: usize) -> Self {
        self.forbid_after = Some(ContextSpec { pattern, window });
        self
    }

    /// Shorthand for excluding negated statements.
    #[must_use]
    pub const fn not_negated(self) -> Self {
        self.forbid_before(NEGATION_BEFORE, 24)
    }

    pub fn compile(&self) -> Result<PatternRule, TagError> {
        Ok(PatternRule {
            pattern: compile(self.pattern)?,
            near: self.near.map(Context::compile).transpose()?,
            forbid_before: self.forbid_before.map(Context::compile).transpose()?,
            forbid_after: self.forbid_after.map(Context::compile).transpose()?,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex, TagError> {
    Regex::new(pattern).map_err(|source| TagError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}

#[derive(Debug, Clone)]
struct Context {
    regex: Regex,
    window: usize,
}

impl Context {
    fn compile(spec: ContextSpec) -> Result<Self, TagError> {
        Ok(Self {
            regex: compile(spec.pattern)?,
            window: spec.window,
        })
    }
}

/// Byte range of a match inside the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub start: usize,
    pub end: usize,
}

impl RuleMatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// A compiled [`RuleSpec`].
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: Regex,
    near: Option<Context>,
    forbid_before: Option<Context>,
    forbid_after: Option<Context>,
}

impl PatternRule {
    /// Returns `true` if the rule carries a required-context constraint.
    #[must_use]
    pub fn has_required_context(&self) -> bool {
        self.near.is_some()
    }

    /// Finds the first occurrence of the pattern that satisfies every constraint.
    #[must_use]
    pub fn find(&self, text: &str) -> Option<RuleMatch> {
        self.pattern
            .find_iter(text)
            .map(|m| RuleMatch {
                start: m.start(),
                end: m.end(),
            })
            .find(|m| self.accepts(text, *m))
    }

    fn accepts(&self, text: &str, m: RuleMatch) -> bool {
        if let Some(ctx) = &self.forbid_before {
            let from = floor_char_boundary(text, m.start.saturating_sub(ctx.window));
            if ctx.regex.is_match(&text[from..m.start]) {
                return false;
            }
        }
        if let Some(ctx) = &self.forbid_after {
            let to = ceil_char_boundary(text, m.end + ctx.window);
            if ctx.regex.is_match(&text[m.end..to]) {
                return false;
            }
        }
        if let Some(ctx) = &self.near {
            let from = floor_char_boundary(text, m.start.saturating_sub(ctx.window))
                .max(sentence_start(text, m.start));
            let to = ceil_char_boundary(text, m.end + ctx.window).min(sentence_end(text, m.end));
            if !ctx.regex.is_match(&text[from..to]) {
                return false;
            }
        }
        true
    }
}

/// Sentence punctuation followed by whitespace or the end of the text.
fn is_sentence_end(bytes: &[u8], i: usize) -> bool {
    matches!(bytes[i], b'.' | b'!' | b'?' | b';')
        && bytes.get(i + 1).is_none_or(u8::is_ascii_whitespace)
}

/// Start of the sentence containing byte `index`.
pub(crate) fn sentence_start(text: &str, index: usize) -> usize {
    let bytes = text.as_bytes();
    (1..=index.min(bytes.len()))
        .rev()
        .find(|&i| is_sentence_end(bytes, i - 1))
        .unwrap_or(0)
}

/// End (past the punctuation) of the sentence containing byte `index`.
pub(crate) fn sentence_end(text: &str, index: usize) -> usize {
    let bytes = text.as_bytes();
    (index..bytes.len())
        .find(|&i| is_sentence_end(bytes, i))
        .map_or(bytes.len(), |i| i + 1)
}

/// Largest char boundary not after `index`.
pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary not before `index`.
pub(crate) fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(spec: RuleSpec, text: &str) -> Option<String> {
        let rule = spec.compile().unwrap();
        rule.find(text).map(|m| m.as_str(text).to_owned())
    }

    #[test]
    fn test_team_rule_requires_ally_context() {
        let spec = RuleSpec::team(r"\bheals?\b", 40);
        assert_eq!(
            find(spec, "heals allies for 20% of max hp").as_deref(),
            Some("heals")
        );
        assert_eq!(find(spec, "heals for 20% of max hp"), None);
        assert!(spec.compile().unwrap().has_required_context());
    }

    #[test]
    fn test_near_context_is_bounded() {
        let spec = RuleSpec::team(r"\bshield\b", 10);
        let text = "gains a shield. after a very long pause it hits allies";
        assert_eq!(find(spec, text), None);
    }

    #[test]
    fn test_near_context_stays_in_sentence() {
        let spec = RuleSpec::team(r"\battack speed\b", 80);
        assert_eq!(
            find(spec, "gains 30% attack speed for 5 seconds. heals allies for 20%."),
            None
        );
        assert_eq!(
            find(spec, "allies gain 10% hp. gains attack speed."),
            None
        );
        assert_eq!(
            find(spec, "deals 2.5x damage. grants attack speed to all allies.").as_deref(),
            Some("attack speed")
        );
    }

    #[test]
    fn test_sentence_bounds() {
        let text = "a 1.5 b. c! d";
        assert_eq!(sentence_start(text, 2), 0);
        assert_eq!(sentence_end(text, 2), 8);
        assert_eq!(sentence_start(text, 9), 8);
        assert_eq!(sentence_end(text, 9), 11);
        assert_eq!(sentence_start(text, 12), 11);
        assert_eq!(sentence_end(text, 12), text.len());
    }

    #[test]
    fn test_negated_occurrence_is_skipped() {
        let spec = RuleSpec::new(r"\bdrains?\b[\s\S]{0,40}?\benergy\b").not_negated();
        assert_eq!(find(spec, "this skill does not drain energy"), None);
        assert_eq!(
            find(spec, "it does not drain energy, but the relic drains energy").as_deref(),
            Some("drains energy")
        );
        assert_eq!(find(spec, "no drain energy here"), None);
    }

    #[test]
    fn test_forbid_after() {
        let spec = RuleSpec::new(r"\breduces?\b[\s\S]{0,20}?\battack\b")
            .forbid_after(r"^\s*(?:spd|speed)", 8);
        assert_eq!(find(spec, "reduces enemy attack speed"), None);
        assert_eq!(
            find(spec, "reduces enemy attack by 10%").as_deref(),
            Some("reduces enemy attack")
        );
    }

    #[test]
    fn test_windows_respect_char_boundaries() {
        let spec = RuleSpec::team(r"\bheals\b", 3);
        // multi-byte characters right next to the match
        assert_eq!(find(spec, "ééheals ééé"), None);
        assert_eq!(floor_char_boundary("éa", 1), 0);
        assert_eq!(ceil_char_boundary("éa", 1), 2);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = RuleSpec::new(r"(unclosed").compile().unwrap_err();
        assert!(matches!(err, TagError::InvalidPattern { .. }));
    }
}
