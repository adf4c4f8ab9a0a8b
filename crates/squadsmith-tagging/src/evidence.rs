use std::{collections::BTreeMap, iter};

use serde::Serialize;

use crate::tag::{Tag, known};

/// Snippet recorded for tags that were assigned by hand.
pub const MANUAL_SNIPPET: &str = "(manually assigned)";
/// Match recorded for tags that were assigned by hand.
pub const MANUAL_MATCH: &str = "(from synergies field)";

/// Why a tag was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evidence {
    /// The matched span, whitespace collapsed.
    #[serde(rename = "match")]
    pub matched: String,
    /// Surrounding context, with `…` where it was cut.
    pub snippet: String,
}

impl Evidence {
    /// Evidence for a span of `text` starting at byte `start`.
    #[must_use]
    pub fn from_span(text: &str, start: usize, end: usize, snippet_len: usize) -> Self {
        Self {
            matched: collapse_whitespace(&text[start..end]),
            snippet: snippet_around(text, start, snippet_len),
        }
    }

    #[must_use]
    pub fn manual() -> Self {
        Self {
            matched: MANUAL_MATCH.to_owned(),
            snippet: MANUAL_SNIPPET.to_owned(),
        }
    }
}

/// Tags assigned to one hero, each with its evidence.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeroTags {
    tags: BTreeMap<Tag, Evidence>,
    forbids_ordinary_attacks: bool,
}

impl HeroTags {
    #[must_use]
    pub fn new(tags: BTreeMap<Tag, Evidence>, forbids_ordinary_attacks: bool) -> Self {
        let mut this = Self {
            tags,
            forbids_ordinary_attacks,
        };
        this.apply_exclusions();
        this
    }

    /// Enforces the hard exclusions that hold whatever strategy produced the tags.
    fn apply_exclusions(&mut self) {
        if self.forbids_ordinary_attacks {
            for tag in known::ATTACK_SCALING {
                self.tags.remove(tag);
            }
        }
        for (team, own) in known::SCOPED_PAIRS {
            if self.tags.contains_key(team) && self.tags.remove(own).is_some() {
                tracing::debug!(team, own, "dropped self-only tag shadowed by team-wide tag");
            }
        }
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.keys()
    }

    #[must_use]
    pub fn evidence(&self, tag: &str) -> Option<&Evidence> {
        self.tags.get(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &Evidence)> {
        self.tags.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The kit states the hero performs no ordinary attacks.
    #[must_use]
    pub fn forbids_ordinary_attacks(&self) -> bool {
        self.forbids_ordinary_attacks
    }
}

/// Cuts about `max_chars` characters of context around byte `index`.
///
/// The window starts `max_chars / 2` characters before `index`; whitespace is collapsed
/// and `…` marks each truncated end.
///
/// ```
/// # use squadsmith_tagging::evidence::snippet_around;
/// let text = "a  b\n c";
/// assert_eq!(snippet_around(text, 3, 180), "a b c");
/// assert_eq!(snippet_around("0123456789", 5, 4), "…3456…");
/// ```
#[must_use]
pub fn snippet_around(text: &str, index: usize, max_chars: usize) -> String {
    let boundaries = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(iter::once(text.len()))
        .collect::<Vec<_>>();
    let char_count = boundaries.len() - 1;
    let center = boundaries.partition_point(|&b| b < index);
    let start = center.saturating_sub(max_chars / 2);
    let end = (start + max_chars).min(char_count);
    let body = collapse_whitespace(&text[boundaries[start]..boundaries[end]]);

    let mut snippet = String::with_capacity(body.len() + 6);
    if start > 0 {
        snippet.push('…');
    }
    snippet.push_str(&body);
    if end < char_count {
        snippet.push('…');
    }
    snippet
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
