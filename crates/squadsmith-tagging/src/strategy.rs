//! Tag assignment strategies.
//!
//! Two strategies sit behind [`TagStrategy`]:
//!
//! - [`InferenceStrategy`] runs the rule table ([`crate::rule_table`]) over the kit text
//!   and records the matched span and a context snippet for every tag.
//! - [`CuratedStrategy`] copies the hand-maintained `synergies` field of each record,
//!   rejecting names outside the vocabulary.
//!
//! Neither strategy applies the hard exclusions; [`HeroTags::new`] does that for both.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use squadsmith_roster::Hero;

use crate::{
    TagError,
    evidence::Evidence,
    rule::{PatternRule, RuleMatch, RuleSpec},
    rule_table::CapabilitySpec,
    tag::{Tag, TagVocabulary},
};

/// Assigns tags (with evidence) to a hero.
pub trait TagStrategy: fmt::Debug + Send + Sync {
    #[must_use]
    fn name(&self) -> &'static str;

    /// Returns the tags for `hero`. `text` is the hero's lower-cased kit text.
    #[must_use]
    fn assign(&self, hero: &Hero, text: &str) -> BTreeMap<Tag, Evidence>;
}

/// Which strategy the engine uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStrategyKind {
    #[default]
    Inference,
    Curated,
}

#[derive(Debug, Clone)]
enum CompiledCapability {
    Single {
        tag: Tag,
        rules: Vec<PatternRule>,
    },
    Scoped {
        team: Tag,
        team_rules: Vec<PatternRule>,
        own: Tag,
        own_rules: Vec<PatternRule>,
    },
}

/// Evidence-based inference over kit text.
#[derive(Debug, Clone)]
pub struct InferenceStrategy {
    capabilities: Vec<CompiledCapability>,
    snippet_len: usize,
}

impl InferenceStrategy {
    /// Compiles `table`, checking every tag against `vocabulary` and every team-wide
    /// rule for a required ally context.
    pub fn new(
        table: &[CapabilitySpec],
        vocabulary: &TagVocabulary,
        snippet_len: usize,
    ) -> Result<Self, TagError> {
        let capabilities = table
            .iter()
            .map(|spec| compile_capability(spec, vocabulary))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            capabilities,
            snippet_len,
        })
    }
}

impl TagStrategy for InferenceStrategy {
    fn name(&self) -> &'static str {
        "inference"
    }

    fn assign(&self, _hero: &Hero, text: &str) -> BTreeMap<Tag, Evidence> {
        let mut tags = BTreeMap::new();
        let mut record = |tag: &Tag, m: RuleMatch| {
            let evidence = Evidence::from_span(text, m.start, m.end, self.snippet_len);
            tags.insert(tag.clone(), evidence);
        };
        for capability in &self.capabilities {
            match capability {
                CompiledCapability::Single { tag, rules } => {
                    if let Some(m) = shortest_match(rules, text) {
                        record(tag, m);
                    }
                }
                CompiledCapability::Scoped {
                    team,
                    team_rules,
                    own,
                    own_rules,
                } => {
                    if let Some(m) = shortest_match(team_rules, text) {
                        record(team, m);
                    } else if let Some(m) = shortest_match(own_rules, text) {
                        record(own, m);
                    }
                }
            }
        }
        tags
    }
}

/// Hand-maintained tags from the record's `synergies` field.
#[derive(Debug, Clone)]
pub struct CuratedStrategy {
    vocabulary: TagVocabulary,
}

impl CuratedStrategy {
    #[must_use]
    pub fn new(vocabulary: TagVocabulary) -> Self {
        Self { vocabulary }
    }
}

impl TagStrategy for CuratedStrategy {
    fn name(&self) -> &'static str {
        "curated"
    }

    fn assign(&self, hero: &Hero, _text: &str) -> BTreeMap<Tag, Evidence> {
        let mut tags = BTreeMap::new();
        for name in &hero.record().synergies {
            match self.vocabulary.resolve(name) {
                Some(tag) => {
                    tags.insert(tag, Evidence::manual());
                }
                None => {
                    tracing::warn!(hero = %hero.id(), tag = %name, "curated tag not in vocabulary, rejected");
                }
            }
        }
        tags
    }
}

fn compile_capability(
    spec: &CapabilitySpec,
    vocabulary: &TagVocabulary,
) -> Result<CompiledCapability, TagError> {
    if let Some(tag) = vocabulary.find_unknown(spec.tags()) {
        return Err(TagError::UnknownRuleTag {
            tag: tag.to_owned(),
        });
    }
    let compiled = match *spec {
        CapabilitySpec::Single { tag, rules } => CompiledCapability::Single {
            tag: Tag::new(tag),
            rules: compile_rules(rules)?,
        },
        CapabilitySpec::Team { tag, rules } => CompiledCapability::Single {
            tag: Tag::new(tag),
            rules: compile_team_rules(tag, rules)?,
        },
        CapabilitySpec::Scoped {
            team,
            team_rules,
            own,
            own_rules,
        } => CompiledCapability::Scoped {
            team: Tag::new(team),
            team_rules: compile_team_rules(team, team_rules)?,
            own: Tag::new(own),
            own_rules: compile_rules(own_rules)?,
        },
    };
    Ok(compiled)
}

fn compile_rules(rules: &[RuleSpec]) -> Result<Vec<PatternRule>, TagError> {
    rules.iter().map(RuleSpec::compile).collect()
}

fn compile_team_rules(
    tag: &str,
    rules: &[RuleSpec],
) -> Result<Vec<PatternRule>, TagError> {
    let compiled = compile_rules(rules)?;
    if compiled.iter().any(|rule| !rule.has_required_context()) {
        return Err(TagError::MissingTeamContext {
            tag: tag.to_owned(),
        });
    }
    Ok(compiled)
}

/// Shortest accepted match across `rules`; earlier rules win ties.
fn shortest_match(rules: &[PatternRule], text: &str) -> Option<RuleMatch> {
    rules
        .iter()
        .filter_map(|rule| rule.find(text))
        .reduce(|best, m| if m.len() < best.len() { m } else { best })
}
