//! Small roster builders shared by the tests of this crate.

use squadsmith_analysis::enrichment::EnrichedRoster;
use squadsmith_evaluator::{
    hero_scorer::{HeroScorer, ScoringConfig},
    power_index::PowerIndex,
};
use squadsmith_roster::{HeroRecord, Roster, RosterConfig, Skill, StatValue};
use squadsmith_tagging::{TagEngine, TaggingConfig, tag::TagVocabulary};

#[derive(Debug, Clone)]
pub struct HeroSpec {
    record: HeroRecord,
}

impl HeroSpec {
    pub fn new(id: &str, faction: &str) -> Self {
        let mut record = HeroRecord::minimal(id, id, faction);
        record.stats.insert("hp".into(), StatValue::Number(1000.0));
        record.stats.insert("atk".into(), StatValue::Number(100.0));
        Self { record }
    }

    pub fn rating(mut self, overall: &str) -> Self {
        self.record.ratings.overall = Some(overall.to_owned());
        self
    }

    pub fn hp(self, hp: f32) -> Self {
        self.stat("hp", hp)
    }

    pub fn atk(self, atk: f32) -> Self {
        self.stat("atk", atk)
    }

    pub fn stat(mut self, name: &str, value: f32) -> Self {
        self.record.stats.insert(name.into(), StatValue::Number(value));
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        class.clone_into(&mut self.record.class);
        self
    }

    pub fn skill(mut self, description: &str) -> Self {
        self.record.skills.push(Skill {
            description: description.to_owned(),
            ..Skill::default()
        });
        self
    }
}

pub fn enriched(specs: &[HeroSpec]) -> EnrichedRoster {
    let records = specs.iter().map(|spec| spec.record.clone());
    let roster = Roster::from_records(records, &RosterConfig::default()).unwrap();
    let engine = TagEngine::new(&TaggingConfig::default(), &TagVocabulary::default()).unwrap();
    EnrichedRoster::build(roster, &engine)
}

pub fn power_index(enriched: &EnrichedRoster) -> PowerIndex {
    let config = ScoringConfig::default();
    let scorer = HeroScorer::new(&config).unwrap();
    PowerIndex::compute(enriched, &scorer, &config.tiers)
}
