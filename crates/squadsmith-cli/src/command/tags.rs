use std::{collections::BTreeMap, path::PathBuf};

use anyhow::bail;
use serde::Serialize;
use squadsmith_roster::{Faction, HeroId};
use squadsmith_tagging::{evidence::HeroTags, tag::Tag};

use super::InputArgs;
use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TagsArg {
    #[clap(flatten)]
    input: InputArgs,
    /// Only report these hero ids (repeatable)
    #[arg(long = "hero", id = "hero")]
    heroes: Vec<HeroId>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TagReport<'a> {
    /// Number of reported heroes holding each tag.
    counts: BTreeMap<&'a Tag, usize>,
    heroes: BTreeMap<&'a HeroId, TaggedHero<'a>>,
}

#[derive(Debug, Serialize)]
struct TaggedHero<'a> {
    name: &'a str,
    faction: &'a Faction,
    #[serde(flatten)]
    tags: &'a HeroTags,
}

pub(crate) fn run(arg: &TagsArg) -> anyhow::Result<()> {
    let TagsArg {
        input,
        heroes,
        output,
    } = arg;

    let pipeline = input.load(|_| {})?;
    let enriched = &pipeline.enriched;
    let roster = enriched.roster();

    let selected = if heroes.is_empty() {
        roster.indices().collect::<Vec<_>>()
    } else {
        let mut selected = vec![];
        for id in heroes {
            let Some(index) = roster.index_of(id) else {
                bail!("Unknown hero id: {id}");
            };
            selected.push(index);
        }
        selected
    };

    let mut report = TagReport {
        counts: BTreeMap::new(),
        heroes: BTreeMap::new(),
    };
    for index in selected {
        let hero = enriched.hero(index);
        let tags = enriched.enriched(index).tags();
        for tag in tags.tags() {
            *report.counts.entry(tag).or_default() += 1;
        }
        report.heroes.insert(
            hero.id(),
            TaggedHero {
                name: hero.name(),
                faction: hero.faction(),
                tags,
            },
        );
    }
    tracing::info!(
        heroes = report.heroes.len(),
        distinct_tags = report.counts.len(),
        "tags reported"
    );

    Output::save_json(&report, output.clone())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use serde_json::Value;

    use super::*;
    use crate::{
        command::test_util::{input, write_roster},
        util,
    };

    fn tag_report(heroes: &Path, output: &Path, ids: &[&str]) -> anyhow::Result<Value> {
        let arg = TagsArg {
            input: input(heroes),
            heroes: ids.iter().map(|id| HeroId::new(*id)).collect(),
            output: Some(output.to_owned()),
        };
        run(&arg)?;
        util::read_json_file("tag report", output)
    }

    fn roster_dir(dir: &Path) -> PathBuf {
        let heroes = dir.join("heroes");
        fs::create_dir(&heroes).unwrap();
        write_roster(&heroes);
        heroes
    }

    #[test]
    fn test_counts_match_reported_heroes() {
        let dir = tempfile::tempdir().unwrap();
        let heroes = roster_dir(dir.path());
        let report = tag_report(&heroes, &dir.path().join("tags.json"), &[]).unwrap();

        let reported = report["heroes"].as_object().unwrap();
        assert_eq!(reported.len(), 6);
        assert_eq!(reported["cy"]["name"], "CY");
        assert_eq!(reported["cy"]["faction"], "Hearts");
        assert!(reported["cy"]["tags"]["HEAL_TEAM"]["match"].is_string());
        assert!(reported["cy"]["forbids_ordinary_attacks"].is_boolean());

        let counts = report["counts"].as_object().unwrap();
        assert!(counts["HEAL_TEAM"].as_u64().unwrap() >= 1);
        for (tag, count) in counts {
            let holders = reported
                .values()
                .filter(|hero| hero["tags"].get(tag).is_some())
                .count();
            assert_eq!(count.as_u64(), Some(holders as u64), "{tag}");
        }
        let total_tags = reported
            .values()
            .map(|hero| hero["tags"].as_object().unwrap().len())
            .sum::<usize>();
        let total_counts = counts.values().map(|c| c.as_u64().unwrap()).sum::<u64>();
        assert_eq!(total_counts, total_tags as u64);
    }

    #[test]
    fn test_hero_filter_limits_report() {
        let dir = tempfile::tempdir().unwrap();
        let heroes = roster_dir(dir.path());
        let report = tag_report(&heroes, &dir.path().join("tags.json"), &["eve", "cy"]).unwrap();

        let reported = report["heroes"].as_object().unwrap();
        assert_eq!(reported.keys().collect::<Vec<_>>(), ["cy", "eve"]);
        let counts = report["counts"].as_object().unwrap();
        for (tag, count) in counts {
            assert!(count.as_u64().unwrap() <= 2, "{tag}");
        }
        assert_eq!(counts["HEAL_TEAM"], 1);
    }

    #[test]
    fn test_unknown_hero_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let heroes = roster_dir(dir.path());
        let output = dir.path().join("tags.json");
        let err = tag_report(&heroes, &output, &["cy", "zed"]).unwrap_err();
        assert!(err.to_string().contains("zed"));
        assert!(!output.exists());
    }
}
