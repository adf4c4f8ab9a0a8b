use std::{fs, path::Path};

use super::InputArgs;

/// Six heroes over two factions and the wildcard, stronger with each entry.
pub(crate) fn write_roster(dir: &Path) {
    let heroes = [
        ("ana", "Hearts", "Tank", "Taunts all enemies and gains a shield."),
        ("bo", "Hearts", "Mage", "Deals 300% ATK damage to all enemies."),
        ("cy", "Hearts", "Healer", "Heals all allies for 10% of max HP."),
        ("dax", "Clubs", "Assassin", "Dashes to the enemy backline."),
        ("eve", "Clubs", "Warrior", "Stuns the target for 2 seconds."),
        ("fay", "Starglint", "Support", "Restores energy to all allies."),
    ];
    for (i, (id, faction, class, skill)) in heroes.into_iter().enumerate() {
        let json = serde_json::json!({
            "id": id,
            "name": id.to_uppercase(),
            "faction": faction,
            "class": class,
            "ratings": { "overall": "A" },
            "stats": { "hp": 1000 + 200 * i, "atk": 100 + 10 * i },
            "skills": [{ "name": "Skill", "description": skill }],
        });
        fs::write(dir.join(format!("{id}.json")), json.to_string()).unwrap();
    }
}

pub(crate) fn input(heroes: &Path) -> InputArgs {
    InputArgs {
        heroes: heroes.to_owned(),
        config: None,
        vocabulary: None,
    }
}
