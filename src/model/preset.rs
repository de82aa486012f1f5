use serde::{Deserialize, Serialize};

use super::chain::{ChainStep, Draft};

/// A named, ready-made chain and run command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub chain: Vec<ChainStep>,
    pub run_command: String,
}

struct PresetDef {
    name: &'static str,
    description: &'static str,
    steps: &'static [(&'static str, &'static [(&'static str, &'static str)])],
    run_command: &'static str,
}

impl PresetDef {
    fn to_preset(&self) -> Preset {
        Preset {
            name: self.name.to_string(),
            description: self.description.to_string(),
            chain: self
                .steps
                .iter()
                .map(|(id, config)| {
                    config
                        .iter()
                        .fold(ChainStep::new(*id), |step, (k, v)| step.with(*k, *v))
                })
                .collect(),
            run_command: self.run_command.to_string(),
        }
    }
}

static PRESETS: &[PresetDef] = &[
    PresetDef {
        name: "Teleport above players",
        description: "Move every player five blocks straight up.",
        steps: &[
            ("as", &[("target", "@a")]),
            ("at", &[("target", "@s")]),
        ],
        run_command: "tp @s ~ ~5 ~",
    },
    PresetDef {
        name: "Standing on diamond block",
        description: "Give speed to players standing on a diamond block.",
        steps: &[
            ("as", &[("target", "@a")]),
            ("at", &[("target", "@s")]),
            ("if_block", &[("y", "~-1"), ("block", "minecraft:diamond_block")]),
        ],
        run_command: "effect give @s minecraft:speed 1 1 true",
    },
    PresetDef {
        name: "Score threshold reward",
        description: "Reward players whose kills score reached ten.",
        steps: &[
            ("as", &[("target", "@a")]),
            (
                "if_score",
                &[
                    ("target", "@s"),
                    ("objective", "kills"),
                    ("comparison", "matches"),
                    ("range", "10.."),
                ],
            ),
        ],
        run_command: "give @s minecraft:diamond 1",
    },
    PresetDef {
        name: "Compare two scores",
        description: "Announce players whose points beat the stored record.",
        steps: &[
            ("as", &[("target", "@a")]),
            (
                "if_score",
                &[
                    ("target", "@s"),
                    ("objective", "points"),
                    ("comparison", ">"),
                    ("sourceTarget", "#record"),
                    ("sourceObjective", "points"),
                ],
            ),
        ],
        run_command: "say New record!",
    },
    PresetDef {
        name: "Store health in score",
        description: "Copy each player's health into the health objective.",
        steps: &[
            ("as", &[("target", "@a")]),
            ("store_result_score", &[("target", "@s"), ("objective", "health")]),
        ],
        run_command: "data get entity @s Health",
    },
    PresetDef {
        name: "Run in the nether",
        description: "Place a block at the nether origin.",
        steps: &[
            ("in", &[("dimension", "minecraft:the_nether")]),
            ("positioned", &[("x", "0"), ("y", "64"), ("z", "0")]),
        ],
        run_command: "setblock ~ ~ ~ minecraft:glowstone",
    },
    PresetDef {
        name: "Particles at feet",
        description: "Spawn flame particles under every player.",
        steps: &[
            ("as", &[("target", "@a")]),
            ("at", &[("target", "@s")]),
            ("anchored", &[("anchor", "feet")]),
        ],
        run_command: "particle minecraft:flame ~ ~ ~ 0.2 0 0.2 0.01 5",
    },
    PresetDef {
        name: "Sync bossbar with score",
        description: "Show the timer score on a bossbar.",
        steps: &[
            ("store_result_bossbar", &[("bossbar", "minecraft:timer"), ("property", "value")]),
        ],
        run_command: "scoreboard players get #timer timer",
    },
    PresetDef {
        name: "Mobs near players",
        description: "Make zombies within ten blocks of a player glow.",
        steps: &[
            ("as", &[("target", "@e[type=minecraft:zombie]")]),
            ("at", &[("target", "@s")]),
            ("if_entity", &[("target", "@a[distance=..10]")]),
        ],
        run_command: "effect give @s minecraft:glowing 2 0 true",
    },
];

/// Every preset, in display order.
pub fn presets() -> Vec<Preset> {
    PRESETS.iter().map(PresetDef::to_preset).collect()
}

/// Look up a preset by name, ignoring case and surrounding whitespace.
pub fn find_preset(name: &str) -> Option<Preset> {
    let name = name.trim();
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(PresetDef::to_preset)
}

impl Draft {
    /// Replace the chain and run command with a preset's.
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.chain.replace_with(preset.chain.iter().cloned());
        self.run_command.clone_from(&preset.run_command);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::model::subcommand::find_definition;

    #[test]
    fn preset_steps_reference_known_subcommands() {
        for preset in presets() {
            for step in &preset.chain {
                assert!(
                    find_definition(&step.subcommand_id).is_some(),
                    "{} uses unknown {}",
                    preset.name,
                    step.subcommand_id
                );
            }
        }
    }

    #[test]
    fn preset_config_keys_are_fields_of_their_subcommand() {
        for preset in presets() {
            for step in &preset.chain {
                let def = find_definition(&step.subcommand_id).unwrap();
                for key in step.config.keys() {
                    assert!(def.field(key).is_some(), "{}: {}.{key}", preset.name, def.id);
                }
            }
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        assert!(find_preset("  teleport ABOVE players ").is_some());
        assert!(find_preset("no such preset").is_none());
    }

    #[test]
    fn apply_replaces_chain_and_run_command() {
        let mut draft = Draft::new();
        draft.chain.add(ChainStep::new("summon"));
        draft.run_command = "kill @s".into();

        let preset = find_preset("Run in the nether").unwrap();
        draft.apply_preset(&preset);
        assert_eq!(draft.chain.to_steps(), preset.chain);
        assert_eq!(draft.run_command, preset.run_command);
    }
}
