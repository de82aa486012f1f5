//! Renders a chain of execute subcommands into one `/execute ... run ...`
//! command line.
//!
//! Rendering never fails. Absent or blank fields fall back to the defaults in
//! [`defaults`], values are passed through without validation, and steps whose
//! subcommand id is not known contribute no clause.

pub mod defaults;

use serde::Serialize;
use ts_rs::TS;

use crate::model::{ClauseSource, Draft, FieldMap};

// ── Clause kinds ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    If,
    Unless,
}

impl Polarity {
    fn keyword(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Unless => "unless",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionTest {
    Entity,
    Block,
    Blocks,
    Score,
    Biome,
    Loaded,
    Dimension,
    DataBlock,
    DataEntity,
    DataStorage,
    Predicate,
}

impl ConditionTest {
    fn from_suffix(suffix: &str) -> Option<Self> {
        Some(match suffix {
            "entity" => Self::Entity,
            "block" => Self::Block,
            "blocks" => Self::Blocks,
            "score" => Self::Score,
            "biome" => Self::Biome,
            "loaded" => Self::Loaded,
            "dimension" => Self::Dimension,
            "data_block" => Self::DataBlock,
            "data_entity" => Self::DataEntity,
            "data_storage" => Self::DataStorage,
            "predicate" => Self::Predicate,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Result,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTarget {
    Score,
    Block,
    Entity,
    Storage,
    Bossbar,
}

impl StoreTarget {
    fn from_suffix(suffix: &str) -> Option<Self> {
        Some(match suffix {
            "score" => Self::Score,
            "block" => Self::Block,
            "entity" => Self::Entity,
            "storage" => Self::Storage,
            "bossbar" => Self::Bossbar,
            _ => return None,
        })
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Block => "block",
            Self::Entity => "entity",
            Self::Storage => "storage",
            Self::Bossbar => "bossbar",
        }
    }
}

/// The clause grammar of one subcommand id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// `<keyword> <target>`
    Selector { keyword: &'static str },
    /// `<keyword> <x> <y> <z>`
    Coordinates { keyword: &'static str },
    /// `<keyword> <value>` where value is one field, usually from a fixed set.
    Choice {
        keyword: &'static str,
        field: &'static str,
        default: &'static str,
    },
    FacingEntity,
    Rotated,
    Condition(Polarity, ConditionTest),
    Store(StoreMode, StoreTarget),
}

impl ClauseKind {
    /// Look up the grammar for a subcommand id. Unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        use crate::serializer::defaults as d;
        let choice = |keyword: &'static str, field: &'static str, default: &'static str| {
            Self::Choice {
                keyword,
                field,
                default,
            }
        };
        let kind = match id {
            "as" => Self::Selector { keyword: "as" },
            "at" => Self::Selector { keyword: "at" },
            "positioned_as" => Self::Selector { keyword: "positioned as" },
            "rotated_as" => Self::Selector { keyword: "rotated as" },
            "positioned" => Self::Coordinates { keyword: "positioned" },
            "facing" => Self::Coordinates { keyword: "facing" },
            "positioned_over" => choice("positioned over", "heightmap", d::HEIGHTMAP),
            "align" => choice("align", "axes", d::AXES),
            "anchored" => choice("anchored", "anchor", d::ANCHOR),
            "in" => choice("in", "dimension", d::DIMENSION),
            "on" => choice("on", "relation", d::RELATION),
            "summon" => choice("summon", "entity", d::ENTITY),
            "facing_entity" => Self::FacingEntity,
            "rotated" => Self::Rotated,
            _ => return Self::condition(id).or_else(|| Self::store(id)),
        };
        Some(kind)
    }

    fn condition(id: &str) -> Option<Self> {
        let (polarity, suffix) = if let Some(rest) = id.strip_prefix("if_") {
            (Polarity::If, rest)
        } else if let Some(rest) = id.strip_prefix("unless_") {
            (Polarity::Unless, rest)
        } else {
            return None;
        };
        ConditionTest::from_suffix(suffix).map(|test| Self::Condition(polarity, test))
    }

    fn store(id: &str) -> Option<Self> {
        let rest = id.strip_prefix("store_")?;
        let (mode, dest) = if let Some(dest) = rest.strip_prefix("result_") {
            (StoreMode::Result, dest)
        } else if let Some(dest) = rest.strip_prefix("success_") {
            (StoreMode::Success, dest)
        } else {
            return None;
        };
        StoreTarget::from_suffix(dest).map(|target| Self::Store(mode, target))
    }

    /// Render this clause from a step's config.
    pub fn render(&self, config: &FieldMap) -> String {
        use crate::serializer::defaults as d;
        let f = Fields(config);
        let mut out: Vec<&str> = Vec::with_capacity(12);

        match *self {
            Self::Selector { keyword } => {
                out.extend([keyword, f.get("target", d::TARGET)]);
            }
            Self::Coordinates { keyword } => {
                out.push(keyword);
                f.push_xyz(&mut out);
            }
            Self::Choice {
                keyword,
                field,
                default,
            } => {
                out.extend([keyword, f.get(field, default)]);
            }
            Self::FacingEntity => {
                out.extend([
                    "facing entity",
                    f.get("target", d::TARGET),
                    f.get("anchor", d::ANCHOR),
                ]);
            }
            Self::Rotated => {
                out.extend([
                    "rotated",
                    f.get("yaw", d::ROTATION),
                    f.get("pitch", d::ROTATION),
                ]);
            }
            Self::Condition(polarity, test) => {
                out.push(polarity.keyword());
                render_condition(test, &f, &mut out);
            }
            Self::Store(mode, target) => {
                out.push(match mode {
                    StoreMode::Result => "store result",
                    StoreMode::Success => "store success",
                });
                out.push(target.keyword());
                render_store_tail(target, &f, &mut out);
            }
        }

        out.join(" ")
    }
}

fn render_condition<'a>(test: ConditionTest, f: &Fields<'a>, out: &mut Vec<&'a str>) {
    use crate::serializer::defaults as d;
    match test {
        ConditionTest::Entity => out.extend(["entity", f.get("target", d::TARGET)]),
        ConditionTest::Block => {
            out.push("block");
            f.push_xyz(out);
            out.push(f.get("block", d::BLOCK));
        }
        ConditionTest::Blocks => {
            out.push("blocks");
            for name in [
                "startX", "startY", "startZ", "endX", "endY", "endZ", "destX", "destY", "destZ",
            ] {
                out.push(f.get(name, d::COORDINATE));
            }
            out.push(f.get("mode", d::SCAN_MODE));
        }
        ConditionTest::Score => {
            out.extend([
                "score",
                f.get("target", d::TARGET),
                f.get("objective", d::OBJECTIVE),
            ]);
            let comparison = f.get("comparison", d::COMPARISON);
            if comparison == "matches" {
                out.extend(["matches", f.get("range", d::RANGE)]);
            } else {
                out.extend([
                    comparison,
                    f.get("sourceTarget", d::TARGET),
                    f.get("sourceObjective", d::OBJECTIVE),
                ]);
            }
        }
        ConditionTest::Biome => {
            out.push("biome");
            f.push_xyz(out);
            out.push(f.get("biome", d::BIOME));
        }
        ConditionTest::Loaded => {
            out.push("loaded");
            f.push_xyz(out);
        }
        ConditionTest::Dimension => out.extend(["dimension", f.get("dimension", d::DIMENSION)]),
        ConditionTest::DataBlock => {
            out.extend(["data", "block"]);
            f.push_xyz(out);
            out.push(f.get("path", d::NBT_PATH));
        }
        ConditionTest::DataEntity => out.extend([
            "data",
            "entity",
            f.get("target", d::TARGET),
            f.get("path", d::NBT_PATH),
        ]),
        ConditionTest::DataStorage => out.extend([
            "data",
            "storage",
            f.get("storage", d::STORAGE),
            f.get("path", d::NBT_PATH),
        ]),
        ConditionTest::Predicate => out.extend(["predicate", f.get("predicate", d::PREDICATE)]),
    }
}

fn render_store_tail<'a>(target: StoreTarget, f: &Fields<'a>, out: &mut Vec<&'a str>) {
    use crate::serializer::defaults as d;
    match target {
        StoreTarget::Score => {
            out.extend([f.get("target", d::TARGET), f.get("objective", d::OBJECTIVE)]);
            return;
        }
        StoreTarget::Bossbar => {
            out.extend([
                f.get("bossbar", d::BOSSBAR),
                f.get("property", d::BOSSBAR_PROPERTY),
            ]);
            return;
        }
        StoreTarget::Block => f.push_xyz(out),
        StoreTarget::Entity => out.push(f.get("target", d::TARGET)),
        StoreTarget::Storage => out.push(f.get("storage", d::STORAGE)),
    }
    out.extend([
        f.get("path", d::NBT_PATH),
        f.get("type", d::DATA_TYPE),
        f.get("scale", d::SCALE),
    ]);
}

/// Config lookup with per-field defaults.
struct Fields<'a>(&'a FieldMap);

impl<'a> Fields<'a> {
    /// The trimmed value of `name`, or `default` when absent or blank.
    fn get(&self, name: &str, default: &'static str) -> &'a str {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn push_xyz(&self, out: &mut Vec<&'a str>) {
        for axis in ["x", "y", "z"] {
            out.push(self.get(axis, defaults::COORDINATE));
        }
    }
}

// ── Command rendering ───────────────────────────────────────────

/// Render one step, or `None` if its subcommand id is unknown.
pub fn render_clause<S: ClauseSource + ?Sized>(step: &S) -> Option<String> {
    ClauseKind::from_id(step.subcommand_id()).map(|kind| kind.render(step.config()))
}

/// Render a full `execute` command from ordered steps and a run command.
/// A blank run command becomes [`defaults::RUN_COMMAND`].
pub fn render_command<'s, S, I>(steps: I, run_command: &str) -> String
where
    S: ClauseSource + 's,
    I: IntoIterator<Item = &'s S>,
{
    let mut parts = vec!["execute".to_string()];
    parts.extend(steps.into_iter().filter_map(render_clause));
    parts.push("run".to_string());
    let run = run_command.trim();
    parts.push(if run.is_empty() {
        defaults::RUN_COMMAND.to_string()
    } else {
        run.to_string()
    });
    parts.join(" ")
}

pub fn render_draft(draft: &Draft) -> String {
    render_command(draft.chain.iter(), &draft.run_command)
}

/// Split a rendered command before its ` run ` for display. The joined
/// command stays the canonical copy text.
pub fn display_lines(command: &str) -> Vec<String> {
    match command.split_once(" run ") {
        Some((head, tail)) => vec![head.to_string(), format!("run {tail}")],
        None => vec![command.to_string()],
    }
}

/// A rendered command plus its display split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct RenderedCommand {
    pub command: String,
    pub lines: Vec<String>,
}

impl RenderedCommand {
    pub fn new(command: String) -> Self {
        let lines = display_lines(&command);
        Self { command, lines }
    }

    pub fn from_draft(draft: &Draft) -> Self {
        Self::new(render_draft(draft))
    }
}
