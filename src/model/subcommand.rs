use serde::Serialize;

use crate::serializer::defaults;

// ── Categories ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubcommandCategory {
    Position,
    Context,
    Condition,
    Store,
}

impl SubcommandCategory {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Context => "context",
            Self::Condition => "condition",
            Self::Store => "store",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Position => {
                "Change where, facing which way, or in which dimension the command runs"
            }
            Self::Context => "Change which entity executes the command",
            Self::Condition => "Only continue when a test passes (or fails)",
            Self::Store => "Store the command's result or success somewhere",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.slug().eq_ignore_ascii_case(slug.trim()))
    }

    pub fn all() -> &'static [SubcommandCategory] {
        &[Self::Position, Self::Context, Self::Condition, Self::Store]
    }
}

// ── Field metadata ──────────────────────────────────────────────

/// What kind of form control a field wants. Enumerated fields list their legal
/// values; the serializer still passes through whatever string it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum FieldKind {
    Selector,
    Coordinate,
    Resource,
    Text,
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub default: &'static str,
}

const fn field(
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    default: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        default,
    }
}

const TARGET: FieldSpec = field("target", "Target", FieldKind::Selector, defaults::TARGET);
const X: FieldSpec = field("x", "X", FieldKind::Coordinate, defaults::COORDINATE);
const Y: FieldSpec = field("y", "Y", FieldKind::Coordinate, defaults::COORDINATE);
const Z: FieldSpec = field("z", "Z", FieldKind::Coordinate, defaults::COORDINATE);
const DIMENSION: FieldSpec = field(
    "dimension",
    "Dimension",
    FieldKind::Enum(defaults::DIMENSION_OPTIONS),
    defaults::DIMENSION,
);
const ANCHOR: FieldSpec = field(
    "anchor",
    "Anchor",
    FieldKind::Enum(defaults::ANCHOR_OPTIONS),
    defaults::ANCHOR,
);
const OBJECTIVE: FieldSpec = field("objective", "Objective", FieldKind::Text, defaults::OBJECTIVE);
const PATH: FieldSpec = field("path", "NBT path", FieldKind::Text, defaults::NBT_PATH);
const STORAGE: FieldSpec = field("storage", "Storage", FieldKind::Resource, defaults::STORAGE);
const DATA_TYPE: FieldSpec = field(
    "type",
    "Data type",
    FieldKind::Enum(defaults::DATA_TYPE_OPTIONS),
    defaults::DATA_TYPE,
);
const SCALE: FieldSpec = field("scale", "Scale", FieldKind::Text, defaults::SCALE);

const TARGET_FIELDS: &[FieldSpec] = &[TARGET];
const XYZ_FIELDS: &[FieldSpec] = &[X, Y, Z];
const DIMENSION_FIELDS: &[FieldSpec] = &[DIMENSION];
const ANCHOR_FIELDS: &[FieldSpec] = &[ANCHOR];
const FACING_ENTITY_FIELDS: &[FieldSpec] = &[TARGET, ANCHOR];
const ROTATION_FIELDS: &[FieldSpec] = &[
    field("yaw", "Yaw", FieldKind::Coordinate, defaults::ROTATION),
    field("pitch", "Pitch", FieldKind::Coordinate, defaults::ROTATION),
];
const HEIGHTMAP_FIELDS: &[FieldSpec] = &[field(
    "heightmap",
    "Heightmap",
    FieldKind::Enum(defaults::HEIGHTMAP_OPTIONS),
    defaults::HEIGHTMAP,
)];
const AXES_FIELDS: &[FieldSpec] = &[field(
    "axes",
    "Axes",
    FieldKind::Enum(defaults::AXES_OPTIONS),
    defaults::AXES,
)];
const RELATION_FIELDS: &[FieldSpec] = &[field(
    "relation",
    "Relation",
    FieldKind::Enum(defaults::RELATION_OPTIONS),
    defaults::RELATION,
)];
const ENTITY_FIELDS: &[FieldSpec] = &[field(
    "entity",
    "Entity",
    FieldKind::Resource,
    defaults::ENTITY,
)];
const BLOCK_FIELDS: &[FieldSpec] = &[
    X,
    Y,
    Z,
    field("block", "Block", FieldKind::Resource, defaults::BLOCK),
];
const BIOME_FIELDS: &[FieldSpec] = &[
    X,
    Y,
    Z,
    field("biome", "Biome", FieldKind::Resource, defaults::BIOME),
];
const BLOCKS_FIELDS: &[FieldSpec] = &[
    field("startX", "Start X", FieldKind::Coordinate, defaults::COORDINATE),
    field("startY", "Start Y", FieldKind::Coordinate, defaults::COORDINATE),
    field("startZ", "Start Z", FieldKind::Coordinate, defaults::COORDINATE),
    field("endX", "End X", FieldKind::Coordinate, defaults::COORDINATE),
    field("endY", "End Y", FieldKind::Coordinate, defaults::COORDINATE),
    field("endZ", "End Z", FieldKind::Coordinate, defaults::COORDINATE),
    field("destX", "Destination X", FieldKind::Coordinate, defaults::COORDINATE),
    field("destY", "Destination Y", FieldKind::Coordinate, defaults::COORDINATE),
    field("destZ", "Destination Z", FieldKind::Coordinate, defaults::COORDINATE),
    field(
        "mode",
        "Scan mode",
        FieldKind::Enum(defaults::SCAN_MODE_OPTIONS),
        defaults::SCAN_MODE,
    ),
];
const SCORE_FIELDS: &[FieldSpec] = &[
    TARGET,
    OBJECTIVE,
    field(
        "comparison",
        "Comparison",
        FieldKind::Enum(defaults::COMPARISON_OPTIONS),
        defaults::COMPARISON,
    ),
    field("range", "Range", FieldKind::Text, defaults::RANGE),
    field("sourceTarget", "Source target", FieldKind::Selector, defaults::TARGET),
    field("sourceObjective", "Source objective", FieldKind::Text, defaults::OBJECTIVE),
];
const DATA_BLOCK_FIELDS: &[FieldSpec] = &[X, Y, Z, PATH];
const DATA_ENTITY_FIELDS: &[FieldSpec] = &[TARGET, PATH];
const DATA_STORAGE_FIELDS: &[FieldSpec] = &[STORAGE, PATH];
const PREDICATE_FIELDS: &[FieldSpec] = &[field(
    "predicate",
    "Predicate",
    FieldKind::Resource,
    defaults::PREDICATE,
)];
const STORE_SCORE_FIELDS: &[FieldSpec] = &[TARGET, OBJECTIVE];
const STORE_BLOCK_FIELDS: &[FieldSpec] = &[X, Y, Z, PATH, DATA_TYPE, SCALE];
const STORE_ENTITY_FIELDS: &[FieldSpec] = &[TARGET, PATH, DATA_TYPE, SCALE];
const STORE_STORAGE_FIELDS: &[FieldSpec] = &[STORAGE, PATH, DATA_TYPE, SCALE];
const STORE_BOSSBAR_FIELDS: &[FieldSpec] = &[
    field("bossbar", "Bossbar", FieldKind::Resource, defaults::BOSSBAR),
    field(
        "property",
        "Property",
        FieldKind::Enum(defaults::BOSSBAR_PROPERTY_OPTIONS),
        defaults::BOSSBAR_PROPERTY,
    ),
];

// ── Definitions ─────────────────────────────────────────────────

/// One entry in the subcommand catalog. Loaded once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubcommandDefinition {
    pub id: &'static str,
    pub category: SubcommandCategory,
    pub label: &'static str,
    pub syntax: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
}

const fn def(
    id: &'static str,
    category: SubcommandCategory,
    label: &'static str,
    syntax: &'static str,
    description: &'static str,
    fields: &'static [FieldSpec],
) -> SubcommandDefinition {
    SubcommandDefinition {
        id,
        category,
        label,
        syntax,
        description,
        fields,
    }
}

use SubcommandCategory::{Condition, Context, Position, Store};

static DEFINITIONS: &[SubcommandDefinition] = &[
    // Position
    def(
        "positioned",
        Position,
        "Positioned",
        "positioned <x> <y> <z>",
        "Run at the given coordinates.",
        XYZ_FIELDS,
    ),
    def(
        "positioned_as",
        Position,
        "Positioned as",
        "positioned as <target>",
        "Run at the position of an entity without changing the executor.",
        TARGET_FIELDS,
    ),
    def(
        "positioned_over",
        Position,
        "Positioned over",
        "positioned over <heightmap>",
        "Move the position to the top of a heightmap.",
        HEIGHTMAP_FIELDS,
    ),
    def(
        "align",
        Position,
        "Align",
        "align <axes>",
        "Floor the position to the block grid on the given axes.",
        AXES_FIELDS,
    ),
    def(
        "anchored",
        Position,
        "Anchored",
        "anchored <eyes|feet>",
        "Anchor local coordinates to the executor's eyes or feet.",
        ANCHOR_FIELDS,
    ),
    def(
        "facing",
        Position,
        "Facing",
        "facing <x> <y> <z>",
        "Face toward the given coordinates.",
        XYZ_FIELDS,
    ),
    def(
        "facing_entity",
        Position,
        "Facing entity",
        "facing entity <target> <eyes|feet>",
        "Face toward an entity's eyes or feet.",
        FACING_ENTITY_FIELDS,
    ),
    def(
        "rotated",
        Position,
        "Rotated",
        "rotated <yaw> <pitch>",
        "Run with the given rotation.",
        ROTATION_FIELDS,
    ),
    def(
        "rotated_as",
        Position,
        "Rotated as",
        "rotated as <target>",
        "Run with the rotation of an entity.",
        TARGET_FIELDS,
    ),
    def(
        "in",
        Position,
        "In dimension",
        "in <dimension>",
        "Run in another dimension.",
        DIMENSION_FIELDS,
    ),
    // Context
    def("as", Context, "As", "as <target>", "Run as each matching entity.", TARGET_FIELDS),
    def(
        "at",
        Context,
        "At",
        "at <target>",
        "Run at the position, rotation and dimension of each matching entity.",
        TARGET_FIELDS,
    ),
    def(
        "on",
        Context,
        "On",
        "on <relation>",
        "Run as an entity related to the current executor.",
        RELATION_FIELDS,
    ),
    def(
        "summon",
        Context,
        "Summon",
        "summon <entity>",
        "Summon a new entity and run as it.",
        ENTITY_FIELDS,
    ),
    // Condition
    def(
        "if_entity",
        Condition,
        "If entity",
        "if entity <target>",
        "Continue if at least one entity matches.",
        TARGET_FIELDS,
    ),
    def(
        "unless_entity",
        Condition,
        "Unless entity",
        "unless entity <target>",
        "Continue if no entity matches.",
        TARGET_FIELDS,
    ),
    def(
        "if_block",
        Condition,
        "If block",
        "if block <x> <y> <z> <block>",
        "Continue if the block at a position matches.",
        BLOCK_FIELDS,
    ),
    def(
        "unless_block",
        Condition,
        "Unless block",
        "unless block <x> <y> <z> <block>",
        "Continue if the block at a position does not match.",
        BLOCK_FIELDS,
    ),
    def(
        "if_blocks",
        Condition,
        "If blocks",
        "if blocks <start> <end> <destination> <all|masked>",
        "Continue if two block regions match.",
        BLOCKS_FIELDS,
    ),
    def(
        "unless_blocks",
        Condition,
        "Unless blocks",
        "unless blocks <start> <end> <destination> <all|masked>",
        "Continue if two block regions differ.",
        BLOCKS_FIELDS,
    ),
    def(
        "if_score",
        Condition,
        "If score",
        "if score <target> <objective> (matches <range>|<op> <source> <sourceObjective>)",
        "Continue if a score matches a range or compares to another score.",
        SCORE_FIELDS,
    ),
    def(
        "unless_score",
        Condition,
        "Unless score",
        "unless score <target> <objective> (matches <range>|<op> <source> <sourceObjective>)",
        "Continue unless a score matches a range or compares to another score.",
        SCORE_FIELDS,
    ),
    def(
        "if_biome",
        Condition,
        "If biome",
        "if biome <x> <y> <z> <biome>",
        "Continue if the position is in the biome.",
        BIOME_FIELDS,
    ),
    def(
        "unless_biome",
        Condition,
        "Unless biome",
        "unless biome <x> <y> <z> <biome>",
        "Continue if the position is not in the biome.",
        BIOME_FIELDS,
    ),
    def(
        "if_loaded",
        Condition,
        "If loaded",
        "if loaded <x> <y> <z>",
        "Continue if the chunk at the position is fully loaded.",
        XYZ_FIELDS,
    ),
    def(
        "unless_loaded",
        Condition,
        "Unless loaded",
        "unless loaded <x> <y> <z>",
        "Continue if the chunk at the position is not loaded.",
        XYZ_FIELDS,
    ),
    def(
        "if_dimension",
        Condition,
        "If dimension",
        "if dimension <dimension>",
        "Continue if executing in the dimension.",
        DIMENSION_FIELDS,
    ),
    def(
        "unless_dimension",
        Condition,
        "Unless dimension",
        "unless dimension <dimension>",
        "Continue unless executing in the dimension.",
        DIMENSION_FIELDS,
    ),
    def(
        "if_data_block",
        Condition,
        "If block data",
        "if data block <x> <y> <z> <path>",
        "Continue if the block entity has data at the path.",
        DATA_BLOCK_FIELDS,
    ),
    def(
        "unless_data_block",
        Condition,
        "Unless block data",
        "unless data block <x> <y> <z> <path>",
        "Continue if the block entity has no data at the path.",
        DATA_BLOCK_FIELDS,
    ),
    def(
        "if_data_entity",
        Condition,
        "If entity data",
        "if data entity <target> <path>",
        "Continue if the entity has data at the path.",
        DATA_ENTITY_FIELDS,
    ),
    def(
        "unless_data_entity",
        Condition,
        "Unless entity data",
        "unless data entity <target> <path>",
        "Continue if the entity has no data at the path.",
        DATA_ENTITY_FIELDS,
    ),
    def(
        "if_data_storage",
        Condition,
        "If storage data",
        "if data storage <storage> <path>",
        "Continue if the storage has data at the path.",
        DATA_STORAGE_FIELDS,
    ),
    def(
        "unless_data_storage",
        Condition,
        "Unless storage data",
        "unless data storage <storage> <path>",
        "Continue if the storage has no data at the path.",
        DATA_STORAGE_FIELDS,
    ),
    def(
        "if_predicate",
        Condition,
        "If predicate",
        "if predicate <predicate>",
        "Continue if the predicate passes.",
        PREDICATE_FIELDS,
    ),
    def(
        "unless_predicate",
        Condition,
        "Unless predicate",
        "unless predicate <predicate>",
        "Continue if the predicate fails.",
        PREDICATE_FIELDS,
    ),
    // Store
    def(
        "store_result_score",
        Store,
        "Store result in score",
        "store result score <target> <objective>",
        "Store the command result in a scoreboard.",
        STORE_SCORE_FIELDS,
    ),
    def(
        "store_success_score",
        Store,
        "Store success in score",
        "store success score <target> <objective>",
        "Store whether the command succeeded in a scoreboard.",
        STORE_SCORE_FIELDS,
    ),
    def(
        "store_result_block",
        Store,
        "Store result in block",
        "store result block <x> <y> <z> <path> <type> <scale>",
        "Store the command result in block entity NBT.",
        STORE_BLOCK_FIELDS,
    ),
    def(
        "store_success_block",
        Store,
        "Store success in block",
        "store success block <x> <y> <z> <path> <type> <scale>",
        "Store whether the command succeeded in block entity NBT.",
        STORE_BLOCK_FIELDS,
    ),
    def(
        "store_result_entity",
        Store,
        "Store result in entity",
        "store result entity <target> <path> <type> <scale>",
        "Store the command result in entity NBT.",
        STORE_ENTITY_FIELDS,
    ),
    def(
        "store_success_entity",
        Store,
        "Store success in entity",
        "store success entity <target> <path> <type> <scale>",
        "Store whether the command succeeded in entity NBT.",
        STORE_ENTITY_FIELDS,
    ),
    def(
        "store_result_storage",
        Store,
        "Store result in storage",
        "store result storage <storage> <path> <type> <scale>",
        "Store the command result in command storage.",
        STORE_STORAGE_FIELDS,
    ),
    def(
        "store_success_storage",
        Store,
        "Store success in storage",
        "store success storage <storage> <path> <type> <scale>",
        "Store whether the command succeeded in command storage.",
        STORE_STORAGE_FIELDS,
    ),
    def(
        "store_result_bossbar",
        Store,
        "Store result in bossbar",
        "store result bossbar <id> <value|max>",
        "Store the command result in a bossbar.",
        STORE_BOSSBAR_FIELDS,
    ),
    def(
        "store_success_bossbar",
        Store,
        "Store success in bossbar",
        "store success bossbar <id> <value|max>",
        "Store whether the command succeeded in a bossbar.",
        STORE_BOSSBAR_FIELDS,
    ),
];

/// The full subcommand catalog, in display order.
pub fn definitions() -> &'static [SubcommandDefinition] {
    DEFINITIONS
}

pub fn find_definition(id: &str) -> Option<&'static SubcommandDefinition> {
    DEFINITIONS.iter().find(|d| d.id == id)
}

pub fn definitions_in(
    category: SubcommandCategory,
) -> impl Iterator<Item = &'static SubcommandDefinition> {
    DEFINITIONS.iter().filter(move |d| d.category == category)
}

impl SubcommandDefinition {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let mut seen = HashSet::new();
        for d in definitions() {
            assert!(seen.insert(d.id), "duplicate subcommand id {}", d.id);
        }
    }

    #[test]
    fn every_category_has_entries() {
        for cat in SubcommandCategory::all() {
            assert!(definitions_in(*cat).count() > 0, "{cat:?} is empty");
        }
    }

    #[test]
    fn store_ids_name_their_keyword() {
        for d in definitions_in(SubcommandCategory::Store) {
            assert!(d.id.contains("result") || d.id.contains("success"), "{}", d.id);
        }
    }

    #[test]
    fn category_slug_round_trips() {
        assert_eq!(SubcommandCategory::from_slug("Condition"), Some(SubcommandCategory::Condition));
        assert_eq!(SubcommandCategory::from_slug("nope"), None);
    }

    #[test]
    fn positioned_fields_default_to_relative() {
        let d = find_definition("positioned").unwrap();
        assert_eq!(d.fields.len(), 3);
        assert!(d.fields.iter().all(|f| f.default == "~"));
    }

    #[test]
    fn enum_defaults_are_legal_options() {
        for d in definitions() {
            for f in d.fields {
                if let FieldKind::Enum(options) = f.kind {
                    assert!(options.contains(&f.default), "{}.{}", d.id, f.name);
                }
            }
        }
    }
}
