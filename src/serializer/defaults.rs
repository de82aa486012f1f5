//! Default literals substituted for absent or blank fields.
//!
//! The subcommand catalog reports these same values to form builders, so a
//! field left untouched in the UI renders exactly what its placeholder shows.

pub const TARGET: &str = "@s";
pub const COORDINATE: &str = "~";
pub const ROTATION: &str = "~";
pub const DIMENSION: &str = "minecraft:overworld";
pub const HEIGHTMAP: &str = "world_surface";
pub const AXES: &str = "xyz";
pub const ANCHOR: &str = "eyes";
pub const RELATION: &str = "passengers";
pub const ENTITY: &str = "minecraft:pig";
pub const BLOCK: &str = "minecraft:stone";
pub const BIOME: &str = "minecraft:plains";
pub const SCAN_MODE: &str = "all";
pub const OBJECTIVE: &str = "objective";
pub const COMPARISON: &str = "matches";
pub const RANGE: &str = "1..";
pub const NBT_PATH: &str = "Data";
pub const STORAGE: &str = "minecraft:storage";
pub const DATA_TYPE: &str = "int";
pub const SCALE: &str = "1";
pub const BOSSBAR: &str = "minecraft:bossbar";
pub const BOSSBAR_PROPERTY: &str = "value";
pub const PREDICATE: &str = "minecraft:predicate";

/// Run command used when the caller leaves it blank.
pub const RUN_COMMAND: &str = "say Hello!";

// ── Legal values for enumerated fields ──────────────────────────

pub const HEIGHTMAP_OPTIONS: &[&str] = &[
    "world_surface",
    "motion_blocking",
    "motion_blocking_no_leaves",
    "ocean_floor",
];
pub const AXES_OPTIONS: &[&str] = &["x", "y", "z", "xy", "xz", "yz", "xyz"];
pub const ANCHOR_OPTIONS: &[&str] = &["eyes", "feet"];
pub const RELATION_OPTIONS: &[&str] = &[
    "attacker",
    "controller",
    "leasher",
    "origin",
    "owner",
    "passengers",
    "target",
    "vehicle",
];
pub const DIMENSION_OPTIONS: &[&str] = &[
    "minecraft:overworld",
    "minecraft:the_nether",
    "minecraft:the_end",
];
pub const SCAN_MODE_OPTIONS: &[&str] = &["all", "masked"];
pub const COMPARISON_OPTIONS: &[&str] = &["matches", "<", "<=", "=", ">=", ">"];
pub const DATA_TYPE_OPTIONS: &[&str] = &["byte", "short", "int", "long", "float", "double"];
pub const BOSSBAR_PROPERTY_OPTIONS: &[&str] = &["value", "max"];
