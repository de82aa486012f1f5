pub mod chain;
pub mod preset;
pub mod subcommand;

// Re-export commonly used types at the model level.
pub use chain::{
    Chain, ChainStep, ClauseSource, Draft, FieldMap, InstanceId, MoveDirection,
    SubcommandInstance,
};
pub use preset::{find_preset, presets, Preset};
pub use subcommand::{
    definitions, definitions_in, find_definition, FieldKind, FieldSpec, SubcommandCategory,
    SubcommandDefinition,
};
