#[cfg(feature = "server")]
pub mod api;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod paths;
pub mod project;
pub mod registry;
pub mod serializer;
pub mod settings;
pub mod state;
