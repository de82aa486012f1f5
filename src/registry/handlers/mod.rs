pub mod edit;
pub mod history;
pub mod query;
pub mod render;
