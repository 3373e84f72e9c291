//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::CoordinatorArgs;
pub use types::{AgentList, CommProto, OutputFormat, PositiveU32, PositiveU64};
