pub mod assist;
pub mod generator;

pub use assist::{AssistOutcome, AssistService};
pub use generator::{GenerateOptions, GeneratorError, ModelState, RuntimeClient, TextGenerator};
