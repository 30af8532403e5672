pub mod generators;

pub use generators::{GeneratorConfig, PlayerGenerator, SaveGenerator};
