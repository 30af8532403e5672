pub mod player;
pub mod save;

pub use player::PlayerGenerator;
pub use save::{GeneratorConfig, SaveGenerator};
