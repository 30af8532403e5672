pub mod listing;
pub mod offer;
pub mod player;
pub mod team;
pub mod transaction;

pub use listing::*;
pub use offer::*;
pub use player::*;
pub use team::*;
pub use transaction::*;
