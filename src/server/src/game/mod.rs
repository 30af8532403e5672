pub mod process;
pub mod routes;
pub mod supervisor;

pub use routes::game_routes;
