pub mod storage;

pub use storage::{load_tournament_data, save_tournament_data, update_tournament_data};
