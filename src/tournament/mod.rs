pub mod access;
pub mod ops;
pub mod types;
pub mod validation;

pub use access::{authorize, verify_code};
pub use ops::{
    add_penalty, clean_data, create_asado, delete_asado, delete_penalty, get_asado, list_asados,
    list_penalties, recompute_document, sync_hosteo, update_asado, CleanStats,
};
pub use types::{
    Asado, AsadoSubmission, NewAsado, NewPenalty, Participation, ParticipationInput, Penalty,
    TournamentData, User,
};
