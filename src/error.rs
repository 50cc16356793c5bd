use thiserror::Error;

/// Reasons a tournament mutation is rejected. The document is left untouched
/// whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TournamentError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid input:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),

    #[error("Invalid access code")]
    AccessDenied,
}

impl TournamentError {
    pub fn asado_not_found(id: &str) -> Self {
        TournamentError::NotFound {
            kind: "Asado",
            id: id.to_string(),
        }
    }

    pub fn penalty_not_found(id: &str) -> Self {
        TournamentError::NotFound {
            kind: "Penalty",
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = TournamentError::asado_not_found("abc");
        assert_eq!(err.to_string(), "Asado not found: abc");
    }

    #[test]
    fn test_invalid_lists_every_error() {
        let err = TournamentError::Invalid(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(err.to_string(), "Invalid input:\n  - first\n  - second");
    }
}
