use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};

use super::types::{NewAsado, NewPenalty, Participation, TournamentData, User};

/// Check an asado and its participation list against the roster before it is stored.
/// Returns all validation errors at once (not just the first).
pub fn validate_asado(
    asado: &NewAsado,
    participations: &[Participation],
    data: &TournamentData,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if asado.name.trim().is_empty() {
        errors.push("asado.name: must not be empty".to_string());
    }

    if asado.date.trim().is_empty() {
        errors.push("asado.date: must not be empty".to_string());
    } else if NaiveDate::parse_from_str(&asado.date, "%Y-%m-%d").is_err() {
        errors.push(format!("asado.date: invalid '{}' - expected YYYY-MM-DD", asado.date));
    }

    if NaiveTime::parse_from_str(&asado.time, "%H:%M").is_err() {
        errors.push(format!("asado.time: invalid '{}' - expected HH:mm", asado.time));
    }

    if asado.host_id.trim().is_empty() {
        errors.push("asado.hostId: must not be empty".to_string());
    } else if data.user(&asado.host_id).is_none() {
        errors.push(format!("asado.hostId: unknown user '{}'", asado.host_id));
    }

    let mut seen = HashSet::new();
    for (i, p) in participations.iter().enumerate() {
        if data.user(&p.user_id).is_none() {
            errors.push(format!("participations[{}].userId: unknown user '{}'", i, p.user_id));
        }
        if !seen.insert(p.user_id.as_str()) {
            errors.push(format!(
                "participations[{}].userId: '{}' listed more than once",
                i, p.user_id
            ));
        }
        if p.llego_a_tiempo && p.llego_tarde {
            errors.push(format!(
                "participations[{}]: llegoATiempo and llegoTarde are mutually exclusive",
                i
            ));
        }
        if let Some(rating) = p.calificacion_asado {
            if !(1..=5).contains(&rating) {
                errors.push(format!(
                    "participations[{}].calificacionAsado: must be 1-5, got {}",
                    i, rating
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// User ids of asadores that were submitted without a rating. These still score
/// (as the minimum rating), so callers only warn about them.
pub fn unrated_asadores(participations: &[Participation]) -> Vec<&str> {
    participations
        .iter()
        .filter(|p| p.asador && p.calificacion_asado.is_none())
        .map(|p| p.user_id.as_str())
        .collect()
}

pub fn validate_penalty(penalty: &NewPenalty, data: &TournamentData) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if data.user(&penalty.user_id).is_none() {
        errors.push(format!("penalty.userId: unknown user '{}'", penalty.user_id));
    }

    if !penalty.points.is_finite() || penalty.points == 0.0 {
        errors.push(format!(
            "penalty.points: must be a non-zero number, got {}",
            penalty.points
        ));
    }

    if penalty.reason.trim().is_empty() {
        errors.push("penalty.reason: must not be empty".to_string());
    }

    if let Some(ref asado_id) = penalty.asado_id {
        if data.asado(asado_id).is_none() {
            errors.push(format!("penalty.asadoId: unknown asado '{}'", asado_id));
        }
    }

    if let Some(ref date) = penalty.date {
        if chrono::DateTime::parse_from_rfc3339(date).is_err()
            && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err()
        {
            errors.push(format!("penalty.date: invalid '{}'", date));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a roster loaded from configuration
pub fn validate_roster(users: &[User]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, user) in users.iter().enumerate() {
        if user.id.trim().is_empty() {
            errors.push(format!("users[{}].id: must not be empty", i));
        } else if !seen.insert(user.id.as_str()) {
            errors.push(format!("users[{}].id: duplicate id '{}'", i, user.id));
        }
        if user.name.trim().is_empty() {
            errors.push(format!("users[{}].name: must not be empty", i));
        }
        if !is_valid_birthday(&user.birthday) {
            errors.push(format!(
                "users[{}].birthday: invalid '{}' - expected MM-DD",
                i, user.birthday
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `MM-DD`, checked against a leap year so 02-29 is accepted
fn is_valid_birthday(s: &str) -> bool {
    s.len() == 5 && NaiveDate::parse_from_str(&format!("2024-{}", s), "%Y-%m-%d").is_ok()
}
