use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::types::{
    Asado, NewAsado, NewPenalty, Participation, ParticipationInput, Penalty, TournamentData,
};
use super::validation::{unrated_asadores, validate_asado, validate_penalty};
use crate::error::TournamentError;
use crate::scoring::recalculate_all;

/// Collection sizes left in the document after a data wipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub users: usize,
    pub asados: usize,
    pub participations: usize,
    pub penalties: usize,
}

/// Turn submitted rows into stored participations for one asado.
///
/// Rows where the user did nothing are dropped (the host's row is always kept, and
/// added when missing) and `hosteo` is rederived from the host so it can never drift
/// from `host_id`.
fn build_participations(
    asado_id: &str,
    host_id: &str,
    mut rows: Vec<ParticipationInput>,
) -> Vec<Participation> {
    if !host_id.trim().is_empty() && !rows.iter().any(|row| row.user_id == host_id) {
        rows.push(ParticipationInput {
            user_id: host_id.to_string(),
            ..Default::default()
        });
    }
    rows.into_iter()
        .filter(|row| row.is_active() || row.user_id == host_id)
        .map(|row| row.into_participation(asado_id, host_id))
        .collect()
}

/// Force `hosteo` to mirror the asado's host on every participation of that asado
pub fn sync_hosteo(data: &mut TournamentData, asado_id: &str) {
    let Some(host_id) = data.asado(asado_id).map(|a| a.host_id.clone()) else {
        return;
    };
    for p in data
        .participations
        .iter_mut()
        .filter(|p| p.asado_id == asado_id)
    {
        p.hosteo = p.user_id == host_id;
    }
}

fn check_asado(
    asado: &NewAsado,
    participations: &[Participation],
    data: &TournamentData,
) -> Result<(), TournamentError> {
    validate_asado(asado, participations, data).map_err(TournamentError::Invalid)?;
    for user_id in unrated_asadores(participations) {
        warn!(user_id, "asador without calificacionAsado, scoring as rating 1");
    }
    Ok(())
}

/// Rebuild cached points in place after a participation change
fn recompute(data: &mut TournamentData) {
    *data = recalculate_all(std::mem::take(data));
}

pub fn create_asado(
    data: &mut TournamentData,
    asado: NewAsado,
    rows: Vec<ParticipationInput>,
) -> Result<Asado, TournamentError> {
    let id = Uuid::new_v4().to_string();
    let participations = build_participations(&id, &asado.host_id, rows);
    check_asado(&asado, &participations, data)?;

    let asado = asado.into_asado(id);
    info!(
        asado_id = %asado.id,
        name = %asado.name,
        participations = participations.len(),
        "creating asado"
    );

    data.asados.push(asado.clone());
    data.participations.extend(participations);
    recompute(data);

    Ok(asado)
}

/// Replace an asado and its whole participation list
pub fn update_asado(
    data: &mut TournamentData,
    id: &str,
    asado: NewAsado,
    rows: Vec<ParticipationInput>,
) -> Result<Asado, TournamentError> {
    let index = data
        .asados
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| TournamentError::asado_not_found(id))?;

    let participations = build_participations(id, &asado.host_id, rows);
    check_asado(&asado, &participations, data)?;

    let asado = asado.into_asado(id.to_string());
    info!(asado_id = %id, participations = participations.len(), "updating asado");

    data.asados[index] = asado.clone();
    data.participations.retain(|p| p.asado_id != id);
    data.participations.extend(participations);
    recompute(data);

    Ok(asado)
}

/// Remove an asado and its participations, then recompute
pub fn delete_asado(data: &mut TournamentData, id: &str) -> Result<Asado, TournamentError> {
    let index = data
        .asados
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| TournamentError::asado_not_found(id))?;

    let asado = data.asados.remove(index);
    let before = data.participations.len();
    // Strip participations before recomputing so no orphan skews a quorum
    data.participations.retain(|p| p.asado_id != id);
    info!(
        asado_id = %id,
        removed_participations = before - data.participations.len(),
        "deleted asado"
    );
    recompute(data);

    Ok(asado)
}

pub fn get_asado<'a>(
    data: &'a TournamentData,
    id: &str,
) -> Result<(&'a Asado, Vec<&'a Participation>), TournamentError> {
    let asado = data
        .asado(id)
        .ok_or_else(|| TournamentError::asado_not_found(id))?;
    Ok((asado, data.participations_for(id)))
}

/// Asados newest first (by date, then time)
pub fn list_asados(data: &TournamentData) -> Vec<&Asado> {
    let mut asados: Vec<&Asado> = data.asados.iter().collect();
    asados.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time)));
    asados
}

/// Record a penalty. Points are stored negative whatever sign was given.
/// Participation points are not recomputed.
pub fn add_penalty(data: &mut TournamentData, penalty: NewPenalty) -> Result<Penalty, TournamentError> {
    validate_penalty(&penalty, data).map_err(TournamentError::Invalid)?;

    let penalty = Penalty {
        id: Uuid::new_v4().to_string(),
        user_id: penalty.user_id,
        points: -penalty.points.abs(),
        reason: penalty.reason.trim().to_string(),
        date: penalty.date.unwrap_or_else(|| Utc::now().to_rfc3339()),
        asado_id: penalty.asado_id,
    };
    info!(
        penalty_id = %penalty.id,
        user_id = %penalty.user_id,
        points = penalty.points,
        "adding penalty"
    );

    data.penalties.push(penalty.clone());
    Ok(penalty)
}

pub fn delete_penalty(data: &mut TournamentData, id: &str) -> Result<Penalty, TournamentError> {
    let index = data
        .penalties
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| TournamentError::penalty_not_found(id))?;
    let penalty = data.penalties.remove(index);
    info!(penalty_id = %id, "deleted penalty");
    Ok(penalty)
}

/// Penalties newest first
pub fn list_penalties(data: &TournamentData) -> Vec<&Penalty> {
    let mut penalties: Vec<&Penalty> = data.penalties.iter().collect();
    penalties.sort_by(|a, b| b.date.cmp(&a.date));
    penalties
}

/// Wipe asados, participations and penalties. The roster survives, so every user
/// starts again from zero.
pub fn clean_data(data: &mut TournamentData) -> CleanStats {
    debug!(
        asados = data.asados.len(),
        participations = data.participations.len(),
        penalties = data.penalties.len(),
        "cleaning tournament data"
    );
    data.asados.clear();
    data.participations.clear();
    data.penalties.clear();

    CleanStats {
        users: data.users.len(),
        asados: data.asados.len(),
        participations: data.participations.len(),
        penalties: data.penalties.len(),
    }
}

/// Rerun the global recompute, e.g. after hand-editing the document.
/// Also resyncs `hosteo` for every asado first.
pub fn recompute_document(data: &mut TournamentData) {
    let ids: Vec<String> = data.asados.iter().map(|a| a.id.clone()).collect();
    for id in &ids {
        sync_hosteo(data, id);
    }
    recompute(data);
}
