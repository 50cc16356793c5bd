use std::collections::HashMap;

use super::engine::calculate_points;
use crate::tournament::types::{Participation, TournamentData};

/// Recalculate the cached `points` of every participation in the document.
///
/// Always a full pass: a change to one participation can move the quorum or the
/// buyer count of its siblings, so nothing is updated incrementally. Penalties are
/// left untouched.
pub fn recalculate_all(mut data: TournamentData) -> TournamentData {
    let mut by_asado: HashMap<&str, Vec<Participation>> = HashMap::new();
    for p in &data.participations {
        by_asado.entry(p.asado_id.as_str()).or_default().push(p.clone());
    }

    let points: Vec<f64> = data
        .participations
        .iter()
        .map(|p| {
            let siblings = by_asado
                .get(p.asado_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            calculate_points(p, siblings)
        })
        .collect();
    let asado_count = by_asado.len();

    for (participation, value) in data.participations.iter_mut().zip(points) {
        participation.points = value;
    }

    tracing::debug!(
        participations = data.participations.len(),
        asados = asado_count,
        "recalculated all points"
    );

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::types::{Penalty, User};

    fn participation(asado: &str, user: &str) -> Participation {
        Participation {
            asado_id: asado.to_string(),
            user_id: user.to_string(),
            asador: false,
            calificacion_asado: None,
            comprador: false,
            asistio: true,
            llego_a_tiempo: false,
            llego_tarde: false,
            hosteo: false,
            carne_especial: false,
            compra_dividida: false,
            points: 0.0,
        }
    }

    fn sample_data() -> TournamentData {
        let mut data = TournamentData::with_users(
            (1..=5)
                .map(|i| User {
                    id: i.to_string(),
                    name: format!("User {}", i),
                    birthday: "01-01".to_string(),
                })
                .collect(),
        );
        for user in ["1", "2", "3", "4"] {
            data.participations.push(participation("a1", user));
        }
        data.participations[0].asador = true;
        data.participations[0].calificacion_asado = Some(4);
        data.participations[1].hosteo = true;

        for user in ["1", "5"] {
            data.participations.push(participation("a2", user));
        }
        data.penalties.push(Penalty {
            id: "p1".to_string(),
            user_id: "1".to_string(),
            points: -2.0,
            reason: "Llego sin hielo".to_string(),
            date: "2025-03-01T00:00:00Z".to_string(),
            asado_id: None,
        });
        data
    }

    #[test]
    fn test_recalculate_fills_points_per_asado() {
        let data = recalculate_all(sample_data());
        let points: Vec<f64> = data.participations.iter().map(|p| p.points).collect();
        // a1 meets quorum; a2 has two attendees
        assert_eq!(points, vec![8.0, 4.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_stale_points_are_overwritten() {
        let mut data = sample_data();
        for p in &mut data.participations {
            p.points = 99.0;
        }
        let data = recalculate_all(data);
        assert!(data.participations.iter().all(|p| p.points <= 10.0));
        assert_eq!(data.participations[4].points, 0.0);
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let once = recalculate_all(sample_data());
        let twice = recalculate_all(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_penalties_untouched() {
        let before = sample_data();
        let after = recalculate_all(before.clone());
        assert_eq!(before.penalties, after.penalties);
        assert_eq!(before.users, after.users);
    }

    #[test]
    fn test_removing_attendee_drops_siblings_below_quorum() {
        let mut data = recalculate_all(sample_data());
        assert_eq!(data.participations[2].points, 1.0);

        data.participations.retain(|p| !(p.asado_id == "a1" && p.user_id == "4"));
        let data = recalculate_all(data);
        assert!(data
            .participations
            .iter()
            .filter(|p| p.asado_id == "a1")
            .all(|p| p.points == 0.0));
    }

    #[test]
    fn test_empty_document() {
        let data = recalculate_all(TournamentData::default());
        assert!(data.participations.is_empty());
    }
}
