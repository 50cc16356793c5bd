use serde::Serialize;

use crate::tournament::types::TournamentData;

/// Per-user aggregates. Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub user_id: String,
    pub total_points: f64,
    pub asados_attended: u32,
    pub asados_cooked: u32,
    pub times_hosted: u32,
    /// Magnitude of the penalty sum, shown as a positive number
    pub total_penalties: f64,
}

pub fn calculate_user_stats(user_id: &str, data: &TournamentData) -> UserStats {
    let mut points_from_asados = 0.0;
    let mut asados_attended = 0;
    let mut asados_cooked = 0;
    let mut times_hosted = 0;

    for p in data.participations.iter().filter(|p| p.user_id == user_id) {
        points_from_asados += p.points;
        if p.asistio {
            asados_attended += 1;
        }
        if p.asador {
            asados_cooked += 1;
        }
        if p.hosteo {
            times_hosted += 1;
        }
    }

    let penalty_sum: f64 = data
        .penalties
        .iter()
        .filter(|p| p.user_id == user_id)
        .map(|p| p.points)
        .sum();

    UserStats {
        user_id: user_id.to_string(),
        total_points: points_from_asados + penalty_sum,
        asados_attended,
        asados_cooked,
        times_hosted,
        total_penalties: penalty_sum.abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::types::{Participation, Penalty};

    fn participation(user: &str, points: f64) -> Participation {
        Participation {
            asado_id: "a1".to_string(),
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
            points,
        }
    }

    fn penalty(user: &str, points: f64) -> Penalty {
        Penalty {
            id: format!("pen-{}-{}", user, points),
            user_id: user.to_string(),
            points,
            reason: "Cancelo a ultimo momento".to_string(),
            date: "2025-04-02T12:00:00Z".to_string(),
            asado_id: None,
        }
    }

    #[test]
    fn test_stats_for_user_without_records() {
        let stats = calculate_user_stats("7", &TournamentData::default());
        assert_eq!(stats.total_points, 0.0);
        assert_eq!(stats.asados_attended, 0);
        assert_eq!(stats.total_penalties, 0.0);
    }

    #[test]
    fn test_stats_sum_points_and_subtract_penalties() {
        let mut data = TournamentData::default();
        let mut cooked = participation("1", 8.0);
        cooked.asador = true;
        cooked.asado_id = "a2".to_string();
        let mut hosted = participation("1", 4.5);
        hosted.hosteo = true;
        hosted.asistio = false;
        data.participations = vec![cooked, hosted, participation("2", 1.0)];
        data.penalties = vec![penalty("1", -2.0), penalty("1", -1.0), penalty("2", -5.0)];

        let stats = calculate_user_stats("1", &data);
        assert_eq!(stats.total_points, 9.5);
        assert_eq!(stats.asados_attended, 1);
        assert_eq!(stats.asados_cooked, 1);
        assert_eq!(stats.times_hosted, 1);
        assert_eq!(stats.total_penalties, 3.0);
    }

    #[test]
    fn test_total_can_go_negative() {
        let mut data = TournamentData::default();
        data.participations = vec![participation("3", 1.0)];
        data.penalties = vec![penalty("3", -4.0)];
        let stats = calculate_user_stats("3", &data);
        assert_eq!(stats.total_points, -3.0);
        assert_eq!(stats.total_penalties, 4.0);
    }
}
