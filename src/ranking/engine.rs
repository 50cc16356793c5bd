use std::cmp::Ordering;

use serde::Serialize;

use super::collate::compare_names;
use super::stats::{calculate_user_stats, UserStats};
use crate::tournament::types::{TournamentData, User};

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    #[serde(flatten)]
    pub stats: UserStats,
    pub user: User,
    pub position: usize, // 1-based, no gaps
}

/// Build the leaderboard for every user in the roster, including users with no asados.
///
/// Order: total points desc, asados cooked desc, times hosted desc, penalties asc,
/// then name. Positions are assigned after sorting, one per row.
pub fn calculate_rankings(data: &TournamentData) -> Vec<Ranking> {
    let mut rankings: Vec<Ranking> = data
        .users
        .iter()
        .map(|user| Ranking {
            stats: calculate_user_stats(&user.id, data),
            user: user.clone(),
            position: 0,
        })
        .collect();

    // Stable sort so users with identical names keep roster order
    rankings.sort_by(compare_rankings);

    for (idx, ranking) in rankings.iter_mut().enumerate() {
        ranking.position = idx + 1;
    }

    rankings
}

/// Leaderboard comparator. Each rule only decides when every rule before it tied.
pub fn compare_rankings(a: &Ranking, b: &Ranking) -> Ordering {
    // Primary: total points descending
    let points_cmp = b
        .stats
        .total_points
        .partial_cmp(&a.stats.total_points)
        .unwrap_or(Ordering::Equal);
    if points_cmp != Ordering::Equal {
        return points_cmp;
    }

    b.stats
        .asados_cooked
        .cmp(&a.stats.asados_cooked)
        .then_with(|| b.stats.times_hosted.cmp(&a.stats.times_hosted))
        .then_with(|| {
            // Fewer penalties ranks higher
            a.stats
                .total_penalties
                .partial_cmp(&b.stats.total_penalties)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| compare_names(&a.user.name, &b.user.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::types::{Participation, Penalty};

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            birthday: "06-15".to_string(),
        }
    }

    fn participation(asado: &str, user: &str, points: f64) -> Participation {
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
            points,
        }
    }

    fn penalty(user: &str, points: f64) -> Penalty {
        Penalty {
            id: format!("pen-{}", user),
            user_id: user.to_string(),
            points,
            reason: "No trajo carbon".to_string(),
            date: "2025-05-10T18:00:00Z".to_string(),
            asado_id: None,
        }
    }

    fn names(rankings: &[Ranking]) -> Vec<&str> {
        rankings.iter().map(|r| r.user.name.as_str()).collect()
    }

    #[test]
    fn test_includes_users_without_participations() {
        let data = TournamentData::with_users(vec![user("1", "Seba"), user("2", "Renato")]);
        let rankings = calculate_rankings(&data);
        assert_eq!(rankings.len(), 2);
        assert!(rankings.iter().all(|r| r.stats.total_points == 0.0));
        // All tied, so names decide
        assert_eq!(names(&rankings), vec!["Renato", "Seba"]);
        assert_eq!(rankings[0].position, 1);
        assert_eq!(rankings[1].position, 2);
    }

    #[test]
    fn test_sorted_by_total_points() {
        let mut data = TournamentData::with_users(vec![
            user("1", "Ana"),
            user("2", "Bruno"),
            user("3", "Carla"),
        ]);
        data.participations = vec![
            participation("a1", "1", 2.0),
            participation("a1", "2", 7.5),
            participation("a1", "3", 5.0),
        ];
        let rankings = calculate_rankings(&data);
        assert_eq!(names(&rankings), vec!["Bruno", "Carla", "Ana"]);
    }

    #[test]
    fn test_penalties_reduce_total() {
        let mut data = TournamentData::with_users(vec![user("1", "Ana"), user("2", "Bruno")]);
        data.participations = vec![participation("a1", "1", 6.0), participation("a1", "2", 5.0)];
        data.penalties = vec![penalty("1", -2.0)];
        let rankings = calculate_rankings(&data);
        assert_eq!(names(&rankings), vec!["Bruno", "Ana"]);
        assert_eq!(rankings[1].stats.total_points, 4.0);
        assert_eq!(rankings[1].stats.total_penalties, 2.0);
    }

    #[test]
    fn test_tie_broken_by_asados_cooked() {
        let mut data = TournamentData::with_users(vec![user("1", "Ana"), user("2", "Bruno")]);
        let mut cooked = participation("a1", "2", 5.0);
        cooked.asador = true;
        data.participations = vec![participation("a1", "1", 5.0), cooked];
        let rankings = calculate_rankings(&data);
        assert_eq!(names(&rankings), vec!["Bruno", "Ana"]);
    }

    #[test]
    fn test_tie_broken_by_times_hosted() {
        let mut data = TournamentData::with_users(vec![user("1", "Ana"), user("2", "Bruno")]);
        let mut hosted = participation("a1", "2", 5.0);
        hosted.hosteo = true;
        data.participations = vec![participation("a1", "1", 5.0), hosted];
        let rankings = calculate_rankings(&data);
        assert_eq!(names(&rankings), vec!["Bruno", "Ana"]);
    }

    #[test]
    fn test_tie_broken_by_fewer_penalties() {
        let mut data = TournamentData::with_users(vec![user("1", "Ana"), user("2", "Bruno")]);
        // Ana: 7 - 2 = 5, Bruno: 5 flat
        data.participations = vec![participation("a1", "1", 7.0), participation("a1", "2", 5.0)];
        data.penalties = vec![penalty("1", -2.0)];
        let rankings = calculate_rankings(&data);
        assert_eq!(names(&rankings), vec!["Bruno", "Ana"]);
    }

    #[test]
    fn test_full_tie_broken_by_name() {
        let mut data = TournamentData::with_users(vec![user("2", "Bruno"), user("1", "Ana")]);
        data.participations = vec![participation("a1", "1", 3.0), participation("a1", "2", 3.0)];
        let rankings = calculate_rankings(&data);
        assert_eq!(names(&rankings), vec!["Ana", "Bruno"]);
    }

    #[test]
    fn test_cooked_outranks_hosted_on_equal_points() {
        let mut data = TournamentData::with_users(vec![user("1", "Ana"), user("2", "Bruno")]);
        let mut host = participation("a1", "1", 4.0);
        host.hosteo = true;
        let mut cook = participation("a2", "2", 4.0);
        cook.asador = true;
        data.participations = vec![host, cook];
        let rankings = calculate_rankings(&data);
        assert_eq!(names(&rankings), vec!["Bruno", "Ana"]);
    }

    #[test]
    fn test_identical_names_keep_roster_order() {
        let data = TournamentData::with_users(vec![user("9", "Lucas"), user("3", "Lucas")]);
        let rankings = calculate_rankings(&data);
        assert_eq!(rankings[0].user.id, "9");
        assert_eq!(rankings[1].user.id, "3");
    }

    #[test]
    fn test_positions_are_sequential_without_gaps() {
        let data = TournamentData::with_users(
            (1..=9).map(|i| user(&i.to_string(), &format!("U{}", i))).collect(),
        );
        let rankings = calculate_rankings(&data);
        let positions: Vec<usize> = rankings.iter().map(|r| r.position).collect();
        assert_eq!(positions, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_rankings_are_idempotent() {
        let mut data = TournamentData::with_users(vec![
            user("1", "Matias"),
            user("2", "Emilio"),
            user("3", "Juampi"),
        ]);
        data.participations = vec![participation("a1", "1", 3.0), participation("a1", "3", 3.0)];
        let first = calculate_rankings(&data);
        let second = calculate_rankings(&data);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ranking_serializes_flat() {
        let data = TournamentData::with_users(vec![user("1", "Ana")]);
        let rankings = calculate_rankings(&data);
        let value = serde_json::to_value(&rankings[0]).unwrap();
        assert_eq!(value["userId"], "1");
        assert_eq!(value["position"], 1);
        assert_eq!(value["user"]["name"], "Ana");
        assert_eq!(value["asadosCooked"], 0);
    }
}
