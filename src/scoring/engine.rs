use crate::tournament::types::Participation;

/// Minimum number of attendees for an asado to award any points
pub const QUORUM: usize = 4;

/// Per-person, per-asado ceiling, applied after summing every rule
pub const MAX_POINTS: f64 = 10.0;

pub const ASADOR_BASE: f64 = 3.0;
pub const DEFAULT_RATING: u8 = 1;
pub const CARNE_ESPECIAL_BONUS: f64 = 1.0;
pub const SOLE_BUYER_POINTS: f64 = 3.0;
pub const SPLIT_BUYER_POINTS: f64 = 1.0;
pub const ATTENDANCE_POINTS: f64 = 1.0;
pub const ON_TIME_POINTS: f64 = 1.0;
pub const LATE_POINTS: f64 = 0.5;
pub const HOST_POINTS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RuleContribution {
    pub label: String,  // e.g. "Asador", "Comprador"
    pub detail: String, // e.g. "3 + rating 4", "split between 2"
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub attendees: usize,
    pub quorum_met: bool,
    pub raw_total: f64,
    pub capped: bool,
    pub rules: Vec<RuleContribution>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub points: f64,
    pub breakdown: ScoreBreakdown,
}

/// Points earned by one participation, given the other participations of the same asado.
///
/// `siblings` may contain participations of other asados; only those sharing
/// `participation.asado_id` are considered.
pub fn calculate_points(participation: &Participation, siblings: &[Participation]) -> f64 {
    score_participation(participation, siblings).points
}

/// Same as [`calculate_points`] but also reports which rules fired.
pub fn score_participation(participation: &Participation, siblings: &[Participation]) -> ScoreResult {
    let same_asado: Vec<&Participation> = siblings
        .iter()
        .filter(|p| p.asado_id == participation.asado_id)
        .collect();
    let attendees = same_asado.iter().filter(|p| p.asistio).count();

    if attendees < QUORUM {
        return ScoreResult {
            points: 0.0,
            breakdown: ScoreBreakdown {
                attendees,
                quorum_met: false,
                raw_total: 0.0,
                capped: false,
                rules: Vec::new(),
            },
        };
    }

    let mut rules = Vec::new();

    if participation.asador {
        // Unrated asadores count as the minimum rating
        let rating = participation.calificacion_asado.unwrap_or(DEFAULT_RATING);
        let detail = match participation.calificacion_asado {
            Some(r) => format!("{} + rating {}", ASADOR_BASE, r),
            None => format!("{} + unrated (counts as {})", ASADOR_BASE, DEFAULT_RATING),
        };
        rules.push(RuleContribution {
            label: "Asador".to_string(),
            detail,
            points: ASADOR_BASE + f64::from(rating),
        });

        if participation.carne_especial {
            rules.push(RuleContribution {
                label: "Carne especial".to_string(),
                detail: "special cut".to_string(),
                points: CARNE_ESPECIAL_BONUS,
            });
        }
    }

    if participation.comprador {
        let buyers = same_asado.iter().filter(|p| p.comprador).count();
        let (points, detail) = if buyers == 1 {
            (SOLE_BUYER_POINTS, "sole buyer".to_string())
        } else {
            (SPLIT_BUYER_POINTS, format!("split between {}", buyers))
        };
        rules.push(RuleContribution {
            label: "Comprador".to_string(),
            detail,
            points,
        });
    }

    if participation.asistio {
        rules.push(RuleContribution {
            label: "Asistio".to_string(),
            detail: "attended".to_string(),
            points: ATTENDANCE_POINTS,
        });
    }

    if participation.llego_a_tiempo {
        rules.push(RuleContribution {
            label: "A tiempo".to_string(),
            detail: "arrived on time".to_string(),
            points: ON_TIME_POINTS,
        });
    }

    if participation.llego_tarde {
        rules.push(RuleContribution {
            label: "Tarde".to_string(),
            detail: "arrived late".to_string(),
            points: LATE_POINTS,
        });
    }

    if participation.hosteo {
        rules.push(RuleContribution {
            label: "Host".to_string(),
            detail: "hosted".to_string(),
            points: HOST_POINTS,
        });
    }

    let raw_total: f64 = rules.iter().map(|r| r.points).sum();

    ScoreResult {
        points: raw_total.min(MAX_POINTS),
        breakdown: ScoreBreakdown {
            attendees,
            quorum_met: true,
            raw_total,
            capped: raw_total > MAX_POINTS,
            rules,
        },
    }
}
