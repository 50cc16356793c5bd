use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub birthday: String, // MM-DD
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asado {
    pub id: String,
    pub name: String,
    pub date: String, // YYYY-MM-DD
    pub time: String, // HH:mm
    pub location: String,
    pub host_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One user's record for one asado. Identity is `(asado_id, user_id)`.
///
/// `points` is a cache filled by [`crate::scoring::recalculate_all`]; it is never read
/// as input by the scoring rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub asado_id: String,
    pub user_id: String,
    pub asador: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calificacion_asado: Option<u8>, // 1-5, expected when asador
    pub comprador: bool,
    pub asistio: bool,
    pub llego_a_tiempo: bool,
    pub llego_tarde: bool,
    pub hosteo: bool,
    pub carne_especial: bool,
    #[serde(default)]
    pub compra_dividida: bool,
    #[serde(default)]
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    pub id: String,
    pub user_id: String,
    pub points: f64, // always negative
    pub reason: String,
    pub date: String, // RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asado_id: Option<String>,
}

/// The whole persisted state. Loaded and saved as one unit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TournamentData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub asados: Vec<Asado>,
    #[serde(default)]
    pub participations: Vec<Participation>,
    #[serde(default)]
    pub penalties: Vec<Penalty>,
}

impl TournamentData {
    /// Fresh document with the given roster and nothing else
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn asado(&self, id: &str) -> Option<&Asado> {
        self.asados.iter().find(|a| a.id == id)
    }

    /// All participations recorded for one asado, in insertion order
    pub fn participations_for(&self, asado_id: &str) -> Vec<&Participation> {
        self.participations
            .iter()
            .filter(|p| p.asado_id == asado_id)
            .collect()
    }
}

/// Asado fields as submitted by a caller, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsado {
    pub name: String,
    pub date: String,
    #[serde(default = "default_time")]
    pub time: String,
    #[serde(default)]
    pub location: String,
    pub host_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_time() -> String {
    "20:00".to_string()
}

impl NewAsado {
    pub fn into_asado(self, id: String) -> Asado {
        Asado {
            id,
            name: self.name,
            date: self.date,
            time: self.time,
            location: self.location,
            host_id: self.host_id,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Participation flags as submitted by a caller. The asado id, `hosteo` and `points`
/// are filled in by the mutation layer, so they are not accepted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationInput {
    pub user_id: String,
    #[serde(default)]
    pub asador: bool,
    #[serde(default)]
    pub calificacion_asado: Option<u8>,
    #[serde(default)]
    pub comprador: bool,
    #[serde(default)]
    pub asistio: bool,
    #[serde(default)]
    pub llego_a_tiempo: bool,
    #[serde(default)]
    pub llego_tarde: bool,
    #[serde(default)]
    pub carne_especial: bool,
    #[serde(default)]
    pub compra_dividida: bool,
}

impl ParticipationInput {
    /// A row only counts if the user did something at the asado. Host rows are kept
    /// by the caller separately since hosting is derived from the asado.
    pub fn is_active(&self) -> bool {
        self.asistio || self.asador || self.comprador
    }

    pub fn into_participation(self, asado_id: &str, host_id: &str) -> Participation {
        Participation {
            asado_id: asado_id.to_string(),
            hosteo: self.user_id == host_id,
            user_id: self.user_id,
            asador: self.asador,
            calificacion_asado: self.calificacion_asado,
            comprador: self.comprador,
            asistio: self.asistio,
            llego_a_tiempo: self.llego_a_tiempo,
            llego_tarde: self.llego_tarde,
            carne_especial: self.carne_especial,
            compra_dividida: self.compra_dividida,
            points: 0.0,
        }
    }
}

/// Payload accepted by `asado add` / `asado edit`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AsadoSubmission {
    pub asado: NewAsado,
    #[serde(default)]
    pub participations: Vec<ParticipationInput>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPenalty {
    pub user_id: String,
    pub points: f64,
    pub reason: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub asado_id: Option<String>,
}
