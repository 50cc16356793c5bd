use serde::{Deserialize, Serialize};

use crate::tournament::types::User;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Tournament document path (default: ~/.config/asado-torneo/torneo.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,

    /// Shared code required by mutating commands. None leaves them open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,

    /// Roster used to seed a fresh tournament document
    #[serde(default = "default_users")]
    pub users: Vec<User>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            access_code: None,
            users: default_users(),
        }
    }
}

/// The founding roster
pub fn default_users() -> Vec<User> {
    [
        ("1", "Seba", "03-04"),
        ("2", "Renato", "05-13"),
        ("3", "Enzo", "12-27"),
        ("4", "Ignacio", "12-23"),
        ("5", "Emilio", "07-05"),
        ("6", "Juampi", "12-17"),
        ("7", "Roman", "10-25"),
        ("8", "Matias", "01-19"),
        ("9", "Lucas", "03-21"),
    ]
    .iter()
    .map(|(id, name, birthday)| User {
        id: id.to_string(),
        name: name.to_string(),
        birthday: birthday.to_string(),
    })
    .collect()
}
