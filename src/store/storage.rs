use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use crate::tournament::types::{TournamentData, User};

/// Load the tournament document from a JSON file
///
/// If the file doesn't exist, returns a fresh document seeded with `roster`.
/// The fresh document is not written until the first save.
pub fn load_tournament_data(path: &Path, roster: &[User]) -> Result<TournamentData> {
    if !path.exists() {
        tracing::info!(path = %path.display(), users = roster.len(), "no tournament data yet, seeding roster");
        return Ok(TournamentData::with_users(roster.to_vec()));
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open tournament data at {}", path.display()))?;

    let data: TournamentData = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse tournament data in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        users = data.users.len(),
        asados = data.asados.len(),
        participations = data.participations.len(),
        penalties = data.penalties.len(),
        "loaded tournament data"
    );

    Ok(data)
}

/// Save the tournament document to a JSON file atomically
///
/// Uses atomic-write-file so the document is never left half written.
/// Creates the parent directory if it doesn't exist.
pub fn save_tournament_data(path: &Path, data: &TournamentData) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, data).context("Failed to serialize tournament data")?;

    file.commit().context("Failed to save tournament data")?;

    tracing::debug!(path = %path.display(), "saved tournament data");
    Ok(())
}

/// Load, apply `updater`, and save only if it succeeded.
///
/// This is the whole-document read-modify-write every mutating command goes through.
/// Concurrent writers are not coordinated: the last save wins.
pub fn update_tournament_data<T, F>(path: &Path, roster: &[User], updater: F) -> Result<T>
where
    F: FnOnce(&mut TournamentData) -> Result<T>,
{
    let mut data = load_tournament_data(path, roster)?;
    let result = updater(&mut data)?;
    save_tournament_data(path, &data)?;
    Ok(result)
}
