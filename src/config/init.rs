use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{default_users, get_config_path, get_default_data_path, save_config, Config};
use crate::tournament::types::User;
use crate::tournament::validation::validate_roster;

/// Line-based prompt source, so the wizard can be driven from tests
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompt user with a message and return their trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message)?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("unexpected end of input");
        }
        Ok(line.trim().to_string())
    }

    /// Prompt user with a message and a default value. Returns default if input is empty.
    fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    /// Prompt user with a yes/no question. Returns bool based on input and default.
    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes" || input == "s" || input == "si")
        }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Ask for participants one by one until an empty name is entered
    fn prompt_roster(&mut self) -> Result<Vec<User>> {
        let mut users: Vec<User> = Vec::new();
        loop {
            let name = self.prompt(&format!("  Participant {} name (empty to finish): ", users.len() + 1))?;
            if name.is_empty() {
                if users.is_empty() {
                    self.say("  At least one participant is required.")?;
                    continue;
                }
                break;
            }
            let birthday = loop {
                let b = self.prompt("  Birthday (MM-DD): ")?;
                let candidate = User {
                    id: "candidate".to_string(),
                    name: name.clone(),
                    birthday: b.clone(),
                };
                match validate_roster(&[candidate]) {
                    Ok(()) => break b,
                    Err(errors) => self.say(&format!("  Invalid: {}. Try again.", errors.join(", ")))?,
                }
            };
            users.push(User {
                id: (users.len() + 1).to_string(),
                name,
                birthday,
            });
        }
        Ok(users)
    }
}

/// Collect a full config interactively. Returns the config and the path to save it to,
/// or None when the user declines to overwrite an existing file.
fn collect_config<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    default_path: Option<PathBuf>,
) -> Result<Option<(PathBuf, Config)>> {
    prompter.say("")?;
    prompter.say("Asado Torneo Configuration Wizard")?;
    prompter.say("=================================")?;
    prompter.say("")?;

    // 1. Tournament document
    prompter.say("The tournament is stored as a single JSON document.")?;
    let default_data = get_default_data_path().display().to_string();
    let data_path = prompter.prompt_with_default("Data file", &default_data)?;
    let data_path = if data_path == default_data {
        None
    } else {
        Some(data_path)
    };

    // 2. Access code
    prompter.say("")?;
    prompter.say("An access code protects creating, editing and deleting asados and penalties.")?;
    let code = prompter.prompt("Access code (empty leaves mutations open): ")?;
    let access_code = if code.is_empty() { None } else { Some(code) };

    // 3. Roster
    prompter.say("")?;
    let names: Vec<String> = default_users().into_iter().map(|u| u.name).collect();
    let use_default = prompter.prompt_yes_no(
        &format!("Use the default roster? ({})", names.join(", ")),
        true,
    )?;
    let users = if use_default {
        default_users()
    } else {
        prompter.prompt_roster()?
    };

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    prompter.say("")?;
    let path_str = prompter.prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompter.prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            prompter.say("Aborted.")?;
            return Ok(None);
        }
    }

    Ok(Some((
        config_path,
        Config {
            data_path,
            access_code,
            users,
        },
    )))
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut prompter = Prompter {
        input: stdin.lock(),
        output: std::io::stdout(),
    };

    let Some((config_path, config)) = collect_config(&mut prompter, default_path)? else {
        return Ok(());
    };

    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `asado-torneo` to see the ranking.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str, default_path: PathBuf) -> (Option<(PathBuf, Config)>, String) {
        let mut prompter = Prompter {
            input: Cursor::new(input.as_bytes().to_vec()),
            output: Vec::new(),
        };
        let result = collect_config(&mut prompter, Some(default_path)).unwrap();
        (result, String::from_utf8(prompter.output).unwrap())
    }

    fn fresh_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_accept_all_defaults() {
        let path = fresh_path("asado_torneo_init_defaults.yaml");
        // data file, access code, default roster, config path
        let (result, output) = run("\n\n\n\n", path.clone());
        let (saved_to, config) = result.unwrap();
        assert_eq!(saved_to, path);
        assert!(config.data_path.is_none());
        assert!(config.access_code.is_none());
        assert_eq!(config.users, default_users());
        assert!(output.contains("Configuration Wizard"));
    }

    #[test]
    fn test_custom_roster_and_code() {
        let path = fresh_path("asado_torneo_init_custom.yaml");
        let input = "/srv/torneo.json\n1234\nn\nJuan\n3/15\n03-15\nPedro\n05-20\n\n\n";
        let (result, output) = run(input, path);
        let (_, config) = result.unwrap();
        assert_eq!(config.data_path.as_deref(), Some("/srv/torneo.json"));
        assert_eq!(config.access_code.as_deref(), Some("1234"));
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].id, "1");
        assert_eq!(config.users[0].birthday, "03-15");
        assert_eq!(config.users[1].id, "2");
        assert!(output.contains("Invalid"));
    }

    #[test]
    fn test_input_closed_mid_roster_is_error() {
        let path = fresh_path("asado_torneo_init_eof.yaml");
        let mut prompter = Prompter {
            input: Cursor::new(b"\n\nn\n".to_vec()),
            output: Vec::new(),
        };
        let err = collect_config(&mut prompter, Some(path)).unwrap_err();
        assert!(err.to_string().contains("unexpected end of input"));
    }

    #[test]
    fn test_input_closed_while_asking_birthday_is_error() {
        let path = fresh_path("asado_torneo_init_eof_birthday.yaml");
        let mut prompter = Prompter {
            input: Cursor::new(b"\n\nn\nJuan\n".to_vec()),
            output: Vec::new(),
        };
        assert!(collect_config(&mut prompter, Some(path)).is_err());
    }

    #[test]
    fn test_declining_overwrite_aborts() {
        let path = fresh_path("asado_torneo_init_existing.yaml");
        std::fs::write(&path, "{}").unwrap();
        let (result, output) = run("\n\n\n\nn\n", path.clone());
        assert!(result.is_none());
        assert!(output.contains("Aborted."));
        let _ = std::fs::remove_file(&path);
    }
}
