use std::io::IsTerminal;
use chrono::DateTime;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::ranking::Ranking;
use crate::scoring::score_participation;
use crate::tournament::types::{Asado, Participation, Penalty, TournamentData, User};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format points without a trailing ".0" (10, 8.5, -3)
pub fn format_points(points: f64) -> String {
    let rounded = (points * 100.0).round() / 100.0;
    // Avoid printing "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn user_name<'a>(data: &'a TournamentData, user_id: &'a str) -> &'a str {
    data.user(user_id).map(|u| u.name.as_str()).unwrap_or(user_id)
}

/// Format the ranking as a table
/// Columns: position, points, name, cooked, hosted, attended, penalties
/// Position column: 3 chars (fits "99."), right-aligned
/// Points column is right-aligned, 6 chars wide
pub fn format_ranking_table(rankings: &[Ranking], use_colors: bool) -> String {
    if rankings.is_empty() {
        return "No participants yet.".to_string();
    }

    let position_width = 3;
    let points_width = 6;
    let separator = "  ";
    let stats_width = 32;

    let longest = rankings
        .iter()
        .map(|r| r.user.name.chars().count())
        .max()
        .unwrap_or(0);

    let fixed_width = position_width + 1 + points_width + separator.len() * 2 + stats_width;
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        // Very narrow terminal
        Some(_) => longest.min(12),
        // No terminal (pipe), don't truncate
        None => longest,
    };

    let header = format!(
        "{:>pw$} {:>w$}{}{}{}{:>6} {:>6} {:>8} {:>9}",
        "#",
        "pts",
        separator,
        format!("{:<w$}", "name", w = name_width),
        separator,
        "cooked",
        "hosted",
        "attended",
        "penalties",
        pw = position_width,
        w = points_width,
    );

    let mut lines = vec![if use_colors {
        header.dimmed().to_string()
    } else {
        header
    }];

    for r in rankings {
        let position = format!("{:>2}.", r.position);
        let points = format!(
            "{:>w$}",
            format_points(r.stats.total_points),
            w = points_width
        );
        let name = format!("{:<w$}", truncate_name(&r.user.name, name_width), w = name_width);
        let penalties = if r.stats.total_penalties > 0.0 {
            format!("-{}", format_points(r.stats.total_penalties))
        } else {
            "0".to_string()
        };
        let stats = format!(
            "{:>6} {:>6} {:>8} {:>9}",
            r.stats.asados_cooked, r.stats.times_hosted, r.stats.asados_attended, penalties
        );

        let line = if use_colors {
            let name = if r.position == 1 {
                name.yellow().bold().to_string()
            } else {
                name.bold().to_string()
            };
            let points = if r.stats.total_points < 0.0 {
                points.red().bold().to_string()
            } else {
                points.green().bold().to_string()
            };
            format!(
                "{} {}{}{}{}{}",
                position.dimmed(),
                points,
                separator,
                name,
                separator,
                stats
            )
        } else {
            format!(
                "{} {}{}{}{}{}",
                position, points, separator, name, separator, stats
            )
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: position, points, name, cooked, hosted, attended, penalties (no headers, no colors)
pub fn format_ranking_tsv(rankings: &[Ranking]) -> String {
    rankings
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                r.position,
                format_points(r.stats.total_points),
                r.user.name,
                r.stats.asados_cooked,
                r.stats.times_hosted,
                r.stats.asados_attended,
                format_points(r.stats.total_penalties)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the roster: id, name, birthday
pub fn format_users(users: &[User], use_colors: bool) -> String {
    if users.is_empty() {
        return "No users.".to_string();
    }

    let id_width = users.iter().map(|u| u.id.chars().count()).max().unwrap_or(0);
    let name_width = users.iter().map(|u| u.name.chars().count()).max().unwrap_or(0);

    users
        .iter()
        .map(|u| {
            let id = format!("{:<w$}", u.id, w = id_width);
            let name = format!("{:<w$}", u.name, w = name_width);
            if use_colors {
                format!("{}  {}  {}", id.dimmed(), name.bold(), u.birthday.cyan())
            } else {
                format!("{}  {}  {}", id, name, u.birthday)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format asados one per line
/// Format: "{date} {time}  {name} @ {location}  host {host}  {attendees} attended  {id}"
pub fn format_asado_list(asados: &[&Asado], data: &TournamentData, use_colors: bool) -> String {
    if asados.is_empty() {
        return "No asados yet.".to_string();
    }

    asados
        .iter()
        .map(|a| {
            let attendees = data
                .participations
                .iter()
                .filter(|p| p.asado_id == a.id && p.asistio)
                .count();
            let host = user_name(data, &a.host_id);
            if use_colors {
                format!(
                    "{} {}  {} @ {}  host {}  {} attended  {}",
                    a.date.cyan(),
                    a.time.cyan(),
                    a.name.bold(),
                    a.location,
                    host.yellow(),
                    attendees,
                    a.id.dimmed()
                )
            } else {
                format!(
                    "{} {}  {} @ {}  host {}  {} attended  {}",
                    a.date, a.time, a.name, a.location, host, attendees, a.id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Short role flags for a participation, e.g. "asador(4) comprador a-tiempo"
fn participation_flags(p: &Participation) -> String {
    let mut flags = Vec::new();
    if p.asador {
        match p.calificacion_asado {
            Some(r) => flags.push(format!("asador({})", r)),
            None => flags.push("asador(unrated)".to_string()),
        }
    }
    if p.carne_especial {
        flags.push("carne-especial".to_string());
    }
    if p.comprador {
        flags.push("comprador".to_string());
    }
    if p.compra_dividida {
        flags.push("compra-dividida".to_string());
    }
    if p.asistio {
        flags.push("asistio".to_string());
    }
    if p.llego_a_tiempo {
        flags.push("a-tiempo".to_string());
    }
    if p.llego_tarde {
        flags.push("tarde".to_string());
    }
    if p.hosteo {
        flags.push("host".to_string());
    }
    flags.join(" ")
}

/// Format one asado with its participants, their flags and the per-rule breakdown
pub fn format_asado_detail(
    asado: &Asado,
    participations: &[&Participation],
    data: &TournamentData,
    use_colors: bool,
) -> String {
    let siblings: Vec<Participation> = participations.iter().map(|p| (*p).clone()).collect();
    let host = user_name(data, &asado.host_id);

    let mut lines = Vec::new();
    if use_colors {
        lines.push(asado.name.bold().to_string());
        lines.push(format!("  When: {} {}", asado.date.cyan(), asado.time.cyan()));
        lines.push(format!("  Where: {}", asado.location));
        lines.push(format!("  Host: {}", host.yellow()));
        lines.push(format!("  Id: {}", asado.id.dimmed()));
    } else {
        lines.push(asado.name.clone());
        lines.push(format!("  When: {} {}", asado.date, asado.time));
        lines.push(format!("  Where: {}", asado.location));
        lines.push(format!("  Host: {}", host));
        lines.push(format!("  Id: {}", asado.id));
    }
    if let Some(ref notes) = asado.notes {
        lines.push(format!("  Notes: {}", notes));
    }

    if siblings.is_empty() {
        lines.push("  No participants.".to_string());
        return lines.join("\n");
    }

    let attendees = siblings.iter().filter(|p| p.asistio).count();
    let quorum_note = if score_participation(&siblings[0], &siblings).breakdown.quorum_met {
        String::new()
    } else {
        " (below quorum, no points awarded)".to_string()
    };
    lines.push(format!("  Attendees: {}{}", attendees, quorum_note));
    lines.push(String::new());

    for p in &siblings {
        let result = score_participation(p, &siblings);
        let name = user_name(data, &p.user_id);
        let points = format_points(p.points);
        if use_colors {
            lines.push(format!(
                "  {}  {}  {}",
                points.green().bold(),
                name.bold(),
                participation_flags(p).dimmed()
            ));
        } else {
            lines.push(format!("  {}  {}  {}", points, name, participation_flags(p)));
        }

        for rule in &result.breakdown.rules {
            lines.push(format!(
                "      +{} {} ({})",
                format_points(rule.points),
                rule.label,
                rule.detail
            ));
        }
        if result.breakdown.capped {
            lines.push(format!(
                "      capped from {}",
                format_points(result.breakdown.raw_total)
            ));
        }
    }

    lines.join("\n")
}

/// Render an RFC 3339 timestamp as "YYYY-MM-DD HH:MM"; other dates are shown as stored
fn format_penalty_date(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Format penalties one per line
/// Format: "{date}  {points}  {user}  {reason}  [{asado}]  {id}"
pub fn format_penalties(penalties: &[&Penalty], data: &TournamentData, use_colors: bool) -> String {
    if penalties.is_empty() {
        return "No penalties.".to_string();
    }

    penalties
        .iter()
        .map(|p| {
            let date = format_penalty_date(&p.date);
            let points = format_points(p.points);
            let user = user_name(data, &p.user_id);
            let asado = p
                .asado_id
                .as_deref()
                .map(|id| {
                    let name = data.asado(id).map(|a| a.name.as_str()).unwrap_or(id);
                    format!("  [{}]", name)
                })
                .unwrap_or_default();
            if use_colors {
                format!(
                    "{}  {}  {}  {}{}  {}",
                    date.cyan(),
                    points.red().bold(),
                    user.bold(),
                    p.reason,
                    asado,
                    p.id.dimmed()
                )
            } else {
                format!(
                    "{}  {}  {}  {}{}  {}",
                    date, points, user, p.reason, asado, p.id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
