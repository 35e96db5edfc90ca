//! Text rendering of records, lists, dashboards and the month calendar.
//!
//! Every function here is pure: it takes already-fetched data and returns
//! the text a command prints.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::{self, MonthGrid, WEEKDAYS_ID};
use crate::error::Result;
use crate::model::{Thesis, ThesisStatus, User};
use crate::pagination::Page;

/// How lists are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per record.
    #[default]
    Plain,
    /// Aligned columns.
    Table,
    /// Pretty JSON.
    Json,
}

/// Badge text for a status.
#[must_use]
pub fn status_label(status: ThesisStatus) -> &'static str {
    match status {
        ThesisStatus::Pending => "Menunggu",
        ThesisStatus::Approved => "Disetujui",
        ThesisStatus::Rejected => "Ditolak",
    }
}

/// Avatar initials: first letters of the first two words, or the first two
/// letters of a single word, uppercased. Falls back to `fallback` when the
/// name is missing or blank.
#[must_use]
pub fn initials(name: Option<&str>, fallback: &str) -> String {
    let words: Vec<&str> = name.unwrap_or_default().split_whitespace().collect();
    match words.as_slice() {
        [] => fallback.to_string(),
        [single] => single.chars().take(2).collect::<String>().to_uppercase(),
        [first, second, ..] => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
    }
}

/// Defense date and time, e.g. `20 Des 2025 03:00`, or `TBA`.
#[must_use]
pub fn defense_label(thesis: &Thesis) -> String {
    match thesis.scheduled_at {
        Some(at) => format!(
            "{} {}",
            calendar::format_date(at.date_naive()),
            at.format("%H:%M")
        ),
        None => "TBA".to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn thesis_line(thesis: &Thesis) -> String {
    format!(
        "[{}] {} - {} ({})",
        status_label(thesis.status),
        thesis.title,
        thesis.student_label(),
        thesis.id
    )
}

/// A list of theses in `format`. `empty` is printed for an empty plain or
/// table list.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn theses(list: &[Thesis], format: OutputFormat, empty: &str) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(list)?);
    }
    if list.is_empty() {
        return Ok(empty.to_string());
    }

    let mut out = String::new();
    match format {
        OutputFormat::Table => {
            let _ = writeln!(
                out,
                "{:<10} {:<40} {:<20} {:<10} {}",
                "ID", "JUDUL", "MAHASISWA", "STATUS", "SIDANG"
            );
            for thesis in list {
                let _ = writeln!(
                    out,
                    "{:<10} {:<40} {:<20} {:<10} {}",
                    truncate(&thesis.id, 10),
                    truncate(&thesis.title, 40),
                    truncate(&thesis.student_label(), 20),
                    status_label(thesis.status),
                    defense_label(thesis)
                );
            }
        }
        OutputFormat::Plain | OutputFormat::Json => {
            for thesis in list {
                let _ = writeln!(out, "{}", thesis_line(thesis));
            }
        }
    }
    Ok(out.trim_end().to_string())
}

/// One page of theses followed by the page indicator.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn thesis_page(page: &Page<'_, Thesis>, format: OutputFormat, empty: &str) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(page)?);
    }
    let mut out = theses(page.items, format, empty)?;
    if page.total_items > 0 {
        let _ = write!(
            out,
            "\n\nHalaman {} ({} pengajuan)",
            page.indicator(),
            page.total_items
        );
    }
    Ok(out)
}

/// Full details of one thesis.
#[must_use]
pub fn thesis_detail(thesis: &Thesis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", thesis.title);
    let _ = writeln!(out, "  ID:        {}", thesis.id);
    let _ = writeln!(out, "  Status:    {}", status_label(thesis.status));
    let _ = writeln!(out, "  Mahasiswa: {}", thesis.student_label());
    if let Some(student) = &thesis.student {
        let _ = writeln!(out, "  E-mail:    {}", student.email);
        if let Some(prodi) = &student.prodi {
            let _ = writeln!(out, "  Prodi:     {prodi}");
        }
    }
    let _ = writeln!(out, "  Dokumen:   {}", thesis.doc_url);
    let _ = writeln!(out, "  Sidang:    {}", defense_label(thesis));
    let _ = write!(
        out,
        "  Diajukan:  {}",
        calendar::format_date(thesis.created_at.date_naive())
    );
    out
}

/// A user profile.
#[must_use]
pub fn profile(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "({}) {}",
        initials(user.name.as_deref(), "?"),
        user.display_name()
    );
    let _ = writeln!(out, "  E-mail: {}", user.email);
    let _ = writeln!(out, "  Role:   {}", user.role.label());
    let _ = write!(out, "  Prodi:  {}", user.prodi.as_deref().unwrap_or("-"));
    out
}

/// A month grid. Days with a defense carry `*`; `selected` is bracketed.
#[must_use]
pub fn month_grid(grid: &MonthGrid, selected: Option<NaiveDate>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^35}", grid.month().label());
    for name in WEEKDAYS_ID {
        let _ = write!(out, " {name:>3} ");
    }
    out.push('\n');

    for week in grid.weeks() {
        for cell in week {
            match cell {
                None => out.push_str("     "),
                Some(date) => {
                    let day = date.day();
                    let mark = if grid.is_marked(*date) { '*' } else { ' ' };
                    if Some(*date) == selected {
                        let _ = write!(out, "[{day:>2}]{mark}");
                    } else {
                        let _ = write!(out, " {day:>2} {mark}");
                    }
                }
            }
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Agenda for one day: theses scheduled on it, or a notice.
#[must_use]
pub fn agenda(theses: &[Thesis], date: NaiveDate) -> String {
    let scheduled = calendar::scheduled_on(theses, date);
    let mut out = format!("Agenda {}", calendar::format_date(date));
    if scheduled.is_empty() {
        out.push_str("\n  Tidak ada agenda pada tanggal ini");
        return out;
    }
    for thesis in scheduled {
        let time = thesis
            .scheduled_at
            .map_or_else(|| "09:00".to_string(), |at| at.format("%H:%M").to_string());
        let _ = write!(
            out,
            "\n  {time}  {} - {}",
            thesis.title,
            thesis.student_label()
        );
    }
    out
}

/// Calendar view: grid plus the agenda of the selected day.
#[must_use]
pub fn calendar_view(theses: &[Thesis], grid: &MonthGrid, selected: NaiveDate) -> String {
    format!(
        "{}\n\n{}",
        month_grid(grid, Some(selected)),
        agenda(theses, selected)
    )
}

/// What the student sees first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentDashboard {
    /// Profile, if it loaded.
    pub profile: Option<User>,
    /// Own submissions.
    pub theses: Vec<Thesis>,
}

impl StudentDashboard {
    /// Render with the calendar on `month` and `selected` highlighted.
    #[must_use]
    pub fn render(&self, grid: &MonthGrid, selected: NaiveDate) -> String {
        let name = self.profile.as_ref().map_or("Mahasiswa", User::display_name);
        let initials = initials(
            self.profile.as_ref().and_then(|p| p.name.as_deref()),
            "M",
        );

        let mut out = format!("({initials}) Halo, {name}\n\n");
        out.push_str(&calendar_view(&self.theses, grid, selected));
        out.push_str("\n\nPengajuan TA\n");
        if self.theses.is_empty() {
            out.push_str("  Belum ada pengajuan");
        } else {
            let lines: Vec<String> = self
                .theses
                .iter()
                .map(|t| format!("  {}", thesis_line(t)))
                .collect();
            out.push_str(&lines.join("\n"));
        }
        out
    }
}

/// What the advisor sees first: the head of the review queue and the next
/// scheduled defenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorDashboard {
    /// Profile, if it loaded.
    pub profile: Option<User>,
    /// First pending submissions, or the message shown when they failed to load.
    pub pending: std::result::Result<Vec<Thesis>, String>,
    /// First approved and scheduled submissions, or the load failure message.
    pub scheduled: std::result::Result<Vec<Thesis>, String>,
}

impl AdvisorDashboard {
    /// Build from the pending queue and the full list, keeping `preview`
    /// rows per section. Each section keeps its own load failure.
    #[must_use]
    pub fn new(
        profile: Option<User>,
        pending: Result<Vec<Thesis>>,
        all: Result<Vec<Thesis>>,
        preview: usize,
    ) -> Self {
        let pending = pending
            .map(|list| list.into_iter().take(preview).collect())
            .map_err(|err| err.user_message());
        let scheduled = all
            .map(|list| {
                list.into_iter()
                    .filter(|t| t.status == ThesisStatus::Approved && t.scheduled_at.is_some())
                    .take(preview)
                    .collect()
            })
            .map_err(|err| err.user_message());
        Self {
            profile,
            pending,
            scheduled,
        }
    }

    /// Render both sections.
    #[must_use]
    pub fn render(&self) -> String {
        let name = self.profile.as_ref().map_or("Dosen", User::display_name);
        let initials = initials(
            self.profile.as_ref().and_then(|p| p.name.as_deref()),
            "D",
        );

        let mut out = format!("({initials}) Halo, {name}\n\nPengajuan Pending\n");
        match &self.pending {
            Err(message) => {
                let _ = writeln!(out, "  {message}");
            }
            Ok(pending) if pending.is_empty() => out.push_str("  Tidak ada pengajuan pending\n"),
            Ok(pending) => {
                for thesis in pending {
                    let _ = writeln!(
                        out,
                        "  {} - {} ({})",
                        thesis.title,
                        thesis.student_label(),
                        thesis.id
                    );
                }
            }
        }

        out.push_str("\nSidang Terjadwal\n");
        match &self.scheduled {
            Err(message) => {
                let _ = write!(out, "  {message}");
            }
            Ok(scheduled) if scheduled.is_empty() => out.push_str("  Belum ada sidang terjadwal"),
            Ok(scheduled) => {
                let lines: Vec<String> = scheduled
                    .iter()
                    .map(|t| format!("  {}  {} - {}", defense_label(t), t.title, t.student_label()))
                    .collect();
                out.push_str(&lines.join("\n"));
            }
        }
        out
    }
}
