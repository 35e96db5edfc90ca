//! Month calendar grid and Indonesian date labels.
//!
//! The grid is seven columns wide, Sunday first. Cells before the 1st and
//! after the last day are blank, and the total cell count is always a
//! multiple of seven.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};
use crate::model::Thesis;

/// Short month names, January first.
pub const MONTHS_ID: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Column headers, Sunday first.
pub const WEEKDAYS_ID: [&str; 7] = ["Min", "Sen", "Sel", "Rab", "Kam", "Jum", "Sab"];

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create from a year and a 1-based month.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `month` is not 1-12 or `year` is
    /// outside the range [`NaiveDate`] can represent, one year of margin
    /// kept on each side for month navigation.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::validation(format!("Bulan tidak valid: {month}")));
        }
        let years = (NaiveDate::MIN.year() + 1)..=(NaiveDate::MAX.year() - 1);
        if !years.contains(&year) {
            return Err(Error::validation(format!("Tahun tidak valid: {year}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month, 1-12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The following month.
    #[must_use]
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year.saturating_add(1),
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month.
    #[must_use]
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year.saturating_sub(1),
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        let first = self.first_day();
        let first_of_next = self.next().first_day();
        u32::try_from(first_of_next.signed_duration_since(first).num_days()).unwrap_or(31)
    }

    /// Blank cells before the 1st: its weekday counted from Sunday.
    #[must_use]
    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// Header label, e.g. `Des 2025`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::validation(format!("Format bulan harus YYYY-MM: {s}"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// Short Indonesian month name for a 1-based month.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MONTHS_ID.get(i))
        .copied()
        .unwrap_or("?")
}

/// `dd MMM yyyy` with Indonesian month names, e.g. `20 Des 2025`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    format!("{:02} {} {}", date.day(), month_name(date.month()), date.year())
}

/// A laid-out month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: YearMonth,
    cells: Vec<Option<NaiveDate>>,
    marked: BTreeSet<NaiveDate>,
}

impl MonthGrid {
    /// Lay out `month` with no marked days.
    #[must_use]
    pub fn new(month: YearMonth) -> Self {
        let leading = month.leading_blanks();
        let days = month.days_in_month();
        let total = (days + leading).div_ceil(7) * 7;

        let first = month.first_day();
        let cells = (0..total)
            .map(|index| {
                index
                    .checked_sub(leading)
                    .filter(|offset| *offset < days)
                    .and_then(|offset| first.checked_add_days(chrono::Days::new(offset.into())))
            })
            .collect();

        Self {
            month,
            cells,
            marked: BTreeSet::new(),
        }
    }

    /// Lay out `month`, marking every day in it that carries a defense.
    #[must_use]
    pub fn with_theses(month: YearMonth, theses: &[Thesis]) -> Self {
        let mut grid = Self::new(month);
        grid.marked = theses
            .iter()
            .filter_map(Thesis::defense_date)
            .filter(|date| YearMonth::of(*date) == month)
            .collect();
        grid
    }

    /// The month shown.
    #[must_use]
    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// All cells, row by row; `None` is a blank.
    #[must_use]
    pub fn cells(&self) -> &[Option<NaiveDate>] {
        &self.cells
    }

    /// Cells grouped into weeks of seven.
    pub fn weeks(&self) -> impl Iterator<Item = &[Option<NaiveDate>]> {
        self.cells.chunks(7)
    }

    /// Whether `date` has a defense.
    #[must_use]
    pub fn is_marked(&self, date: NaiveDate) -> bool {
        self.marked.contains(&date)
    }

    /// Days with a defense, in order.
    #[must_use]
    pub fn marked(&self) -> &BTreeSet<NaiveDate> {
        &self.marked
    }
}

/// Resolve the month shown and the day selected from optional `YYYY-MM`
/// and `YYYY-MM-DD` inputs. A lone day picks its month; a lone month
/// selects today when today falls in it, otherwise its first day.
///
/// # Errors
///
/// Returns [`Error::Validation`] for unparseable input.
pub fn select(
    month: Option<&str>,
    day: Option<&str>,
    today: NaiveDate,
) -> Result<(YearMonth, NaiveDate)> {
    let day = day
        .map(|d| {
            NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                .map_err(|_| Error::validation("Format tanggal harus YYYY-MM-DD"))
        })
        .transpose()?;
    let month = month.map(str::parse::<YearMonth>).transpose()?;

    Ok(match (month, day) {
        (Some(month), Some(day)) => (month, day),
        (None, Some(day)) => (YearMonth::of(day), day),
        (Some(month), None) if YearMonth::of(today) == month => (month, today),
        (Some(month), None) => (month, month.first_day()),
        (None, None) => (YearMonth::of(today), today),
    })
}

/// Theses with an approved defense on `date`.
#[must_use]
pub fn scheduled_on(theses: &[Thesis], date: NaiveDate) -> Vec<&Thesis> {
    theses.iter().filter(|t| t.is_scheduled_on(date)).collect()
}
