//! Assignment calendar
//!
//! A month is shown as six Sunday-first weeks: the tail of the previous month,
//! every day of the month, then the head of the next month, 42 cells in all.
//! Assignments are fetched once and bucketed by local calendar day; moving the
//! cursor only rebuilds the grid.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Local, Months, NaiveDate};

use crate::model::time::format_date;
use crate::model::Assignment;

pub const GRID_CELLS: usize = 42;

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Month cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// `None` unless `month` is 1..=12 and the year is representable
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        self.first_day()
            .checked_add_months(Months::new(1))
            .map(Self::of)
            .unwrap_or(*self)
    }

    pub fn prev(&self) -> Self {
        self.first_day()
            .checked_sub_months(Months::new(1))
            .map(Self::of)
            .unwrap_or(*self)
    }

    pub fn days_in_month(&self) -> u32 {
        let first = self.first_day();
        let next = self.next().first_day();
        if next > first {
            (next - first).num_days() as u32
        } else {
            31
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// e.g. `March 2025`
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One square of the month grid
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for the leading and trailing days of neighbouring months
    pub in_month: bool,
    pub is_today: bool,
    pub assignment_count: usize,
}

impl DayCell {
    pub fn is_marked(&self) -> bool {
        self.assignment_count > 0
    }
}

/// Assignments keyed by local due day
pub type DayBuckets = BTreeMap<NaiveDate, Vec<Assignment>>;

pub fn bucket_by_day(assignments: &[Assignment]) -> DayBuckets {
    let mut buckets = DayBuckets::new();
    for assignment in assignments {
        buckets
            .entry(assignment.due_date.date())
            .or_default()
            .push(assignment.clone());
    }
    buckets
}

/// 42-cell grid for one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn build(month: YearMonth, buckets: &DayBuckets, today: NaiveDate) -> Self {
        let first = month.first_day();
        let leading = u64::from(first.weekday().num_days_from_sunday());
        let start = first.checked_sub_days(Days::new(leading)).unwrap_or(first);

        let cells = start
            .iter_days()
            .take(GRID_CELLS)
            .map(|date| DayCell {
                date,
                in_month: month.contains(date),
                is_today: date == today,
                assignment_count: buckets.get(&date).map_or(0, Vec::len),
            })
            .collect();

        Self { month, cells }
    }

    /// Cells split into six rows of seven
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(WEEKDAY_HEADERS.len())
    }
}

/// Cursor plus the assignment set fetched for it
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarState {
    cursor: YearMonth,
    buckets: DayBuckets,
    loaded: bool,
}

impl Default for CalendarState {
    fn default() -> Self {
        Self::new(YearMonth::current())
    }
}

impl CalendarState {
    pub fn new(cursor: YearMonth) -> Self {
        Self {
            cursor,
            buckets: DayBuckets::new(),
            loaded: false,
        }
    }

    pub fn cursor(&self) -> YearMonth {
        self.cursor
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn set_assignments(&mut self, assignments: &[Assignment]) {
        self.buckets = bucket_by_day(assignments);
        self.loaded = true;
    }

    pub(crate) fn set_cursor(&mut self, cursor: YearMonth) {
        self.cursor = cursor;
    }

    pub(crate) fn next(&mut self) -> YearMonth {
        self.cursor = self.cursor.next();
        self.cursor
    }

    pub(crate) fn prev(&mut self) -> YearMonth {
        self.cursor = self.cursor.prev();
        self.cursor
    }

    pub fn grid(&self) -> MonthGrid {
        MonthGrid::build(self.cursor, &self.buckets, Local::now().date_naive())
    }

    pub fn assignments_on(&self, date: NaiveDate) -> &[Assignment] {
        self.buckets.get(&date).map_or(&[], Vec::as_slice)
    }
}

/// Text listing a day's assignment titles, one per line
pub fn day_summary(date: NaiveDate, assignments: &[Assignment]) -> String {
    let mut text = format!("Assignments due {}:", format_date(&date.and_time(chrono::NaiveTime::MIN)));
    for assignment in assignments {
        text.push_str("\n- ");
        text.push_str(&assignment.title);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::time::parse_timestamp;

    fn assignment(id: i64, title: &str, due: &str) -> Assignment {
        Assignment {
            id,
            title: title.into(),
            due_date: parse_timestamp(due).unwrap(),
            course: None,
            project_id: None,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_every_month_has_42_cells() {
        let mut month = YearMonth::new(2024, 1).unwrap();
        for _ in 0..36 {
            let grid = MonthGrid::build(month, &DayBuckets::new(), ymd(2024, 1, 1));
            assert_eq!(grid.cells.len(), GRID_CELLS, "{month}");
            assert_eq!(grid.weeks().count(), 6);
            assert_eq!(
                grid.cells.iter().filter(|c| c.in_month).count() as u32,
                month.days_in_month()
            );
            month = month.next();
        }
        assert_eq!(WEEKDAY_HEADERS.len(), 7);
    }

    #[test]
    fn test_grid_starts_on_sunday() {
        // March 1st 2025 is a Saturday: six leading February days
        let grid = MonthGrid::build(YearMonth::new(2025, 3).unwrap(), &DayBuckets::new(), ymd(2025, 3, 1));
        assert_eq!(grid.cells[0].date, ymd(2025, 2, 23));
        assert!(!grid.cells[5].in_month);
        assert_eq!(grid.cells[6].date, ymd(2025, 3, 1));
        assert_eq!(grid.cells[41].date, ymd(2025, 4, 5));
    }

    #[test]
    fn test_month_starting_sunday_has_no_leading_days() {
        // June 1st 2025 is a Sunday
        let grid = MonthGrid::build(YearMonth::new(2025, 6).unwrap(), &DayBuckets::new(), ymd(2025, 6, 1));
        assert_eq!(grid.cells[0].date, ymd(2025, 6, 1));
        assert!(grid.cells[0].in_month);
    }

    #[test]
    fn test_marked_days_list_their_titles() {
        let mut state = CalendarState::new(YearMonth::new(2025, 3).unwrap());
        state.set_assignments(&[
            assignment(1, "Design doc", "2025-03-04T23:59:00"),
            assignment(2, "Prototype", "2025-03-04"),
            assignment(3, "Retro", "2025-03-20T12:00:00"),
        ]);

        let grid = state.grid();
        let marked: Vec<NaiveDate> = grid.cells.iter().filter(|c| c.is_marked()).map(|c| c.date).collect();
        assert_eq!(marked, vec![ymd(2025, 3, 4), ymd(2025, 3, 20)]);

        let titles: Vec<&str> = state
            .assignments_on(ymd(2025, 3, 4))
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Design doc", "Prototype"]);
        assert!(state.assignments_on(ymd(2025, 3, 5)).is_empty());

        let summary = day_summary(ymd(2025, 3, 4), state.assignments_on(ymd(2025, 3, 4)));
        assert_eq!(summary, "Assignments due Mar 04, 2025:\n- Design doc\n- Prototype");
    }

    #[test]
    fn test_navigation_keeps_fetched_set() {
        let mut state = CalendarState::new(YearMonth::new(2025, 12).unwrap());
        state.set_assignments(&[assignment(1, "Final", "2026-01-09")]);

        assert_eq!(state.next(), YearMonth::new(2026, 1).unwrap());
        assert!(state.grid().cells.iter().any(|c| c.is_marked() && c.in_month));

        assert_eq!(state.prev(), YearMonth::new(2025, 12).unwrap());
        assert_eq!(state.cursor().label(), "December 2025");
    }

    #[test]
    fn test_invalid_month() {
        assert!(YearMonth::new(2025, 13).is_none());
        assert!(YearMonth::new(2025, 0).is_none());
    }
}
