//! Search, sort and pagination over the static sample

use serde::{Deserialize, Serialize};

use crate::dataset::{Column, DataPoint};

pub const DEFAULT_ROWS_PER_PAGE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  Asc,
  Desc,
}

impl SortDirection {
  pub fn flipped(self) -> Self {
    match self {
      SortDirection::Asc => SortDirection::Desc,
      SortDirection::Desc => SortDirection::Asc,
    }
  }

  pub fn arrow(self) -> &'static str {
    match self {
      SortDirection::Asc => "↑",
      SortDirection::Desc => "↓",
    }
  }
}

/// One rendered page together with its position in the filtered rows
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<'a> {
  pub rows: Vec<&'a DataPoint>,
  pub page: usize,
  pub page_count: usize,
  pub total: usize,
  /// 1-based index of the first shown row, 0 when nothing matched
  pub first: usize,
  pub last: usize,
}

impl TableView<'_> {
  pub fn summary(&self) -> String {
    format!("Showing {} to {} of {} entries", self.first, self.last, self.total)
  }

  pub fn page_label(&self) -> String {
    format!("Page {} of {}", self.page, self.page_count)
  }

  pub fn has_prev(&self) -> bool {
    self.page > 1
  }

  pub fn has_next(&self) -> bool {
    self.page < self.page_count
  }
}

/// Interactive state of the sample browser
#[derive(Debug, Clone)]
pub struct TableState<'a> {
  data: &'a [DataPoint],
  search: String,
  sort: Option<(Column, SortDirection)>,
  page: usize,
  rows_per_page: usize,
}

impl<'a> TableState<'a> {
  pub fn new(data: &'a [DataPoint]) -> Self {
    Self::with_rows_per_page(data, DEFAULT_ROWS_PER_PAGE)
  }

  /// `rows_per_page` of zero is treated as one
  pub fn with_rows_per_page(data: &'a [DataPoint], rows_per_page: usize) -> Self {
    Self { data, search: String::new(), sort: None, page: 1, rows_per_page: rows_per_page.max(1) }
  }

  pub fn search(&self) -> &str {
    &self.search
  }

  pub fn sort(&self) -> Option<(Column, SortDirection)> {
    self.sort
  }

  pub fn page(&self) -> usize {
    self.page
  }

  /// New search terms always go back to the first page
  pub fn set_search(&mut self, term: &str) {
    self.search = term.to_string();
    self.page = 1;
  }

  /// Same column flips direction, a new column starts ascending
  pub fn toggle_sort(&mut self, column: Column) {
    self.sort = match self.sort {
      Some((current, direction)) if current == column => Some((column, direction.flipped())),
      _ => Some((column, SortDirection::Asc)),
    };
  }

  pub fn set_sort(&mut self, column: Column, direction: SortDirection) {
    self.sort = Some((column, direction));
  }

  pub fn clear_sort(&mut self) {
    self.sort = None;
  }

  pub fn filtered(&self) -> Vec<&'a DataPoint> {
    let needle = self.search.to_lowercase();
    self
      .data
      .iter()
      .filter(|row| {
        needle.is_empty() || row.search_values().iter().any(|v| v.to_lowercase().contains(&needle))
      })
      .collect()
  }

  fn sorted(&self) -> Vec<&'a DataPoint> {
    let mut rows = self.filtered();
    if let Some((column, direction)) = self.sort {
      rows.sort_by(|a, b| {
        let ord = column.compare(a, b);
        match direction {
          SortDirection::Asc => ord,
          SortDirection::Desc => ord.reverse(),
        }
      });
    }
    rows
  }

  pub fn page_count(&self) -> usize {
    self.filtered().len().div_ceil(self.rows_per_page)
  }

  /// Clamped to the available pages; page 1 when nothing matched
  pub fn go_to_page(&mut self, page: usize) {
    let last = self.page_count().max(1);
    self.page = page.clamp(1, last);
  }

  pub fn next_page(&mut self) {
    self.go_to_page(self.page + 1);
  }

  pub fn prev_page(&mut self) {
    self.go_to_page(self.page.saturating_sub(1));
  }

  pub fn view(&self) -> TableView<'a> {
    let rows = self.sorted();
    let total = rows.len();
    let page_count = total.div_ceil(self.rows_per_page);
    let start = (self.page - 1) * self.rows_per_page;
    let end = (start + self.rows_per_page).min(total);
    let page_rows: Vec<&DataPoint> =
      if start < total { rows[start..end].to_vec() } else { Vec::new() };

    let (first, last) = if page_rows.is_empty() { (0, 0) } else { (start + 1, end) };

    TableView { rows: page_rows, page: self.page, page_count, total, first, last }
  }
}
