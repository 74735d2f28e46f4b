//! Generic searchable, sortable table over any row type.
//!
//! Columns resolve each row to a [`CellValue`] through an accessor. Search
//! matches the stringified value of searchable columns; sorting compares the
//! resolved values. Search and sort state travel in the page URL as a
//! [`TableQuery`], so every render is a pure function of rows and query.

pub mod render;

pub use render::{AddAction, EmptyState, TableView};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;

use crate::format::{format_datetime, PLACEHOLDER};

/// Key of the column rendered as a trailing action row in card layout.
pub const ACTIONS_KEY: &str = "actions";

/// Value a column resolves a row to.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Text(String),
    Integer(i64),
    Number(Decimal),
    Bool(bool),
    Date(DateTime<Utc>),
    Json(serde_json::Value),
}

impl CellValue {
    /// Text used for search matching; `None` never matches.
    pub fn search_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Integer(n) => Some(n.to_string()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Date(at) => Some(at.to_rfc3339()),
            CellValue::Json(value) => Some(value.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Integer(_) | CellValue::Number(_) => 2,
            CellValue::Date(_) => 3,
            CellValue::Text(_) => 4,
            CellValue::Json(_) => 5,
        }
    }
}

/// Default coercion: missing values show the placeholder, booleans read Yes/No.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str(PLACEHOLDER),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(true) => f.write_str("Yes"),
            CellValue::Bool(false) => f.write_str("No"),
            CellValue::Date(at) => f.write_str(&format_datetime(at)),
            CellValue::Json(serde_json::Value::Null) => f.write_str(PLACEHOLDER),
            CellValue::Json(value) => write!(f, "{}", value),
        }
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Text(a), Text(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.cmp(b),
            (Integer(a), Number(b)) => Decimal::from(*a).cmp(b),
            (Number(a), Integer(b)) => a.cmp(&Decimal::from(*b)),
            (Bool(a), Bool(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (Json(a), Json(b)) => a.to_string().cmp(&b.to_string()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(value.into())
    }
}

impl From<u8> for CellValue {
    fn from(value: u8) -> Self {
        CellValue::Integer(value.into())
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::Date(value)
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        CellValue::Json(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// HTML that is safe to emit unescaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Escape plain text.
    pub fn text(text: &str) -> Self {
        Markup(askama_escape::escape(text, askama_escape::Html).to_string())
    }

    /// Trust `html` as already-safe markup.
    pub fn raw(html: impl Into<String>) -> Self {
        Markup(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing meaningful would show: empty or the placeholder dash.
    pub fn is_blank(&self) -> bool {
        let trimmed = self.0.trim();
        trimmed.is_empty() || trimmed == PLACEHOLDER
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Accessor<R> = Box<dyn Fn(&R) -> CellValue + Send + Sync>;
type Renderer<R> = Box<dyn Fn(&CellValue, &R) -> Markup + Send + Sync>;

pub struct Column<R> {
    key: String,
    header: String,
    sortable: bool,
    searchable: bool,
    accessor: Accessor<R>,
    render: Option<Renderer<R>>,
}

impl<R> Column<R> {
    pub fn new(
        key: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&R) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: false,
            searchable: false,
            accessor: Box::new(accessor),
            render: None,
        }
    }

    /// Row actions; resolves to `Null` and is never searched or sorted.
    pub fn actions(
        header: impl Into<String>,
        render: impl Fn(&R) -> Markup + Send + Sync + 'static,
    ) -> Self {
        Self::new(ACTIONS_KEY, header, |_| CellValue::Null)
            .render(move |_, row| render(row))
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Take over rendering of this column's cells.
    pub fn render(
        mut self,
        render: impl Fn(&CellValue, &R) -> Markup + Send + Sync + 'static,
    ) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn is_actions(&self) -> bool {
        self.key == ACTIONS_KEY
    }

    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    pub fn cell(&self, row: &R) -> Markup {
        let value = self.value(row);
        match &self.render {
            Some(render) => render(&value, row),
            None => Markup::text(&value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: same column flips direction, another column starts ascending.
    pub fn click(&mut self, key: &str) {
        if self.column.as_deref() == Some(key) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clicked(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.click(key);
        next
    }
}

/// Search and sort state carried in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub dir: Option<SortDirection>,
}

impl TableQuery {
    pub fn search(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }

    pub fn sort_state(&self) -> SortState {
        SortState {
            column: self.sort.clone().filter(|s| !s.is_empty()),
            direction: self.dir.unwrap_or_default(),
        }
    }

    /// Query string for the given search text and sort state.
    pub fn href(search: &str, sort: &SortState) -> String {
        let mut params = Vec::new();
        if !search.is_empty() {
            params.push(format!("q={}", urlencoding::encode(search)));
        }
        if let Some(column) = &sort.column {
            params.push(format!("sort={}", urlencoding::encode(column)));
            params.push(format!("dir={}", sort.direction.as_str()));
        }
        if params.is_empty() {
            "?".to_string()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// A column set plus the presentation affordances around it.
pub struct DataTable<R> {
    columns: Vec<Column<R>>,
    title: Option<String>,
    description: Option<String>,
    search_placeholder: String,
    add: Option<AddAction>,
    empty: EmptyState,
    row_key: Option<Box<dyn Fn(&R) -> String + Send + Sync>>,
}

impl<R> DataTable<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            title: None,
            description: None,
            search_placeholder: "Search...".to_string(),
            add: None,
            empty: EmptyState::default(),
            row_key: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    pub fn add_action(mut self, add: AddAction) -> Self {
        self.add = Some(add);
        self
    }

    pub fn empty_state(mut self, empty: EmptyState) -> Self {
        self.empty = empty;
        self
    }

    /// Stable identifier emitted as `data-key` on each row.
    pub fn row_key(mut self, key: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.row_key = Some(Box::new(key));
        self
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn is_searchable(&self) -> bool {
        self.columns.iter().any(Column::is_searchable)
    }

    /// Rows whose searchable columns contain `query`, ignoring case, in input order.
    pub fn filter<'a>(&self, rows: &'a [R], query: &str) -> Vec<&'a R> {
        if query.is_empty() {
            return rows.iter().collect();
        }
        let needle = query.to_lowercase();
        rows.iter()
            .filter(|row| {
                self.columns.iter().filter(|c| c.searchable).any(|column| {
                    column
                        .value(row)
                        .search_text()
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            })
            .collect()
    }

    /// Stable sort on a sortable column; any other key leaves the order alone.
    pub fn sort(&self, rows: &mut [&R], sort: &SortState) {
        let Some(column) = sort
            .column
            .as_deref()
            .and_then(|key| self.columns.iter().find(|c| c.key == key && c.sortable))
        else {
            return;
        };

        rows.sort_by(|a, b| {
            let ordering = column.value(a).cmp(&column.value(b));
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    /// Filter and sort `rows` for `query`, in display order.
    pub fn visible<'a>(&self, rows: &'a [R], query: &TableQuery) -> Vec<&'a R> {
        let mut visible = self.filter(rows, query.search());
        self.sort(&mut visible, &query.sort_state());
        visible
    }

    fn key_of(&self, row: &R) -> Option<String> {
        self.row_key.as_ref().map(|key| key(row))
    }
}
