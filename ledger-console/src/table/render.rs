use askama::Template;

use super::{DataTable, Markup, TableQuery};

/// Button shown in the table header and in the empty state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddAction {
    pub label: String,
    pub href: String,
}

impl AddAction {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Icon name, rendered as a CSS class.
    pub icon: Option<String>,
    pub message: String,
    pub description: String,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            icon: None,
            message: "No data found".to_string(),
            description: "Get started by adding your first item".to_string(),
        }
    }
}

impl EmptyState {
    pub fn new(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            icon: None,
            message: message.into(),
            description: description.into(),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub header: String,
    /// Link that applies the next sort state; `None` for unsortable columns.
    pub href: Option<String>,
    pub arrow: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub key: Option<String>,
    pub cells: Vec<Markup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub header: String,
    pub value: Markup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub key: Option<String>,
    pub fields: Vec<CardField>,
    pub actions: Option<Markup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBox {
    pub placeholder: String,
    pub value: String,
    pub sort: Option<String>,
    pub dir: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Loading,
    Empty(EmptyState),
    Rows {
        headers: Vec<HeaderCell>,
        rows: Vec<RowView>,
        cards: Vec<CardView>,
    },
}

/// Everything needed to draw one table, both desktop and card layouts.
///
/// Its `Display` output is the rendered HTML; pages embed it with `|safe`.
#[derive(Debug, Clone, PartialEq, Eq, Template)]
#[template(path = "partials/data_table.html")]
pub struct TableView {
    pub title: Option<String>,
    pub description: Option<String>,
    pub search: Option<SearchBox>,
    pub add: Option<AddAction>,
    pub body: Body,
}

impl TableView {
    pub fn row_count(&self) -> usize {
        match &self.body {
            Body::Rows { rows, .. } => rows.len(),
            _ => 0,
        }
    }
}

impl<R> DataTable<R> {
    /// Build the view for `rows` under `query`.
    ///
    /// While `loading`, neither rows nor the empty state are shown.
    pub fn view(&self, rows: &[R], query: &TableQuery, loading: bool) -> TableView {
        let sort = query.sort_state();
        let search = self.is_searchable().then(|| SearchBox {
            placeholder: self.search_placeholder.clone(),
            value: query.search().to_string(),
            sort: sort.column.clone(),
            dir: sort.direction.as_str(),
        });

        let body = if loading {
            Body::Loading
        } else {
            let visible = self.visible(rows, query);
            if visible.is_empty() {
                Body::Empty(self.empty.clone())
            } else {
                Body::Rows {
                    headers: self.headers(query),
                    rows: visible
                        .iter()
                        .map(|row| RowView {
                            key: self.key_of(row),
                            cells: self.columns.iter().map(|c| c.cell(row)).collect(),
                        })
                        .collect(),
                    cards: visible.iter().map(|row| self.card(row)).collect(),
                }
            }
        };

        TableView {
            title: self.title.clone(),
            description: self.description.clone(),
            search,
            add: self.add.clone(),
            body,
        }
    }

    fn headers(&self, query: &TableQuery) -> Vec<HeaderCell> {
        let sort = query.sort_state();
        self.columns
            .iter()
            .map(|column| {
                let active = column.sortable && sort.column.as_deref() == Some(column.key());
                HeaderCell {
                    header: column.header().to_string(),
                    href: column
                        .sortable
                        .then(|| TableQuery::href(query.search(), &sort.clicked(column.key()))),
                    arrow: active.then(|| sort.direction.arrow()),
                }
            })
            .collect()
    }

    fn card(&self, row: &R) -> CardView {
        let fields = self
            .columns
            .iter()
            .filter(|column| !column.is_actions())
            .filter_map(|column| {
                let value = column.cell(row);
                (!value.is_blank()).then(|| CardField {
                    header: column.header().to_string(),
                    value,
                })
            })
            .collect();

        let actions = self
            .columns
            .iter()
            .find(|column| column.is_actions())
            .map(|column| column.cell(row));

        CardView {
            key: self.key_of(row),
            fields,
            actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CellValue, Column, SortDirection};

    struct Ledger {
        uuid: &'static str,
        name: &'static str,
        locked: bool,
        note: Option<&'static str>,
    }

    fn ledgers() -> Vec<Ledger> {
        vec![
            Ledger {
                uuid: "L1",
                name: "Main",
                locked: false,
                note: None,
            },
            Ledger {
                uuid: "L2",
                name: "Payroll <2024>",
                locked: true,
                note: Some("closed"),
            },
        ]
    }

    fn table() -> DataTable<Ledger> {
        DataTable::new(vec![
            Column::new("name", "Name", |l: &Ledger| l.name.into()).sortable().searchable(),
            Column::new("locked", "Locked", |l: &Ledger| l.locked.into()),
            Column::new("note", "Note", |l: &Ledger| l.note.into()),
            Column::actions("Actions", |l: &Ledger| {
                Markup::raw(format!(r#"<a href="/ledgers/{}">Open</a>"#, l.uuid))
            }),
        ])
        .title("Ledgers")
        .row_key(|l: &Ledger| l.uuid.to_string())
        .add_action(AddAction::new("Create Ledger", "#create-ledger"))
        .empty_state(EmptyState::new("No ledgers found", "Create a ledger to begin").icon("book"))
    }

    #[test]
    fn rows_use_default_coercion_and_escape_text() {
        let view = table().view(&ledgers(), &TableQuery::default(), false);

        let Body::Rows { rows, headers, .. } = &view.body else {
            panic!("expected rows");
        };
        assert_eq!(headers.len(), 4);
        assert_eq!(rows[0].key.as_deref(), Some("L1"));
        assert_eq!(rows[0].cells[1].as_str(), "No");
        assert_eq!(rows[0].cells[2].as_str(), "-");
        assert_eq!(rows[1].cells[0].as_str(), "Payroll &lt;2024&gt;");
        assert_eq!(rows[1].cells[3].as_str(), r#"<a href="/ledgers/L2">Open</a>"#);
    }

    #[test]
    fn cards_hide_blank_fields_and_trail_actions() {
        let view = table().view(&ledgers(), &TableQuery::default(), false);
        let Body::Rows { cards, .. } = &view.body else {
            panic!("expected rows");
        };

        let headers: Vec<&str> = cards[0].fields.iter().map(|f| f.header.as_str()).collect();
        assert_eq!(headers, vec!["Name", "Locked"]);
        assert!(cards[0].actions.as_ref().is_some_and(|a| a.as_str().contains("L1")));
        assert_eq!(cards[1].fields.len(), 3);
    }

    #[test]
    fn headers_link_to_next_sort_state() {
        let query = TableQuery {
            q: Some("main".into()),
            sort: Some("name".into()),
            dir: Some(SortDirection::Asc),
        };
        let view = table().view(&ledgers(), &query, false);
        let Body::Rows { headers, rows, .. } = &view.body else {
            panic!("expected rows");
        };

        assert_eq!(rows.len(), 1);
        assert_eq!(headers[0].href.as_deref(), Some("?q=main&sort=name&dir=desc"));
        assert_eq!(headers[0].arrow, Some("↑"));
        assert_eq!(headers[1].href, None);
        assert_eq!(view.search.as_ref().map(|s| s.value.as_str()), Some("main"));
    }

    #[test]
    fn loading_suppresses_rows_and_empty_state() {
        let view = table().view(&[], &TableQuery::default(), true);
        assert_eq!(view.body, Body::Loading);

        let html = view.to_string();
        assert!(html.contains("Loading..."));
        assert!(!html.contains("No ledgers found"));
    }

    #[test]
    fn empty_state_offers_add_action() {
        let query = TableQuery {
            q: Some("zzz".into()),
            ..Default::default()
        };
        let view = table().view(&ledgers(), &query, false);
        assert!(matches!(view.body, Body::Empty(_)));

        let html = view.to_string();
        assert!(html.contains("No ledgers found"));
        assert!(html.contains("Create Ledger"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn renders_both_layouts() {
        let html = table().view(&ledgers(), &TableQuery::default(), false).to_string();
        assert!(html.contains("<table"));
        assert!(html.contains("table-cards"));
        assert!(html.contains(r#"data-key="L2""#));
        assert!(html.contains("Payroll &lt;2024&gt;"));
        assert_eq!(CellValue::Null.to_string(), "-");
    }
}
