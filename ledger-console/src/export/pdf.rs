//! A4 PDF rendition of a statement, laid out as plain text rows.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::handlers::statements::{Figure, StatementView};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 20.0;
const CODE_X: f32 = MARGIN;
const NAME_X: f32 = 42.0;
const AMOUNT_X: f32 = 150.0;

/// Render `statement` for `ledger` on as many A4 pages as it needs.
pub fn render_statement(
    statement: &StatementView,
    ledger: &str,
    generated: &str,
) -> Result<Vec<u8>, anyhow::Error> {
    let title = statement.kind.title();
    let (doc, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Statement");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow::anyhow!("Failed to load PDF font: {:?}", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow::anyhow!("Failed to load PDF font: {:?}", e))?;

    let layer = doc.get_page(page).get_layer(layer);
    let mut sheet = Sheet {
        doc,
        layer,
        y: PAGE_HEIGHT.0 - MARGIN,
        regular,
        bold,
    };

    sheet.text(title, 18.0, MARGIN, true);
    sheet.advance(8.0);
    sheet.text(&format!("Ledger: {}", ledger), 11.0, MARGIN, false);
    sheet.advance(5.0);
    sheet.text(&format!("Generated {}", generated), 9.0, MARGIN, false);
    sheet.advance(5.0);
    sheet.text(statement.description, 10.0, MARGIN, false);
    sheet.advance(10.0);

    for figure in &statement.highlights {
        sheet.figure(figure, false);
    }
    if !statement.highlights.is_empty() {
        sheet.advance(4.0);
    }

    for section in &statement.sections {
        sheet.ensure_room(20.0);
        sheet.text(section.title, 13.0, MARGIN, true);
        sheet.advance(7.0);
        for line in &section.lines {
            sheet.ensure_room(6.0);
            sheet.text(&line.code, 10.0, CODE_X, false);
            sheet.text(&line.name, 10.0, NAME_X, false);
            sheet.text(&line.amount, 10.0, AMOUNT_X, false);
            sheet.advance(5.5);
        }
        sheet.figure(&section.total, true);
        for figure in &section.after {
            sheet.figure(figure, true);
        }
        sheet.advance(5.0);
    }

    for figure in &statement.summary {
        sheet.figure(figure, false);
    }
    sheet.advance(2.0);
    sheet.figure(&statement.grand_total, true);

    sheet
        .doc
        .save_to_bytes()
        .map_err(|e| anyhow::anyhow!("Failed to write PDF: {:?}", e))
}

/// Cursor over the current page; starts a new page when the bottom margin is reached.
struct Sheet {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Sheet {
    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(printable(text), size, Mm(x), Mm(self.y), font);
    }

    fn figure(&mut self, figure: &Figure, bold: bool) {
        self.ensure_room(7.0);
        self.text(&figure.label, 11.0, NAME_X, bold);
        self.text(&figure.amount, 11.0, AMOUNT_X, bold);
        self.advance(6.5);
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed >= MARGIN {
            return;
        }
        let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Statement");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT.0 - MARGIN;
    }
}

/// Built-in PDF fonts use a single-byte encoding; non-ASCII prints as `?`.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IncomeStatement, StatementLine};
    use rust_decimal::Decimal;

    fn income(lines: usize) -> IncomeStatement {
        IncomeStatement {
            revenues: (0..lines)
                .map(|i| StatementLine {
                    code: format!("4{:03}", i),
                    name: format!("Sales stream {}", i),
                    balance: Decimal::from(100),
                    uuid: format!("R{}", i),
                })
                .collect(),
            total_revenues: Decimal::from(100 * lines as i64),
            cogs: Vec::new(),
            total_cogs: Decimal::ZERO,
            gross_profit: Decimal::from(100 * lines as i64),
            expenses: Vec::new(),
            total_expenses: Decimal::ZERO,
            net_income: Decimal::from(100 * lines as i64),
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let view = StatementView::from(&income(3));
        let bytes = render_statement(&view, "MAIN", "Mar 5, 2024").unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_statements_flow_onto_more_pages() {
        let render = |lines| {
            render_statement(&StatementView::from(&income(lines)), "MAIN", "Mar 5, 2024").unwrap()
        };

        assert!(render(120).len() > render(3).len());
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(printable("Caf\u{e9} \u{20ac}5"), "Caf? ?5");
        assert_eq!(printable("1000 - Cash"), "1000 - Cash");
    }
}
