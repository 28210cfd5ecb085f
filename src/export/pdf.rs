//! PDF rendering of a customer report.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::domain::customer::Customer;
use crate::export::{ExportError, ExportResult};

pub const REPORT_TITLE: &str = "Reporte de Clientes";
pub const DOWNLOAD_NAME: &str = "reporte_clientes.pdf";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TITLE_SIZE: f32 = 18.0;
const TEXT_SIZE: f32 = 12.0;
const MARGIN_LEFT: f32 = 14.0;
const FIELD_INDENT: f32 = 20.0;
/// Offset from the top at which a fresh page starts writing.
const TOP: f32 = 20.0;
/// Offset from the top past which a new customer block starts a new page.
const BLOCK_THRESHOLD: f32 = 270.0;
/// Offset from the top past which no line is written on the current page.
const LINE_THRESHOLD: f32 = 285.0;

fn pdf_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

/// Writes lines top-down, adding pages as the offset grows.
struct Cursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl Cursor {
    fn text(&self, text: &str, size: f32, x: f32) {
        self.layer
            .use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - self.y), &self.font);
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
        self.pages += 1;
    }

    fn line(&mut self, text: &str, x: f32, advance: f32) {
        if self.y > LINE_THRESHOLD {
            self.new_page();
        }
        self.text(text, TEXT_SIZE, x);
        self.y += advance;
    }
}

/// Renders the report and returns the PDF bytes.
///
/// Each customer gets a `Cliente k:` heading followed by one `label: value`
/// line per present attribute.
pub fn render_customer_report(customers: &[Customer]) -> ExportResult<Vec<u8>> {
    render_paged(customers).map(|(bytes, _)| bytes)
}

/// Renders the report, also returning the number of pages written.
pub(crate) fn render_paged(customers: &[Customer]) -> ExportResult<(Vec<u8>, usize)> {
    let (doc, page, layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut cursor = Cursor {
        doc,
        layer,
        font,
        y: 18.0,
        pages: 1,
    };

    cursor.text(REPORT_TITLE, TITLE_SIZE, MARGIN_LEFT);
    cursor.y = 30.0;

    for (idx, customer) in customers.iter().enumerate() {
        cursor.line(&format!("Cliente {}:", idx + 1), MARGIN_LEFT, 8.0);
        for (label, value) in customer.fields.entries() {
            cursor.line(&format!("{label}: {value}"), FIELD_INDENT, 7.0);
        }
        cursor.y += 5.0;

        if cursor.y > BLOCK_THRESHOLD && idx + 1 < customers.len() {
            cursor.new_page();
        }
    }

    log::debug!(
        "Rendered report with {} customers on {} pages",
        customers.len(),
        cursor.pages
    );
    let pages = cursor.pages;
    let bytes = cursor.doc.save_to_bytes().map_err(pdf_error)?;
    Ok((bytes, pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::CustomerFields;
    use crate::domain::types::CustomerId;

    fn customer(n: usize) -> Customer {
        Customer::new(
            CustomerId::new(format!("c{n}")).unwrap(),
            CustomerFields {
                nombre: Some(format!("Cliente {n}")),
                empresa: Some("Acme".into()),
                telefono: Some("999 888 777".into()),
                ..CustomerFields::default()
            },
        )
    }

    #[test]
    fn renders_a_pdf_document() {
        let bytes = render_customer_report(&[customer(1)]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn a_single_customer_fits_on_one_page() {
        let (_, pages) = render_paged(&[customer(1)]).unwrap();
        assert_eq!(pages, 1);
    }

    #[test]
    fn long_selections_span_several_pages() {
        let customers: Vec<_> = (0..40).map(customer).collect();
        let (bytes, pages) = render_paged(&customers).unwrap();
        // 34mm per customer block from 30mm down to the 270mm threshold.
        assert!(pages >= 5, "rendered {pages} pages");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn a_record_crossing_the_bottom_continues_on_a_new_page() {
        let value = || Some("x".to_string());
        let full = Customer::new(
            CustomerId::new("full").unwrap(),
            CustomerFields {
                nombre: value(),
                apellidos: value(),
                empresa: value(),
                razon_social: value(),
                rubro: value(),
                tipo_cliente: value(),
                medio_contacto: value(),
                comentario: value(),
                etapa: value(),
                cargo: value(),
                ruc: value(),
                telefono: value(),
                email: value(),
                pagina_web: value(),
                direccion: value(),
                distrito: value(),
                provincia: value(),
                fecha: value(),
            },
        );
        // The second block starts above the block threshold but runs past the line threshold.
        let (_, pages) = render_paged(&[full.clone(), full]).unwrap();
        assert_eq!(pages, 2);
    }
}
