//! Spreadsheet export of the customer list.

use rust_xlsxwriter::{Format, Workbook};

use crate::domain::customer::Customer;
use crate::export::ExportResult;

pub const SHEET_NAME: &str = "Clientes";
pub const DOWNLOAD_NAME: &str = "clientes.xlsx";
pub const COLUMNS: [&str; 6] = ["id", "nombre", "empresa", "etapa", "tipo_cliente", "fecha"];

fn cell<'a>(customer: &'a Customer, column: &str) -> &'a str {
    let fields = &customer.fields;
    let value = match column {
        "id" => Some(customer.id.as_str()),
        "nombre" => fields.nombre.as_deref(),
        "empresa" => fields.empresa.as_deref(),
        "etapa" => fields.etapa.as_deref(),
        "tipo_cliente" => fields.tipo_cliente.as_deref(),
        "fecha" => fields.fecha.as_deref(),
        _ => None,
    };
    value.unwrap_or_default()
}

/// Renders one sheet with a header row followed by one row per customer.
pub fn customers_workbook<'a, I>(customers: I) -> ExportResult<Vec<u8>>
where
    I: IntoIterator<Item = &'a Customer>,
{
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in (0u16..).zip(COLUMNS) {
        worksheet.write_string_with_format(0, col, name, &header)?;
    }

    let mut rows = 0usize;
    for (row, customer) in (1u32..).zip(customers) {
        for (col, name) in (0u16..).zip(COLUMNS) {
            worksheet.write_string(row, col, cell(customer, name))?;
        }
        rows += 1;
    }

    log::debug!("Rendered {rows} customers into {SHEET_NAME}");
    Ok(workbook.save_to_buffer()?)
}
