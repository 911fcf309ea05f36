use crate::api::Freshbooks;
use crate::args::parse_line_item;
use crate::error::FbooksError;

use super::output;

pub async fn run_list(
    fb: &mut Freshbooks,
    statuses: &[String],
    json: bool,
) -> Result<(), FbooksError> {
    let response = fb.list_invoices(statuses).await?;
    if json {
        output::print_json(&response);
    } else {
        output::print_invoice_list(&response);
    }
    Ok(())
}

pub async fn run_get(
    fb: &mut Freshbooks,
    invoice_id: &str,
    json: bool,
) -> Result<(), FbooksError> {
    let response = fb.get_invoice(invoice_id).await?;
    if json {
        output::print_json(&response);
    } else {
        output::print_invoice_details(&response);
    }
    Ok(())
}

pub async fn run_create(
    fb: &mut Freshbooks,
    client_email: &str,
    item_specs: &[String],
    json: bool,
) -> Result<(), FbooksError> {
    let items = item_specs
        .iter()
        .map(|spec| parse_line_item(spec))
        .collect::<Result<Vec<_>, _>>()?;

    let response = fb.create_invoice(client_email, &items).await?;
    if json {
        output::print_json(&response);
    } else {
        output::print_invoice_details(&response);
    }
    Ok(())
}

pub async fn run_send(
    fb: &mut Freshbooks,
    invoice_id: &str,
    approve: bool,
) -> Result<(), FbooksError> {
    fb.send_invoice(invoice_id, approve).await?;
    println!("Invoice {invoice_id} sent.");
    Ok(())
}

pub async fn run_delete(fb: &mut Freshbooks, invoice_id: &str) -> Result<(), FbooksError> {
    fb.delete_invoice(invoice_id).await?;
    println!("Invoice {invoice_id} deleted.");
    Ok(())
}
