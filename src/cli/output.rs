use std::io::IsTerminal;

use colored::Colorize;
use serde_json::Value;

use crate::api::{clients::clients_from_response, result_slot, Freshbooks};
use crate::error::FbooksError;

pub fn print_json(value: &Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

pub fn print_error(err: &FbooksError) {
    let label = if std::io::stderr().is_terminal() {
        "Error".red().bold().to_string()
    } else {
        "Error".to_string()
    };
    eprintln!("{label} [{}]: {err}", err.code());
}

/// One line per invoice: number, organization, total, status.
pub fn print_invoice_list(response: &Value) {
    let invoices = result_slot(response, "invoices")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if invoices.is_empty() {
        println!("No invoices found.");
        return;
    }
    for invoice in &invoices {
        println!(
            "{}  {}  {} {}  {}",
            field(invoice, "invoice_number"),
            field(invoice, "organization"),
            field(&invoice["amount"], "amount"),
            field(&invoice["amount"], "code"),
            field(invoice, "v3_status"),
        );
    }
}

pub fn print_invoice_details(response: &Value) {
    let Some(invoice) = Freshbooks::invoice_from_response(response) else {
        println!("No invoice in response.");
        return;
    };
    println!("Invoice ID: {}", field(invoice, "id"));
    println!("Invoice Number: {}", field(invoice, "invoice_number"));
    println!(
        "Client: {} {}",
        field(invoice, "fname"),
        field(invoice, "lname")
    );
    println!("Email: {}", field(invoice, "email"));
    println!("Organization: {}", field(invoice, "organization"));
    println!(
        "Total: {} {}",
        field(&invoice["amount"], "amount"),
        field(&invoice["amount"], "code")
    );
    println!("Status: {}", field(invoice, "v3_status"));

    if let Some(lines) = invoice["lines"].as_array() {
        println!();
        println!("Line items:");
        for line in lines {
            println!(
                "- {}: {} {} (qty: {})",
                field(line, "name"),
                field(&line["unit_cost"], "amount"),
                field(&line["unit_cost"], "code"),
                field(line, "qty"),
            );
        }
    }
}

/// One line per client: id, organization, email, name.
pub fn print_client_list(clients: &[Value]) {
    if clients.is_empty() {
        println!("No clients found.");
        return;
    }
    for client in clients {
        println!(
            "{}  {}  {}  {} {}",
            field(client, "id"),
            field(client, "organization"),
            field(client, "email"),
            field(client, "fname"),
            field(client, "lname"),
        );
    }
}

pub fn print_clients_response(response: &Value) {
    print_client_list(&clients_from_response(response));
}

fn field(value: &Value, key: &str) -> String {
    match &value[key] {
        Value::Null => "N/A".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
