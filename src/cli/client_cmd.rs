use serde_json::Value;

use crate::api::Freshbooks;
use crate::args::parse_field_args;
use crate::error::FbooksError;

use super::output;

pub async fn run_list(fb: &mut Freshbooks, per_page: u32, json: bool) -> Result<(), FbooksError> {
    let response = fb.list_clients(per_page).await?;
    if json {
        output::print_json(&response);
    } else {
        output::print_clients_response(&response);
    }
    Ok(())
}

pub async fn run_get(
    fb: &mut Freshbooks,
    email: Option<&str>,
    organization: Option<&str>,
    json: bool,
) -> Result<(), FbooksError> {
    // Email takes precedence when both filters are given.
    let clients: Vec<Value> = match (email, organization) {
        (Some(email), _) => fb.clients_by_email(email).await?,
        (None, Some(organization)) => fb.clients_by_organization(organization).await?,
        (None, None) => {
            return Err(FbooksError::InvalidArgument(
                "either --email or --organization is required".into(),
            ));
        }
    };

    if json {
        output::print_json(&Value::Array(clients));
    } else {
        output::print_client_list(&clients);
    }
    Ok(())
}

pub async fn run_create(
    fb: &mut Freshbooks,
    email: &str,
    first_name: &str,
    last_name: &str,
    organization: &str,
    json: bool,
) -> Result<(), FbooksError> {
    let response = fb
        .create_client(email, first_name, last_name, organization)
        .await?;
    if json {
        output::print_json(&response);
    } else {
        println!("Client created for {organization} <{email}>.");
    }
    Ok(())
}

pub async fn run_update(
    fb: &mut Freshbooks,
    client_id: &str,
    field_args: &[String],
    json: bool,
) -> Result<(), FbooksError> {
    let fields = parse_field_args(field_args)?;
    if fields.is_empty() {
        return Err(FbooksError::InvalidArgument(
            "no fields to update; pass key=value pairs".into(),
        ));
    }

    let response = fb.update_client(client_id, fields).await?;
    if json {
        output::print_json(&response);
    } else {
        println!("Client {client_id} updated.");
    }
    Ok(())
}
