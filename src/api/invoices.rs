use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{result_slot, Freshbooks};
use crate::error::FbooksError;

/// One invoice line. Quantities and amounts are strings on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub qty: String,
    pub unit_cost: UnitCost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCost {
    pub amount: String,
    pub code: String,
}

impl Freshbooks {
    /// List current invoices, optionally filtered by status
    /// (draft, sent, paid, ...).
    pub async fn list_invoices(&mut self, statuses: &[String]) -> Result<Value, FbooksError> {
        let endpoint = format!("/search/account/{}/invoices_current", self.account_id);
        let query: Vec<(String, String)> = statuses
            .iter()
            .map(|s| ("status[]".to_string(), s.clone()))
            .collect();
        self.exec.get(&endpoint, &query).await
    }

    /// Fetch one invoice with its line items included.
    pub async fn get_invoice(&mut self, invoice_id: &str) -> Result<Value, FbooksError> {
        let endpoint = format!(
            "/accounting/account/{}/invoices/invoices/{}",
            self.account_id, invoice_id
        );
        let query = vec![("include[]".to_string(), "lines".to_string())];
        self.exec.get(&endpoint, &query).await
    }

    /// Create a draft invoice for the client with the given email.
    ///
    /// The email must resolve to exactly one client; zero or several matches
    /// are errors rather than a guess.
    pub async fn create_invoice(
        &mut self,
        client_email: &str,
        items: &[LineItem],
    ) -> Result<Value, FbooksError> {
        let matches = self.clients_by_email(client_email).await?;
        let customer_id = match matches.as_slice() {
            [] => return Err(FbooksError::ClientNotFound(client_email.to_string())),
            [client] => client["id"].clone(),
            _ => return Err(FbooksError::AmbiguousClient(client_email.to_string())),
        };

        let endpoint = format!("/accounting/account/{}/invoices/invoices", self.account_id);
        let payload = json!({
            "invoice": {
                "customerid": customer_id,
                "create_date": chrono::Local::now().format("%Y-%m-%d").to_string(),
                "due_offset_days": 30,
                "currency_code": "USD",
                "language": "en",
                "lines": items,
                "send_now": false,
            }
        });
        self.exec.post(&endpoint, &payload).await
    }

    /// Email the invoice to its client. Emails go out immediately, so the
    /// caller must pass explicit human approval.
    pub async fn send_invoice(
        &mut self,
        invoice_id: &str,
        approved: bool,
    ) -> Result<Value, FbooksError> {
        if !approved {
            return Err(FbooksError::ApprovalRequired);
        }
        let endpoint = format!(
            "/accounting/account/{}/invoices/invoices/{}",
            self.account_id, invoice_id
        );
        let payload = json!({"invoice": {"action_email": true}});
        self.exec.put(&endpoint, &payload).await
    }

    /// Mark the invoice deleted (vis_state 1).
    pub async fn delete_invoice(&mut self, invoice_id: &str) -> Result<Value, FbooksError> {
        let endpoint = format!(
            "/accounting/account/{}/invoices/invoices/{}",
            self.account_id, invoice_id
        );
        let payload = json!({"invoice": {"vis_state": 1}});
        self.exec.put(&endpoint, &payload).await
    }

    /// Pull the invoice object out of a get/create response envelope.
    pub fn invoice_from_response(response: &Value) -> Option<&Value> {
        result_slot(response, "invoice")
    }
}
