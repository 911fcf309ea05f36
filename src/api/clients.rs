use serde_json::{json, Map, Value};

use super::{result_slot, Freshbooks};
use crate::error::FbooksError;

impl Freshbooks {
    /// List clients on the account.
    pub async fn list_clients(&mut self, per_page: u32) -> Result<Value, FbooksError> {
        let endpoint = format!("/accounting/account/{}/users/clients", self.account_id);
        let query = vec![("per_page".to_string(), per_page.to_string())];
        self.exec.get(&endpoint, &query).await
    }

    /// Clients matching an email, via the server-side search filter.
    pub async fn clients_by_email(&mut self, email: &str) -> Result<Vec<Value>, FbooksError> {
        let endpoint = format!("/accounting/account/{}/users/clients", self.account_id);
        let query = vec![("search[email]".to_string(), email.to_string())];
        let response = self.exec.get(&endpoint, &query).await?;
        Ok(clients_from_response(&response))
    }

    /// Clients whose organization matches exactly. The API has no
    /// organization filter, so this lists and filters locally.
    pub async fn clients_by_organization(
        &mut self,
        organization: &str,
    ) -> Result<Vec<Value>, FbooksError> {
        let response = self.list_clients(100).await?;
        Ok(clients_from_response(&response)
            .into_iter()
            .filter(|c| c["organization"].as_str() == Some(organization))
            .collect())
    }

    /// Create a client record.
    pub async fn create_client(
        &mut self,
        email: &str,
        first_name: &str,
        last_name: &str,
        organization: &str,
    ) -> Result<Value, FbooksError> {
        let endpoint = format!("/accounting/account/{}/users/clients", self.account_id);
        let payload = json!({
            "client": {
                "email": email,
                "fname": first_name,
                "lname": last_name,
                "organization": organization,
            }
        });
        self.exec.post(&endpoint, &payload).await
    }

    /// Update arbitrary fields (organization, fname, lname, email, street,
    /// city, ...) on an existing client.
    pub async fn update_client(
        &mut self,
        client_id: &str,
        fields: Map<String, Value>,
    ) -> Result<Value, FbooksError> {
        let endpoint = format!(
            "/accounting/account/{}/users/clients/{}",
            self.account_id, client_id
        );
        let payload = json!({"client": fields});
        self.exec.put(&endpoint, &payload).await
    }
}

/// Pull the clients array out of a response envelope.
pub fn clients_from_response(response: &Value) -> Vec<Value> {
    result_slot(response, "clients")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clients_from_response_unwraps_envelope() {
        let response = json!({
            "response": {"result": {"clients": [
                {"id": 1, "organization": "Progress Software Corporation"},
                {"id": 2, "organization": "Acme"},
            ]}}
        });
        let clients = clients_from_response(&response);
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0]["id"], 1);
    }

    #[test]
    fn clients_from_response_tolerates_missing_body() {
        assert!(clients_from_response(&json!({})).is_empty());
        assert!(clients_from_response(&json!({"response": {}})).is_empty());
    }
}
