pub mod clients;
pub mod executor;
pub mod invoices;

pub use executor::RequestExecutor;
pub use invoices::LineItem;

use serde_json::Value;

/// High-level FreshBooks API surface for one account.
///
/// Pure request-building glue over [`RequestExecutor::execute`]; all token
/// handling lives below this layer. Invoice operations are in
/// `invoices.rs`, client operations in `clients.rs`.
pub struct Freshbooks {
    exec: RequestExecutor,
    account_id: String,
}

impl Freshbooks {
    pub fn new(exec: RequestExecutor, account_id: String) -> Self {
        Self { exec, account_id }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn executor_mut(&mut self) -> &mut RequestExecutor {
        &mut self.exec
    }
}

/// Drill into the `response.result.<key>` envelope FreshBooks wraps every
/// payload in.
pub(crate) fn result_slot<'a>(response: &'a Value, key: &str) -> Option<&'a Value> {
    response.get("response")?.get("result")?.get(key)
}
