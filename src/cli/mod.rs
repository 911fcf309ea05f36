pub mod auth_cmd;
pub mod client_cmd;
pub mod invoice_cmd;
pub mod output;
