use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fbooks", version, about = "CLI client for the FreshBooks invoicing API")]
struct Cli {
    /// Path to the config file (default: ~/.fbooks/config.json)
    #[arg(long, global = true, env = "FBOOKS_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authorize this machine: open the authorization page, or exchange a code
    Auth {
        /// Authorization code from the redirect URL
        code: Option<String>,
    },

    /// Work with invoices
    Invoices {
        #[command(subcommand)]
        action: InvoiceAction,
    },

    /// Work with clients
    Clients {
        #[command(subcommand)]
        action: ClientAction,
    },
}

#[derive(Subcommand)]
enum InvoiceAction {
    /// List current invoices
    List {
        /// Filter by status (draft, sent, paid, ...), comma-separated
        #[arg(long, value_delimiter = ',')]
        status: Vec<String>,

        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one invoice with its line items
    Get {
        invoice_id: String,

        #[arg(long)]
        json: bool,
    },

    /// Create a draft invoice for a client
    Create {
        /// Email of the client to bill
        #[arg(long)]
        client_email: String,

        /// Line item as `name=...,amount=...[,qty=...][,currency=...]` (repeatable)
        #[arg(long = "item", required = true)]
        items: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Email an invoice to its client (sends immediately; requires --approve)
    Send {
        invoice_id: String,

        /// Confirm that a human approved sending this invoice
        #[arg(long)]
        approve: bool,
    },

    /// Mark an invoice deleted
    Delete { invoice_id: String },
}

#[derive(Subcommand)]
enum ClientAction {
    /// List clients
    List {
        #[arg(long, default_value_t = 100)]
        per_page: u32,

        #[arg(long)]
        json: bool,
    },

    /// Look up clients by email or organization
    Get {
        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        organization: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Create a client
    Create {
        #[arg(long)]
        email: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        organization: String,

        #[arg(long)]
        json: bool,
    },

    /// Update client fields as `key=value` pairs
    Update {
        client_id: String,

        fields: Vec<String>,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("FBOOKS_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        fbooks::cli::output::print_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), fbooks::FbooksError> {
    let config = fbooks::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Auth { code } => {
            fbooks::cli::auth_cmd::run_auth(&config, code.as_deref()).await
        }
        Commands::Invoices { action } => {
            let mut fb = fbooks::connect(&config)?;
            match action {
                InvoiceAction::List { status, json } => {
                    fbooks::cli::invoice_cmd::run_list(&mut fb, &status, json).await
                }
                InvoiceAction::Get { invoice_id, json } => {
                    fbooks::cli::invoice_cmd::run_get(&mut fb, &invoice_id, json).await
                }
                InvoiceAction::Create {
                    client_email,
                    items,
                    json,
                } => {
                    fbooks::cli::invoice_cmd::run_create(&mut fb, &client_email, &items, json)
                        .await
                }
                InvoiceAction::Send {
                    invoice_id,
                    approve,
                } => fbooks::cli::invoice_cmd::run_send(&mut fb, &invoice_id, approve).await,
                InvoiceAction::Delete { invoice_id } => {
                    fbooks::cli::invoice_cmd::run_delete(&mut fb, &invoice_id).await
                }
            }
        }
        Commands::Clients { action } => {
            let mut fb = fbooks::connect(&config)?;
            match action {
                ClientAction::List { per_page, json } => {
                    fbooks::cli::client_cmd::run_list(&mut fb, per_page, json).await
                }
                ClientAction::Get {
                    email,
                    organization,
                    json,
                } => {
                    fbooks::cli::client_cmd::run_get(
                        &mut fb,
                        email.as_deref(),
                        organization.as_deref(),
                        json,
                    )
                    .await
                }
                ClientAction::Create {
                    email,
                    first_name,
                    last_name,
                    organization,
                    json,
                } => {
                    fbooks::cli::client_cmd::run_create(
                        &mut fb,
                        &email,
                        &first_name,
                        &last_name,
                        &organization,
                        json,
                    )
                    .await
                }
                ClientAction::Update {
                    client_id,
                    fields,
                    json,
                } => {
                    fbooks::cli::client_cmd::run_update(&mut fb, &client_id, &fields, json).await
                }
            }
        }
    }
}
