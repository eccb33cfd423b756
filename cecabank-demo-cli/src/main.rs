//! Cecabank Demo CLI
//!
//! Command-line interface for exercising the Cecabank gateway client:
//! build payment forms, verify notifications and submit refunds.

use anyhow::Result;
use cecabank_lib::{Client, ConfigParams};
use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cecabank-demo")]
#[command(about = "Cecabank demo CLI - build, verify and refund gateway requests", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Gateway credentials and selectors shared by every command.
#[derive(Args, Clone)]
struct GatewayOpts {
    /// Shared secret signing key (ClaveCifrado)
    #[arg(long)]
    secret: String,

    /// Merchant identifier (9 digits)
    #[arg(long)]
    merchant: String,

    /// Acquirer BIN (10 digits)
    #[arg(long)]
    acquirer_bin: String,

    /// Terminal identifier
    #[arg(long, default_value = "00000001")]
    terminal: String,

    /// Gateway environment (test or real)
    #[arg(long, default_value = "test")]
    environment: String,

    /// Digest algorithm name (SHA1 or SHA2)
    #[arg(long, default_value = "SHA2")]
    cipher: String,
}

impl GatewayOpts {
    fn client(&self) -> cecabank_lib::Result<Client> {
        Client::new(ConfigParams {
            environment: Some(self.environment.clone()),
            secret_key: Some(self.secret.clone()),
            merchant_id: Some(self.merchant.clone()),
            acquirer_bin: Some(self.acquirer_bin.clone()),
            terminal_id: Some(self.terminal.clone()),
            cipher: Some(self.cipher.clone()),
            ..ConfigParams::default()
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the signed hidden-field form for a payment redirect
    Form {
        #[command(flatten)]
        gateway: GatewayOpts,

        /// Merchant order number
        #[arg(long)]
        order: String,

        /// Amount, e.g. 25.99
        #[arg(long)]
        amount: String,

        /// Redirect URL on success
        #[arg(long)]
        url_ok: String,

        /// Redirect URL on failure
        #[arg(long)]
        url_nok: String,

        /// Order description
        #[arg(long)]
        description: Option<String>,

        /// Print the fields as JSON instead of HTML inputs
        #[arg(long)]
        json: bool,
    },

    /// Verify a gateway notification from its urlencoded POST body
    Verify {
        #[command(flatten)]
        gateway: GatewayOpts,

        /// Raw urlencoded notification body
        body: String,
    },

    /// Submit a refund (anulación) for a completed transaction
    Refund {
        #[command(flatten)]
        gateway: GatewayOpts,

        /// Order number of the original payment
        #[arg(long)]
        order: String,

        /// Amount to reverse, e.g. 25.99
        #[arg(long)]
        amount: String,

        /// Reference assigned by the gateway to the original payment
        #[arg(long)]
        reference: String,

        /// Mark the refund as partial
        #[arg(long)]
        partial: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("cecabank_demo_cli=debug,cecabank_lib=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("cecabank_demo_cli=info,cecabank_lib=warn")
            .init();
    }

    match cli.command {
        Commands::Form {
            gateway,
            order,
            amount,
            url_ok,
            url_nok,
            description,
            json,
        } => {
            commands::form::run(
                &gateway.client()?,
                order,
                amount,
                url_ok,
                url_nok,
                description,
                json,
            )?;
        }
        Commands::Verify { gateway, body } => {
            commands::verify::run(&gateway.client()?, &body)?;
        }
        Commands::Refund {
            gateway,
            order,
            amount,
            reference,
            partial,
        } => {
            commands::refund::run(&gateway.client()?, order, amount, reference, partial).await?;
        }
    }

    Ok(())
}
