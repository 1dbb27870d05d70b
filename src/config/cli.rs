use crate::domain::model::DeliveryRequest;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "entregador")]
#[command(about = "Registers parcel deliveries and notifies residents")]
pub struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Override server.bind_address from config
        #[arg(long)]
        bind: Option<String>,
    },
    /// Register a single delivery and exit
    Register(RegisterArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub apartment: String,

    #[arg(long)]
    pub package_type: String,

    #[arg(long, default_value = "normal")]
    pub urgency: String,

    /// Defaults to registration.default_status from config
    #[arg(long)]
    pub status: Option<String>,
}

impl From<RegisterArgs> for DeliveryRequest {
    fn from(args: RegisterArgs) -> Self {
        DeliveryRequest {
            apartment_number: args.apartment,
            package_type: args.package_type,
            urgency: args.urgency,
            status: args.status,
        }
    }
}
