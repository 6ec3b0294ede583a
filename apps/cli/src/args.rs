use clap::{Args, Parser, Subcommand};
use sos::domain::{Capabilities, EmergencyCategory};
use std::path::PathBuf;

/// Emergency alert dispatch from the command line.
#[derive(Parser, Debug)]
#[command(name = "sos", version, about)]
pub struct Cli {
    /// Configuration file (TOML). Missing files fall back to defaults.
    #[arg(short, long, default_value = "sos.toml")]
    pub config: PathBuf,

    /// Overrides `storage.data_dir`.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage a user's emergency contacts
    Contacts(ContactsArgs),
    /// Send an alert to every contact of a user
    Dispatch(DispatchArgs),
}

#[derive(Args, Debug)]
pub struct ContactsArgs {
    /// Owner of the contact list
    #[arg(long)]
    pub user: String,

    #[command(subcommand)]
    pub action: ContactAction,
}

#[derive(Subcommand, Debug)]
pub enum ContactAction {
    /// Print every contact
    List,
    /// Add a contact
    Add {
        #[arg(long)]
        name: String,
        /// Exactly ten digits
        #[arg(long)]
        phone: String,
        /// Make this the priority contact
        #[arg(long)]
        priority: bool,
    },
    /// Replace a contact's details
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        priority: bool,
    },
    /// Delete a contact
    Remove { id: String },
    /// Make a contact the only priority contact
    Priority { id: String },
}

#[derive(Args, Debug)]
pub struct DispatchArgs {
    /// Signed-in user whose contacts are alerted
    #[arg(long)]
    pub user: String,

    /// general, medical, accident, violence or fire
    #[arg(long, default_value = "general")]
    pub category: EmergencyCategory,

    /// Without `--lat`/`--lon` the device has no fix and the run aborts.
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Replaces the category's default message
    #[arg(long)]
    pub message: Option<String>,

    /// List nearby hospitals regardless of category
    #[arg(long, conflicts_with = "no_enrich")]
    pub enrich: bool,

    /// Never list nearby hospitals
    #[arg(long)]
    pub no_enrich: bool,

    /// Granted capabilities: sms, location, call, all
    #[arg(long, value_delimiter = ',', default_value = "sms,location,call")]
    pub grant: Vec<Capabilities>,

    /// Pretend there is no network path
    #[arg(long)]
    pub offline: bool,
}

impl DispatchArgs {
    #[must_use]
    pub fn grants(&self) -> Capabilities {
        self.grant.iter().copied().collect()
    }

    /// `None` keeps the category default.
    #[must_use]
    pub const fn enrichment(&self) -> Option<bool> {
        match (self.enrich, self.no_enrich) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
