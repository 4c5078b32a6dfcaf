use clap::{Args, Subcommand};

/// Organization commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OrgCommands {
    /// List organizations, one page at a time.
    List(OrgListArgs),
    /// Show one organization as a card.
    Show {
        id: String,
    },
    /// Search organizations by free text.
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Show the organization of the signed-in user.
    Current,
    /// Create an organization.
    Create(OrgCreateArgs),
    /// Change fields of an organization. Unset flags keep their value; an
    /// empty value clears an optional field.
    Edit(OrgEditArgs),
    /// Delete an organization after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Debug, Default, Args)]
pub struct OrgListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Defaults to `panel.per_page` from config.
    #[arg(long)]
    pub per_page: Option<u32>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct OrgCreateArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Clone, Debug, Args)]
pub struct OrgEditArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}
