mod browse;
mod manage;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::OrgCommands;
use crate::context::AppContext;

/// Handle `desk org <subcommand>`.
pub async fn handle(
    action: &OrgCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        OrgCommands::List(args) => browse::list(args, ctx, flags).await,
        OrgCommands::Search { query, limit } => browse::search(query, *limit, ctx, flags).await,
        OrgCommands::Current => browse::current(ctx, flags).await,
        OrgCommands::Show { id } => manage::show(id, ctx, flags).await,
        OrgCommands::Create(args) => manage::create(args, ctx, flags).await,
        OrgCommands::Edit(args) => manage::edit(args, ctx, flags).await,
        OrgCommands::Delete { id, yes } => manage::delete(id, *yes, ctx, flags).await,
    }
}
