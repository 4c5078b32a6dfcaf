use desk_core::Organization;
use desk_org::OrganizationQuery;
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::subcommands::OrgListArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct CurrentResponse {
    organization: Option<Organization>,
}

pub async fn list(args: &OrgListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let query = OrganizationQuery {
        page: Some(args.page.max(1)),
        per_page: Some(args.per_page.unwrap_or(ctx.config.panel.per_page)),
        name: args.name.clone(),
        email: args.email.clone(),
        search: args.search.clone(),
    };
    let page = ctx.orgs.list(&query).await?;

    if flags.format == OutputFormat::Text {
        output(&page.items, flags.format)?;
        if !flags.quiet {
            eprintln!(
                "page {} of {} ({} total)",
                page.current_page, page.last_page, page.total
            );
        }
        return Ok(());
    }
    output(&page, flags.format)
}

pub async fn search(
    query: &str,
    limit: u32,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let found = ctx.orgs.search(query, limit).await?;
    output(&found, flags.format)
}

pub async fn current(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let organization = ctx.auth.user_organization().await?;
    output(&CurrentResponse { organization }, flags.format)
}
