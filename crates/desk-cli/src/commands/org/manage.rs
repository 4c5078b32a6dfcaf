//! Commands that drive the organization panel: one panel per invocation,
//! banner and card printed at the end.

use desk_cli::panel::{Banner, OrgCard, OrgPanel};
use desk_core::Id;
use desk_org::OrganizationService;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{OrgCreateArgs, OrgEditArgs};
use crate::context::AppContext;
use crate::output::output;
use crate::prompt::confirm;

#[derive(Serialize)]
struct PanelReport<'a> {
    banner: Option<&'a Banner>,
    card: Option<&'a OrgCard>,
}

fn open(ctx: &AppContext) -> OrgPanel<&OrganizationService> {
    OrgPanel::new(&ctx.orgs, ctx.banner_ttl()).with_viewer(ctx.auth.cached_user())
}

/// Print the panel state. An error banner fails the command.
fn report(panel: &OrgPanel<&OrganizationService>, flags: &GlobalFlags) -> anyhow::Result<()> {
    let banner = panel.banner();
    if let Some(banner) = banner.filter(|banner| banner.is_error()) {
        anyhow::bail!("{}", banner.text);
    }
    output(
        &PanelReport {
            banner,
            card: panel.card(),
        },
        flags.format,
    )
}

pub async fn show(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut panel = open(ctx);
    panel.load(&Id::from(id)).await;
    report(&panel, flags)
}

pub async fn create(
    args: &OrgCreateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut panel = open(ctx);
    panel.begin_create();
    if let Some(form) = panel.create_form_mut() {
        form.name.clone_from(&args.name);
        form.email.clone_from(&args.email);
        form.address.clone_from(&args.address);
        form.phone.clone_from(&args.phone);
    }
    panel.submit_create().await;
    report(&panel, flags)
}

pub async fn edit(args: &OrgEditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut panel = open(ctx);
    if !panel.load(&Id::from(args.id.as_str())).await {
        return report(&panel, flags);
    }

    panel.begin_edit();
    if let Some(form) = panel.edit_form_mut() {
        for (slot, value) in [
            (&mut form.name, &args.name),
            (&mut form.email, &args.email),
            (&mut form.address, &args.address),
            (&mut form.phone, &args.phone),
        ] {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
    }
    panel.save_edit().await;
    report(&panel, flags)
}

pub async fn delete(
    id: &str,
    yes: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut panel = open(ctx);
    if !panel.load(&Id::from(id)).await || !panel.request_delete() {
        return report(&panel, flags);
    }

    let name = panel
        .card()
        .map(|card| card.organization.name.clone())
        .unwrap_or_default();
    if !yes && !confirm(&format!("Delete organization \"{name}\" ({id})?"))? {
        panel.cancel_delete();
        if !flags.quiet {
            eprintln!("Delete cancelled");
        }
        return Ok(());
    }

    panel.confirm_delete().await;
    report(&panel, flags)
}
