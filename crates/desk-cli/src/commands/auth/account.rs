use std::path::Path;

use anyhow::Context;
use desk_auth::{AVATAR_FIELD, EmailVerification, PasswordChange, PasswordReset, ProfileUpdate};
use desk_http::FileUpload;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{AuthPasswordChangeArgs, AuthPasswordResetArgs, AuthProfileArgs};
use crate::context::AppContext;
use crate::output::output;
use crate::prompt::value_or_prompt;

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

impl From<String> for MessageResponse {
    fn from(message: String) -> Self {
        Self { message }
    }
}

pub async fn profile(
    args: &AuthProfileArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if args.name.is_none() && args.email.is_none() {
        anyhow::bail!("nothing to update: pass --name and/or --email");
    }
    let update = ProfileUpdate {
        name: args.name.clone(),
        email: args.email.clone(),
    };
    let user = ctx.auth.update_profile(&update).await?;
    output(&user, flags.format)
}

pub async fn change_password(
    args: &AuthPasswordChangeArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let current_password = value_or_prompt(args.current.as_deref(), "Current password")?;
    let password = value_or_prompt(args.new.as_deref(), "New password")?;
    let change = PasswordChange {
        current_password,
        password_confirmation: password.clone(),
        password,
    };
    let message = ctx.auth.change_password(&change).await?;
    output(&MessageResponse::from(message), flags.format)
}

pub async fn forgot_password(
    email: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let message = ctx.auth.request_password_reset(email).await?;
    output(&MessageResponse::from(message), flags.format)
}

pub async fn reset_password(
    args: &AuthPasswordResetArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let password = value_or_prompt(args.password.as_deref(), "New password")?;
    let reset = PasswordReset {
        token: args.token.clone(),
        email: args.email.clone(),
        password_confirmation: password.clone(),
        password,
    };
    let message = ctx.auth.reset_password(&reset).await?;
    output(&MessageResponse::from(message), flags.format)
}

pub async fn verify_email(
    token: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let verification = EmailVerification {
        token: token.to_string(),
    };
    let message = ctx.auth.verify_email(&verification).await?;
    output(&MessageResponse::from(message), flags.format)
}

pub async fn resend_verification(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let message = ctx.auth.resend_email_verification().await?;
    output(&MessageResponse::from(message), flags.format)
}

pub async fn avatar(path: &Path, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let file = FileUpload::read(AVATAR_FIELD, path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let user = ctx.auth.upload_avatar(file).await?;
    output(&user, flags.format)
}
