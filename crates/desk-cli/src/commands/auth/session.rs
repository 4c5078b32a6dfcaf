use desk_auth::{Credentials, Registration};
use desk_core::User;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{AuthLoginArgs, AuthRegisterArgs};
use crate::context::AppContext;
use crate::output::output;
use crate::prompt::value_or_prompt;

#[derive(Serialize)]
struct SignedInResponse {
    signed_in: bool,
    first_time_login: bool,
    user: Option<User>,
}

#[derive(Serialize)]
struct LogoutResponse {
    cleared: bool,
}

#[derive(Serialize)]
struct StatusResponse {
    authenticated: bool,
    backend: &'static str,
    user: Option<String>,
    first_time_login: bool,
    has_refresh_token: bool,
    expires_at: Option<String>,
}

#[derive(Serialize)]
struct RefreshResponse {
    refreshed: bool,
    expires_at: Option<String>,
}

pub async fn login(
    args: &AuthLoginArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let password = value_or_prompt(args.password.as_deref(), "Password")?;
    let session = ctx
        .auth
        .login(&Credentials::new(args.email.clone(), password))
        .await?;
    output(
        &SignedInResponse {
            signed_in: true,
            first_time_login: session.first_time_login,
            user: session.user,
        },
        flags.format,
    )
}

pub async fn register(
    args: &AuthRegisterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let password = value_or_prompt(args.password.as_deref(), "Password")?;
    let registration = Registration {
        name: args.name.clone(),
        email: args.email.clone(),
        password_confirmation: password.clone(),
        password,
        organisation_name: args.organisation.clone(),
    };
    let session = ctx.auth.register(&registration).await?;
    output(
        &SignedInResponse {
            signed_in: true,
            first_time_login: session.first_time_login,
            user: session.user,
        },
        flags.format,
    )
}

pub async fn logout(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.auth.logout().await?;
    output(&LogoutResponse { cleared: true }, flags.format)
}

pub fn status(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let expires_at = ctx
        .session
        .token()
        .and_then(|token| desk_session::decode_expiry(&token).ok())
        .map(|at| at.to_rfc3339());
    let status = StatusResponse {
        authenticated: ctx.auth.is_authenticated(),
        backend: ctx.session.backend_name(),
        user: ctx.auth.cached_user().map(|user| user.email),
        first_time_login: ctx.auth.is_first_time_login(),
        has_refresh_token: ctx.session.refresh_token().is_some(),
        expires_at,
    };
    output(&status, flags.format)
}

pub async fn me(fresh: bool, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let user = if fresh {
        ctx.auth.fetch_user().await?
    } else {
        ctx.auth.current_user().await?
    };
    output(&user, flags.format)
}

pub async fn refresh(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.auth.refresh_token().await?;
    let expires_at = desk_session::decode_expiry(&session.token)
        .ok()
        .map(|at| at.to_rfc3339());
    output(
        &RefreshResponse {
            refreshed: true,
            expires_at,
        },
        flags.format,
    )
}
