mod account;
mod session;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;

/// Handle `desk auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => session::login(args, ctx, flags).await,
        AuthCommands::Register(args) => session::register(args, ctx, flags).await,
        AuthCommands::Logout => session::logout(ctx, flags).await,
        AuthCommands::Status => session::status(ctx, flags),
        AuthCommands::Me { fresh } => session::me(*fresh, ctx, flags).await,
        AuthCommands::Refresh => session::refresh(ctx, flags).await,
        AuthCommands::Profile(args) => account::profile(args, ctx, flags).await,
        AuthCommands::PasswordChange(args) => account::change_password(args, ctx, flags).await,
        AuthCommands::PasswordForgot { email } => account::forgot_password(email, ctx, flags).await,
        AuthCommands::PasswordReset(args) => account::reset_password(args, ctx, flags).await,
        AuthCommands::VerifyEmail { token } => account::verify_email(token, ctx, flags).await,
        AuthCommands::ResendVerification => account::resend_verification(ctx, flags).await,
        AuthCommands::Avatar { path } => account::avatar(path, ctx, flags).await,
    }
}
