use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Account and session commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password.
    Login(AuthLoginArgs),
    /// Create an account and sign in.
    Register(AuthRegisterArgs),
    /// Sign out and clear the stored session.
    Logout,
    /// Show local session state (no network).
    Status,
    /// Show the signed-in user.
    Me {
        /// Fetch from the server instead of using the cached copy.
        #[arg(long)]
        fresh: bool,
    },
    /// Exchange the stored refresh token for a new access token.
    Refresh,
    /// Update name and/or email.
    Profile(AuthProfileArgs),
    /// Change the password of the signed-in user.
    PasswordChange(AuthPasswordChangeArgs),
    /// Send a password reset email.
    PasswordForgot {
        email: String,
    },
    /// Set a new password using a reset token.
    PasswordReset(AuthPasswordResetArgs),
    /// Confirm an email address with the token from the verification email.
    VerifyEmail {
        token: String,
    },
    /// Send the verification email again.
    ResendVerification,
    /// Upload a new avatar image.
    Avatar {
        path: PathBuf,
    },
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long)]
    pub email: String,
    /// Prompted on stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthRegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// Prompted on stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
    /// Organization to create alongside the account.
    #[arg(long)]
    pub organisation: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthPasswordChangeArgs {
    /// Prompted on stdin when omitted.
    #[arg(long)]
    pub current: Option<String>,
    /// Prompted on stdin when omitted.
    #[arg(long)]
    pub new: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthPasswordResetArgs {
    /// Token from the reset email.
    #[arg(long)]
    pub token: String,
    #[arg(long)]
    pub email: String,
    /// Prompted on stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
}
