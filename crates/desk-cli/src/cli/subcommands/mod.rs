mod auth;
mod org;

pub use auth::{
    AuthCommands, AuthLoginArgs, AuthPasswordChangeArgs, AuthPasswordResetArgs, AuthProfileArgs,
    AuthRegisterArgs,
};
pub use org::{OrgCommands, OrgCreateArgs, OrgEditArgs, OrgListArgs};
