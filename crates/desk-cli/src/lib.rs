//! # desk-cli
//!
//! The `desk` binary plus the organization management panel it drives. The
//! panel is a library module so it can be embedded and tested without a
//! terminal.

pub mod panel;
