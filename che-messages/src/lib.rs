//! che-messages
//!
//! Centralized message catalog for the che directory tool.
//! Every user-facing string lives here as a static template so wording
//! stays in one place; templates use `{variable}` placeholders rendered
//! by the `MessageBuilder` through the `msg!` macro.

pub mod builder;
pub mod macros;
pub mod messages;
