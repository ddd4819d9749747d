//! Conversation core and HTTP surface of the SafeGuard safety and legal-help assistant.

// Interdiction stricte de pratiques dangereuses ou non idiomatiques
#![deny(unsafe_code)] // Le code unsafe est interdit
#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)] // Toute API publique doit être documentée
#![warn(dead_code)] // Le code inutilisé est signalé
#![warn(unused_imports)]
#![warn(unused_variables)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(unused_must_use)] // Oblige à gérer explicitement les Result et Option
#![deny(nonstandard_style)]
#![deny(overflowing_literals)]

// Clippy pour stricte discipline
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(clippy::unwrap_used)] // Interdit unwrap()
#![deny(clippy::expect_used)] // Interdit expect()
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)] // Les logs passent par tracing
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![warn(clippy::missing_const_for_fn)]
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::module_inception)]
#![deny(clippy::redundant_clone)]
#![warn(clippy::shadow_unrelated)]
#![deny(clippy::too_many_arguments)]
#![deny(clippy::cognitive_complexity)]
#![allow(clippy::module_name_repetitions)] // `LawyerDirectory` dans `lawyers`, etc.

/// Complaint records and per-user complaint history.
pub mod complaints;
/// Process configuration.
pub mod config;
/// Conversation log, keyword classifier and turn engine.
pub mod conversation;
/// Feature modals that inject messages into a conversation.
pub mod features;
/// User identity documents and the injected session context.
pub mod identity;
/// Lawyer directory lookup with its in-memory fallback.
pub mod lawyers;
/// Client for the external priority-queue service.
pub mod queue;
/// HTTP server and API routes.
#[allow(
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::unused_async
)]
pub mod server;
/// Entry helpers to start the SafeGuard server.
pub mod start_safeguard;

#[cfg(test)]
mod test_support;
