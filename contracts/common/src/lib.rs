//! Shared capability interfaces for the Health Passport contract suite.
//!
//! This crate provides:
//! - [`ContentStore`]: put/get of opaque document bytes behind a content
//!   reference (CID).
//! - [`Ledger`]: submit/evaluate against an external record ledger used to
//!   anchor audit entries.
//!
//! Both traits carry `#[contractclient]`, so a contract holding the address of
//! an implementation talks to it through the generated `ContentStoreClient` /
//! `LedgerClient`. Tests register in-memory fakes at those addresses.

#![no_std]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod content;
pub mod ledger;

pub use content::*;
pub use ledger::*;
