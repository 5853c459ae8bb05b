// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Certificate synchronization: decode, compare, write and notify.

pub mod command;
pub mod engine;
pub mod extract;
pub mod files;

pub use engine::{run_cycle, SyncOutcome};
pub use extract::{decode_bundle, CertBundle};
