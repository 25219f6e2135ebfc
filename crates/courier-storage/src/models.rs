// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types live in `courier-core::types` so they can cross the
//! trait seams. This module re-exports them for convenience within the
//! storage crate.

pub use courier_core::types::{ChatRole, Message, User};
