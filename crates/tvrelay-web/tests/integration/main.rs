/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Integration tests for the relay web service.
//!
//! Tests touching the database are `#[ignore]`d; run them with
//! `DATABASE_URL` set and `--ignored`.

#[path = "../fixtures.rs"]
mod fixtures;

mod api;
mod dal;
