/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Database models and schema shared by the web service and the worker.

pub mod models;
pub mod schema;
