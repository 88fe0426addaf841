// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bushing check API endpoint module
//!
//! Provides POST /cek_bushing for classifying a bushing photo by URL.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::cek_bushing_handler;
pub use request::CekBushingRequest;
pub use response::{BushingStatus, CekBushingResponse};
