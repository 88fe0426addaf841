// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cek_bushing;
pub mod errors;
pub mod http_server;

pub use cek_bushing::{cek_bushing_handler, BushingStatus, CekBushingRequest, CekBushingResponse};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_router, start_server, AppState};
