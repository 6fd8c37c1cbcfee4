//! # HTTP Request Handlers
//!
//! Axum handlers organized by feature domain. Handlers stay thin and delegate to
//! the services in [`crate::services`].
//!
//! ## Handler Modules
//!
//! - **[`token`]**: Token details and chart data
//!   - `POST /api/token/details` - Details for `{"token_address"}`
//!   - `GET /api/token/{address}` - Details, path form
//!   - `GET /api/token/{address}/chart` - Chart data
//!
//! - **[`credentials`]**: Axiom session status
//!   - `GET /api/credentials/status` - Expiry of the current pair
//!   - `POST /api/credentials/refresh` - Force a refresh
//!
//! - **[`tools`]**: Function-calling surface
//!   - `GET /api/tools` - Tool definitions
//!   - `POST /api/tools/call` - Invoke a tool by name
//!
//! ## Error Handling
//!
//! Handlers return `Result<Json<T>, AppError>`; `AppError` renders itself as
//! `{"error": ..., "code": ...}` with the matching status. Upstream failures never
//! reach this layer: a token lookup always answers 200 with a (possibly degraded)
//! record.

pub mod credentials;
pub mod token;
pub mod tools;
