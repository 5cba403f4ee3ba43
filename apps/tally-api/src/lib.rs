//! # Tally API
//!
//! HTTP surface for checkout, sales history and catalog management.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Tally API                                     │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /api/sales    │  │ /api/products  │  │  /health                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • POST checkout│  │ • GET list/one │  │ • database ping            ││
//! │  │ • GET history  │  │ • POST/PUT/DEL │  │                            ││
//! │  │ • GET invoice  │  │   (admin only) │  │                            ││
//! │  └───────┬────────┘  └───────┬────────┘  └────────────────────────────┘│
//! │          │                   │                                          │
//! │          ▼                   ▼                                          │
//! │  ┌──────────────────┐  ┌──────────────────────────────────────────────┐│
//! │  │  SaleProcessor   │  │  tally-db repositories                       ││
//! │  └────────┬─────────┘  └──────────────────────────────────────────────┘│
//! │           └──────────────────────► SQLite ◄────────────────────────────│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]. Everything comes from `TALLY_*` environment
//! variables.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use routes::create_router;
pub use state::AppState;
