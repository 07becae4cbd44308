//! HTTP server layer for the web toolbox.
//!
//! This module provides the routes, handlers, and server-rendered pages.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │   pages  /  /tools/{tool}      APIs  /api/v1/*                  │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │   pages     │  │  handlers   │  │        routes           │  │
//! │  │ (rendering) │  │ (requests)  │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod pages;
pub mod routes;

pub use handlers::{
    health_handler, home_handler, not_found_handler, optimize_image_handler, ping_handler,
    scan_usernames_handler, tool_page_handler, tool_redirect_handler, AppState, ErrorResponse,
    HealthResponse,
};
pub use pages::{find_tool, Tool, TOOLS};
pub use routes::{create_router, RouterConfig};
