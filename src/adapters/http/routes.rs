//! Axum router for the SecurePay endpoints.
//!
//! The host mounts this wherever its URL scheme wants it, e.g.
//!
//! ```ignore
//! let app = Router::new()
//!     .nest("/securepay", securepay_routes())
//!     .with_state(state);
//! ```

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{handle_callback, handle_redirect, CallbackAppState};

/// Create the SecurePay endpoint router.
///
/// # Routes
///
/// - `POST /callback` - server-to-server payment status (signature verified)
/// - `GET /redirect` - customer browser return (classification only)
pub fn securepay_routes() -> Router<CallbackAppState> {
    Router::new()
        .route("/callback", post(handle_callback))
        .route("/redirect", get(handle_redirect))
}
