//! 前端页面路由
//!
//! The HTML entry points are mapped explicitly; everything else under the
//! static root is served by the router fallback.

use std::path::Path;

use axum::Router;
use tower_http::services::ServeFile;

use crate::state::AppState;

/// Pages served by name. `/` maps to `index.html`.
pub const PAGES: [&str; 4] = [
    "/index.html",
    "/login.html",
    "/createprofile.html",
    "/profile.html",
];

pub fn router(static_root: &Path) -> Router<AppState> {
    PAGES.iter().fold(
        Router::new().route_service("/", ServeFile::new(static_root.join("index.html"))),
        |router, page| {
            let file = static_root.join(page.trim_start_matches('/'));
            router.route_service(page, ServeFile::new(file))
        },
    )
}
