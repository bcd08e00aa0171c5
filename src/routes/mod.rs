//! Page routing module
//!
//! Pages are resolved through an explicit table built once at startup.

pub mod sitemap;
pub mod table;

pub use sitemap::render_sitemap;
pub use table::{default_routes, Page, RouteMatch, RoutePattern, RouteTable};
