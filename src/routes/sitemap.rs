//! Localized sitemap for every static page

use quick_xml::escape::escape;

use super::RouteTable;
use crate::locale::LocaleRouting;

/// Render `sitemap.xml` listing each static page once per locale
pub fn render_sitemap(base_url: &str, routing: &LocaleRouting, routes: &RouteTable) -> String {
    let base_url = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for path in routes.static_paths() {
        for locale in routing.locales() {
            let location = format!("{}{}", base_url, routing.localize(locale, path));
            xml.push_str("  <url><loc>");
            xml.push_str(&escape(location.as_str()));
            xml.push_str("</loc></url>\n");
        }
    }

    xml.push_str("</urlset>\n");
    xml
}
