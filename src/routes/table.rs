//! Ordered route table mapping locale-less paths to pages

use std::collections::BTreeMap;

use serde::Serialize;

/// Pages served behind the locale proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Landing,
    Home,
    Templates,
    NewTemplate,
    Template,
    Practice,
    Onboarding,
    Login,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Path pattern such as `/templates/:template_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split_segments(pattern)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Patterns without parameters name exactly one path
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    fn captures(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// A successful lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub page: Page,
    pub pattern: String,
    pub params: BTreeMap<String, String>,
}

/// Ordered table of patterns; the first match wins
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(RoutePattern, Page)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route after every existing one
    pub fn route(mut self, pattern: &str, page: Page) -> Self {
        self.routes.push((RoutePattern::parse(pattern), page));
        self
    }

    pub fn lookup(&self, path: &str) -> Option<RouteMatch> {
        self.routes.iter().find_map(|(pattern, page)| {
            pattern.captures(path).map(|params| RouteMatch {
                page: *page,
                pattern: pattern.as_str().to_string(),
                params,
            })
        })
    }

    /// Paths of every parameterless route, in table order
    pub fn static_paths(&self) -> impl Iterator<Item = &str> {
        self.routes
            .iter()
            .filter(|(pattern, _)| pattern.is_static())
            .map(|(pattern, _)| pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// The application's pages
pub fn default_routes() -> RouteTable {
    RouteTable::new()
        .route("/", Page::Landing)
        .route("/home", Page::Home)
        .route("/templates", Page::Templates)
        .route("/templates/new", Page::NewTemplate)
        .route("/templates/:template_id", Page::Template)
        .route("/practice/:template_id", Page::Practice)
        .route("/onboarding", Page::Onboarding)
        .route("/login", Page::Login)
}
