//! Landing page catalog.

use serde::{Deserialize, Serialize};

/// A tool advertised on the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFeature {
    pub title: String,
    pub description: String,
    pub href: String,
}

impl SiteFeature {
    fn new(title: &str, description: &str, href: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            href: href.to_string(),
        }
    }
}

pub fn features() -> Vec<SiteFeature> {
    vec![
        SiteFeature::new(
            "AI Chat",
            "Intelligent conversations powered by advanced AI technology",
            "/chat",
        ),
        SiteFeature::new(
            "Code Reviewer",
            "Smart code analysis and optimization suggestions",
            "/code-reviewer",
        ),
        SiteFeature::new(
            "Blog",
            "Insights, tutorials, and the latest in tech innovation",
            "/blog",
        ),
        SiteFeature::new(
            "About",
            "Learn more about our mission and technology",
            "/about",
        ),
    ]
}
