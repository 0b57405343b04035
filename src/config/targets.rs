use anyhow::{Result, bail};

/// One configured scraping target: which site, which category page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTarget {
    pub site_name: String,
    pub category_name: String,
    pub category_url: String,
}

/// Load pipe-separated `site|category|url` rows from a targets file.
pub fn load_targets(path: &str) -> Result<Vec<CategoryTarget>> {
    let content = std::fs::read_to_string(path)?;
    parse_targets(&content)
}

pub fn parse_targets(content: &str) -> Result<Vec<CategoryTarget>> {
    let mut targets = Vec::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.splitn(3, '|');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(site), Some(category), Some(url)) => targets.push(CategoryTarget {
                site_name: site.trim().to_string(),
                category_name: category.trim().to_string(),
                category_url: url.trim().to_string(),
            }),
            _ => bail!(
                "invalid target on line {}: expected 'site|category|url'",
                lineno + 1
            ),
        }
    }

    Ok(targets)
}
