use crate::config::Config;
use crate::models::TreeNode;

/// Expand a leaf category path into the list view path segment
///
/// `sport/region/league` gets `/all`, `sport/region` gets `/all/all`,
/// anything else is used as is.
pub fn full_path(path: &str) -> String {
    match path.split('/').count() {
        3 => format!("{}/all", path),
        2 => format!("{}/all/all", path),
        _ => path.to_string(),
    }
}

/// Event list URL for a leaf category path
pub fn list_view_url(config: &Config, path: &str) -> String {
    format!(
        "{}{}/listView/{}/matches.json?lang={}&market={}&useCombined=true",
        config.base_url,
        config.offering,
        full_path(path),
        config.language,
        config.market
    )
}

/// Walk the category tree depth first and collect an event list URL for
/// every leaf category. Duplicates are kept.
pub fn collect_leaf_urls(root: &TreeNode, config: &Config) -> Vec<String> {
    let mut urls = Vec::new();
    collect_into(root, config, &mut urls);
    urls
}

fn collect_into(node: &TreeNode, config: &Config, urls: &mut Vec<String>) {
    match node {
        TreeNode::Group(items) => {
            for item in items {
                collect_into(item, config, urls);
            }
        }
        TreeNode::Category(category) => {
            if let Some(path) = category.leaf_path() {
                urls.push(list_view_url(config, path));
            }
            // A leaf can still hold nested sub-groups
            for child in &category.children {
                collect_into(child, config, urls);
            }
        }
    }
}
