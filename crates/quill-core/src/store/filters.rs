//! Client-side post filtering.

use serde::{Deserialize, Serialize};

use crate::models::Post;

/// Filters applied to the full post list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveFilters {
    /// A post must carry every selected tag.
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub search_query: String,
}

impl ActiveFilters {
    pub fn is_active(&self) -> bool {
        !self.tags.is_empty() || self.author.is_some() || !self.search_query.trim().is_empty()
    }

    pub fn matches(&self, post: &Post) -> bool {
        has_all_tags(post, &self.tags)
            && self
                .author
                .as_deref()
                .is_none_or(|author| post.author.id == author)
            && matches_search(post, &self.search_query)
    }

    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        posts.iter().filter(|p| self.matches(p)).cloned().collect()
    }

    /// Adds `tag` to the selection, or removes it if already selected.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(index) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(index);
        } else {
            self.tags.push(tag.to_string());
        }
    }
}

/// Case-insensitive substring match over title, content and tags.
pub fn matches_search(post: &Post, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    post.title.to_lowercase().contains(&query)
        || post.content.to_lowercase().contains(&query)
        || post.tags.iter().any(|t| t.to_lowercase().contains(&query))
}

pub fn has_all_tags(post: &Post, tags: &[String]) -> bool {
    tags.iter().all(|tag| post.tags.contains(tag))
}

/// Unique tags in first-seen order.
pub fn available_tags(posts: &[Post]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in posts.iter().flat_map(|p| &p.tags) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn post(id: &str, title: &str, tags: &[&str], author: &str) -> Post {
        Post {
            id: id.into(),
            title: title.into(),
            content: format!("About {title}"),
            tags: tags.iter().map(ToString::to_string).collect(),
            author: User {
                id: author.into(),
                ..User::default()
            },
            ..Post::default()
        }
    }

    fn sample() -> Vec<Post> {
        vec![
            post("1", "Primes", &["math", "number-theory"], "u1"),
            post("2", "Pendulums", &["physics"], "u2"),
            post("3", "Segment trees", &["math", "cp"], "u1"),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_over_tags() {
        let posts = sample();
        assert!(matches_search(&posts[0], "PRIMES"));
        assert!(matches_search(&posts[1], "phys"));
        assert!(matches_search(&posts[2], "about segment"));
        assert!(!matches_search(&posts[1], "graph"));
        assert!(matches_search(&posts[1], "   "));
    }

    #[test]
    fn test_tag_selection_intersects() {
        let posts = sample();
        let mut filters = ActiveFilters::default();
        filters.toggle_tag("math");
        let ids: Vec<_> = filters.apply(&posts).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["1", "3"]);

        filters.toggle_tag("cp");
        let ids: Vec<_> = filters.apply(&posts).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["3"]);

        filters.toggle_tag("math");
        filters.toggle_tag("cp");
        assert!(!filters.is_active());
        assert_eq!(filters.apply(&posts).len(), 3);
    }

    #[test]
    fn test_combined_filters() {
        let filters = ActiveFilters {
            tags: vec!["math".into()],
            author: Some("u1".into()),
            search_query: "tree".into(),
        };
        let ids: Vec<_> = filters.apply(&sample()).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn test_available_tags_keep_first_seen_order() {
        assert_eq!(
            available_tags(&sample()),
            vec!["math", "number-theory", "physics", "cp"]
        );
    }
}
