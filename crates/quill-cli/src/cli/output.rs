//! Plain-text rendering of store contents.

use comfy_table::{ContentArrangement, Table};
use quill_core::models::{Comment, Pagination, Post, User};
use quill_core::present::{EXCERPT_CHARS, excerpt, format_date};

const TABLE_WIDTH: u16 = 120;

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_width(TABLE_WIDTH);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

pub fn posts_table(posts: &[Post]) -> Table {
    let mut table = table(&["ID", "Title", "Author", "Tags", "Likes", "Comments", "Date"]);
    for post in posts {
        table.add_row(vec![
            post.id.clone(),
            post.title.clone(),
            post.author.name.clone(),
            post.tags.join(", "),
            post.like_count.to_string(),
            post.comment_count.to_string(),
            format_date(post.created_at),
        ]);
    }
    table
}

pub fn users_table(users: &[User]) -> Table {
    let mut table = table(&["ID", "Name", "Email"]);
    for user in users {
        table.add_row(vec![user.id.clone(), user.name.clone(), user.email.clone()]);
    }
    table
}

pub fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts found.");
    } else {
        println!("{}", posts_table(posts));
    }
}

pub fn pagination_line(pagination: &Pagination, noun: &str) -> String {
    format!(
        "Page {} of {} ({} {noun})",
        pagination.page,
        pagination.pages.max(1),
        pagination.total
    )
}

pub fn post_details(post: &Post) -> String {
    let mut out = String::new();
    out.push_str(&post.title);
    out.push('\n');

    let mut meta = vec![format!("by {}", post.author.name)];
    let date = format_date(post.created_at);
    if !date.is_empty() {
        meta.push(date);
    }
    if let Some(status) = &post.status {
        meta.push(status.clone());
    }
    meta.push(format!("{} likes", post.like_count));
    meta.push(format!("{} comments", post.comment_count));
    if post.liked == Some(true) {
        meta.push("liked".to_string());
    }
    out.push_str(&meta.join(" · "));
    out.push('\n');

    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|t| format!("#{t}")).collect();
        out.push_str(&tags.join(" "));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&post.content);
    out.push('\n');
    out
}

/// One line per comment, replies indented under their parent.
pub fn comment_lines(tree: &[Comment]) -> Vec<String> {
    let mut lines = Vec::new();
    push_comments(&mut lines, tree, 0);
    lines
}

fn push_comments(lines: &mut Vec<String>, tree: &[Comment], depth: usize) {
    for comment in tree {
        lines.push(format!(
            "{}[{}] {} ({} likes): {}",
            "  ".repeat(depth),
            comment.id,
            comment.author.name,
            comment.like_count,
            excerpt(&comment.content.replace('\n', " "), EXCERPT_CHARS)
        ));
        push_comments(lines, &comment.replies, depth + 1);
    }
}

pub fn print_comments(tree: &[Comment]) {
    if tree.is_empty() {
        println!("No comments yet.");
        return;
    }
    for line in comment_lines(tree) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str, replies: Vec<Comment>) -> Comment {
        Comment {
            id: id.into(),
            content: format!("text {id}"),
            author: User {
                name: "Ada".into(),
                ..User::default()
            },
            replies,
            ..Comment::default()
        }
    }

    #[test]
    fn test_comment_lines_indent_replies() {
        let tree = vec![comment("c1", vec![comment("c2", vec![])]), comment("c3", vec![])];
        assert_eq!(
            comment_lines(&tree),
            vec![
                "[c1] Ada (0 likes): text c1",
                "  [c2] Ada (0 likes): text c2",
                "[c3] Ada (0 likes): text c3",
            ]
        );
    }

    #[test]
    fn test_post_details_lists_tags_and_counts() {
        let post = Post {
            title: "Hello".into(),
            content: "Body".into(),
            tags: vec!["rust".into(), "tui".into()],
            like_count: 3,
            liked: Some(true),
            author: User {
                name: "Ada".into(),
                ..User::default()
            },
            ..Post::default()
        };
        let details = post_details(&post);
        assert!(details.starts_with("Hello\nby Ada · 3 likes · 0 comments · liked\n"));
        assert!(details.contains("#rust #tui"));
        assert!(details.ends_with("\nBody\n"));
    }

    #[test]
    fn test_posts_table_has_a_row_per_post() {
        let posts = vec![
            Post {
                id: "p1".into(),
                title: "First".into(),
                ..Post::default()
            },
            Post {
                id: "p2".into(),
                title: "Second".into(),
                ..Post::default()
            },
        ];
        let rendered = posts_table(&posts).to_string();
        assert!(rendered.contains("First"));
        assert!(rendered.contains("p2"));
    }

    #[test]
    fn test_pagination_line() {
        let pagination = Pagination {
            total: 25,
            page: 2,
            limit: 10,
            pages: 3,
        };
        assert_eq!(pagination_line(&pagination, "posts"), "Page 2 of 3 (25 posts)");
    }
}
