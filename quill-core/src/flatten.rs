//! Row flattening for `posts ⋈ post_tags ⋈ tags`
//!
//! A left join yields one row per (post, tag) pair and a single row with
//! null tag columns for an untagged post. These functions fold such rows
//! back into nested [`Post`] values:
//!
//! - posts come out in order of first appearance
//! - each post appears once, its tags in encounter order without duplicates
//! - an untagged post appears with `tags = []`

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::{PageRequest, Post, PostTagRow, TagId};

/// Insertion-ordered accumulator keyed by post id.
#[derive(Default)]
struct PostAccumulator {
    posts: Vec<Post>,
    index: HashMap<Uuid, usize>,
    seen_tags: HashSet<(Uuid, TagId)>,
}

impl PostAccumulator {
    fn contains(&self, post_id: &Uuid) -> bool {
        self.index.contains_key(post_id)
    }

    fn len(&self) -> usize {
        self.posts.len()
    }

    /// Materialize the post on first sight, then record the row's tag.
    fn push(&mut self, row: &PostTagRow) {
        let slot = match self.index.get(&row.post_id) {
            Some(&slot) => slot,
            None => {
                self.posts.push(row.to_post());
                self.index.insert(row.post_id, self.posts.len() - 1);
                self.posts.len() - 1
            }
        };

        if let Some(tag) = row.tag() {
            if self.seen_tags.insert((row.post_id, tag.id)) {
                self.posts[slot].tags.push(tag);
            }
        }
    }

    fn finish(self) -> Vec<Post> {
        self.posts
    }
}

/// Fold joined rows into posts with nested tags.
pub fn flatten_rows<'a, I>(rows: I) -> Vec<Post>
where
    I: IntoIterator<Item = &'a PostTagRow>,
{
    let mut acc = PostAccumulator::default();
    for row in rows {
        acc.push(row);
    }
    acc.finish()
}

/// Fold joined rows into one page of posts.
///
/// Only posts created strictly after the page cursor are eligible, and at
/// most `page.limit()` distinct posts are kept. The limit counts posts, not
/// rows: tag rows of an admitted post are still collected after the limit
/// has been reached.
pub fn flatten_page<'a, I>(rows: I, page: &PageRequest) -> Vec<Post>
where
    I: IntoIterator<Item = &'a PostTagRow>,
{
    let limit = page.limit() as usize;
    let mut acc = PostAccumulator::default();

    for row in rows {
        if !page.admits(row.created_at) {
            continue;
        }
        if !acc.contains(&row.post_id) && acc.len() >= limit {
            continue;
        }
        acc.push(row);
    }

    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn row(post: u128, created: i64, tag: Option<(TagId, &str)>) -> PostTagRow {
        PostTagRow {
            post_id: Uuid::from_u128(post),
            title: format!("post {post}"),
            content: "body".into(),
            category: "notes".into(),
            created_at: at(created),
            updated_at: at(created),
            tag_id: tag.map(|(id, _)| id),
            tag_name: tag.map(|(_, name)| name.to_owned()),
        }
    }

    fn ids(posts: &[Post]) -> Vec<Uuid> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn groups_tags_by_post_in_first_seen_order() {
        let rows = vec![
            row(2, 0, Some((1, "go"))),
            row(1, 1, Some((2, "rust"))),
            row(2, 0, Some((3, "sql"))),
            row(1, 1, None),
        ];

        let posts = flatten_rows(&rows);

        assert_eq!(ids(&posts), vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
        assert_eq!(posts[0].tags, vec![Tag::new(1, "go"), Tag::new(3, "sql")]);
        assert_eq!(posts[1].tags, vec![Tag::new(2, "rust")]);
    }

    #[test]
    fn untagged_post_appears_once_with_empty_tags() {
        let rows = vec![row(7, 0, None)];
        let posts = flatten_rows(&rows);
        assert_eq!(posts.len(), 1);
        assert!(posts[0].tags.is_empty());
    }

    #[test]
    fn duplicate_tag_rows_collapse() {
        let rows = vec![
            row(1, 0, Some((5, "go"))),
            row(1, 0, Some((5, "go"))),
        ];
        let posts = flatten_rows(&rows);
        assert_eq!(posts[0].tags, vec![Tag::new(5, "go")]);
    }

    #[test]
    fn empty_input_yields_no_posts() {
        assert!(flatten_rows(&Vec::<PostTagRow>::new()).is_empty());
    }

    #[test]
    fn page_limit_counts_posts_not_rows() {
        // three posts t1 < t2 < t3, each with several tag rows
        let rows = vec![
            row(1, 1, Some((1, "go"))),
            row(1, 1, Some((2, "rust"))),
            row(1, 1, Some((3, "sql"))),
            row(2, 2, Some((1, "go"))),
            row(2, 2, Some((4, "web"))),
            row(3, 3, Some((2, "rust"))),
        ];

        let posts = flatten_page(&rows, &PageRequest::new(None, 2));

        assert_eq!(ids(&posts), vec![Uuid::from_u128(1), Uuid::from_u128(2)]);
        assert_eq!(posts[0].tags.len(), 3);
        assert_eq!(posts[1].tags.len(), 2);
    }

    #[test]
    fn page_keeps_late_tag_rows_of_admitted_posts() {
        let rows = vec![
            row(1, 1, Some((1, "go"))),
            row(2, 2, None),
            row(1, 1, Some((2, "rust"))),
        ];

        let posts = flatten_page(&rows, &PageRequest::new(None, 1));

        assert_eq!(ids(&posts), vec![Uuid::from_u128(1)]);
        assert_eq!(posts[0].tags, vec![Tag::new(1, "go"), Tag::new(2, "rust")]);
    }

    #[test]
    fn zero_limit_yields_empty_page() {
        let rows = vec![row(1, 1, Some((1, "go"))), row(2, 2, None), row(3, 3, None)];
        let page = PageRequest::from_args(None, Some(0)).unwrap();
        assert!(flatten_page(&rows, &page).is_empty());
    }

    #[test]
    fn page_cursor_is_strictly_after() {
        let rows = vec![row(1, 1, None), row(2, 2, None), row(3, 3, None)];

        let posts = flatten_page(&rows, &PageRequest::new(Some(at(1)), 10));
        assert_eq!(ids(&posts), vec![Uuid::from_u128(2), Uuid::from_u128(3)]);

        let posts = flatten_page(&rows, &PageRequest::new(Some(at(3)), 10));
        assert!(posts.is_empty());
    }
}
