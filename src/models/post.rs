//! Blog post model

use serde::{Deserialize, Serialize};

/// A published blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Sequence id, assigned by the database
    pub sno: i64,
    pub title: String,
    pub tagline: String,
    /// Public lookup key; not guaranteed unique
    pub slug: String,
    pub content: String,
    /// Publication timestamp
    pub date: String,
    /// Filename in the upload directory
    pub img_file: String,
}

impl Post {
    /// Build an unsaved post from form input
    pub fn new(input: PostInput, date: String) -> Self {
        Self {
            sno: 0,
            title: input.title,
            tagline: input.tagline,
            slug: input.slug,
            content: input.content,
            date,
            img_file: input.img_file,
        }
    }

    /// Overwrite the editable fields, keeping id and date
    pub fn apply(&mut self, input: PostInput) {
        self.title = input.title;
        self.tagline = input.tagline;
        self.slug = input.slug;
        self.content = input.content;
        self.img_file = input.img_file;
    }
}

/// Fields submitted by the post editor
///
/// Missing fields are coerced to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "tline")]
    pub tagline: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub img_file: String,
    #[serde(default)]
    pub content: String,
}
