//! Story records and the append-only story sequence.

use serde::Serialize;
use storyreel_core::blob::BlobRef;
use storyreel_core::error::DomainError;

/// Label shown for a story whose title is blank.
#[must_use]
pub fn fallback_label(index: usize) -> String {
    format!("Story {}", index + 1)
}

/// One uploaded image with its optional title.
///
/// A story has no identifier of its own; its position in the
/// [`StoryStore`] is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    title: String,
    image: BlobRef,
}

impl Story {
    /// Creates a story. The title is kept verbatim, empty or not.
    #[must_use]
    pub fn new(title: impl Into<String>, image: BlobRef) -> Self {
        Self {
            title: title.into(),
            image,
        }
    }

    /// The title as uploaded.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Reference to the story image.
    #[must_use]
    pub fn image(&self) -> BlobRef {
        self.image
    }

    /// Display label for the story at `index`: the title, or
    /// `"Story {index + 1}"` when the title is empty.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        if self.title.is_empty() {
            fallback_label(index)
        } else {
            self.title.clone()
        }
    }
}

/// Ordered, append-only story sequence. Insertion order is display order.
#[derive(Debug, Clone, Default)]
pub struct StoryStore {
    stories: Vec<Story>,
}

impl StoryStore {
    /// Creates an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a story built from `title` and `image`, returning its index.
    pub fn append(&mut self, title: impl Into<String>, image: BlobRef) -> usize {
        self.push(Story::new(title, image))
    }

    /// Appends an existing story, returning its index.
    pub fn push(&mut self, story: Story) -> usize {
        self.stories.push(story);
        self.stories.len() - 1
    }

    /// Returns the story at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoryNotFound` if `index` is past the end.
    pub fn get(&self, index: usize) -> Result<&Story, DomainError> {
        self.stories
            .get(index)
            .ok_or(DomainError::StoryNotFound(index))
    }

    /// Number of stories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    /// Returns `true` when no story has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Index of the last story, if any.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.stories.len().checked_sub(1)
    }

    /// Checks that `index` addresses an existing story.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` when it does not.
    pub fn check_index(&self, index: usize) -> Result<usize, DomainError> {
        if index < self.stories.len() {
            Ok(index)
        } else {
            Err(DomainError::OutOfRange {
                index,
                len: self.stories.len(),
            })
        }
    }

    /// Iterates stories with their indices, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Story)> {
        self.stories.iter().enumerate()
    }
}
