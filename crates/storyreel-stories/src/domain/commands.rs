//! Commands for the Stories context.

use storyreel_core::command::Command;
use uuid::Uuid;

/// Command to add an uploaded image as a new story.
#[derive(Clone)]
pub struct AddStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Title typed by the user; may be blank.
    pub title: String,
    /// MIME type of the uploaded file.
    pub content_type: String,
    /// The uploaded file, absent when the user submitted without one.
    pub image: Option<Vec<u8>>,
}

impl std::fmt::Debug for AddStory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddStory")
            .field("correlation_id", &self.correlation_id)
            .field("title", &self.title)
            .field("content_type", &self.content_type)
            .field("image_bytes", &self.image.as_ref().map(Vec::len))
            .finish()
    }
}

impl Command for AddStory {
    fn command_type(&self) -> &'static str {
        "stories.add_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
