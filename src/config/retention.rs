// ABOUTME: Archive retention policy applied after successful extraction.
// ABOUTME: Supports delete (default) and keep (timestamped rename).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    /// Remove the uploaded archive once extraction succeeds.
    #[default]
    Delete,
    /// Rename the archive with a timestamp suffix and leave it in place.
    Keep,
}

impl RetentionPolicy {
    /// Map the caller's "keep archive" flag onto a policy.
    pub fn from_keep_flag(keep: bool) -> Self {
        if keep {
            RetentionPolicy::Keep
        } else {
            RetentionPolicy::Delete
        }
    }
}
