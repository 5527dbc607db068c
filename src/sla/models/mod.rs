mod comment;
mod event;
mod issue;

pub use comment::Comment;
pub use event::LabelEvent;
pub use issue::{Issue, IssueState, Label, RepoRef};
