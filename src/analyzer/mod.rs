//! Analysis engine for picking the release to diff against

pub mod tag_resolver;

pub use tag_resolver::{find_previous_tag, TagResolver};
