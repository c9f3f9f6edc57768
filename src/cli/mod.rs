pub mod orchestration;

pub use orchestration::{
    run_changelog_workflow, run_publish_workflow, ChangelogResult, ChangelogWorkflowArgs,
    PublishResult, PublishWorkflowArgs,
};
