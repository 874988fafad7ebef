pub mod history;
pub mod topic;
