pub mod git_command;
pub mod github_http;
pub mod sealed_box;

pub use git_command::GitCommandAdapter;
pub use github_http::HttpGitHubClient;
pub use sealed_box::SealedBoxSealer;
