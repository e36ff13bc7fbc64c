mod fake_git;
mod fake_github;

pub use fake_git::FakeGit;
pub use fake_github::{FakeGitHub, FakeSealer};
