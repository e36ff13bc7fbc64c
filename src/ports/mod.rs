mod git;
mod github;
mod secret_sealer;

pub use git::GitPort;
pub use github::GitHubPort;
pub use secret_sealer::SecretSealer;
