use crate::ports::{GitHubPort, GitPort, SecretSealer};

/// Application context holding the ports a batch run talks through.
pub struct AppContext<H: GitHubPort, G: GitPort, S: SecretSealer> {
    github: H,
    git: G,
    sealer: S,
}

impl<H: GitHubPort, G: GitPort, S: SecretSealer> AppContext<H, G, S> {
    /// Create a new application context.
    pub fn new(github: H, git: G, sealer: S) -> Self {
        Self { github, git, sealer }
    }

    /// Remote repository API.
    pub fn github(&self) -> &H {
        &self.github
    }

    /// Local version-control commands.
    pub fn git(&self) -> &G {
        &self.git
    }

    pub fn sealer(&self) -> &S {
        &self.sealer
    }
}
