#![allow(dead_code, unused_imports)]

pub(crate) mod git_remote;
pub(crate) mod github_api;

pub(crate) use git_remote::GitRemotes;
pub(crate) use github_api::GitHubApi;
