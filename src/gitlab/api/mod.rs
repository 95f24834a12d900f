//! Endpoint methods on [`GitLabClient`](super::GitLabClient), one file per
//! resource family. Each method maps to exactly one REST call.

mod approvals;
mod branches;
mod commits;
mod discussions;
mod groups;
mod issues;
mod jobs;
mod merge_requests;
mod notes;
mod pipelines;
mod projects;
mod releases;
mod tags;
mod variables;

use super::RemoteId;

fn project_path(project: &RemoteId) -> String {
    format!("/projects/{}", project.segment())
}

fn group_path(group: &RemoteId) -> String {
    format!("/groups/{}", group.segment())
}

fn mr_path(project: &RemoteId, iid: u64) -> String {
    format!("{}/merge_requests/{}", project_path(project), iid)
}
