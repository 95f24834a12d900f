//! GitLab API parameter types
//!
//! Closed value sets the REST API defines, so callers get a schema with an
//! `enum` instead of a free-form string.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub items: Vec<Value>,
    /// From the `X-Total` header; GitLab omits it for very large collections
    pub total: Option<u64>,
    /// Items on earlier pages, from `X-Page` and `X-Per-Page`
    pub offset: u64,
}

/// Declare a string enum with `as_str()` matching its wire form.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                Value::String(value.as_str().to_string())
            }
        }
    };
}

wire_enum!(
    /// Project visibility
    Visibility {
        Private => "private",
        Internal => "internal",
        Public => "public",
    }
);

wire_enum!(
    /// Squash behaviour offered on merge requests
    SquashOption {
        Never => "never",
        Always => "always",
        DefaultOn => "default_on",
        DefaultOff => "default_off",
    }
);

wire_enum!(
    /// Project merge method
    MergeMethod {
        Merge => "merge",
        RebaseMerge => "rebase_merge",
        /// Fast-forward only
        FastForward => "ff",
    }
);

wire_enum!(
    /// Merge request state filter
    MergeRequestState {
        Opened => "opened",
        Closed => "closed",
        Merged => "merged",
        All => "all",
    }
);

wire_enum!(
    /// Merge request scope filter
    MergeRequestScope {
        CreatedByMe => "created_by_me",
        AssignedToMe => "assigned_to_me",
        All => "all",
    }
);

wire_enum!(
    /// Issue state filter
    IssueState {
        Opened => "opened",
        Closed => "closed",
        All => "all",
    }
);

wire_enum!(
    /// State transition for merge requests and issues
    StateEvent {
        Close => "close",
        Reopen => "reopen",
    }
);

wire_enum!(
    /// Action kinds accepted by the commits API
    CommitActionKind {
        Create => "create",
        Delete => "delete",
        Move => "move",
        Update => "update",
        Chmod => "chmod",
    }
);

wire_enum!(
    /// CI/CD variable type
    VariableType {
        EnvVar => "env_var",
        File => "file",
    }
);

wire_enum!(
    /// Tag ordering
    TagOrderBy {
        Name => "name",
        Updated => "updated",
        Version => "version",
    }
);

wire_enum!(
    SortOrder {
        Asc => "asc",
        Desc => "desc",
    }
);

wire_enum!(
    /// Which side of the diff a line range refers to
    LineType {
        New => "new",
        Old => "old",
    }
);

wire_enum!(
    /// Pipeline status filter
    PipelineStatus {
        Created => "created",
        WaitingForResource => "waiting_for_resource",
        Preparing => "preparing",
        Pending => "pending",
        Running => "running",
        Success => "success",
        Failed => "failed",
        Canceled => "canceled",
        Skipped => "skipped",
        Manual => "manual",
        Scheduled => "scheduled",
    }
);

/// Role granted when sharing a project or group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Guest,
    Reporter,
    Developer,
    Maintainer,
    Owner,
}

impl AccessLevel {
    pub const NAMES: &'static str = "guest, reporter, developer, maintainer, owner";

    /// Numeric level GitLab expects in `group_access`
    pub fn value(&self) -> u64 {
        match self {
            AccessLevel::Guest => 10,
            AccessLevel::Reporter => 20,
            AccessLevel::Developer => 30,
            AccessLevel::Maintainer => 40,
            AccessLevel::Owner => 50,
        }
    }

    pub fn from_name(name: &str) -> Result<Self, String> {
        match name.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(AccessLevel::Guest),
            "reporter" => Ok(AccessLevel::Reporter),
            "developer" => Ok(AccessLevel::Developer),
            "maintainer" => Ok(AccessLevel::Maintainer),
            "owner" => Ok(AccessLevel::Owner),
            _ => Err(format!("Invalid access level: {}. Use: {}", name, Self::NAMES)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names() {
        assert_eq!(MergeMethod::FastForward.as_str(), "ff");
        assert_eq!(
            serde_json::to_value(MergeRequestScope::AssignedToMe).unwrap(),
            json!("assigned_to_me")
        );
        let state: MergeRequestState = serde_json::from_value(json!("merged")).unwrap();
        assert_eq!(state, MergeRequestState::Merged);
        assert!(serde_json::from_value::<MergeRequestState>(json!("draft")).is_err());
    }

    #[test]
    fn test_access_levels() {
        assert_eq!(AccessLevel::from_name("developer").unwrap().value(), 30);
        assert_eq!(AccessLevel::from_name("Owner").unwrap().value(), 50);
        let err = AccessLevel::from_name("admin").unwrap_err();
        assert!(err.starts_with("Invalid access level: admin. Use: guest"));
    }
}
