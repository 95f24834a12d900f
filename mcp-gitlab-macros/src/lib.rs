//! Procedural macros for mcp-gitlab
//!
//! This crate provides the `#[gitlab_tool]` attribute macro for defining GitLab MCP tools
//! with minimal boilerplate.

use darling::{FromMeta, ast::NestedMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{DeriveInput, parse_macro_input};

/// Arguments for the `#[gitlab_tool]` attribute
#[derive(Debug, FromMeta)]
struct GitLabToolArgs {
    /// Tool name as exposed over MCP (e.g., "gitlab_create_branch")
    name: String,
    /// Tool description for MCP
    description: String,
    /// Tool category (one per GitLab resource family)
    category: String,
    /// Operation type: "read", "write", "delete", or "execute"
    operation: String,
    /// Repeating the call with the same arguments leaves the remote unchanged
    #[darling(default)]
    idempotent: Option<bool>,
}

/// Attribute macro for GitLab MCP tools.
///
/// This macro generates:
/// - `ToolInfo` trait implementation (name, description, category, operation_type, idempotent)
/// - Automatically adds `#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]`
/// - An `inventory` registration so the tool is picked up by `ToolRegistry::register_all_auto`
///
/// # Example
///
/// ```ignore
/// #[gitlab_tool(
///     name = "gitlab_create_branch",
///     description = "Create a new branch",
///     category = "branches",
///     operation = "write"
/// )]
/// pub struct CreateBranch {
///     /// Project ID or path
///     pub project_id: RemoteId,
///     /// New branch name
///     pub branch_name: String,
///     /// Source branch or commit SHA
///     #[serde(rename = "ref")]
///     pub ref_name: String,
/// }
///
/// #[async_trait]
/// impl ToolExecutor for CreateBranch {
///     async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
///         // Your implementation here
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn gitlab_tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.to_compile_error()),
    };

    let args = match GitLabToolArgs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    let input = parse_macro_input!(item as DeriveInput);
    let expanded = impl_gitlab_tool(&args, &input);

    TokenStream::from(expanded)
}

fn impl_gitlab_tool(args: &GitLabToolArgs, input: &DeriveInput) -> TokenStream2 {
    let struct_name = &input.ident;
    let tool_name = &args.name;
    let description = &args.description;

    if !tool_name.starts_with("gitlab_") {
        return syn::Error::new_spanned(
            input,
            format!("Tool name must start with 'gitlab_': {}", tool_name),
        )
        .to_compile_error();
    }

    let category_variant = match args.category.as_str() {
        "projects" => quote! { crate::access_control::ToolCategory::Projects },
        "approvals" => quote! { crate::access_control::ToolCategory::Approvals },
        "groups" => quote! { crate::access_control::ToolCategory::Groups },
        "branches" => quote! { crate::access_control::ToolCategory::Branches },
        "commits" => quote! { crate::access_control::ToolCategory::Commits },
        "merge_requests" => quote! { crate::access_control::ToolCategory::MergeRequests },
        "mr_notes" => quote! { crate::access_control::ToolCategory::MrNotes },
        "mr_discussions" => quote! { crate::access_control::ToolCategory::MrDiscussions },
        "pipelines" => quote! { crate::access_control::ToolCategory::Pipelines },
        "jobs" => quote! { crate::access_control::ToolCategory::Jobs },
        "tags" => quote! { crate::access_control::ToolCategory::Tags },
        "releases" => quote! { crate::access_control::ToolCategory::Releases },
        "variables" => quote! { crate::access_control::ToolCategory::Variables },
        "issues" => quote! { crate::access_control::ToolCategory::Issues },
        other => {
            return syn::Error::new_spanned(input, format!("Unknown category: {}", other))
                .to_compile_error();
        }
    };

    let operation_variant = match args.operation.as_str() {
        "read" => quote! { crate::access_control::OperationType::Read },
        "write" => quote! { crate::access_control::OperationType::Write },
        "delete" => quote! { crate::access_control::OperationType::Delete },
        "execute" => quote! { crate::access_control::OperationType::Execute },
        other => {
            return syn::Error::new_spanned(
                input,
                format!("Unknown operation: {}. Use: read, write, delete, or execute", other),
            )
            .to_compile_error();
        }
    };

    // Reads are idempotent unless stated otherwise; writes only when declared.
    let idempotent = args
        .idempotent
        .unwrap_or(args.operation.as_str() == "read");

    let vis = &input.vis;
    let attrs: Vec<_> = input.attrs.iter().collect();
    let generics = &input.generics;

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    input,
                    "gitlab_tool only supports structs with named fields",
                )
                .to_compile_error();
            }
        },
        _ => {
            return syn::Error::new_spanned(input, "gitlab_tool only supports structs")
                .to_compile_error();
        }
    };

    let register_fn = format_ident!("__register_{}", struct_name);

    quote! {
        #(#attrs)*
        #[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
        #vis struct #struct_name #generics {
            #fields
        }

        impl crate::tools::ToolInfo for #struct_name {
            fn name() -> &'static str {
                #tool_name
            }

            fn description() -> &'static str {
                #description
            }

            fn category() -> crate::access_control::ToolCategory {
                #category_variant
            }

            fn operation_type() -> crate::access_control::OperationType {
                #operation_variant
            }

            fn idempotent() -> bool {
                #idempotent
            }
        }

        #[allow(non_snake_case)]
        fn #register_fn(registry: &mut crate::tools::ToolRegistry) {
            registry.register::<#struct_name>();
        }

        ::inventory::submit! {
            crate::tools::registry::ToolRegistration {
                register_fn: #register_fn,
            }
        }
    }
}
