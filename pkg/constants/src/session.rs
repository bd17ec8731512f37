//! AgenticSession resource identity constants.

/// API group/version of the AgenticSession resource, used when building
/// owner references on replicated secrets.
pub const SESSION_API_VERSION: &str = "sessions.agentic.dev/v1alpha1";

/// Kind of the AgenticSession resource.
pub const SESSION_KIND: &str = "AgenticSession";
