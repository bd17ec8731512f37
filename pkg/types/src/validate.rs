use anyhow::{Result, bail};

/// Validate a DNS-1123 style resource name (namespaces, secret names).
/// Rules: lowercase `[a-z0-9-]`, 1..=63 chars, must start and end with an
/// alphanumeric character. `kind` names the field in error messages.
pub fn validate_resource_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("{} must not be empty", kind);
    }
    if name.len() > 63 {
        bail!("{} '{}' exceeds 63 characters (got {})", kind, name, name.len());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        bail!(
            "{} '{}' must contain only lowercase letters, digits, and hyphens [a-z0-9-]",
            kind,
            name
        );
    }
    let first = name.as_bytes()[0];
    let last = name.as_bytes()[name.len() - 1];
    if first == b'-' || last == b'-' {
        bail!(
            "{} '{}' must start and end with an alphanumeric character",
            kind,
            name
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(validate_resource_name("namespace", "tenant-a").is_ok());
        assert!(validate_resource_name("namespace", "a").is_ok());
        assert!(validate_resource_name("secret name", "agentic-vertex").is_ok());
        assert!(validate_resource_name("namespace", "ns-123").is_ok());
    }

    #[test]
    fn invalid_names() {
        assert!(validate_resource_name("namespace", "").is_err());
        assert!(validate_resource_name("namespace", "Tenant-A").is_err());
        assert!(validate_resource_name("namespace", "tenant_a").is_err());
        assert!(validate_resource_name("namespace", "-leading").is_err());
        assert!(validate_resource_name("namespace", "trailing-").is_err());
        assert!(validate_resource_name("namespace", &"a".repeat(64)).is_err());
    }
}
