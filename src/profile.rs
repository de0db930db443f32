use crate::select::Selectable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A saved Git identity. `alias` is the label shown in selection lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub alias: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Alias cannot be empty.")]
    EmptyAlias,
    #[error("The alias \"{0}\" is reserved.")]
    ReservedAlias(String),
}

impl Profile {
    pub fn new(alias: String, name: String, email: String) -> Self {
        Self { alias, name, email }
    }

    /// Check a profile built by the add flow before it is saved.
    pub fn validate(&self, protected_label: &str) -> Result<(), ProfileError> {
        if self.alias.is_empty() {
            return Err(ProfileError::EmptyAlias);
        }
        if self.alias == protected_label {
            return Err(ProfileError::ReservedAlias(self.alias.clone()));
        }
        Ok(())
    }

    /// `name (email)`, as used in status messages and list details.
    pub fn identity_line(&self) -> String {
        format!("{} ({})", self.name, self.email)
    }

    pub fn is_protected(&self, protected_label: &str) -> bool {
        self.alias == protected_label
    }
}

impl Selectable for Profile {
    fn label(&self) -> &str {
        &self.alias
    }

    fn detail(&self) -> String {
        self.identity_line()
    }

    fn filter_key(&self) -> &str {
        &self.alias
    }
}

/// One line per profile, `label: name (email)`, in list order.
pub fn format_profile_list(profiles: &[Profile]) -> String {
    if profiles.is_empty() {
        return "No saved accounts.".to_string();
    }
    profiles
        .iter()
        .map(|p| format!("{}: {}", p.alias, p.identity_line()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work() -> Profile {
        Profile::new(
            "Work".to_string(),
            "Bob".to_string(),
            "bob@x.com".to_string(),
        )
    }

    #[test]
    fn test_profile_validation() {
        assert!(work().validate("Default").is_ok());
    }

    #[test]
    fn test_profile_validation_empty_alias() {
        let mut profile = work();
        profile.alias = String::new();
        assert_eq!(profile.validate("Default"), Err(ProfileError::EmptyAlias));
    }

    #[test]
    fn test_profile_validation_whitespace_alias() {
        let mut profile = work();
        profile.alias = " ".to_string();
        assert!(profile.validate("Default").is_ok());
    }

    #[test]
    fn test_profile_validation_reserved_alias() {
        let mut profile = work();
        profile.alias = "Default".to_string();
        assert!(matches!(
            profile.validate("Default"),
            Err(ProfileError::ReservedAlias(_))
        ));
        // case-sensitive
        profile.alias = "default".to_string();
        assert!(profile.validate("Default").is_ok());
    }

    #[test]
    fn test_selectable_fields() {
        let profile = work();
        assert_eq!(profile.label(), "Work");
        assert_eq!(profile.detail(), "Bob (bob@x.com)");
        assert_eq!(profile.filter_key(), "Work");
    }

    #[test]
    fn test_format_profile_list() {
        let profiles = vec![
            Profile::new(
                "Default".to_string(),
                "Ada".to_string(),
                "ada@x.com".to_string(),
            ),
            work(),
        ];
        let message = format_profile_list(&profiles);
        let lines: Vec<_> = message.lines().collect();
        assert_eq!(
            lines,
            vec!["Default: Ada (ada@x.com)", "Work: Bob (bob@x.com)"]
        );
    }

    #[test]
    fn test_format_empty_profile_list() {
        assert_eq!(format_profile_list(&[]), "No saved accounts.");
    }
}
