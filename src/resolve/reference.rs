//! `namespace:name` sound references

use std::fmt;

use crate::error::{Result, SoundpackError};

/// A parsed sound reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoundRef {
    pub namespace: String,
    pub name: String,
}

impl SoundRef {
    /// Parse `namespace:name`; a missing or empty namespace becomes
    /// `default_namespace`.
    pub fn parse(input: &str, default_namespace: &str) -> Result<Self> {
        let (namespace, name) = match input.split_once(':') {
            Some((ns, name)) if !ns.is_empty() => (ns, name),
            Some((_, name)) => (default_namespace, name),
            None => (default_namespace, input),
        };

        if name.is_empty() || name.contains(':') {
            return Err(SoundpackError::InvalidReference {
                reference: input.to_string(),
            });
        }

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.strip_suffix(".ogg").unwrap_or(name).to_string(),
        })
    }

    /// Logical path of the audio file this reference names when it is
    /// not an event
    pub fn sound_path(&self) -> String {
        format!("{}/sounds/{}.ogg", self.namespace, self.name)
    }
}

impl fmt::Display for SoundRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}
