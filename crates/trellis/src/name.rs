//! Widget names and slash-separated widget paths.

use std::fmt;

use convert_case::{Case, Casing};

use crate::error::{Error, Result};

/// A widget name: lowercase ASCII alphanumerics and underscores. Names are
/// used for diagnostics and path lookups, and need not be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetName(String);

/// Is `c` allowed in a widget name?
fn name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

impl WidgetName {
    /// Munge an arbitrary string into a name: snake case, invalid characters
    /// dropped, falling back to `widget` when nothing survives.
    pub fn convert(raw: &str) -> Self {
        let snake: String = raw
            .to_case(Case::Snake)
            .chars()
            .filter(|c| name_char(*c))
            .collect();
        if snake.is_empty() {
            Self("widget".into())
        } else {
            Self(snake)
        }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for WidgetName {
    type Error = Error;

    fn try_from(raw: &str) -> Result<Self> {
        if raw.is_empty() || !raw.chars().all(name_char) {
            return Err(Error::InvalidOperation(format!("invalid widget name: {raw:?}")));
        }
        Ok(Self(raw.to_string()))
    }
}

impl fmt::Display for WidgetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for WidgetName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A path of widget names from some root, written `a/b/c`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetPath(Vec<WidgetName>);

impl WidgetPath {
    /// Parse a slash-separated path. Empty components are ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        raw.split('/')
            .filter(|part| !part.is_empty())
            .map(WidgetName::try_from)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// Path components.
    pub fn components(&self) -> &[WidgetName] {
        &self.0
    }

    /// Append a component.
    pub fn push(&mut self, name: WidgetName) {
        self.0.push(name);
    }
}

impl fmt::Display for WidgetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.0.iter().map(WidgetName::as_str).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert() {
        assert_eq!(WidgetName::convert("OkButton"), "ok_button");
        assert_eq!(WidgetName::convert("Ok Button!"), "ok_button");
        assert_eq!(WidgetName::convert("???"), "widget");
    }

    #[test]
    fn strict_names() {
        assert!(WidgetName::try_from("panel_2").is_ok());
        assert!(WidgetName::try_from("Panel").is_err());
        assert!(WidgetName::try_from("").is_err());
    }

    #[test]
    fn paths() -> Result<()> {
        let p = WidgetPath::parse("/menu//ok_button")?;
        assert_eq!(p.components().len(), 2);
        assert_eq!(p.to_string(), "/menu/ok_button");
        assert!(WidgetPath::parse("menu/Bad").is_err());
        Ok(())
    }
}
