use super::error::MarshalError;
use super::SEPARATOR;

/// A parsed `name[,expand][,omitempty]` field annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    pub expand: bool,
    pub omit_empty: bool,
}

impl<'a> Tag<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, MarshalError> {
        let mut parts = raw.split(',');
        let name = parts.next().unwrap_or_default().trim();

        let mut tag = Tag {
            name,
            expand: false,
            omit_empty: false,
        };

        for option in parts {
            match option.trim() {
                "expand" => tag.expand = true,
                "omitempty" => tag.omit_empty = true,
                "" => {}
                other => {
                    return Err(MarshalError::InvalidTag {
                        tag: raw.to_string(),
                        reason: format!("unknown option {other:?}"),
                    });
                }
            }
        }

        if name.contains(SEPARATOR) {
            return Err(MarshalError::ReservedName {
                name: name.to_string(),
            });
        }

        Ok(tag)
    }

    /// `-` always skips; an empty name skips unless the member is inlined with `expand`.
    pub fn is_skipped(&self) -> bool {
        self.name == "-" || (self.name.is_empty() && !self.expand)
    }

    pub fn key(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.name)
    }

    pub fn child_prefix(&self, prefix: &str) -> String {
        if self.name.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix}{}{SEPARATOR}", self.name)
        }
    }
}
