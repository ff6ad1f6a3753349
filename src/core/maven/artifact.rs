use std::fmt;

use crate::core::error::{MetaError, MetaResult};

/// A parsed library coordinate.
///
/// Supported formats:
///   `groupId:artifactId:version`
///   `groupId:artifactId:version:classifier`
///   either of the above with an `@extension` suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MavenArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    /// File extension. Defaults to `"jar"`.
    pub extension: String,
}

impl MavenArtifact {
    pub fn parse(coord: &str) -> MetaResult<Self> {
        let invalid = || MetaError::InvalidCoordinate(coord.to_string());

        let (body, extension) = match coord.rsplit_once('@') {
            Some((body, ext)) if !ext.is_empty() => (body, ext),
            Some(_) => return Err(invalid()),
            None => (coord, "jar"),
        };

        let parts: Vec<&str> = body.split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid());
        }

        let classifier = match parts.len() {
            3 => None,
            4 => Some(parts[3].to_string()),
            _ => return Err(invalid()),
        };

        Ok(Self {
            group_id: parts[0].to_string(),
            artifact_id: parts[1].to_string(),
            version: parts[2].to_string(),
            classifier,
            extension: extension.to_string(),
        })
    }

    /// `artifactId-version[-classifier].extension`
    pub fn filename(&self) -> String {
        match &self.classifier {
            Some(c) => format!("{}-{}-{}.{}", self.artifact_id, self.version, c, self.extension),
            None => format!("{}-{}.{}", self.artifact_id, self.version, self.extension),
        }
    }

    /// `<group/path>/<artifactId>/<version>/<filename>` with `/` separators.
    pub fn repository_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version,
            self.filename()
        )
    }
}

impl fmt::Display for MavenArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{}", c)?;
        }
        if self.extension != "jar" {
            write!(f, "@{}", self.extension)?;
        }
        Ok(())
    }
}
