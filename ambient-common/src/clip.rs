//! Audio clip descriptors
//!
//! The controller never touches sample data. A clip is a name the host audio
//! layer can resolve plus the clip's length, which drives intro and manual
//! loop scheduling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Cheap-to-clone handle to an audio clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Name (or path) the host audio layer resolves
    pub name: Arc<str>,

    /// Clip length in seconds
    pub length: f32,
}

impl Clip {
    pub fn new(name: impl Into<Arc<str>>, length: f32) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.name, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_from_toml() {
        let clip: Clip = toml::from_str("name = \"wind\"\nlength = 12.5").unwrap();
        assert_eq!(clip, Clip::new("wind", 12.5));
        assert_eq!(clip.to_string(), "wind (12.50s)");
    }
}
