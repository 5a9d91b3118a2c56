use std::fmt;

/// Slash-separated address of a folder or leaf, starting with the panel title.
///
/// Keys such as `Segments.Width` contain dots, so `/` separates segments:
/// `Planet/Geometry/Ocean/Segments.Width`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlPath(Vec<String>);

impl ControlPath {
    pub const SEPARATOR: char = '/';

    /// Path of a panel root.
    pub fn root(title: &str) -> Self {
        Self(vec![title.to_string()])
    }

    /// Split a `/`-separated string. Empty segments are dropped.
    pub fn parse(path: &str) -> Self {
        Self(
            path.split(Self::SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The panel title, i.e. the first segment.
    pub fn panel(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Segments below the panel root.
    pub fn within_panel(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    /// The last segment.
    pub fn key(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn parent(&self) -> Option<Self> {
        match self.0.len() {
            0 => None,
            n => Some(Self(self.0[..n - 1].to_vec())),
        }
    }

    pub fn starts_with(&self, prefix: &ControlPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ControlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", Self::SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<&str> for ControlPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<&ControlPath> for ControlPath {
    fn from(path: &ControlPath) -> Self {
        path.clone()
    }
}
