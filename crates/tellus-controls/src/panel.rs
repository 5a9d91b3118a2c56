use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde_json::Value;

use crate::{ControlError, ControlNode, ControlPath, ControlTree, ControlValue, HexColor};

/// One titled panel built from one JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    pub title: String,
    pub tree: ControlTree,
}

impl ControlPanel {
    /// Build a panel from a parsed document.
    ///
    /// Function markers in value position are evaluated with a thread-local
    /// RNG. Use [`ControlPanel::from_json_with_rng`] for reproducible output.
    pub fn from_json(title: &str, json: &Value) -> Result<Self, ControlError> {
        Self::from_json_with_rng(title, json, &mut rand::thread_rng())
    }

    pub fn from_json_with_rng<R: Rng + ?Sized>(
        title: &str,
        json: &Value,
        rng: &mut R,
    ) -> Result<Self, ControlError> {
        let Value::Object(root) = json else {
            return Err(ControlError::RootNotObject {
                title: title.to_string(),
            });
        };

        let tree = ControlTree::from_object(root, &ControlPath::root(title), rng);
        tracing::debug!(title, controls = tree.leaves(&ControlPath::root(title)).len(), "built control panel");
        Ok(Self {
            title: title.to_string(),
            tree,
        })
    }

    /// Build a panel from JSON text.
    pub fn parse(title: &str, text: &str) -> Result<Self, ControlError> {
        Self::parse_with_rng(title, text, &mut rand::thread_rng())
    }

    pub fn parse_with_rng<R: Rng + ?Sized>(
        title: &str,
        text: &str,
        rng: &mut R,
    ) -> Result<Self, ControlError> {
        let json: Value = serde_json::from_str(text)?;
        Self::from_json_with_rng(title, &json, rng)
    }

    pub fn root(&self) -> ControlPath {
        ControlPath::root(&self.title)
    }
}

/// A value edit at `path`, carrying the new value.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlChange {
    pub path: ControlPath,
    pub value: ControlValue,
}

/// Every panel of the application, addressed by title.
///
/// This is the live parameter state: widgets and setters write into it, and
/// the application reads current values back through the typed accessors.
#[derive(Debug)]
pub struct ControlPanels {
    pub(crate) panels: Vec<ControlPanel>,
    pending: Vec<ControlChange>,
    pub(crate) rng: Xoshiro256StarStar,
}

impl Default for ControlPanels {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPanels {
    /// Empty panels with an entropy-seeded RNG for function markers.
    pub fn new() -> Self {
        Self::from_rng(Xoshiro256StarStar::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Xoshiro256StarStar::seed_from_u64(seed))
    }

    fn from_rng(rng: Xoshiro256StarStar) -> Self {
        Self {
            panels: Vec::new(),
            pending: Vec::new(),
            rng,
        }
    }

    /// Add an already built panel. Titles must be unique.
    pub fn add(&mut self, panel: ControlPanel) -> Result<(), ControlError> {
        if self.panel(&panel.title).is_some() {
            return Err(ControlError::DuplicatePanel(panel.title));
        }
        tracing::info!(title = %panel.title, "added control panel");
        self.panels.push(panel);
        Ok(())
    }

    pub fn add_json(&mut self, title: &str, json: &Value) -> Result<(), ControlError> {
        let panel = ControlPanel::from_json_with_rng(title, json, &mut self.rng)?;
        self.add(panel)
    }

    pub fn add_json_str(&mut self, title: &str, text: &str) -> Result<(), ControlError> {
        let panel = ControlPanel::parse_with_rng(title, text, &mut self.rng)?;
        self.add(panel)
    }

    pub fn panel(&self, title: &str) -> Option<&ControlPanel> {
        self.panels.iter().find(|p| p.title == title)
    }

    pub fn panels(&self) -> &[ControlPanel] {
        &self.panels
    }

    pub fn node(&self, path: impl Into<ControlPath>) -> Option<&ControlNode> {
        let path = path.into();
        self.panel(path.panel()?)?.tree.node(path.within_panel())
    }

    /// The folder at `path`. A bare panel title names the panel's root.
    pub fn folder(&self, path: impl Into<ControlPath>) -> Result<&ControlTree, ControlError> {
        let path = path.into();
        let panel = path
            .panel()
            .and_then(|title| self.panel(title))
            .ok_or_else(|| ControlError::Missing(path.clone()))?;

        if path.within_panel().is_empty() {
            return Ok(&panel.tree);
        }
        match panel.tree.node(path.within_panel()) {
            Some(ControlNode::Folder(tree)) => Ok(tree),
            Some(ControlNode::Leaf(value)) => Err(ControlError::WrongKind {
                path,
                expected: "a folder",
                found: value.kind(),
            }),
            None => Err(ControlError::Missing(path)),
        }
    }

    /// The leaf at `path`.
    pub fn value(&self, path: impl Into<ControlPath>) -> Result<&ControlValue, ControlError> {
        let path = path.into();
        match self.node(&path) {
            Some(ControlNode::Leaf(value)) => Ok(value),
            Some(ControlNode::Folder(_)) => Err(ControlError::WrongKind {
                path,
                expected: "a value",
                found: "a folder",
            }),
            None => Err(ControlError::Missing(path)),
        }
    }

    /// The controller handle for the leaf at `path`, for registering listeners.
    pub fn controller(&self, path: impl Into<ControlPath>) -> Result<ControlPath, ControlError> {
        let path = path.into();
        self.value(&path)?;
        Ok(path)
    }

    pub fn number(&self, path: impl Into<ControlPath>) -> Result<f64, ControlError> {
        self.typed(path.into(), "a number", ControlValue::as_number)
    }

    pub fn boolean(&self, path: impl Into<ControlPath>) -> Result<bool, ControlError> {
        self.typed(path.into(), "a boolean", ControlValue::as_bool)
    }

    pub fn text(&self, path: impl Into<ControlPath>) -> Result<String, ControlError> {
        self.typed(path.into(), "text", |v| v.as_text().map(str::to_string))
    }

    pub fn color(&self, path: impl Into<ControlPath>) -> Result<HexColor, ControlError> {
        self.typed(path.into(), "a colour", ControlValue::as_color)
    }

    /// The JSON value of the selected option.
    pub fn choice(&self, path: impl Into<ControlPath>) -> Result<Value, ControlError> {
        self.typed(path.into(), "a choice", |v| {
            v.as_choice().map(|option| option.value.clone())
        })
    }

    fn typed<T>(
        &self,
        path: ControlPath,
        expected: &'static str,
        read: impl FnOnce(&ControlValue) -> Option<T>,
    ) -> Result<T, ControlError> {
        let value = self.value(&path)?;
        read(value).ok_or_else(|| ControlError::WrongKind {
            found: value.kind(),
            path,
            expected,
        })
    }

    /// Set a number, constrained to its range, and queue the change.
    pub fn set_number(&mut self, path: impl Into<ControlPath>, value: f64) -> Result<(), ControlError> {
        self.update(path.into(), "a number", |current| match current {
            ControlValue::Number { value: v, range } => {
                *v = range.constrain(value);
                true
            }
            _ => false,
        })
    }

    pub fn set_bool(&mut self, path: impl Into<ControlPath>, value: bool) -> Result<(), ControlError> {
        self.update(path.into(), "a boolean", |current| match current {
            ControlValue::Bool(b) => {
                *b = value;
                true
            }
            _ => false,
        })
    }

    pub fn set_text(&mut self, path: impl Into<ControlPath>, value: &str) -> Result<(), ControlError> {
        self.update(path.into(), "text", |current| match current {
            ControlValue::Text(s) => {
                *s = value.to_string();
                true
            }
            _ => false,
        })
    }

    pub fn set_color(&mut self, path: impl Into<ControlPath>, value: HexColor) -> Result<(), ControlError> {
        self.update(path.into(), "a colour", |current| match current {
            ControlValue::Color(c) => {
                *c = value;
                true
            }
            _ => false,
        })
    }

    /// Select a choice option by index. Out-of-range indices are clamped to
    /// the last option.
    pub fn set_choice(&mut self, path: impl Into<ControlPath>, index: usize) -> Result<(), ControlError> {
        self.update(path.into(), "a choice", |current| match current {
            ControlValue::Choice { selected, options } => {
                *selected = index.min(options.len().saturating_sub(1));
                true
            }
            _ => false,
        })
    }

    /// Press a function button: invoke it and queue the change with its result.
    pub fn press(&mut self, path: impl Into<ControlPath>) -> Result<String, ControlError> {
        let path = path.into();
        let mut result = String::new();
        let rng = &mut self.rng;
        let panels = &mut self.panels;
        let pending = &mut self.pending;
        apply(panels, pending, path, "a function", |current| match current {
            ControlValue::Function { function, last_result } => {
                result = function.invoke(rng);
                *last_result = Some(result.clone());
                true
            }
            _ => false,
        })?;
        Ok(result)
    }

    fn update(
        &mut self,
        path: ControlPath,
        expected: &'static str,
        write: impl FnOnce(&mut ControlValue) -> bool,
    ) -> Result<(), ControlError> {
        apply(&mut self.panels, &mut self.pending, path, expected, write)
    }

    /// Drain changes queued by the setters.
    pub fn take_changes(&mut self) -> Vec<ControlChange> {
        std::mem::take(&mut self.pending)
    }
}

fn apply(
    panels: &mut [ControlPanel],
    pending: &mut Vec<ControlChange>,
    path: ControlPath,
    expected: &'static str,
    write: impl FnOnce(&mut ControlValue) -> bool,
) -> Result<(), ControlError> {
    let node = path
        .panel()
        .and_then(|title| panels.iter_mut().find(|p| p.title == title))
        .and_then(|panel| panel.tree.node_mut(path.within_panel()));

    let value = match node {
        Some(ControlNode::Leaf(value)) => value,
        Some(ControlNode::Folder(_)) => {
            return Err(ControlError::WrongKind {
                path,
                expected,
                found: "a folder",
            });
        }
        None => return Err(ControlError::Missing(path)),
    };

    if !write(value) {
        return Err(ControlError::WrongKind {
            found: value.kind(),
            path,
            expected,
        });
    }

    pending.push(ControlChange {
        value: value.clone(),
        path,
    });
    Ok(())
}
