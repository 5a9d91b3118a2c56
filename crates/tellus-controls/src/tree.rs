//! The ordered control tree and the JSON walk that builds it.

use rand::Rng;
use serde_json::{Map, Value};

use crate::value::{ChoiceOption, NumberRange};
use crate::{AllowedFunction, ControlPath, ControlValue, HexColor, parse_marker};

/// Literal bound to a button key whose function is not on the allow-list.
const UNDEFINED_FUNCTION: &str = "undefined";

/// A folder or a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlNode {
    Folder(ControlTree),
    Leaf(ControlValue),
}

impl ControlNode {
    pub fn as_folder(&self) -> Option<&ControlTree> {
        match self {
            Self::Folder(tree) => Some(tree),
            Self::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&ControlValue> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Folder(_) => None,
        }
    }
}

/// Folder contents in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControlTree {
    entries: Vec<(String, ControlNode)>,
}

impl ControlTree {
    /// Walk a JSON object. `path` is the address of the object itself and is
    /// only used for log lines.
    pub fn from_object<R: Rng + ?Sized>(
        object: &Map<String, Value>,
        path: &ControlPath,
        rng: &mut R,
    ) -> Self {
        let mut entries = Vec::with_capacity(object.len());

        for (key, value) in object {
            let child = path.child(key);
            match value {
                Value::Object(inner) => {
                    entries.push((
                        key.clone(),
                        ControlNode::Folder(Self::from_object(inner, &child, rng)),
                    ));
                }
                _ => match parse_leaf(key, value, &child, rng) {
                    Some(leaf) => entries.push((key.clone(), ControlNode::Leaf(leaf))),
                    None => tracing::debug!(path = %child, "skipping unsupported control value"),
                },
            }
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ControlNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut ControlNode)> {
        self.entries.iter_mut().map(|(key, node)| (key.as_str(), node))
    }

    pub fn get(&self, key: &str) -> Option<&ControlNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, node)| node)
    }

    pub fn folder(&self, key: &str) -> Option<&ControlTree> {
        self.get(key).and_then(ControlNode::as_folder)
    }

    pub fn leaf(&self, key: &str) -> Option<&ControlValue> {
        self.get(key).and_then(ControlNode::as_leaf)
    }

    /// Descend through `segments`. An empty slice has no node.
    pub fn node(&self, segments: &[String]) -> Option<&ControlNode> {
        let (first, rest) = segments.split_first()?;
        let node = self.get(first)?;
        if rest.is_empty() {
            return Some(node);
        }
        node.as_folder()?.node(rest)
    }

    pub fn node_mut(&mut self, segments: &[String]) -> Option<&mut ControlNode> {
        let (first, rest) = segments.split_first()?;
        let node = self
            .entries
            .iter_mut()
            .find(|(k, _)| k == first)
            .map(|(_, node)| node)?;
        if rest.is_empty() {
            return Some(node);
        }
        match node {
            ControlNode::Folder(tree) => tree.node_mut(rest),
            ControlNode::Leaf(_) => None,
        }
    }

    /// Every leaf below this tree with its full path, depth first.
    pub fn leaves(&self, root: &ControlPath) -> Vec<(ControlPath, &ControlValue)> {
        let mut out = Vec::new();
        self.collect_leaves(root, &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, at: &ControlPath, out: &mut Vec<(ControlPath, &'a ControlValue)>) {
        for (key, node) in &self.entries {
            let path = at.child(key);
            match node {
                ControlNode::Folder(tree) => tree.collect_leaves(&path, out),
                ControlNode::Leaf(value) => out.push((path, value)),
            }
        }
    }
}

fn parse_leaf<R: Rng + ?Sized>(
    key: &str,
    value: &Value,
    path: &ControlPath,
    rng: &mut R,
) -> Option<ControlValue> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::Bool(b) => Some(ControlValue::Bool(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(|v| ControlValue::number(v, NumberRange::UNBOUNDED)),
        Value::Array(items) => parse_array(items),
        Value::String(s) => parse_string(key, s, path, rng),
    }
}

fn parse_string<R: Rng + ?Sized>(
    key: &str,
    s: &str,
    path: &ControlPath,
    rng: &mut R,
) -> Option<ControlValue> {
    let Some(name) = parse_marker(s) else {
        return Some(string_value(s, path));
    };

    let function = AllowedFunction::from_name(name);
    if key.contains("()") {
        return Some(match function {
            Some(function) => ControlValue::Function {
                function,
                last_result: None,
            },
            None => ControlValue::Text(UNDEFINED_FUNCTION.to_string()),
        });
    }

    match function {
        Some(function) => {
            let result = function.invoke(rng);
            tracing::debug!(path = %path, function = name, %result, "bound function result");
            Some(string_value(&result, path))
        }
        None => {
            tracing::warn!(path = %path, function = name, "function is not on the allow-list");
            None
        }
    }
}

fn string_value(s: &str, path: &ControlPath) -> ControlValue {
    if s.starts_with('#') {
        match s.parse::<HexColor>() {
            Ok(color) => return ControlValue::Color(color),
            Err(e) => tracing::debug!(path = %path, "{e}, binding as text"),
        }
    }
    ControlValue::Text(s.to_string())
}

/// `[v]`, `[v, min]`, `[v, min, max]`, `[v, min, max, step]`, `[v, [options]]`
/// or `[v, {label: value}]`. Anything else is unsupported.
fn parse_array(items: &[Value]) -> Option<ControlValue> {
    let (first, rest) = items.split_first()?;

    match rest {
        [Value::Array(options)] => choice_from_list(first, options),
        [Value::Object(options)] => choice_from_map(first, options),
        _ => {
            let value = first.as_f64()?;
            let bounds = rest.iter().map(Value::as_f64).collect::<Option<Vec<_>>>()?;
            let range = match bounds.as_slice() {
                [] => NumberRange::UNBOUNDED,
                [min] => NumberRange {
                    min: Some(*min),
                    ..NumberRange::UNBOUNDED
                },
                [min, max] if min <= max => NumberRange::bounded(*min, *max, None),
                [min, max, step] if min <= max => {
                    NumberRange::bounded(*min, *max, Some(*step).filter(|s| *s > 0.0))
                }
                _ => return None,
            };
            Some(ControlValue::number(value, range))
        }
    }
}

fn choice_from_list(current: &Value, options: &[Value]) -> Option<ControlValue> {
    let options = options
        .iter()
        .filter_map(|value| {
            let label = scalar_label(value)?;
            Some(ChoiceOption {
                label,
                value: value.clone(),
            })
        })
        .collect::<Vec<_>>();
    choice(current, options)
}

fn choice_from_map(current: &Value, options: &Map<String, Value>) -> Option<ControlValue> {
    let options = options
        .iter()
        .filter(|(_, value)| scalar_label(value).is_some())
        .map(|(label, value)| ChoiceOption {
            label: label.clone(),
            value: value.clone(),
        })
        .collect::<Vec<_>>();
    choice(current, options)
}

fn choice(current: &Value, options: Vec<ChoiceOption>) -> Option<ControlValue> {
    if options.is_empty() {
        return None;
    }
    let selected = options
        .iter()
        .position(|option| json_eq(&option.value, current))
        .unwrap_or(0);
    Some(ControlValue::Choice { selected, options })
}

fn scalar_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Equality that treats `1` and `1.0` as the same number.
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}
