use serde_json::Value;

use crate::{AllowedFunction, HexColor};

/// Bounds and step of a numeric control.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl NumberRange {
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
        step: None,
    };

    pub fn bounded(min: f64, max: f64, step: Option<f64>) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step,
        }
    }

    /// Snap to the step (if any), then clamp into the bounds.
    pub fn constrain(&self, value: f64) -> f64 {
        let mut value = value;
        if let Some(step) = self.step.filter(|s| *s > 0.0) {
            value = (value / step).round() * step;
        }
        if let Some(min) = self.min {
            value = value.max(min);
        }
        if let Some(max) = self.max {
            value = value.min(max);
        }
        value
    }

    /// Both ends are known, so the value can be drawn as a slider.
    pub fn is_bounded(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }
}

/// One entry of a choice control.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub label: String,
    pub value: Value,
}

/// The widget a value is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    Slider,
    DragValue,
    Checkbox,
    TextField,
    ColorPicker,
    ComboBox,
    Button,
}

/// A typed control leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    Number {
        value: f64,
        range: NumberRange,
    },
    Bool(bool),
    Text(String),
    Color(HexColor),
    Choice {
        selected: usize,
        options: Vec<ChoiceOption>,
    },
    /// A button. `last_result` holds the return value of the latest press.
    Function {
        function: AllowedFunction,
        last_result: Option<String>,
    },
}

impl ControlValue {
    /// A number constrained to `range` from the start.
    pub fn number(value: f64, range: NumberRange) -> Self {
        Self::Number {
            value: range.constrain(value),
            range,
        }
    }

    pub fn widget(&self) -> Widget {
        match self {
            Self::Number { range, .. } if range.is_bounded() => Widget::Slider,
            Self::Number { .. } => Widget::DragValue,
            Self::Bool(_) => Widget::Checkbox,
            Self::Text(_) => Widget::TextField,
            Self::Color(_) => Widget::ColorPicker,
            Self::Choice { .. } => Widget::ComboBox,
            Self::Function { .. } => Widget::Button,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number { .. } => "a number",
            Self::Bool(_) => "a boolean",
            Self::Text(_) => "text",
            Self::Color(_) => "a colour",
            Self::Choice { .. } => "a choice",
            Self::Function { .. } => "a function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<HexColor> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// The selected option of a choice.
    pub fn as_choice(&self) -> Option<&ChoiceOption> {
        match self {
            Self::Choice { selected, options } => options.get(*selected),
            _ => None,
        }
    }

    /// The value as the JSON it would be written back as.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number { value, .. } => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Bool(b) => Value::Bool(*b),
            Self::Text(s) => Value::String(s.clone()),
            Self::Color(c) => Value::String(c.to_string()),
            Self::Choice { .. } => self
                .as_choice()
                .map(|option| option.value.clone())
                .unwrap_or(Value::Null),
            Self::Function { function, .. } => Value::String(format!("{}()", function.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constrain_clamps() {
        let range = NumberRange::bounded(0.1, 5.0, None);
        assert_eq!(range.constrain(-3.0), 0.1);
        assert_eq!(range.constrain(9.0), 5.0);
        assert_eq!(range.constrain(2.5), 2.5);
    }

    #[test]
    fn test_constrain_snaps_to_step() {
        let range = NumberRange::bounded(3.0, 64.0, Some(1.0));
        assert_eq!(range.constrain(16.4), 16.0);
        assert_eq!(range.constrain(16.6), 17.0);
        assert_eq!(range.constrain(1.0), 3.0);
    }

    #[test]
    fn test_lower_bound_only() {
        let range = NumberRange {
            min: Some(0.0),
            ..NumberRange::UNBOUNDED
        };
        assert_eq!(range.constrain(-1.0), 0.0);
        assert_eq!(range.constrain(1e9), 1e9);
        assert!(!range.is_bounded());
    }

    #[test]
    fn test_number_constructor_constrains() {
        let value = ControlValue::number(100.0, NumberRange::bounded(0.0, 10.0, None));
        assert_eq!(value.as_number(), Some(10.0));
    }

    #[test]
    fn test_widget_inference() {
        let slider = ControlValue::number(1.0, NumberRange::bounded(0.0, 2.0, None));
        let drag = ControlValue::number(1.0, NumberRange::UNBOUNDED);
        assert_eq!(slider.widget(), Widget::Slider);
        assert_eq!(drag.widget(), Widget::DragValue);
        assert_eq!(ControlValue::Bool(true).widget(), Widget::Checkbox);
        assert_eq!(ControlValue::Color(HexColor::WHITE).widget(), Widget::ColorPicker);
        assert_eq!(ControlValue::Text(String::new()).widget(), Widget::TextField);
    }

    #[test]
    fn test_to_json() {
        assert_eq!(ControlValue::Color(HexColor::new(1, 2, 3)).to_json(), "#010203");
        assert_eq!(ControlValue::Bool(false).to_json(), false);
        let choice = ControlValue::Choice {
            selected: 1,
            options: vec![
                ChoiceOption {
                    label: "a".into(),
                    value: Value::from(1),
                },
                ChoiceOption {
                    label: "b".into(),
                    value: Value::from(2),
                },
            ],
        };
        assert_eq!(choice.to_json(), 2);
        assert_eq!(choice.as_choice().unwrap().label, "b");
    }
}
