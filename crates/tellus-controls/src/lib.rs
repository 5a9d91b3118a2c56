//! JSON-driven control panels.
//!
//! A declarative JSON document is walked once and turned into a [`ControlTree`]:
//! objects become folders, leaves become typed [`ControlValue`]s whose shape
//! decides the widget drawn for them. The resulting [`ControlPanels`] is the
//! application's live parameter state. Widgets write into it, and every edit
//! is queued as a [`ControlChange`] that [`Listeners`] turn into
//! application-defined actions.
//!
//! ```
//! use tellus_controls::{ControlPanels, Listeners};
//!
//! let mut panels = ControlPanels::with_seed(1);
//! panels
//!     .add_json_str("Scene", r##"{ "Color": "#101020", "Zoom": [1.0, 0.5, 4.0, 0.1] }"##)
//!     .unwrap();
//!
//! let mut listeners = Listeners::new();
//! listeners.on_change(panels.controller("Scene/Zoom").unwrap(), "zoom");
//!
//! panels.set_number("Scene/Zoom", 2.0).unwrap();
//! let actions = listeners.dispatch(&panels.take_changes());
//! assert_eq!(actions, vec!["zoom"]);
//! assert_eq!(panels.number("Scene/Zoom").unwrap(), 2.0);
//! ```

mod color;
mod error;
mod functions;
mod listeners;
mod panel;
mod path;
mod tree;
mod ui;
mod value;

pub use color::{HexColor, random_hex_color};
pub use error::ControlError;
pub use functions::{AllowedFunction, parse_marker};
pub use listeners::Listeners;
pub use panel::{ControlChange, ControlPanel, ControlPanels};
pub use path::ControlPath;
pub use tree::{ControlNode, ControlTree};
pub use value::{ChoiceOption, ControlValue, NumberRange, Widget};
