//! PlantUML style strings

use serde::{Deserialize, Serialize};

use crate::core::StyleClass;

const GLOBAL: &str = "left to right direction
hide circle
hide empty members
skinparam backgroundColor white
skinparam ClassStereotypeFontColor blue
skinparam nodesep 40
skinparam ranksep 40
skinparam ClassFontSize 13
skinparam Shadowing false";

/// Styles applied to the PlantUML output
///
/// Every field has a default, so a config file only needs to name the
/// styles it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    /// Skin parameters and switches emitted right after `@startuml`
    pub global: String,
    pub proper_class: String,
    pub proper_class_out_link: String,
    pub proper_class_super_class_link: String,
    pub shape_specific_class: String,
    pub shape_specific_class_out_link: String,
    /// Link into a shape-specific class, the context the variant exists in
    pub shape_specific_class_in_link: String,
    pub shape_specific_class_super_class_link: String,
    pub forbidden_link: String,
    /// Inner property line; `{icon}`, `{property}`, `{range}` and
    /// `{cardinality}` are replaced once each
    pub inner_property_template: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            global: GLOBAL.to_string(),
            proper_class: "#line:black".to_string(),
            proper_class_out_link: "#black".to_string(),
            proper_class_super_class_link: "#blue".to_string(),
            shape_specific_class: "#EEE;line:green".to_string(),
            shape_specific_class_out_link: "#text:999;line:999".to_string(),
            shape_specific_class_in_link: "#line:green;text:green;line.bold".to_string(),
            shape_specific_class_super_class_link: "#line:99F".to_string(),
            forbidden_link: "#line:red;text:red;line.bold".to_string(),
            inner_property_template:
                "{icon} <color:royalBlue>{property}</color>  {range}  <color:green>[{cardinality}]</color>"
                    .to_string(),
        }
    }
}

impl StyleConfig {
    /// Style string for a style class
    pub fn style(&self, class: StyleClass) -> &str {
        match class {
            StyleClass::ProperClass => &self.proper_class,
            StyleClass::ShapeSpecificClass => &self.shape_specific_class,
            StyleClass::ProperOutLink => &self.proper_class_out_link,
            StyleClass::ShapeSpecificOutLink => &self.shape_specific_class_out_link,
            StyleClass::ShapeSpecificInLink => &self.shape_specific_class_in_link,
            StyleClass::SuperClassLink => &self.proper_class_super_class_link,
            StyleClass::IndirectSuperClassLink => &self.shape_specific_class_super_class_link,
            StyleClass::ForbiddenLink => &self.forbidden_link,
        }
    }

    /// Fill the inner property template
    pub fn inner_property(&self, icon: &str, property: &str, range: &str, cardinality: &str) -> String {
        self.inner_property_template
            .replacen("{icon}", icon, 1)
            .replacen("{property}", property, 1)
            .replacen("{range}", range, 1)
            .replacen("{cardinality}", cardinality, 1)
    }
}
