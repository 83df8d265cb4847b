//! Schema description and plan modifiers
//!
//! A [`Schema`] lists the attributes of a resource (or of the provider
//! block) and how each one behaves during planning: who sets it, whether it
//! is secret, which plan modifiers run on it.

use serde::Serialize;
use std::collections::BTreeMap;

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
}

/// One attribute of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub description: String,
    /// Must be set in config
    pub required: bool,
    /// May be set in config
    pub optional: bool,
    /// May be set by the provider
    pub computed: bool,
    /// Never shown in plans or logs
    pub sensitive: bool,
    /// Descriptions of the plan modifiers attached to this attribute
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plan_modifiers: Vec<String>,
}

impl Attribute {
    fn new(attr_type: AttributeType) -> Self {
        Self {
            attr_type,
            description: String::new(),
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            plan_modifiers: Vec::new(),
        }
    }

    pub fn required_string() -> Self {
        Self {
            required: true,
            ..Self::new(AttributeType::String)
        }
    }

    pub fn optional_string() -> Self {
        Self {
            optional: true,
            ..Self::new(AttributeType::String)
        }
    }

    /// Optional in config, filled in by the provider when left unset
    pub fn optional_computed_string() -> Self {
        Self {
            optional: true,
            computed: true,
            ..Self::new(AttributeType::String)
        }
    }

    pub fn computed_string() -> Self {
        Self {
            computed: true,
            ..Self::new(AttributeType::String)
        }
    }

    pub fn computed_bool() -> Self {
        Self {
            computed: true,
            ..Self::new(AttributeType::Bool)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_plan_modifier(mut self, modifier: &dyn StringPlanModifier) -> Self {
        self.plan_modifiers.push(modifier.description());
        self
    }

    /// Computed and not settable from config
    pub fn is_read_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// Attributes of a resource type or of the provider block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub description: String,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Names of attributes that must be present in config
    pub fn required(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|(_, a)| a.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Whether the value of `name` must be masked when displayed
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(|a| a.sensitive)
    }
}

/// Input of a string plan modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringRequest<'a> {
    /// Value recorded in state, `None` if the instance is new or the value unset
    pub state_value: Option<&'a str>,
    /// Value proposed by config, `None` if it is being removed
    pub plan_value: Option<&'a str>,
}

/// Hook that can rewrite the planned value of a string attribute
///
/// Modifiers run while the plan is computed, so a value they replace never
/// reaches the lifecycle operations.
pub trait StringPlanModifier: Send + Sync {
    /// Plain-text description shown in schema output
    fn description(&self) -> String;

    fn markdown_description(&self) -> String {
        self.description()
    }

    /// Return the value to plan with
    fn plan_modify_string(&self, req: StringRequest<'_>) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct KeepState;

    impl StringPlanModifier for KeepState {
        fn description(&self) -> String {
            "Always keeps the state value.".to_string()
        }

        fn plan_modify_string(&self, req: StringRequest<'_>) -> Option<String> {
            req.state_value.or(req.plan_value).map(str::to_string)
        }
    }

    #[test]
    fn test_attribute_constructors() {
        assert!(Attribute::required_string().required);
        assert!(Attribute::computed_string().is_read_only());
        assert!(!Attribute::optional_computed_string().is_read_only());
        assert_eq!(Attribute::computed_bool().attr_type, AttributeType::Bool);
    }

    #[test]
    fn test_schema_queries() {
        let schema = Schema::new("test")
            .with_attribute("name", Attribute::required_string())
            .with_attribute("api_key", Attribute::required_string().sensitive())
            .with_attribute("id", Attribute::computed_string());

        assert_eq!(schema.required(), vec!["api_key", "name"]);
        assert!(schema.is_sensitive("api_key"));
        assert!(!schema.is_sensitive("name"));
        assert!(!schema.is_sensitive("missing"));
    }

    #[test]
    fn test_plan_modifier_listed() {
        let attr = Attribute::required_string().with_plan_modifier(&KeepState);
        assert_eq!(attr.plan_modifiers, vec!["Always keeps the state value."]);
        assert_eq!(KeepState.markdown_description(), KeepState.description());
    }

    #[test]
    fn test_schema_serializes_type_field() {
        let schema = Schema::new("s").with_attribute("flag", Attribute::computed_bool());
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["attributes"]["flag"]["type"], "bool");
        assert!(json["attributes"]["flag"].get("plan_modifiers").is_none());
    }
}
