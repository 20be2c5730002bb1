//! Tool schema generation from declared parameter specs.
//!
//! ```rust
//! use rtooling::{ParamType, ToolSpec};
//!
//! let spec = ToolSpec::new("add", "Add two integers")
//!     .param("a", ParamType::Integer)
//!     .param("b", ParamType::Integer);
//!
//! let definition = spec.definition();
//! assert_eq!(definition.name, "add");
//! assert_eq!(definition.parameters["properties"]["a"]["type"], "integer");
//! assert_eq!(definition.parameters["required"], serde_json::json!(["a", "b"]));
//! ```

use rprovider::ToolDefinition;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    String,
    Integer,
    Float,
    Boolean,
    Object,
    Array,
}

impl ParamType {
    pub fn json_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub ty: ParamType,
    pub description: Option<String>,
    pub required: bool,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn schema_entry(&self) -> Value {
        let mut entry = Map::new();
        entry.insert("type".to_string(), Value::from(self.ty.json_type()));
        if let Some(description) = &self.description {
            entry.insert("description".to_string(), Value::from(description.as_str()));
        }
        Value::Object(entry)
    }
}

/// Name, description, and parameter list attached to a tool at registration.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
    explicit_schema: Option<Value>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            explicit_schema: None,
        }
    }

    pub fn param(self, name: impl Into<String>, ty: ParamType) -> Self {
        self.with_param(ParamSpec::required(name, ty))
    }

    pub fn optional_param(self, name: impl Into<String>, ty: ParamType) -> Self {
        self.with_param(ParamSpec::optional(name, ty))
    }

    pub fn param_described(
        self,
        name: impl Into<String>,
        ty: ParamType,
        description: impl Into<String>,
    ) -> Self {
        self.with_param(ParamSpec::required(name, ty).with_description(description))
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
        self.params.extend(params);
        self
    }

    /// Hand-written parameter schema; used verbatim instead of the generated one.
    pub fn explicit_schema(mut self, schema: Value) -> Self {
        self.explicit_schema = Some(schema);
        self
    }

    pub fn has_explicit_schema(&self) -> bool {
        self.explicit_schema.is_some()
    }

    pub fn parameters_schema(&self) -> Value {
        if let Some(schema) = &self.explicit_schema {
            return schema.clone();
        }

        let mut properties = Map::new();
        for param in &self.params {
            properties.insert(param.name.clone(), param.schema_entry());
        }

        let required = self
            .params
            .iter()
            .filter(|param| param.required)
            .map(|param| Value::from(param.name.as_str()))
            .collect::<Vec<_>>();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters_schema(),
        }
    }
}
