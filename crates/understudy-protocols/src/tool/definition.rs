//! Tool definition types.

use serde::{Deserialize, Serialize};

/// Definition of a tool: what the model sees when the tool is offered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique identifier for the tool.
    pub id: String,

    /// Description of what the tool does.
    pub description: String,

    /// JSON Schema for the parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_schema: Option<serde_json::Value>,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            parameters_schema: None,
        }
    }

    /// Set the parameters schema.
    pub fn with_parameters_schema(mut self, schema: serde_json::Value) -> Self {
        self.parameters_schema = Some(schema);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_new() {
        let def = ToolDefinition::new("lookup", "Look something up");
        assert_eq!(def.id, "lookup");
        assert_eq!(def.description, "Look something up");
        assert!(def.parameters_schema.is_none());
    }

    #[test]
    fn test_definition_with_schema() {
        let schema = serde_json::json!({"type": "object", "properties": {}});
        let def = ToolDefinition::new("lookup", "Look something up")
            .with_parameters_schema(schema.clone());
        assert_eq!(def.parameters_schema, Some(schema));
    }

    #[test]
    fn test_definition_serialize_skips_missing_schema() {
        let def = ToolDefinition::new("lookup", "Look something up");
        let json = serde_json::to_string(&def).unwrap();
        assert!(!json.contains("parameters_schema"));
    }
}
