use serde::Serialize;
use serde_json::{json, Value};

use super::Tool;

/// Function-calling description of a tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

const TOKEN_PARAM: &str =
    "The Wolai app token from get_token. If omitted, the cached token is used.";

fn token_property() -> Value {
    json!({ "type": "string", "description": TOKEN_PARAM })
}

/// Definitions for every tool, in `Tool::ALL` order
pub fn definitions() -> Vec<ToolDefinition> {
    Tool::ALL.iter().map(|tool| definition(*tool)).collect()
}

pub fn definition(tool: Tool) -> ToolDefinition {
    let (description, parameters) = match tool {
        Tool::GetToken => (
            "Obtain an app token from the Wolai API. The response \"data\" holds \"app_token\", \
             \"app_id\", \"create_time\", \"expire_time\" (-1 means it never expires) and \
             \"update_time\". The token is cached for later calls and is sent as the raw \
             Authorization header value, not in Bearer form.",
            json!({
                "type": "object",
                "properties": {
                    "appId": {
                        "type": "string",
                        "description": "Application ID. Defaults to WOLAI_APP_ID."
                    },
                    "appSecret": {
                        "type": "string",
                        "description": "Application secret. Defaults to WOLAI_APP_SECRET."
                    }
                },
                "required": []
            }),
        ),
        Tool::RefreshToken => (
            "Reset the Wolai app token, e.g. after it has leaked. The new token replaces the \
             cached one.",
            json!({
                "type": "object",
                "properties": {
                    "token": {
                        "type": "string",
                        "description": "The current app_token. If omitted, the cached token is used."
                    }
                },
                "required": []
            }),
        ),
        Tool::GetBlock => (
            "Retrieve a block by ID. A page ID (the part of a wolai page URL after wolai.com/) \
             also works. The response \"data\" holds the block.",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "Block or page ID." },
                    "token": token_property()
                },
                "required": ["id"]
            }),
        ),
        Tool::GetBlockChildren => (
            "List the direct child blocks of a block or page.",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "Parent block or page ID." },
                    "token": token_property()
                },
                "required": ["id"]
            }),
        ),
        Tool::CreateBlocks => (
            "Insert one or more blocks under a page or block. The application must be added to \
             the page in its collaboration settings, otherwise the call is rejected. The \
             response \"data\" lists the URLs of the created blocks.",
            json!({
                "type": "object",
                "properties": {
                    "parent_id": {
                        "type": "string",
                        "description": "Page or block ID to insert into. Defaults to WOLAI_BLOCK_ID."
                    },
                    "token": token_property(),
                    "blocks": {
                        "type": "array",
                        "description": "Blocks to create. \"content\" is a string for text blocks \
                                        and an object with \"title\" and \"front_color\" for headings.",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": {
                                    "type": "string",
                                    "description": "Block type, e.g. \"text\" or \"heading\"."
                                },
                                "content": {
                                    "description": "Block content; shape depends on the type."
                                },
                                "text_alignment": {
                                    "type": "string",
                                    "description": "\"left\", \"center\" or \"right\"."
                                },
                                "level": {
                                    "type": "integer",
                                    "description": "Heading level 1-6, headings only."
                                }
                            },
                            "required": ["type"]
                        }
                    }
                },
                "required": ["blocks"]
            }),
        ),
        Tool::GetDatabase => (
            "Retrieve a database's columns and rows by ID (the part of the database page URL \
             after wolai.com/).",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "Database ID." },
                    "token": token_property()
                },
                "required": ["id"]
            }),
        ),
        Tool::CreateDatabaseRows => (
            "Insert rows into an existing database. Databases cannot be created through the \
             API, only filled. Row keys are column names.",
            json!({
                "type": "object",
                "properties": {
                    "database_id": {
                        "type": "string",
                        "description": "Target database ID. Defaults to WOLAI_DATABASE_ID."
                    },
                    "token": token_property(),
                    "rows": {
                        "type": "array",
                        "description": "Rows to insert, each an object keyed by column name.",
                        "items": { "type": "object" }
                    }
                },
                "required": ["rows"]
            }),
        ),
    };

    ToolDefinition {
        kind: "function",
        function: FunctionDefinition {
            name: tool.name(),
            description,
            parameters,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tool_has_a_definition() {
        let defs = definitions();
        assert_eq!(defs.len(), Tool::ALL.len());
        for (def, tool) in defs.iter().zip(Tool::ALL) {
            assert_eq!(def.function.name, tool.name());
            assert_eq!(def.kind, "function");
            assert_eq!(def.function.parameters["type"], "object");
        }
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(definition(Tool::GetBlock)).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "get_block");
        assert_eq!(value["function"]["parameters"]["required"], json!(["id"]));
    }

    #[test]
    fn test_token_is_never_required() {
        for def in definitions() {
            let required = def.function.parameters["required"]
                .as_array()
                .cloned()
                .unwrap_or_default();
            assert!(!required.contains(&json!("token")), "{}", def.function.name);
        }
    }
}
