//! Interactive API documentation.

use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};

const SWAGGER_UI: &str = include_str!("../../assets/swagger.html");

/// GET /swagger
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

/// GET /swagger.json
pub async fn openapi() -> Json<Value> {
    Json(openapi_document())
}

/// OpenAPI 3.0 description of the `/api/test` family.
pub fn openapi_document() -> Value {
    let id_param = json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer" }
    }]);
    let project = json!({ "$ref": "#/components/schemas/TestProjects" });
    let input_body = json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/TestProjectsInput" }
            }
        }
    });

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Backend API",
            "version": "1.0.0",
            "description": "Backend API Documentation"
        },
        "paths": {
            "/api/test": {
                "get": {
                    "summary": "Get all test projects",
                    "responses": {
                        "200": {
                            "description": "List of test projects",
                            "content": {
                                "application/json": {
                                    "schema": { "type": "array", "items": project }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "summary": "Create a new test project",
                    "requestBody": input_body,
                    "responses": {
                        "201": {
                            "description": "Created test project",
                            "content": { "application/json": { "schema": project } }
                        }
                    }
                }
            },
            "/api/test/{id}": {
                "get": {
                    "summary": "Get test project by ID",
                    "parameters": id_param,
                    "responses": {
                        "200": {
                            "description": "Test project found",
                            "content": { "application/json": { "schema": project } }
                        },
                        "404": { "description": "Project not found" }
                    }
                },
                "put": {
                    "summary": "Update test project",
                    "parameters": id_param,
                    "requestBody": input_body,
                    "responses": {
                        "200": { "description": "Updated test project" },
                        "404": { "description": "Project not found" }
                    }
                },
                "delete": {
                    "summary": "Delete test project",
                    "parameters": id_param,
                    "responses": {
                        "200": { "description": "Deleted successfully" },
                        "404": { "description": "Project not found" }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "TestProjects": {
                    "type": "object",
                    "properties": {
                        "Id": { "type": "integer" },
                        "Name": { "type": "string" }
                    }
                },
                "TestProjectsInput": {
                    "type": "object",
                    "required": ["Name"],
                    "properties": {
                        "Name": { "type": "string" }
                    }
                }
            }
        }
    })
}
