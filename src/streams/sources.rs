//! Source connections and their models, tables and segments

use super::StreamDefinition;
use crate::schema::builders::{array, boolean, datetime, free_object, integer, object, string};
use crate::schema::JsonSchema;

/// `GET /api/v1/sources`
pub fn sources() -> StreamDefinition {
    let schema = JsonSchema::from_properties([
        ("id", integer().with_description("The source's system ID")),
        ("name", string().with_description("The source's name")),
        ("label", string().with_description("The source's label")),
        ("type", string().with_description("The source's connector type")),
        (
            "created_at",
            datetime().with_description("The source's creation date"),
        ),
        (
            "last_test_succeeded",
            boolean().with_description("Whether the last connection test succeeded"),
        ),
        (
            "last_tested_at",
            datetime().with_description("When the connection was last tested"),
        ),
        (
            "connection_details",
            free_object().with_description("Connector-specific connection details"),
        ),
        (
            "read_only",
            boolean().with_description("Whether the connection is read-only"),
        ),
    ]);

    StreamDefinition::new("sources", "/api/v1/sources", schema)
}

/// `GET /api/v1/sources/{source_id}/objects`, once per source
pub fn source_objects() -> StreamDefinition {
    let column = object([
        ("name", string().with_description("The column's name")),
        ("data_type", string().with_description("The column's warehouse type")),
        (
            "is_nullable",
            boolean().with_description("Whether the column allows nulls"),
        ),
    ]);

    let schema = JsonSchema::from_properties([
        ("id", integer().with_description("The source object's system ID")),
        (
            "source_id",
            integer().with_description("The parent source's system ID"),
        ),
        (
            "type",
            string().with_description("The object kind: table, model or segment"),
        ),
        ("name", string().with_description("The source object's name")),
        ("label", string().with_description("The source object's label")),
        ("table_catalog", string().with_description("The table's catalog")),
        ("table_schema", string().with_description("The table's schema")),
        ("table_name", string().with_description("The table's name")),
        ("query", string().with_description("The model's SQL query")),
        (
            "created_at",
            datetime().with_description("The source object's creation date"),
        ),
        (
            "updated_at",
            datetime().with_description("The source object's last updated date"),
        ),
        ("columns", array(column).with_description("The object's columns")),
    ]);

    StreamDefinition::new("source_objects", "/api/v1/sources/{source_id}/objects", schema)
        .child_of("sources", "source_id")
}
