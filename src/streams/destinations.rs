//! Destination connections and the objects they expose

use super::StreamDefinition;
use crate::schema::builders::{array, boolean, datetime, free_object, integer, object, string};
use crate::schema::JsonSchema;

/// `GET /api/v1/destinations`
pub fn destinations() -> StreamDefinition {
    let schema = JsonSchema::from_properties([
        ("id", integer().with_description("The destination's system ID")),
        ("name", string().with_description("The destination's name")),
        ("type", string().with_description("The destination's connector type")),
        (
            "created_at",
            datetime().with_description("The destination's creation date"),
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
            "objects",
            array(object([
                ("label", string().with_description("The object's display label")),
                ("full_name", string().with_description("The object's API name")),
            ]))
            .with_description("Objects available in the destination"),
        ),
    ]);

    StreamDefinition::new("destinations", "/api/v1/destinations", schema)
}

/// `GET /api/v1/destinations/{destination_id}/objects`, once per destination
pub fn destination_objects() -> StreamDefinition {
    let field = object([
        ("label", string().with_description("The field's display label")),
        ("full_name", string().with_description("The field's API name")),
        ("type", string().with_description("The field's data type")),
        (
            "identifiable",
            boolean().with_description("Whether the field can identify a record"),
        ),
        ("required", boolean().with_description("Whether the field is required")),
        (
            "createable",
            boolean().with_description("Whether the field can be set on create"),
        ),
        (
            "updateable",
            boolean().with_description("Whether the field can be set on update"),
        ),
        ("array", boolean().with_description("Whether the field holds a list")),
    ]);

    let schema = JsonSchema::from_properties([
        (
            "destination_id",
            integer().with_description("The parent destination's system ID"),
        ),
        ("label", string().with_description("The object's display label")),
        ("full_name", string().with_description("The object's API name")),
        (
            "allow_custom_fields",
            boolean().with_description("Whether custom fields may be created"),
        ),
        (
            "allow_custom_objects",
            boolean().with_description("Whether custom objects may be created"),
        ),
        (
            "supported_operations",
            array(string()).with_description("Sync operations the object supports"),
        ),
        ("fields", array(field).with_description("The object's fields")),
    ]);

    StreamDefinition::new(
        "destination_objects",
        "/api/v1/destinations/{destination_id}/objects",
        schema,
    )
    .with_primary_key(&["full_name"])
    .child_of("destinations", "destination_id")
}
