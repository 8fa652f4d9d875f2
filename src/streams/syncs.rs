//! Syncs and their runs

use super::StreamDefinition;
use crate::schema::builders::{array, boolean, datetime, integer, map_of, object, string};
use crate::schema::JsonSchema;

/// `GET /api/v1/syncs`
pub fn syncs() -> StreamDefinition {
    let schema = JsonSchema::from_properties([
        ("id", integer().with_description("The sync's system ID")),
        ("label", string().with_description("The sync's label")),
        (
            "schedule_frequency",
            string().with_description("The sync's schedule frequency"),
        ),
        ("schedule_day", integer().with_description("The sync's schedule day")),
        ("schedule_hour", integer().with_description("The sync's schedule hour")),
        (
            "schedule_minute",
            integer().with_description("The sync's schedule minute"),
        ),
        ("created_at", datetime().with_description("The sync's creation date")),
        (
            "updated_at",
            datetime().with_description("The sync's last updated date"),
        ),
        ("operation", string().with_description("The sync's operation type")),
        ("paused", boolean().with_description("Whether the sync is paused")),
        ("status", string().with_description("The sync's status")),
        (
            "lead_union_insert_to",
            string().with_description("The sync's lead union insert to"),
        ),
        (
            "trigger_on_dbt_cloud_rebuild",
            boolean().with_description("Whether the sync is triggered on dbt Cloud rebuild"),
        ),
        (
            "field_behavior",
            string().with_description("The sync's field behavior type"),
        ),
        (
            "field_normalization",
            string().with_description("The sync's field normalization type"),
        ),
        (
            "mirror_strategy",
            string().with_description("The sync's mirror strategy type"),
        ),
        (
            "source_attributes",
            object([
                (
                    "connection_id",
                    integer().with_description("The sync's source connection ID"),
                ),
                (
                    "object",
                    object([
                        ("type", string().with_description("The sync's source object type")),
                        ("id", integer().with_description("The sync's source object ID")),
                        ("name", string().with_description("The sync's source object name")),
                        (
                            "created_at",
                            datetime().with_description("The sync's source object creation date"),
                        ),
                        (
                            "updated_at",
                            datetime()
                                .with_description("The sync's source object last updated date"),
                        ),
                        ("query", string().with_description("The sync's source object query")),
                    ])
                    .with_description("The sync's source object"),
                ),
            ])
            .with_description("The sync's source attributes"),
        ),
        (
            "destination_attributes",
            object([
                (
                    "connection_id",
                    integer().with_description("The sync's destination connection ID"),
                ),
                ("object", string().with_description("The sync's destination object")),
            ])
            .with_description("The sync's destination attributes"),
        ),
        (
            "mappings",
            array(object([
                (
                    "from",
                    object([
                        ("type", string().with_description("The sync's mapping from type")),
                        ("email", string().with_description("The sync's mapping from email")),
                    ])
                    .with_description("The sync's mapping from"),
                ),
                ("to", string().with_description("The sync's mapping to")),
                (
                    "is_primary_identifier",
                    boolean().with_description("Whether the sync's mapping is primary identifier"),
                ),
                (
                    "generate_field",
                    boolean().with_description("Whether the sync's mapping generates field"),
                ),
                (
                    "preserve_values",
                    boolean().with_description("Whether the sync's mapping preserves values"),
                ),
                (
                    "operation",
                    string().with_description("The sync's mapping operation type"),
                ),
            ])),
        ),
    ]);

    StreamDefinition::new("syncs", "/api/v1/syncs", schema).with_replication_key("updated_at")
}

/// `GET /api/v1/syncs/{sync_id}/sync_runs`, once per sync
pub fn sync_runs() -> StreamDefinition {
    let schema = JsonSchema::from_properties([
        ("id", integer().with_description("The sync run's system ID")),
        ("sync_id", integer().with_description("The sync run's sync ID")),
        (
            "source_record_count",
            integer().with_description("The sync run's source record count"),
        ),
        (
            "records_processed",
            integer().with_description("The count of records processed"),
        ),
        (
            "records_updated",
            integer().with_description("The count of records updated"),
        ),
        (
            "records_failed",
            integer().with_description("The count of records failed"),
        ),
        (
            "records_invalid",
            integer().with_description("The count of records invalid"),
        ),
        (
            "created_at",
            datetime().with_description("The sync run's creation date"),
        ),
        (
            "updated_at",
            datetime().with_description("The sync run's last updated date"),
        ),
        (
            "completed_at",
            datetime().with_description("The sync run's completion date"),
        ),
        (
            "scheduled_execution_time",
            datetime().with_description("The sync run's scheduled execution time"),
        ),
        ("error_code", integer().with_description("The sync run's error code")),
        (
            "error_message",
            string().with_description("The sync run's error message"),
        ),
        (
            "error_detail",
            string().with_description("The sync run's error detail"),
        ),
        ("status", string().with_description("The sync run's status")),
        (
            "canceled",
            boolean().with_description("Whether the sync run is canceled"),
        ),
        (
            "full_sync",
            boolean().with_description("Whether the sync run is a full sync"),
        ),
        (
            "sync_trigger_reason",
            map_of(string()).with_description("The sync run's sync trigger reason"),
        ),
    ]);

    StreamDefinition::new("sync_runs", "/api/v1/syncs/{sync_id}/sync_runs", schema)
        .with_replication_key("updated_at")
        .child_of("syncs", "sync_id")
}
