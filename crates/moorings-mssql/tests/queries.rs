//! Integration tests for the criteria-to-statement pipeline
//!
//! Exercises the full path a caller takes: register collections, parse
//! JSON criteria, compile statements, then decode driver-shaped result
//! rows back into typed records.

use moorings_core::{
    record_values, Attribute, AttributeSchema, AttributeType, Collection, CollectionRegistry,
    Criteria, ResultSet,
};
use moorings_mssql::{
    decode_row, normalize_schema, ColumnRow, ConstraintRow, MssqlConfig, Statements,
};
use serde_json::json;

/// Setup helper: a registry with one `person` collection.
fn setup_registry() -> CollectionRegistry {
    let schema: AttributeSchema = serde_json::from_value(json!({
        "id": {"type": "integer", "primaryKey": true},
        "name": {"type": "string"},
        "email": {"type": "string", "unique": true},
        "active": {"type": "boolean"},
        "tags": {"type": "array"},
        "joined": {"type": "datetime"},
    }))
    .unwrap();

    let mut registry = CollectionRegistry::new();
    registry.register(Collection::new("person", schema));
    registry
}

fn person_statements(registry: &CollectionRegistry) -> Statements<'_> {
    let collection = registry.get("person").unwrap();
    Statements::new(&collection.table, &collection.schema)
}

#[test]
fn test_json_criteria_compile_to_a_full_select() {
    let registry = setup_registry();
    let statements = person_statements(&registry);

    let criteria: Criteria = serde_json::from_value(json!({
        "where": {
            "active": true,
            "or": [{"name": {"startsWith": "M"}}, {"email": {"endsWith": "@example.com"}}],
            "age": {">=": 18},
        },
        "sort": {"joined": -1, "name": 1},
        "limit": 25,
    }))
    .unwrap();

    assert_eq!(
        statements.select(&criteria).unwrap(),
        "SELECT TOP 25 * FROM [person] \
         WHERE [active]='true' \
         AND ( [name] LIKE 'M%' OR [email] LIKE '%@example.com' ) \
         AND [age]>='18' \
         ORDER BY [joined] DESC, [name] ASC"
    );
}

#[test]
fn test_aggregate_criteria_switch_the_select_head() {
    let registry = setup_registry();
    let statements = person_statements(&registry);

    let criteria: Criteria = serde_json::from_value(json!({
        "groupBy": "dept",
        "sum": "salary",
        "average": ["age"],
        "where": {"active": true},
    }))
    .unwrap();

    assert_eq!(
        statements.select(&criteria).unwrap(),
        "SELECT [dept], SUM([salary]) AS [salary], AVG([age]) AS [age] \
         FROM [person] WHERE [active]='true' GROUP BY [dept]"
    );
}

#[test]
fn test_insert_then_decode_the_output_row() {
    let registry = setup_registry();
    let statements = person_statements(&registry);

    let record = json!({
        "name": "Mia O'Neil",
        "active": true,
        "tags": ["staff", "admin"],
    });
    let values = record_values(&record).unwrap();

    assert_eq!(
        statements.insert(&values).unwrap(),
        "INSERT INTO [person] ([name], [active], [tags]) OUTPUT INSERTED.* \
         VALUES ('Mia O''Neil', 'true', '[\"staff\",\"admin\"]')"
    );

    // The driver returns the inserted row, identity column included.
    let results: ResultSet = serde_json::from_value(json!({
        "columns": [
            {"name": "id", "type": "int"},
            {"name": "name", "type": "nvarchar"},
            {"name": "active", "type": "bit"},
            {"name": "tags", "type": "nvarchar"},
        ],
        "rows": [[7, "Mia O'Neil", 1, "[\"staff\",\"admin\"]"]],
    }))
    .unwrap();

    let schema = registry.schema_for("person").unwrap();
    let decoded = decode_row(schema, &results.columns, &results.rows[0]);

    assert_eq!(decoded.get("id"), Some(&json!(7)));
    assert_eq!(decoded.get("name"), Some(&json!("Mia O'Neil")));
    assert_eq!(decoded.get("active"), Some(&json!(true)));
    assert_eq!(decoded.get("tags"), Some(&json!(["staff", "admin"])));
}

#[test]
fn test_update_and_delete_share_the_where_compiler() {
    let registry = setup_registry();
    let statements = person_statements(&registry);

    let criteria: Criteria =
        serde_json::from_value(json!({"where": {"id": [3, 4]}})).unwrap();
    let values = record_values(&json!({"active": false, "email": null})).unwrap();

    assert_eq!(
        statements.update(&criteria, &values).unwrap(),
        "UPDATE [person] SET [active]='false', [email]=NULL WHERE [id] IN ('3', '4')"
    );
    assert_eq!(
        statements.delete(&criteria).unwrap(),
        "DELETE FROM [person] WHERE [id] IN ('3', '4')"
    );
}

#[test]
fn test_malformed_criteria_never_reach_statement_text() {
    let registry = setup_registry();
    let statements = person_statements(&registry);

    let criteria: Criteria =
        serde_json::from_value(json!({"where": {"age": {"around": 30}}})).unwrap();

    let err = statements.select(&criteria).unwrap_err();
    assert_eq!(err.to_string(), "unsupported operator: around");
}

#[test]
fn test_introspection_round_trips_into_ddl() {
    // Rows shaped like the describe statements' results.
    let columns = vec![
        ColumnRow::new("id", "int"),
        ColumnRow::new("email", "nvarchar(255)"),
        ColumnRow::new("active", "bit"),
    ];
    let constraints = vec![
        ConstraintRow::new("id", "PRIMARY KEY"),
        ConstraintRow::new("email", "UNIQUE"),
    ];

    let schema = normalize_schema(&columns, &constraints);
    assert!(schema.get("id").unwrap().primary_key);
    assert!(schema.get("email").unwrap().unique);
    assert!(schema.get("email").unwrap().indexed);
    assert_eq!(schema.get("active").unwrap().kind, AttributeType::Boolean);

    let statements = Statements::new("person", &schema);
    assert_eq!(
        statements.create_table(),
        "CREATE TABLE [person] (\
         [id] INT NOT NULL IDENTITY(1,1) CONSTRAINT [PK_person] PRIMARY KEY, \
         [email] NVARCHAR(MAX) NOT NULL UNIQUE, \
         [active] BIT)"
    );
    assert_eq!(
        statements.add_column("age", &Attribute::of(AttributeType::Integer)),
        "ALTER TABLE [person] ADD [age] INT"
    );
}

#[test]
fn test_config_marshals_the_driver_connection_string() {
    let config: MssqlConfig = serde_json::from_value(json!({
        "connection": {"server": "db.internal", "database": "app"},
    }))
    .unwrap();

    assert_eq!(
        config.connection_string().unwrap(),
        "database=app;driver=SQL Server Native Client 11.0;server=db.internal;"
    );
}
