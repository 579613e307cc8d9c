use quarry::{Searcher, prelude::*};
use quarry_sqlite::{SqliteConnection, SqliteSchemaProvider};
use std::sync::Arc;

pub const CONFIG: &str = r#"
[languages]
"eng-GB" = 2
"ger-DE" = 4

[indexables.ezstring]
default_match = "sort_value"
default_sort = "sort_value"
fields = { value = "string", sort_value = "string_ci" }

[indexables.ezinteger]
default_match = "value"
default_sort = "value"
fields = { value = "integer" }

[field_value_handlers]
ezinteger = "simple"
"#;

pub fn connection() -> Arc<SqliteConnection> {
    let conn = SqliteConnection::open_in_memory().expect("in-memory database");
    conn.execute_batch(include_str!("fixtures/schema.sql"))
        .expect("schema");
    conn.execute_batch(include_str!("fixtures/content.sql"))
        .expect("fixtures");

    Arc::new(conn)
}

pub fn searcher() -> Searcher {
    let conn = connection();
    let schema = SqliteSchemaProvider::new(Arc::clone(&conn));

    Searcher::from_toml_str(CONFIG, conn, &schema).expect("searcher")
}

pub fn ids(result: &QueryResult) -> Vec<i64> {
    result
        .rows
        .iter()
        .map(|row| row.int("id").expect("id column"))
        .collect()
}

/// All matching ids in default order, checking the count agrees.
pub fn find_ids(searcher: &Searcher, criterion: Criterion) -> Vec<i64> {
    let result = searcher
        .find(&FindQuery::new(criterion))
        .expect("find");
    let ids = ids(&result);
    assert_eq!(result.count, Some(ids.len() as u64));

    ids
}
