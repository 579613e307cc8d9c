use crate::{SqliteConnection, convert::driver_error};
use quarry_core::{
    db::{
        engine::DEFAULT_CONTENT_TYPE_STATUS,
        field::{FieldDefinition, SchemaProvider, SearchableFieldMap},
        schema::{content_type, content_type_field},
    },
    error::{ErrorOrigin, InternalError},
};
use std::sync::Arc;

///
/// SqliteSchemaProvider
///
/// Reads every searchable field of every defined content type:
/// `content_type_field` rows flagged `is_searchable`, keyed by the owning
/// type's identifier and the field's identifier.
///

#[derive(Clone)]
pub struct SqliteSchemaProvider {
    connection: Arc<SqliteConnection>,
    defined_status: i64,
}

impl SqliteSchemaProvider {
    #[must_use]
    pub const fn new(connection: Arc<SqliteConnection>) -> Self {
        Self {
            connection,
            defined_status: DEFAULT_CONTENT_TYPE_STATUS,
        }
    }

    #[must_use]
    pub const fn defined_status(mut self, status: i64) -> Self {
        self.defined_status = status;
        self
    }

    fn query() -> String {
        format!(
            "SELECT ct.{ct_identifier}, f.{f_identifier}, f.{f_id}, f.{f_type} \
             FROM {fields} AS f INNER JOIN {types} AS ct ON ct.{ct_id} = f.{f_type_id} \
             WHERE f.{searchable} = 1 AND ct.{status} = ?1 ORDER BY f.{f_id}",
            ct_identifier = content_type::IDENTIFIER,
            f_identifier = content_type_field::IDENTIFIER,
            f_id = content_type_field::ID,
            f_type = content_type_field::DATA_TYPE,
            fields = content_type_field::TABLE,
            types = content_type::TABLE,
            ct_id = content_type::ID,
            f_type_id = content_type_field::CONTENT_TYPE_ID,
            searchable = content_type_field::IS_SEARCHABLE,
            status = content_type::STATUS,
        )
    }
}

impl SchemaProvider for SqliteSchemaProvider {
    fn searchable_field_map(&self) -> Result<SearchableFieldMap, InternalError> {
        let backend = |err| InternalError::backend(ErrorOrigin::Schema, driver_error(err));

        let conn = self
            .connection
            .lock()
            .map_err(|err| InternalError::backend(ErrorOrigin::Schema, err))?;
        let mut stmt = conn.prepare(&Self::query()).map_err(backend)?;
        let rows = stmt
            .query_map([self.defined_status], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(backend)?;

        let mut map = SearchableFieldMap::new();
        for row in rows {
            let (entity_type, attribute, id, type_identifier) = row.map_err(backend)?;
            map.insert(entity_type, attribute, FieldDefinition::new(id, type_identifier));
        }

        tracing::debug!(
            entity_types = map.len(),
            "loaded searchable field map"
        );

        Ok(map)
    }
}
