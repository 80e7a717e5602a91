//! Schema loader for record schemas stored as JSON files
//!
//! - One file per record schema, `<dir>/<Name>.json`
//! - Schemas are keyed by record name and immutable once registered
//! - Malformed files are rejected with the offending path

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{SchemaError, SchemaResult};
use super::types::RecordSchema;

/// Reads record schema files from disk and keeps an in-memory registry.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by record name
    schemas: HashMap<String, Arc<RecordSchema>>,
}

impl SchemaLoader {
    /// Creates a loader for the given schema directory.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    /// Loads every `.json` file in the schema directory.
    ///
    /// A missing directory holds no schemas.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        if !self.schema_dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }

        // Directory order is platform dependent
        paths.sort();
        for path in &paths {
            self.load_file(path)?;
        }

        Ok(paths.len())
    }

    /// Reads, checks and registers a single schema file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<Arc<RecordSchema>> {
        let schema = read_schema_file(path)?;
        let name = schema.name.clone();
        let schema = self.insert(schema)?;

        let path_str = path.display().to_string();
        log_event_with_fields(
            Event::SchemaLoaded,
            &[("path", path_str.as_str()), ("schema", name.as_str())],
        );

        Ok(schema)
    }

    fn insert(&mut self, schema: RecordSchema) -> SchemaResult<Arc<RecordSchema>> {
        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::AlreadyRegistered(schema.name));
        }

        let schema = Arc::new(schema);
        self.schemas.insert(schema.name.clone(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Gets a schema by record name.
    pub fn get(&self, name: &str) -> SchemaResult<Arc<RecordSchema>> {
        self.schemas
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::Unknown(name.to_string()))
    }
}

/// Reads and structurally checks a schema file without registering it.
pub fn read_schema_file(path: &Path) -> SchemaResult<RecordSchema> {
    let content = fs::read_to_string(path).map_err(|e| {
        SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
    })?;

    let schema: RecordSchema = serde_json::from_str(&content).map_err(|e| {
        SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
    })?;

    schema
        .validate_structure()
        .map_err(|e| SchemaError::malformed(path.display().to_string(), e))?;

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const USER_DATA: &str = r#"{
        "name": "UserData",
        "fields": [
            {"name": "name", "type": "string"},
            {"name": "age", "type": "int"},
            {"name": "email", "type": "string", "optional": true}
        ]
    }"#;

    #[test]
    fn test_load_all_registers_by_name() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("UserData.json"), USER_DATA).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 1);
        assert_eq!(*loader.get("UserData").unwrap(), RecordSchema::user_data());
    }

    #[test]
    fn test_duplicate_record_name_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.json"), USER_DATA).unwrap();
        fs::write(temp_dir.path().join("b.json"), USER_DATA).unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), "RECORD_SCHEMA_DUPLICATE");
        assert!(matches!(err, SchemaError::AlreadyRegistered(name) if name == "UserData"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(&temp_dir.path().join("nope"));
        assert_eq!(loader.load_all().unwrap(), 0);
        assert!(matches!(loader.get("User"), Err(SchemaError::Unknown(_))));
    }

    #[test]
    fn test_malformed_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Broken.json");
        fs::write(&path, "{ not json").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), "RECORD_SCHEMA_MALFORMED");
        assert!(err.to_string().contains("Broken.json"));
    }

    #[test]
    fn test_duplicate_field_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Dup.json");
        fs::write(
            &path,
            r#"{"name":"Dup","fields":[{"name":"a","type":"int"},{"name":"a","type":"string"}]}"#,
        )
        .unwrap();

        let err = read_schema_file(&path).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}
