use crate::{ConfigError, FieldKind, SearchConfig, ValueHandlerKind};

const FULL: &str = r#"
[search]
debug = true
published_status = 3
full_text_wildcards = false

[languages]
"eng-GB" = 2
"ger-DE" = 4

[transformation.replacements]
"ß" = "ss"

[indexables.ezstring]
default_match = "value"
default_sort = "sort_value"
fields = { value = "string_ci", sort_value = "string_ci" }

[indexables.ezinteger]
fields = { value = "integer" }

[field_value_handlers]
ezinteger = "simple"
"#;

#[test]
fn parses_every_section() {
    let config = SearchConfig::from_toml_str(FULL).expect("valid config");

    assert!(config.search.debug);
    assert_eq!(config.search.published_status, 3);
    assert_eq!(config.search.content_type_status, 0);
    assert!(!config.search.full_text_wildcards);

    assert_eq!(config.languages["eng-GB"], 2);
    assert_eq!(config.languages["ger-DE"], 4);

    let rules: Vec<_> = config.transformation.rules().collect();
    assert_eq!(rules, vec![('ß', "ss")]);

    let ezstring = &config.indexables["ezstring"];
    assert_eq!(ezstring.fields["sort_value"], FieldKind::StringCi);
    assert_eq!(ezstring.default_match.as_deref(), Some("value"));
    assert_eq!(config.indexables["ezinteger"].default_sort, None);

    assert_eq!(
        config.field_value_handlers["ezinteger"],
        ValueHandlerKind::Simple
    );
}

#[test]
fn empty_document_uses_defaults() {
    let config = SearchConfig::from_toml_str("").expect("empty config");

    assert_eq!(config, SearchConfig::default());
    assert_eq!(config.search.published_status, 1);
    assert!(config.search.full_text_wildcards);
}

#[test]
fn rejects_non_power_of_two_language_id() {
    let err = SearchConfig::from_toml_str("[languages]\n\"eng-GB\" = 6\n").unwrap_err();

    assert!(matches!(err, ConfigError::InvalidLanguageId { id: 6, .. }));
}

#[test]
fn rejects_the_always_available_bit() {
    let err = SearchConfig::from_toml_str("[languages]\n\"eng-GB\" = 1\n").unwrap_err();

    assert!(matches!(err, ConfigError::InvalidLanguageId { id: 1, .. }));
}

#[test]
fn rejects_shared_language_ids() {
    let err =
        SearchConfig::from_toml_str("[languages]\n\"eng-GB\" = 2\n\"eng-US\" = 2\n").unwrap_err();

    match err {
        ConfigError::DuplicateLanguageId { first, second, id } => {
            assert_eq!((first.as_str(), second.as_str(), id), ("eng-GB", "eng-US", 2));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_undeclared_defaults() {
    let source = r#"
[indexables.ezkeyword]
default_sort = "sort_value"
fields = { value = "string" }
"#;
    let err = SearchConfig::from_toml_str(source).unwrap_err();

    assert!(matches!(
        err,
        ConfigError::UndeclaredDefault { purpose: "sort", .. }
    ));
}

#[test]
fn rejects_indexables_without_fields() {
    let source = "[indexables.ezempty]\nfields = {}\n";
    let err = SearchConfig::from_toml_str(source).unwrap_err();

    assert!(matches!(err, ConfigError::EmptyIndexable { .. }));
}

#[test]
fn rejects_unknown_storage_kinds_and_handlers() {
    let kind = "[indexables.ezstring]\nfields = { value = \"text\" }\n";
    assert!(matches!(
        SearchConfig::from_toml_str(kind).unwrap_err(),
        ConfigError::Parse(_)
    ));

    let handler = "[field_value_handlers]\nezinteger = \"numeric\"\n";
    assert!(matches!(
        SearchConfig::from_toml_str(handler).unwrap_err(),
        ConfigError::Parse(_)
    ));
}

#[test]
fn rejects_unknown_keys() {
    let err = SearchConfig::from_toml_str("[search]\nverbose = true\n").unwrap_err();

    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn rejects_multi_character_replacement_sources() {
    let source = "[transformation.replacements]\n\"ae\" = \"a\"\n";
    let err = SearchConfig::from_toml_str(source).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidReplacement { .. }));
}

#[test]
fn rejects_uppercase_replacement_sources() {
    let source = "[transformation.replacements]\n\"Æ\" = \"ae\"\n";
    let err = SearchConfig::from_toml_str(source).unwrap_err();

    assert!(matches!(
        err,
        ConfigError::InvalidReplacement { source_text } if source_text == "Æ"
    ));
}
