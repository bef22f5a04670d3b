//! Integration tests for the translate and check-config commands

use docguard::{check_config, translate_file, translate_records, Config, MethodRecord, SpecificationRecord};
use docguard_translator::TranslationService;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

const RECORDS: &str = r#"[
  {
    "method": {
      "name": "divide",
      "params": [
        { "name": "dividend", "type": "int" },
        { "name": "divisor", "type": "int" }
      ],
      "return_type": "int",
      "declaring_type": { "qualified_name": "org.example.Arithmetic" }
    },
    "tags": [
      {
        "kind": "throws",
        "exception": "ArithmeticException",
        "comment": { "text": "if divisor is zero" }
      },
      {
        "kind": "return",
        "comment": { "text": "the quotient of dividend and divisor" }
      }
    ]
  },
  {
    "method": {
      "name": "greet",
      "params": [{ "name": "name", "type": "java.lang.String" }],
      "declaring_type": { "qualified_name": "org.example.Greeter" }
    },
    "tags": [
      {
        "kind": "param",
        "parameter": "name",
        "comment": { "text": "must not be null" }
      }
    ]
  }
]"#;

fn conditions(record: &SpecificationRecord) -> Vec<String> {
    record
        .specifications
        .iter()
        .map(|s| s.specification.to_string())
        .collect()
}

#[tokio::test]
async fn test_translate_file_writes_specifications() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("methods.json");
    let output = dir.path().join("specs.json");
    std::fs::write(&input, RECORDS).unwrap();

    let count = translate_file(&input, Some(&output), &Config::default())
        .await
        .unwrap();
    assert_eq!(count, 2);

    let written: Vec<SpecificationRecord> =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written[0].method, "org.example.Arithmetic.divide(int, int)");
    assert_eq!(
        written[0]
            .specifications
            .iter()
            .map(|s| s.tag.as_str())
            .collect::<Vec<_>>(),
        vec!["@throws ArithmeticException", "@return"]
    );
    assert_eq!(
        conditions(&written[0]),
        vec![
            "args[1]==0 => throws ArithmeticException".to_string(),
            "true ? result==args[0]/args[1]".to_string(),
        ]
    );
    assert_eq!(conditions(&written[1]), vec!["args[0]!=null".to_string()]);
}

#[tokio::test]
async fn test_translate_file_rejects_malformed_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("methods.json");
    std::fs::write(&input, "{ not json").unwrap();

    let result = translate_file(&input, None, &Config::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_records_keep_input_order() {
    let records: Vec<MethodRecord> = serde_json::from_str(RECORDS).unwrap();
    let service = Arc::new(TranslationService::from_config(&Config::default()).unwrap());

    let translated = translate_records(service, records, 1).await.unwrap();
    let methods: Vec<&str> = translated.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(
        methods,
        vec![
            "org.example.Arithmetic.divide(int, int)",
            "org.example.Greeter.greet(java.lang.String)",
        ]
    );
}

#[tokio::test]
async fn test_translated_tag_does_not_block_its_siblings() {
    let records: Vec<MethodRecord> = serde_json::from_str(
        r#"[
          {
            "method": {
              "name": "greet",
              "params": [{ "name": "name", "type": "java.lang.String" }],
              "declaring_type": { "qualified_name": "org.example.Greeter" }
            },
            "tags": [
              {
                "kind": "param",
                "parameter": "name",
                "comment": { "text": "must not be empty" },
                "translation": {
                  "kind": "precondition",
                  "guard": { "description": "", "condition": "!args[0].isEmpty()" }
                }
              },
              {
                "kind": "throws",
                "exception": "NullPointerException",
                "comment": { "text": "if name is null" }
              }
            ]
          }
        ]"#,
    )
    .unwrap();
    let service = Arc::new(TranslationService::from_config(&Config::default()).unwrap());

    let translated = translate_records(service, records, 1).await.unwrap();
    assert_eq!(
        conditions(&translated[0]),
        vec!["args[0]==null => throws NullPointerException".to_string()]
    );
}

#[test]
fn test_check_config_prints_effective_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[matcher]\ndistance_threshold = 3\n").unwrap();

    let rendered = check_config(Some(&path)).unwrap();
    let config = Config::from_toml_str(&rendered).unwrap();
    assert_eq!(config.matcher.distance_threshold, 3);
    assert_eq!(config.gate.checker, "scope");
}

#[test]
fn test_check_config_rejects_unknown_checker() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[gate]\nchecker = \"lint\"\n").unwrap();

    assert!(check_config(Some(&path)).is_err());
}
