use super::*;

#[test]
fn client_configuration() {
    let config = OllamaConfig {
        protocol: "http".to_string(),
        host: "test-host".to_string(),
        port: 1234,
        model: "test-model".to_string(),
        batch_size: 128,
    };
    let client = OllamaClient::new(&config).expect("can create client");

    assert_eq!(client.model, "test-model");
    assert_eq!(client.batch_size, 128);
    assert_eq!(client.base_url.host_str(), Some("test-host"));
    assert_eq!(client.base_url.port(), Some(1234));
}

#[test]
fn client_builder_timeout_keeps_configuration() {
    let client = OllamaClient::new(&OllamaConfig::default())
        .expect("can create client")
        .with_timeout(Duration::from_secs(60));

    assert_eq!(client.model, OllamaConfig::default().model);
    assert_eq!(client.batch_size, OllamaConfig::default().batch_size);
}

#[test]
fn embed_request_shape() {
    let request = EmbedRequest {
        model: "test-model".to_string(),
        input: vec!["alpha".to_string(), "beta".to_string()],
    };

    let value = serde_json::to_value(&request).expect("can serialize request");
    assert_eq!(value["model"], "test-model");
    assert_eq!(value["input"][0], "alpha");
    assert_eq!(value["input"][1], "beta");
}

#[test]
fn embed_response_parses_vectors() {
    let json = r#"{"model":"test-model","embeddings":[[0.1,0.2],[0.3,0.4]]}"#;
    let response: EmbedResponse = serde_json::from_str(json).expect("can parse response");

    assert_eq!(response.embeddings.len(), 2);
    assert_eq!(response.embeddings[0], vec![0.1, 0.2]);
}

#[test]
fn models_response_parses_names() {
    let json = r#"{"models":[{"name":"nomic-embed-text:latest","size":274302450}]}"#;
    let response: ModelsResponse = serde_json::from_str(json).expect("can parse response");

    assert_eq!(response.models.len(), 1);
    assert_eq!(response.models[0].name, "nomic-embed-text:latest");
}

#[test]
fn embed_batch_with_no_texts_skips_the_network() {
    let client = OllamaClient::new(&OllamaConfig::default()).expect("can create client");
    let vectors = client.embed_batch(&[]).expect("empty batch succeeds");
    assert!(vectors.is_empty());
}
