/*!
 * Tests for provider request and response handling
 */

use kitabai::providers::ollama::{GenerationRequest, GenerationResponse, Ollama};
use kitabai::providers::openai::{OpenAI, OpenAIChoice, OpenAIMessage, OpenAIRequest, OpenAIResponse};
use kitabai::providers::Provider;

/// Test OpenAI request serialization shape
#[test]
fn test_openai_request_withMessagesAndTemperature_shouldSerializeExpectedFields() {
    let request = OpenAIRequest::new("gpt-3.5-turbo")
        .add_message("system", "You are a translator.")
        .add_message("user", "مرحبا")
        .temperature(0.3);

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["model"], "gpt-3.5-turbo");
    assert_eq!(value["messages"][0]["role"], "system");
    assert_eq!(value["messages"][1]["content"], "مرحبا");
    assert!((value["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    // Unset options are omitted from the wire format
    assert!(value.get("max_tokens").is_none());
}

/// Test OpenAI request max_tokens serialization
#[test]
fn test_openai_request_withMaxTokens_shouldSerializeMaxTokens() {
    let request = OpenAIRequest::new("gpt-3.5-turbo")
        .add_message("user", "Hello")
        .max_tokens(10);

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["max_tokens"], 10);
    assert!(value.get("temperature").is_none());
}

/// Test text extraction from an OpenAI response
#[test]
fn test_openai_extract_text_withChoices_shouldReturnFirstMessage() {
    let response = OpenAIResponse {
        choices: vec![OpenAIChoice {
            message: OpenAIMessage {
                role: "assistant".to_string(),
                content: "Hello world".to_string(),
            },
        }],
        usage: None,
    };

    assert_eq!(OpenAI::extract_text(&response), "Hello world");
}

/// Test text extraction from an empty OpenAI response
#[test]
fn test_openai_extract_text_withNoChoices_shouldReturnEmptyString() {
    let response = OpenAIResponse {
        choices: Vec::new(),
        usage: None,
    };

    assert_eq!(OpenAI::extract_text(&response), "");
}

/// Test Ollama request serialization shape
#[test]
fn test_ollama_request_withSystemAndTemperature_shouldSerializeExpectedFields() {
    let request = GenerationRequest::new("llama2", "Translate this")
        .system("You are a translator.")
        .temperature(0.3);

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["model"], "llama2");
    assert_eq!(value["prompt"], "Translate this");
    assert_eq!(value["system"], "You are a translator.");
    assert!((value["options"]["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    // Responses are requested as a single JSON object
    assert_eq!(value["stream"], false);
}

/// Test text extraction from an Ollama response
#[test]
fn test_ollama_extract_text_shouldReturnResponseField() {
    let response = GenerationResponse {
        model: "llama2".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        response: "Hello world".to_string(),
        done: true,
        prompt_eval_count: Some(10),
        eval_count: Some(20),
    };

    assert_eq!(Ollama::extract_text(&response), "Hello world");
}
