//! Tests for the chat request envelope

use chatwire_core::protocol::*;
use serde_json::json;

fn vision_request() -> ChatRequest {
    let mut request = ChatRequest::new(
        "gpt-4o",
        vec![
            Message::system("You describe pictures."),
            Message::user_parts(vec![
                ContentPart::text("What is in this image?"),
                ContentPart::image(vec![0xFF, 0xD8], None),
            ])
            .unwrap(),
        ],
    );
    request.set_stream(true);
    request
}

#[test]
fn test_vision_request_round_trip_preserves_order_and_stream() {
    let request = vision_request();
    let json = request.to_json_string().unwrap();
    let parsed = ChatRequest::from_json_str(&json).unwrap();

    assert_eq!(parsed, request);
    assert!(parsed.stream);
    assert_eq!(parsed.messages[0].role(), Role::System);
    assert_eq!(parsed.messages[1].role(), Role::User);

    let parts = match parsed.messages[1].content() {
        Some(MessageContent::Parts(parts)) => parts,
        other => panic!("expected parts, got {other:?}"),
    };
    assert_eq!(parts[0].as_text(), Some("What is in this image?"));
    assert_eq!(parts[1].as_image().unwrap().url, "data:image/jpeg;base64,/9g=");
}

#[test]
fn test_vision_request_wire_shape() {
    assert_eq!(
        vision_request().to_wire().unwrap(),
        json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": "You describe pictures."},
                {"role": "user", "content": [
                    {"type": "text", "text": "What is in this image?"},
                    {"type": "image_url", "image_url": {
                        "url": "data:image/jpeg;base64,/9g=",
                        "detail": "high"
                    }}
                ]}
            ],
            "stream": true
        })
    );
}

#[test]
fn test_external_key_names() {
    let request = ChatRequest::new("gpt-4o", vec![Message::user("Hello")])
        .with_penalties(Some(0.5), Some(-0.5))
        .with_logit_bias("50256", -100)
        .with_logprobs(Some(3))
        .with_max_tokens(64)
        .with_n(2)
        .with_seed(7)
        .with_top_p(0.9)
        .with_temperature(0.5)
        .with_user("user-1")
        .with_stop("END")
        .with_response_format(ResponseFormat::JsonObject);

    let value = request.to_wire().unwrap();
    assert_eq!(value["frequency_penalty"], json!(0.5));
    assert_eq!(value["presence_penalty"], json!(-0.5));
    assert_eq!(value["logit_bias"], json!({"50256": -100}));
    assert_eq!(value["logprobs"], json!(true));
    assert_eq!(value["top_logprobs"], json!(3));
    assert_eq!(value["max_tokens"], json!(64));
    assert_eq!(value["n"], json!(2));
    assert_eq!(value["seed"], json!(7));
    assert_eq!(value["top_p"], json!(0.9));
    assert_eq!(value["temperature"], json!(0.5));
    assert_eq!(value["user"], json!("user-1"));
    assert_eq!(value["stop"], json!("END"));
    assert_eq!(value["response_format"], json!({"type": "json_object"}));
    assert_eq!(value["stream"], json!(false));

    assert_eq!(ChatRequest::from_wire(value).unwrap(), request);
}

#[test]
fn test_optional_fields_are_omitted() {
    let json = ChatRequest::new("gpt-4o", vec![Message::user("Hello")])
        .to_json_string()
        .unwrap();
    for key in ["top_p", "temperature", "tools", "tool_choice", "stop", "stream_options"] {
        assert!(!json.contains(&format!("\"{key}\"")), "{key} should be omitted");
    }
    assert!(json.contains("\"stream\":false"));
}

#[test]
fn test_stop_list_round_trip() {
    let request = ChatRequest::new("m", vec![Message::user("count")])
        .with_stop(vec!["5".to_string(), "STOP".to_string()]);
    let value = request.to_wire().unwrap();
    assert_eq!(value["stop"], json!(["5", "STOP"]));
    assert_eq!(ChatRequest::from_wire(value).unwrap().stop, request.stop);
}

#[test]
fn test_tool_choice_round_trips() {
    let named = ToolChoice::function("x");
    assert_eq!(ToolChoice::from_wire(named.to_wire().unwrap()).unwrap(), named);
    assert_eq!(ToolChoice::None.to_json_string().unwrap(), "\"none\"");
    assert_eq!(ToolChoice::Auto.to_json_string().unwrap(), "\"auto\"");
    assert_eq!(ToolChoice::from_json_str("\"auto\"").unwrap(), ToolChoice::Auto);
}

#[test]
fn test_request_with_tools() {
    let request = ChatRequest::new("gpt-4o", vec![Message::user("Search for info")])
        .with_tools(vec![ToolDefinition::function(
            "search",
            Some("Search the web".to_string()),
            Some(
                FunctionParameters::object()
                    .with_property("query", Property::new(JsonType::String))
                    .with_required(["query"]),
            ),
        )])
        .with_tool_choice(ToolChoice::function("search"));

    let value = request.to_wire().unwrap();
    assert_eq!(value["tools"][0]["type"], json!("function"));
    assert_eq!(value["tools"][0]["function"]["parameters"]["required"], json!(["query"]));
    assert_eq!(
        value["tool_choice"],
        json!({"type": "function", "function": {"name": "search"}})
    );
    assert_eq!(ChatRequest::from_wire(value).unwrap(), request);
}

#[test]
fn test_json_schema_response_format() {
    let format = ResponseFormat::JsonSchema {
        json_schema: JsonSchemaFormat {
            name: "person".to_string(),
            description: None,
            schema: Some(json!({"type": "object", "properties": {"age": {"type": "number"}}})),
            strict: Some(true),
        },
    };
    let value = format.to_wire().unwrap();
    assert_eq!(value["type"], json!("json_schema"));
    assert_eq!(value["json_schema"]["name"], json!("person"));
    assert!(value["json_schema"].get("description").is_none());
    assert_eq!(ResponseFormat::from_wire(value).unwrap(), format);
}

#[test]
fn test_streaming_options() {
    let request = ChatRequest::new("m", vec![Message::user("hi")]).with_streaming(true);
    let value = request.to_wire().unwrap();
    assert_eq!(value["stream"], json!(true));
    assert_eq!(value["stream_options"], json!({"include_usage": true}));
}

#[test]
fn test_bad_message_is_located_inside_request() {
    let err = ChatRequest::from_wire(json!({
        "model": "m",
        "messages": [{"role": "user", "content": "hi"}, {"role": "tool", "content": "x"}]
    }))
    .unwrap_err();
    assert_eq!(err.union(), Some(UnionKind::Message));
    assert_eq!(err.path(), Some("messages[1]"));
    assert!(err.to_string().contains("tool message has an invalid shape"));
}

#[test]
fn test_nested_union_failures_keep_their_kind() {
    let base = || json!({"model": "m", "messages": [{"role": "user", "content": "hi"}]});

    let mut request = base();
    request["messages"][0]["content"] = json!([]);
    let err = ChatRequest::from_wire(request).unwrap_err();
    assert_eq!(err.union(), Some(UnionKind::MessageContent));
    assert_eq!(err.path(), Some("messages[0].content"));

    let mut request = base();
    request["tool_choice"] = json!("required");
    let err = ChatRequest::from_wire(request).unwrap_err();
    assert_eq!(err.union(), Some(UnionKind::ToolChoice));
    assert_eq!(err.path(), Some("tool_choice"));

    let mut request = base();
    request["stop"] = json!(["a", 1]);
    let err = ChatRequest::from_json_str(&request.to_string()).unwrap_err();
    assert_eq!(err.union(), Some(UnionKind::Stop));
    assert_eq!(err.path(), Some("stop"));
}

#[test]
fn test_bad_tool_choice_is_mismatch() {
    let err = ToolChoice::from_wire(json!({"type": "function"})).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::DecodeMismatch { union: UnionKind::ToolChoice, .. }
    ));
}
