//! Build a tool-calling conversation and print its wire form
//!
//! Run with: cargo run --example build_request

use chatwire_core::protocol::{
    ChatRequest, FunctionParameters, JsonType, Message, Property, ToolCall, ToolChoice,
    ToolDefinition, WireFormat,
};
use chatwire_core::validation::RequestValidator;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let weather = ToolDefinition::function(
        "get_weather",
        Some("Current weather for a city".to_string()),
        Some(
            FunctionParameters::object()
                .with_property(
                    "city",
                    Property::new(JsonType::String).with_description("City name"),
                )
                .with_property(
                    "unit",
                    Property::new(JsonType::String).with_enum(["celsius", "fahrenheit"]),
                )
                .with_required(["city"]),
        ),
    );

    let mut request = ChatRequest::new(
        "gpt-4o",
        vec![
            Message::system("Answer with the tool when it helps."),
            Message::user("What's the weather in Lyon?"),
            Message::assistant_tool_calls(vec![ToolCall::function(
                "call_1",
                "get_weather",
                r#"{"city": "Lyon"}"#,
            )]),
            Message::tool("call_1", r#"{"temp_c": 18}"#)?,
        ],
    )
    .with_temperature(0.2)
    .with_tools(vec![weather])
    .with_tool_choice(ToolChoice::Auto);

    RequestValidator::new().validate(&request)?;

    println!("{}", serde_json::to_string_pretty(&request.to_wire()?)?);

    request.set_stream(true);
    println!("streaming variant: {}", request.to_json_string()?);
    Ok(())
}
