//! Tests for message construction and the role-dispatched wire encoding

use chatwire_core::protocol::*;
use proptest::prelude::*;
use serde_json::json;
use test_case::test_case;

fn round_trip(message: &Message) -> Message {
    let value = message.to_wire().unwrap();
    Message::from_wire(value).unwrap()
}

#[test]
fn test_message_construction() {
    let sys_msg = Message::system("You are a helpful assistant");
    assert_eq!(sys_msg.role(), Role::System);
    assert_eq!(sys_msg.text(), Some("You are a helpful assistant"));

    let user_msg = Message::user("Hello!");
    assert_eq!(user_msg.role(), Role::User);
    assert_eq!(user_msg.content(), Some(MessageContent::Text("Hello!".to_string())));

    let asst_msg = Message::assistant("Hi there! How can I help?");
    assert_eq!(asst_msg.role(), Role::Assistant);
    assert_eq!(asst_msg.text(), Some("Hi there! How can I help?"));

    let tool_msg = Message::tool("call_123", "Tool result").unwrap();
    assert_eq!(tool_msg.role(), Role::Tool);
    assert_eq!(tool_msg.tool_call_id(), Some("call_123"));
}

#[test]
fn test_accessors_are_role_agnostic() {
    let tool_msg = Message::tool("call_9", "done").unwrap();
    assert_eq!(tool_msg.name(), None);
    assert!(tool_msg.tool_calls().is_none());
    assert_eq!(tool_msg.content(), Some(MessageContent::Text("done".to_string())));

    let system = Message::new(Role::System, Some("rules".into()), Some("ops".into()), None, None)
        .unwrap();
    assert_eq!(system.name(), Some("ops"));
    assert_eq!(system.tool_call_id(), None);
    assert!(system.tool_calls().is_none());

    let call = ToolCall::function("call_1", "search", r#"{"q":"rust"}"#);
    let assistant = Message::assistant_tool_calls(vec![call.clone()]);
    assert_eq!(assistant.tool_calls(), Some(&[call][..]));
    assert_eq!(assistant.content(), None);
    assert_eq!(assistant.tool_call_id(), None);
}

#[test]
fn test_every_variant_round_trips() {
    let messages = vec![
        Message::new(Role::System, Some("Be terse".into()), Some("policy".into()), None, None)
            .unwrap(),
        MessageBuilder::new(Role::User)
            .with_content("Hi")
            .with_name("alice")
            .build()
            .unwrap(),
        Message::user_parts(vec![
            ContentPart::text("Look:"),
            ContentPart::image(vec![1u8, 2, 3], Some(ImageDetail::Auto)),
        ])
        .unwrap(),
        MessageBuilder::new(Role::Assistant)
            .with_content("Calling a tool")
            .with_name("bot")
            .with_tool_call(ToolCall::function("call_1", "lookup", "{\"id\": 7}"))
            .build()
            .unwrap(),
        Message::assistant_tool_calls(vec![ToolCall::function("call_2", "noop", "{}")]),
        Message::tool("call_1", "{\"found\": true}").unwrap(),
    ];

    for message in &messages {
        assert_eq!(&round_trip(message), message);
    }
}

#[test]
fn test_wire_shapes_are_flat() {
    assert_eq!(
        Message::tool("call_7", "42").unwrap().to_wire().unwrap(),
        json!({"role": "tool", "content": "42", "tool_call_id": "call_7"})
    );
    assert_eq!(
        Message::assistant_tool_calls(vec![ToolCall::function("c", "f", "{\"a\":1}")])
            .to_wire()
            .unwrap(),
        json!({
            "role": "assistant",
            "tool_calls": [{
                "id": "c",
                "type": "function",
                "function": {"name": "f", "arguments": "{\"a\":1}"}
            }]
        })
    );
}

#[test_case(Role::Tool, Some("result"), None ; "tool without call id")]
#[test_case(Role::Tool, Some("result"), Some("") ; "tool with empty call id")]
#[test_case(Role::Tool, None, Some("call_1") ; "tool without content")]
#[test_case(Role::User, None, None ; "user without content")]
#[test_case(Role::System, None, None ; "system without content")]
#[test_case(Role::User, Some("hi"), Some("call_1") ; "user with call id")]
fn test_inconsistent_fields_are_rejected(
    role: Role,
    content: Option<&str>,
    tool_call_id: Option<&str>,
) {
    let result = Message::new(
        role,
        content.map(str::to_string),
        None,
        None,
        tool_call_id.map(str::to_string),
    );
    match result {
        Err(ProtocolError::ConstructionRejected { role: rejected, .. }) => {
            assert_eq!(rejected, role)
        }
        other => panic!("expected ConstructionRejected, got {other:?}"),
    }
}

#[test]
fn test_fields_foreign_to_role_are_rejected() {
    let call = ToolCall::function("c", "f", "{}");
    assert!(Message::new(Role::User, Some("hi".into()), None, Some(vec![call]), None).is_err());
    assert!(MessageBuilder::new(Role::Tool)
        .with_content("x")
        .with_tool_call_id("c")
        .with_name("nope")
        .build()
        .is_err());
}

#[test_case(Role::System ; "system")]
#[test_case(Role::Assistant ; "assistant")]
#[test_case(Role::Tool ; "tool")]
fn test_parts_only_accepted_for_user(role: Role) {
    let err = Message::with_parts(role, vec![ContentPart::text("x")]).unwrap_err();
    assert!(matches!(err, ProtocolError::ConstructionRejected { .. }));
}

#[test]
fn test_empty_parts_rejected() {
    assert!(Message::with_parts(Role::User, vec![]).is_err());
    assert!(Message::user_parts(vec![]).is_err());
    assert!(Message::with_parts(Role::User, vec![ContentPart::text("ok")]).is_ok());
}

#[test]
fn test_assistant_without_content_or_calls_is_permitted() {
    let msg = Message::new(Role::Assistant, None, None, None, None).unwrap();
    assert_eq!(msg.to_wire().unwrap(), json!({"role": "assistant"}));
}

#[test_case(json!({"role": "user", "content": 5}), UnionKind::MessageContent, Some("content") ; "numeric content")]
#[test_case(json!({"role": "user", "content": []}), UnionKind::MessageContent, Some("content") ; "empty parts")]
#[test_case(json!({"role": "user", "content": {"text": "hi"}}), UnionKind::MessageContent, Some("content") ; "object content")]
#[test_case(json!({"role": "user", "content": [{"type": "audio", "data": "x"}]}), UnionKind::ContentPart, Some("content[0]") ; "unknown part")]
#[test_case(json!({"role": "user"}), UnionKind::Message, None ; "missing content")]
fn test_bad_user_payload_is_decode_mismatch(
    payload: serde_json::Value,
    union: UnionKind,
    path: Option<&str>,
) {
    let err = Message::from_wire(payload).unwrap_err();
    assert_eq!(err.union(), Some(union));
    assert_eq!(err.path(), path);
}

#[test]
fn test_bad_tool_call_is_located() {
    let err = Message::from_wire(json!({
        "role": "assistant",
        "tool_calls": [{"id": "call_1", "type": "retrieval", "function": {"name": "f", "arguments": "{}"}}]
    }))
    .unwrap_err();
    assert_eq!(err.union(), Some(UnionKind::ToolCall));
    assert_eq!(err.path(), Some("tool_calls[0]"));
}

#[test]
fn test_role_alone_selects_variant() {
    // A payload shaped like a tool reply but declaring `system` must decode as system
    let msg = Message::from_wire(json!({
        "role": "system",
        "content": "x",
        "tool_call_id": "call_1"
    }))
    .unwrap();
    assert_eq!(msg.role(), Role::System);
    assert_eq!(msg.tool_call_id(), None);

    // ...and a tool payload missing its id does not fall through to another role
    let err = Message::from_wire(json!({"role": "tool", "content": "x"})).unwrap_err();
    assert!(err.to_string().contains("tool message has an invalid shape"));
}

proptest! {
    #[test]
    fn prop_text_messages_round_trip(content in ".*", name in proptest::option::of("[a-z]{1,12}")) {
        let system = Message::new(Role::System, Some(content.clone()), name.clone(), None, None).unwrap();
        prop_assert_eq!(round_trip(&system), system);

        let user = Message::new(Role::User, Some(content.clone()), name, None, None).unwrap();
        prop_assert_eq!(round_trip(&user), user);
    }

    #[test]
    fn prop_tool_messages_round_trip(id in "[A-Za-z0-9_]{1,24}", content in ".*") {
        let tool = Message::tool(id, content).unwrap();
        prop_assert_eq!(round_trip(&tool), tool);
    }

    #[test]
    fn prop_image_bytes_encode_to_data_url(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let part = ContentPart::image(bytes, None);
        let url = &part.as_image().unwrap().url;
        prop_assert!(url.starts_with("data:image/jpeg;base64,"));
        let value = part.to_wire().unwrap();
        prop_assert_eq!(&value["image_url"]["detail"], &json!("high"));
    }
}
