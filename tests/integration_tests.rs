use msgwire::{
  Content, Contents, Error, MediaType, Message, MessageRequest,
  Metadata, Role
};
use serde_json::json;

fn init_logger()
{   let _ = env_logger::builder().is_test(true).try_init();
}

fn hello_request() -> MessageRequest
{   MessageRequest::builder()
      .model("claude-3")
      .max_tokens(1024)
      .message(Message::user("Hello"))
      .build()
      .expect("all required fields set")
}

#[test]
fn test_minimal_request_wire_format()
{   init_logger();
    let request = hello_request();

    assert_eq!(
      request.to_json().unwrap(),
      r#"{"model":"claude-3","max_tokens":1024,"messages":[{"role":"user","content":[{"type":"text","text":"Hello"}]}]}"#
    );
    // diagnostics print the same document
    assert_eq!(request.to_string(), request.to_json().unwrap());
}

#[test]
fn test_unset_optionals_are_omitted()
{   init_logger();
    let value = hello_request().to_json_value().unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["max_tokens", "messages", "model"]);
}

#[test]
fn test_all_optionals_are_emitted()
{   init_logger();
    let request = MessageRequest::builder()
      .model("claude-3-opus")
      .max_tokens(256)
      .messages(vec![
        Message::user("Hi")
      , Message::assistant("Hello, how can I help?")
      , Message::user("Tell me a joke")
      ])
      .system("You are terse.")
      .user_id("13803d75-b4b5-4c3e-b2a2-6f21399b021b")
      .stop_sequences(["\n\nHuman:", "END"])
      .stream(false)
      .temperature(0.5)
      .top_p(0.25)
      .top_k(40)
      .build()
      .unwrap();

    assert_eq!(
      request.to_json_value().unwrap(),
      json!({
        "model": "claude-3-opus",
        "max_tokens": 256,
        "messages": [
          {"role": "user", "content": [{"type": "text", "text": "Hi"}]},
          {"role": "assistant", "content": [
            {"type": "text", "text": "Hello, how can I help?"}
          ]},
          {"role": "user", "content": [
            {"type": "text", "text": "Tell me a joke"}
          ]}
        ],
        "system": "You are terse.",
        "metadata": {"user_id": "13803d75-b4b5-4c3e-b2a2-6f21399b021b"},
        "stop_sequences": ["\n\nHuman:", "END"],
        "stream": false,
        "temperature": 0.5,
        "top_p": 0.25,
        "top_k": 40
      })
    );
}

#[test]
fn test_partial_optionals()
{   init_logger();
    let request = MessageRequest::builder()
      .model("claude-3")
      .max_tokens(10)
      .message(Message::user("x"))
      .stream(true)
      .stop_sequence("STOP")
      .build()
      .unwrap();

    let value = request.to_json_value().unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 5);
    assert_eq!(object["stream"], json!(true));
    assert_eq!(object["stop_sequences"], json!(["STOP"]));
    assert!(!object.contains_key("temperature"));
    assert!(!object.contains_key("system"));
}

#[test]
fn test_builder_missing_model()
{   init_logger();
    let result = MessageRequest::builder()
      .max_tokens(1024)
      .message(Message::user("Hello"))
      .build();
    assert_eq!(
      result,
      Err(Error::MissingRequiredField("model".to_string()))
    );
}

#[test]
fn test_builder_missing_max_tokens()
{   init_logger();
    let result = MessageRequest::builder()
      .model("claude-3")
      .message(Message::user("Hello"))
      .build();
    assert_eq!(
      result,
      Err(Error::MissingRequiredField("max_tokens".to_string()))
    );
}

#[test]
fn test_builder_missing_messages()
{   init_logger();
    let result = MessageRequest::builder()
      .model("claude-3")
      .max_tokens(1024)
      .build();
    assert_eq!(
      result,
      Err(Error::MissingRequiredField("messages".to_string()))
    );
}

#[test]
fn test_permissive_values_are_accepted()
{   init_logger();
    // empty history and out-of-range sampling are the server's call
    let request = MessageRequest::builder()
      .model("claude-3")
      .max_tokens(1)
      .messages(Vec::new())
      .temperature(7.5)
      .top_p(-1.0)
      .build()
      .unwrap();

    assert!(request.messages().is_empty());
    assert_eq!(request.temperature(), Some(7.5));
    assert_eq!(request.to_json_value().unwrap()["messages"], json!([]));
}

#[test]
fn test_new_matches_builder()
{   init_logger();
    let request = MessageRequest::new(
      "claude-3", 1024, vec![Message::user("Hello")]
    );
    assert_eq!(request, hello_request());
}

#[test]
fn test_string_coerces_to_message_content()
{   let message = Message::user("Hello");
    let content = message.content();

    assert_eq!(message.role(), Role::User);
    assert_eq!(content.len(), 1);
    let block = &content.as_slice()[0];
    assert_eq!(block.kind(), "text");
    assert_eq!(block.as_text(), Some("Hello"));
    assert!(block.source().is_none());
}

#[test]
fn test_string_coerces_to_content_block()
{   let block: Content = "Hello".into();
    assert_eq!(block, Content::Text { text: "Hello".to_string() });
    assert!(block.source().is_none());

    let owned: Content = String::from("Hi").into();
    assert_eq!(owned.as_text(), Some("Hi"));
}

#[test]
fn test_mixed_content_keeps_order()
{   let contents: Contents = vec![
      Content::text("Describe this:")
    , Content::image(MediaType::Png, vec![1u8, 2, 3])
    , "and be brief".into()
    ].into();

    let kinds: Vec<&str> = contents.iter().map(Content::kind).collect();
    assert_eq!(kinds, vec!["text", "image", "text"]);
    assert_eq!(contents.text(), "Describe this:and be brief");
}

#[test]
fn test_image_content_wire_format()
{   init_logger();
    let block = Content::image(MediaType::Png, vec![1u8, 2, 3]);

    assert_eq!(
      serde_json::to_value(&block).unwrap(),
      json!({
        "type": "image",
        "source": {
          "type": "base64",
          "media_type": "image/png",
          "data": "AQID"
        }
      })
    );
    assert!(block.as_text().is_none());
    assert_eq!(block.source().unwrap().data(), &[1u8, 2, 3]);
}

#[test]
fn test_round_trip_with_image()
{   init_logger();
    let request = MessageRequest::builder()
      .model("claude-3")
      .max_tokens(512)
      .message(Message::user(vec![
        Content::image(MediaType::Jpeg, b"\xff\xd8\xff\xe0".to_vec())
      , Content::text("What is in this picture?")
      ]))
      .message(Message::assistant("A cat."))
      .metadata(Metadata::new("user-42"))
      .temperature(0.75)
      .top_k(5)
      .build()
      .unwrap();

    let body = request.to_json().unwrap();
    let decoded = MessageRequest::from_json(&body).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn test_round_trip_minimal()
{   let request = hello_request();
    let decoded = MessageRequest::from_json(
      &request.to_json().unwrap()
    ).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn test_decode_bare_string_content()
{   init_logger();
    let request = MessageRequest::from_json(
      r#"{"model":"claude-3","max_tokens":1024,"messages":[{"role":"user","content":"Hello"}]}"#
    ).unwrap();
    assert_eq!(request, hello_request());
}

#[test]
fn test_decode_source_type_defaults_to_base64()
{   let block: Content = serde_json::from_value(json!({
      "type": "image",
      "source": {"media_type": "image/gif", "data": "AQID"}
    })).unwrap();
    assert_eq!(block, Content::image(MediaType::Gif, vec![1u8, 2, 3]));
}

#[test]
fn test_decode_missing_required_keys()
{   init_logger();
    let cases = [
      (json!({"max_tokens": 1, "messages": []}), "model")
    , (json!({"model": "m", "messages": []}), "max_tokens")
    , (json!({"model": "m", "max_tokens": 1}), "messages")
    , (json!({"model": null, "max_tokens": 1, "messages": []}), "model")
    ];
    for (document, field) in cases
    {   assert_eq!(
          MessageRequest::from_json(&document.to_string()),
          Err(Error::MissingRequiredField(field.to_string()))
        );
    }
}

#[test]
fn test_decode_missing_nested_field()
{   let result = MessageRequest::from_json(
      r#"{"model":"m","max_tokens":1,"messages":[],"metadata":{}}"#
    );
    assert_eq!(
      result,
      Err(Error::MissingRequiredField("user_id".to_string()))
    );
}

#[test]
fn test_decode_missing_block_fields()
{   init_logger();
    let cases = [
      (json!([{"type": "text"}]), "text")
    , (json!([{"type": "image"}]), "source")
    , (json!([{"type": "image", "source": {"media_type": "image/png"}}]), "data")
    , (json!([{"type": "image", "source": {"data": "AQID"}}]), "media_type")
    ];
    for (content, field) in cases
    {   let document = json!({
          "model": "m",
          "max_tokens": 1,
          "messages": [{"role": "user", "content": content}]
        });
        assert_eq!(
          MessageRequest::from_json(&document.to_string()),
          Err(Error::MissingRequiredField(field.to_string()))
        );
    }
}

#[test]
fn test_decode_content_of_wrong_type()
{   let result = MessageRequest::from_json(
      r#"{"model":"m","max_tokens":1,"messages":[{"role":"user","content":5}]}"#
    );
    assert!(matches!(result, Err(Error::TypeMismatch(_))));
}

#[test]
fn test_builder_rejects_non_finite_sampling()
{   init_logger();
    let base = || MessageRequest::builder()
      .model("claude-3")
      .max_tokens(16)
      .message(Message::user("Hello"));

    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY]
    {   assert!(matches!(
          base().temperature(value).build(),
          Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
          base().top_p(value).build(),
          Err(Error::TypeMismatch(_))
        ));
    }

    // finite values still go through untouched
    let request = base().temperature(0.5).build().unwrap();
    let decoded = MessageRequest::from_json(
      &request.to_json().unwrap()
    ).unwrap();
    assert_eq!(decoded.temperature(), Some(0.5));
}

#[test]
fn test_decode_type_mismatch()
{   init_logger();
    let bad = [
      r#"{"model":"m","max_tokens":"lots","messages":[]}"#
    , r#"{"model":"m","max_tokens":1,"messages":[{"role":"system","content":"x"}]}"#
    , r#"{"model":"m","max_tokens":1,"messages":[],"stream":"yes"}"#
    , r#"[1, 2, 3]"#
    ];
    for body in bad
    {   match MessageRequest::from_json(body)
        {   Err(Error::TypeMismatch(_)) => {}
          , other => panic!("expected TypeMismatch for {}: {:?}", body, other)
        }
    }
}

#[test]
fn test_decode_bad_base64_is_type_mismatch()
{   let result = MessageRequest::from_json(
      r#"{"model":"m","max_tokens":1,"messages":[{"role":"user","content":[{"type":"image","source":{"type":"base64","media_type":"image/png","data":"!!!"}}]}]}"#
    );
    assert!(matches!(result, Err(Error::TypeMismatch(_))));
}

#[test]
fn test_decode_not_json()
{   assert!(matches!(
      MessageRequest::from_json("model=claude-3"),
      Err(Error::Parse(_))
    ));
}

#[test]
fn test_media_type_parsing()
{   assert_eq!("image/webp".parse::<MediaType>(), Ok(MediaType::Webp));
    assert_eq!(MediaType::Jpeg.to_string(), "image/jpeg");
    assert!(matches!(
      "image/bmp".parse::<MediaType>(),
      Err(Error::TypeMismatch(_))
    ));
}

#[test]
fn test_request_is_shareable_across_threads()
{   let request = std::sync::Arc::new(hello_request());
    let handles: Vec<_> = (0..4)
      .map(|_| {
        let request = request.clone();
        std::thread::spawn(move || request.to_json().unwrap())
      })
      .collect();
    for handle in handles
    {   assert_eq!(handle.join().unwrap(), request.to_json().unwrap());
    }
}
