use serde_json::{json, Value};
use todo_mcp::application::todo_service::TodoServiceImpl;
use todo_mcp::infrastructure::memory_repo::InMemoryTodoRepository;
use todo_mcp::mcp::McpServer;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

type Server = McpServer<TodoServiceImpl<InMemoryTodoRepository>>;

fn server() -> Server {
    McpServer::new(TodoServiceImpl::new(InMemoryTodoRepository::new()))
}

async fn rpc(server: &Server, id: u64, method: &str, params: Value) -> Value {
    let line = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }).to_string();
    let out = server.handle_line(&line).await.expect("requests get a response");
    serde_json::from_str(&out).unwrap()
}

async fn call(server: &Server, name: &str, arguments: Value) -> Value {
    let res = rpc(server, 1, "tools/call", json!({ "name": name, "arguments": arguments })).await;
    res["result"].clone()
}

fn payload(result: &Value) -> Value {
    serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn initialize_and_list_tools() {
    let server = server();
    let init = rpc(&server, 1, "initialize", json!({ "protocolVersion": "2024-11-05", "capabilities": {} })).await;
    assert_eq!(init["id"], json!(1));
    assert_eq!(init["result"]["protocolVersion"], json!("2024-11-05"));
    assert_eq!(init["result"]["serverInfo"]["name"], json!("todo-mcp"));

    let note = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string();
    assert!(server.handle_line(&note).await.is_none());

    let tools = rpc(&server, 2, "tools/list", Value::Null).await;
    let names: Vec<_> = tools["result"]["tools"].as_array().unwrap().iter().map(|t| t["name"].as_str().unwrap().to_string()).collect();
    assert_eq!(names, ["list_todos", "get_todo", "create_todo", "update_todo", "delete_todo"]);

    assert_eq!(rpc(&server, 3, "ping", Value::Null).await["result"], json!({}));
}

#[tokio::test]
async fn end_to_end_tool_scenario() {
    let server = server();

    let created = call(&server, "create_todo", json!({ "title": "Learn MCP", "status": "pending" })).await;
    assert_eq!(created["isError"], json!(false));
    assert_eq!(payload(&created)["id"], json!(1));

    let listed = payload(&call(&server, "list_todos", json!({})).await);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["title"], json!("Learn MCP"));
    assert_eq!(listed[0]["status"], json!("pending"));

    let updated = payload(&call(&server, "update_todo", json!({ "todo_id": 1, "status": "completed" })).await);
    assert_eq!(updated["id"], json!(1));
    assert_eq!(updated["status"], json!("completed"));
    assert_eq!(updated["title"], json!("Learn MCP"));

    let deleted = payload(&call(&server, "delete_todo", json!({ "todo_id": 1 })).await);
    assert_eq!(deleted, json!({ "deleted": true, "todo_id": 1 }));

    let missing = call(&server, "get_todo", json!({ "todo_id": 1 })).await;
    assert_eq!(missing["isError"], json!(true));
    assert_eq!(missing["content"][0]["text"], json!("Todo not found: 1"));
}

#[tokio::test]
async fn store_validation_errors_are_tool_errors() {
    let server = server();
    let res = call(&server, "create_todo", json!({ "title": "" })).await;
    assert_eq!(res["isError"], json!(true));

    let res = call(&server, "create_todo", json!({ "title": "A", "status": "bogus" })).await;
    assert_eq!(res["isError"], json!(true));
    assert!(res["content"][0]["text"].as_str().unwrap().contains("invalid status"));

    assert_eq!(payload(&call(&server, "list_todos", Value::Null).await), json!([]));
}

#[tokio::test]
async fn negative_ids_are_not_found_results() {
    let server = server();
    call(&server, "create_todo", json!({ "title": "a" })).await;
    for (name, args) in [
        ("get_todo", json!({ "todo_id": -1 })),
        ("update_todo", json!({ "todo_id": -1, "status": "completed" })),
        ("delete_todo", json!({ "todo_id": -1 })),
    ] {
        let res = call(&server, name, args).await;
        assert_eq!(res["isError"], json!(true), "{name}");
        assert_eq!(res["content"][0]["text"], json!("Todo not found: -1"), "{name}");
    }
}

#[tokio::test]
async fn null_id_requests_get_a_reply() {
    let server = server();
    let line = json!({ "jsonrpc": "2.0", "id": null, "method": "ping" }).to_string();
    let res: Value = serde_json::from_str(&server.handle_line(&line).await.expect("null id is not a notification")).unwrap();
    assert_eq!(res["id"], Value::Null);
    assert_eq!(res["result"], json!({}));
}

#[tokio::test]
async fn protocol_errors() {
    let server = server();

    let res: Value = serde_json::from_str(&server.handle_line("{not json").await.unwrap()).unwrap();
    assert_eq!(res["error"]["code"], json!(-32700));
    assert_eq!(res["id"], Value::Null);

    let res: Value = serde_json::from_str(&server.handle_line(r#"{"jsonrpc":"2.0","id":5}"#).await.unwrap()).unwrap();
    assert_eq!(res["error"]["code"], json!(-32600));
    assert_eq!(res["id"], json!(5));

    assert_eq!(rpc(&server, 6, "resources/list", Value::Null).await["error"]["code"], json!(-32601));

    let res = rpc(&server, 7, "tools/call", json!({ "name": "drop_tables", "arguments": {} })).await;
    assert_eq!(res["error"]["code"], json!(-32602));

    let res = rpc(&server, 8, "tools/call", json!({ "name": "get_todo", "arguments": { "todo_id": "one" } })).await;
    assert_eq!(res["error"]["code"], json!(-32602));

    assert!(server.handle_line("   ").await.is_none());
}

#[tokio::test]
async fn serves_newline_delimited_stream_until_eof() {
    let server = server();
    let (client, server_io) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server_io);
    let task = tokio::spawn(async move { server.serve(BufReader::new(server_read), server_write).await });

    let (client_read, mut client_write) = tokio::io::split(client);
    let requests = [
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": { "name": "create_todo", "arguments": { "title": "over the wire" } } }),
    ];
    for req in &requests {
        client_write.write_all(format!("{req}\n").as_bytes()).await.unwrap();
    }
    client_write.shutdown().await.unwrap();

    let mut lines = BufReader::new(client_read).lines();
    let first: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    let second: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(first["id"], json!(1));
    assert_eq!(second["id"], json!(2));
    assert_eq!(payload(&second["result"])["title"], json!("over the wire"));

    task.await.unwrap().unwrap();
    assert!(lines.next_line().await.unwrap().is_none());
}

#[tokio::test]
async fn both_front_ends_share_one_store() {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use todo_mcp::http::routing::{self, todos};
    use tower::ServiceExt;

    let service = TodoServiceImpl::new(InMemoryTodoRepository::new());
    let app = routing::app(todos::router(todos::AppState { service: service.clone() }));
    let mcp = McpServer::new(service);

    call(&mcp, "create_todo", json!({ "title": "from tools" })).await;

    let res = app.oneshot(Request::builder().uri("/todos/1").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(res.status(), 200);
    let todo: Value = serde_json::from_slice(&to_bytes(res.into_body(), 1024 * 1024).await.unwrap()).unwrap();
    assert_eq!(todo["title"], json!("from tools"));
}
