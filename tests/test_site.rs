use tinyhttpd::http::connection::Connection;
use tinyhttpd::http::response::StatusCode;
use tinyhttpd::http::stream::PeekReader;
use tinyhttpd::site::Site;
use tinyhttpd::storage::MemoryStorage;

fn request(site: &mut Site, storage: &MemoryStorage, raw: &str) -> (StatusCode, String) {
    let mut conn = Connection::new(PeekReader::new(raw.as_bytes()), Vec::new());
    let status = site.serve(&mut conn, storage).unwrap();
    let (_, out) = conn.into_parts();
    let response = String::from_utf8(out).unwrap();
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}

fn site() -> Site {
    Site::new("box", vec!["led".to_string()], vec!["name".to_string()])
}

#[test]
fn test_form_values_are_decoded_and_substituted() {
    let mut site = site();
    let storage = MemoryStorage::new()
        .with_file("/web/index.htm", "Hi %name% on %server% at %uri% 100%%");
    let raw = "POST / HTTP/1.1\r\nContent-Length: 16\r\n\r\nname=Jane+Doe%21";

    let (status, body) = request(&mut site, &storage, raw);

    assert_eq!(status, StatusCode::Ok);
    assert_eq!(body, "Hi Jane Doe! on box at /index.htm 100%");
    assert_eq!(site.form_value("name"), Some("Jane Doe!"));
}

#[test]
fn test_form_values_persist_query_values_do_not() {
    let mut site = site();
    let storage = MemoryStorage::new().with_file("/web/s.htm", "[%led%|%name%]");

    request(
        &mut site,
        &storage,
        "POST /s.htm HTTP/1.1\r\nContent-Length: 6\r\n\r\nname=x",
    );
    let (_, body) = request(&mut site, &storage, "GET /s.htm?led=on HTTP/1.1\r\n\r\n");
    assert_eq!(body, "[on|x]");

    let (_, body) = request(&mut site, &storage, "GET /s.htm HTTP/1.1\r\n\r\n");
    assert_eq!(body, "[|x]");
}

#[test]
fn test_unknown_variable_renders_empty() {
    let mut site = site();
    let storage = MemoryStorage::new().with_file("/web/index.htm", "a%nothing%b");

    let (_, body) = request(&mut site, &storage, "GET / HTTP/1.1\r\n\r\n");
    assert_eq!(body, "ab");
}

#[test]
fn test_missing_page() {
    let mut site = site();
    let storage = MemoryStorage::new();

    let (status, body) = request(&mut site, &storage, "GET /gone.htm HTTP/1.1\r\n\r\n");
    assert_eq!(status, StatusCode::NotFound);
    assert!(body.contains("'/gone.htm'"));
}
