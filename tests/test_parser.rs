use kastle::http::error::{ErrorKind, ParseError};
use kastle::http::parser::{
    parse_content_length, parse_header_line, parse_request_line, split_header_line,
};

#[test]
fn test_parse_simple_request_line() {
    let line = parse_request_line(b"GET / HTTP/1.1\r\n").unwrap();

    assert_eq!(line.method, "GET");
    assert_eq!(line.target, "/");
    assert_eq!(line.version, "HTTP/1.1");
}

#[test]
fn test_parse_request_line_with_query_string() {
    let line = parse_request_line(b"GET /search?q=rust HTTP/1.1\r\n").unwrap();

    assert_eq!(line.target, "/search?q=rust");
}

#[test]
fn test_parse_request_line_keeps_unknown_method_token() {
    // Routing decides what to do with it.
    let line = parse_request_line(b"BREW /pot HTTP/1.1\r\n").unwrap();

    assert_eq!(line.method, "BREW");
}

#[test]
fn test_parse_request_line_wrong_token_count() {
    for raw in [
        &b"GARBAGE\r\n"[..],
        b"GET /\r\n",
        b"GET / HTTP/1.1 extra\r\n",
        b"\r\n",
    ] {
        let result = parse_request_line(raw);
        assert!(
            matches!(result, Err(ParseError::MalformedRequestLine)),
            "{:?}",
            String::from_utf8_lossy(raw)
        );
    }
}

#[test]
fn test_parse_request_line_unsupported_version() {
    let result = parse_request_line(b"GET / HTTP/1.0\r\n");

    match result {
        Err(ParseError::VersionNotSupported(version)) => assert_eq!(version, "HTTP/1.0"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_parse_request_line_version_is_case_sensitive() {
    let err = parse_request_line(b"GET / http/1.1\r\n").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::HttpVersionNotSupported);
}

#[test]
fn test_parse_request_line_target_without_slash() {
    let err = parse_request_line(b"GET about HTTP/1.1\r\n").unwrap_err();

    assert!(matches!(err, ParseError::InvalidTarget(_)));
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[test]
fn test_parse_request_line_invalid_utf8() {
    let result = parse_request_line(b"GET /\xff HTTP/1.1\r\n");

    assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
}

#[test]
fn test_parse_header_line_strips_crlf() {
    let line = parse_header_line(b"Host: example.com\r\n").unwrap();

    assert_eq!(line, "Host: example.com");
}

#[test]
fn test_parse_malformed_header() {
    let result = parse_header_line(b"BrokenHeader\r\n");

    assert!(matches!(result, Err(ParseError::InvalidHeader)));
}

#[test]
fn test_split_header_line_is_narrow() {
    // One leading space goes, nothing else is trimmed.
    assert_eq!(
        split_header_line("Content-Type: application/json"),
        Some(("Content-Type", "application/json"))
    );
    assert_eq!(split_header_line("X-Pad:  two "), Some(("X-Pad", " two ")));
    assert_eq!(split_header_line("X-Empty:"), Some(("X-Empty", "")));
    assert_eq!(split_header_line("NoColon"), None);
}

#[test]
fn test_parse_content_length() {
    assert_eq!(parse_content_length("0").unwrap(), 0);
    assert_eq!(parse_content_length("1024").unwrap(), 1024);
}

#[test]
fn test_parse_content_length_rejects_non_numeric() {
    for value in ["abc", "1e3", "0x10", "5 ", "-5", "__import__('os')"] {
        let err = parse_content_length(value).unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength(_)), "{}", value);
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}

#[test]
fn test_parse_content_length_overflow() {
    let result = parse_content_length("99999999999999999999999999");

    assert!(matches!(result, Err(ParseError::InvalidContentLength(_))));
}
