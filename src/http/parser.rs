use crate::http::error::ParseError;

pub const HTTP_VERSION: &str = "HTTP/1.1";
pub const CRLF: &[u8] = b"\r\n";

/// The three tokens of a request line, as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

/// Strips the CRLF ending off a line read up to `\n`.
///
/// A line cut short by EOF has no ending and is returned whole. A bare `\n`
/// ending yields `None`.
pub fn strip_line_ending(line: &[u8]) -> Option<&[u8]> {
    match line.strip_suffix(CRLF) {
        Some(stripped) => Some(stripped),
        None if line.ends_with(b"\n") => None,
        None => Some(line),
    }
}

pub fn parse_request_line(line: &[u8]) -> Result<RequestLine, ParseError> {
    let line = strip_line_ending(line).ok_or(ParseError::MalformedRequestLine)?;
    let line = std::str::from_utf8(line).map_err(|_| ParseError::MalformedRequestLine)?;

    let parts: Vec<&str> = line.split_whitespace().collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine);
    };

    if version != HTTP_VERSION {
        return Err(ParseError::VersionNotSupported(version.to_string()));
    }

    if !target.starts_with('/') {
        return Err(ParseError::InvalidTarget(target.to_string()));
    }

    Ok(RequestLine {
        method: method.to_string(),
        target: target.to_string(),
        version: version.to_string(),
    })
}

/// Checks one header line and returns it without its line ending.
///
/// Only validates that the line is text and has a `:`; splitting happens
/// later when the headers are first read.
pub fn parse_header_line(line: &[u8]) -> Result<String, ParseError> {
    let line = strip_line_ending(line).ok_or(ParseError::InvalidHeader)?;
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidHeader)?;

    if !line.contains(':') {
        return Err(ParseError::InvalidHeader);
    }

    Ok(line.to_string())
}

/// Splits a header line on its first `:`.
///
/// Exactly one leading space is removed from the value. Trailing whitespace
/// is kept as is.
pub fn split_header_line(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    Some((name, value.strip_prefix(' ').unwrap_or(value)))
}

pub fn parse_content_length(value: &str) -> Result<usize, ParseError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidContentLength(value.to_string()));
    }

    value
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength(value.to_string()))
}

/// Finds the body length declared by raw header lines.
///
/// Names match case-insensitively. Every occurrence must be valid and all of
/// them must agree, otherwise the framing is ambiguous.
pub fn content_length(lines: &[String]) -> Result<Option<usize>, ParseError> {
    let mut length = None;

    for (name, value) in lines.iter().filter_map(|line| split_header_line(line)) {
        if !name.eq_ignore_ascii_case("Content-Length") {
            continue;
        }

        let parsed = parse_content_length(value)?;
        match length {
            Some(previous) if previous != parsed => {
                return Err(ParseError::ConflictingContentLength(previous, parsed));
            }
            _ => length = Some(parsed),
        }
    }

    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_request_line() {
        let line = parse_request_line(b"GET / HTTP/1.1\r\n").unwrap();

        assert_eq!(line.method, "GET");
        assert_eq!(line.target, "/");
        assert_eq!(line.version, "HTTP/1.1");
    }

    #[test]
    fn header_value_loses_one_leading_space_only() {
        assert_eq!(split_header_line("Host: a"), Some(("Host", "a")));
        assert_eq!(split_header_line("Host:  a "), Some(("Host", " a ")));
        assert_eq!(split_header_line("Host:a"), Some(("Host", "a")));
        assert_eq!(split_header_line("X-Time: 12:30"), Some(("X-Time", "12:30")));
    }

    #[test]
    fn content_length_rejects_signs_and_spaces() {
        assert_eq!(parse_content_length("42").unwrap(), 42);
        assert!(parse_content_length("-1").is_err());
        assert!(parse_content_length("+1").is_err());
        assert!(parse_content_length(" 1").is_err());
        assert!(parse_content_length("").is_err());
    }

    #[test]
    fn bare_lf_line_endings_are_rejected() {
        assert!(matches!(
            parse_request_line(b"GET / HTTP/1.1\n"),
            Err(ParseError::MalformedRequestLine)
        ));
        assert!(matches!(
            parse_header_line(b"Host: a\n"),
            Err(ParseError::InvalidHeader)
        ));
        assert_eq!(parse_header_line(b"Host: a\r\n").unwrap(), "Host: a");
    }

    #[test]
    fn content_length_across_case_variants() {
        let lines = |raw: &[&str]| raw.iter().map(|l| l.to_string()).collect::<Vec<_>>();

        assert_eq!(content_length(&lines(&["Host: a"])).unwrap(), None);
        assert_eq!(
            content_length(&lines(&["Content-Length: 5", "content-length: 5"])).unwrap(),
            Some(5)
        );
        assert!(matches!(
            content_length(&lines(&["Content-Length: 3", "content-length: 5"])),
            Err(ParseError::ConflictingContentLength(3, 5))
        ));
        assert!(matches!(
            content_length(&lines(&["Content-Length: 3", "CONTENT-LENGTH: x"])),
            Err(ParseError::InvalidContentLength(_))
        ));
    }
}
