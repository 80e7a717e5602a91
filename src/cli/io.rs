//! JSON-lines I/O for the `check` command
//!
//! - Input: one JSON request per line
//! - Output: one JSON response per line
//! - Blank input lines are skipped

use std::io::{BufRead, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Reads JSON request lines. Unparseable lines yield `BadRequest`.
pub fn read_requests<R: BufRead>(input: R) -> impl Iterator<Item = CliResult<Value>> {
    input.lines().filter_map(|line| match line {
        Err(e) => Some(Err(CliError::from(e))),
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(
            serde_json::from_str(&line)
                .map_err(|e| CliError::bad_request(format!("Invalid JSON: {}", e))),
        ),
    })
}

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });
    write_line(out, &response)
}

/// Write an error response
pub fn write_error<W: Write>(out: &mut W, err: &CliError) -> CliResult<()> {
    let mut response = json!({
        "status": "error",
        "code": err.code_str(),
        "message": err.message()
    });
    if let Some(details) = err.details() {
        response["errors"] = details.clone();
    }
    write_line(out, &response)
}

fn write_line<W: Write>(out: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_requests_skips_blank_lines() {
        let input = Cursor::new("{\"op\":\"dump\"}\n\n   \nnot json\n");
        let results: Vec<_> = read_requests(input).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap()["op"], "dump");
        assert_eq!(
            results[1].as_ref().unwrap_err().code_str(),
            "RECORD_CLI_BAD_REQUEST"
        );
    }

    #[test]
    fn test_write_response_one_line() {
        let mut out = Vec::new();
        write_response(&mut out, json!({"age": 22})).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "{\"status\":\"ok\",\"data\":{\"age\":22}}\n");
    }

    #[test]
    fn test_write_error_shape() {
        let mut out = Vec::new();
        write_error(&mut out, &CliError::not_constructed()).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["code"], "RECORD_CLI_NOT_CONSTRUCTED");
        assert!(parsed.get("errors").is_none());
    }
}
