//! Text program format.
//!
//! One instruction byte per line, written as a binary literal such as
//! `10000010`. Everything after `#` is a comment. Blank and comment-only lines
//! are skipped and do not take up an address.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{Ls8Error, Result};

pub fn parse_program(text: &str) -> Result<Vec<u8>> {
    let mut program = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let code = raw.split('#').next().unwrap_or("").trim();
        if code.is_empty() {
            continue;
        }
        program.push(parse_byte(code).ok_or_else(|| Ls8Error::Parse {
            line: idx + 1,
            text: code.to_string(),
        })?);
    }
    Ok(program)
}

pub fn load_file(path: &Path) -> Result<Vec<u8>> {
    let text = fs::read_to_string(path)?;
    let program = parse_program(&text)?;
    debug!(path = %path.display(), bytes = program.len(), "parsed program");
    Ok(program)
}

fn parse_byte(literal: &str) -> Option<u8> {
    if literal.is_empty() || literal.len() > 8 {
        return None;
    }
    if !literal.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    u8::from_str_radix(literal, 2).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let text = "\
# print8.ls8

10000010 # LDI R0,8
00000000
00001000
   01000111   # PRN R0
00000000
00000001 # HLT
";
        assert_eq!(
            parse_program(text).unwrap(),
            vec![0x82, 0x00, 0x08, 0x47, 0x00, 0x01]
        );
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(parse_program("00000001\r\n").unwrap(), vec![1]);
    }

    #[test]
    fn short_literals_are_accepted() {
        assert_eq!(parse_program("1\n101").unwrap(), vec![1, 5]);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let err = parse_program("00000001\n\n1000002\n").unwrap_err();
        match err {
            Ls8Error::Parse { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "1000002");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(matches!(
            parse_program("100000001"),
            Err(Ls8Error::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_program("+1010"),
            Err(Ls8Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn empty_text_yields_empty_program() {
        assert!(parse_program("# nothing here\n\n").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("missing.ls8")).unwrap_err();
        assert!(matches!(err, Ls8Error::Io(_)));
    }
}
