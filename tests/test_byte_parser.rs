use phylovec::parser::byte_parser::{ByteParser, ConsumeMode};
use phylovec::parser::parsing_error::ParsingErrorType;

#[test]
fn test_peek_and_next() {
    let mut parser = ByteParser::for_str("ab");
    assert_eq!(parser.peek(), Some(b'a'));
    assert_eq!(parser.next_byte(), Some(b'a'));
    assert_eq!(parser.next_byte(), Some(b'b'));
    assert_eq!(parser.next_byte(), None);
    assert!(parser.is_eof());
}

#[test]
fn test_skip_comment_and_whitespace() {
    let mut parser = ByteParser::for_str("  [one] \n [two]\t(");
    parser.skip_comment_and_whitespace().unwrap();
    assert!(parser.peek_is(b'('));

    let mut unclosed = ByteParser::for_str(" [never closed");
    let err = unclosed.skip_comment_and_whitespace().unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnclosedComment);
}

#[test]
fn test_consume() {
    let mut parser = ByteParser::for_str("(A,B);rest");
    assert!(parser.consume_if(b'('));
    assert!(!parser.consume_if(b')'));
    assert!(parser.peek_is_sequence(b"A,B"));

    assert_eq!(parser.consume_until_any(b",;", ConsumeMode::Exclusive), Some(b','));
    assert!(parser.peek_is(b','));
    assert!(parser.consume_until(b';', ConsumeMode::Inclusive));
    assert_eq!(parser.position(), 6);
    assert!(!parser.consume_until(b'#', ConsumeMode::Inclusive));
    assert!(parser.is_eof());

    parser.set_position(1);
    assert_eq!(parser.get_context_as_string(3), "A,B");
}

#[test]
fn test_parse_labels() {
    let delimiters = b"(),:; ";
    let mut parser = ByteParser::for_str("Apteryx_owenii:1 'Wilson''s petrel',");

    assert_eq!(parser.parse_label(delimiters).unwrap(), "Apteryx_owenii");
    assert!(parser.consume_if(b':'));
    assert!(parser.consume_if(b'1'));
    assert_eq!(parser.parse_label(delimiters).unwrap(), "Wilson's petrel");
    assert!(parser.peek_is(b','));
}

#[test]
fn test_parse_utf8_labels() {
    let mut parser = ByteParser::for_str("'Pūteketeke';");
    assert_eq!(parser.parse_label(b";").unwrap(), "Pūteketeke");

    let mut invalid = ByteParser::from_bytes(&[b'A', 0xFF, b';']);
    assert!(invalid.parse_label(b";").is_err());
}

#[test]
fn test_unclosed_quote() {
    let mut parser = ByteParser::for_str("'no end");
    let err = parser.parse_label(b";").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnclosedQuote);
}
