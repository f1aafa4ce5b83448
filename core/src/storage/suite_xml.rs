//! Reading and writing the `<codeforces-problem>` test-suite document.

use cfr_webclient::strip_blank_lines;
use quick_xml::{escape::escape, events::Event, Reader};

use crate::testing::{TestCase, TestSuite};

pub const SUITE_FILE_EXT: &str = "xml";

const ROOT_TAG: &str = "codeforces-problem";

#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error("Malformed XML at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("<case> #{case} has no <{field}>")]
    MissingField { case: usize, field: &'static str },

    #[error("Document ended inside <case> #{0}")]
    UnexpectedEof(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Url,
    Input,
    Output,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"url" => Some(Field::Url),
            b"input" => Some(Field::Input),
            b"output" => Some(Field::Output),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct PartialCase {
    input: Option<String>,
    output: Option<String>,
}

impl PartialCase {
    fn finish(self, case: usize) -> Result<TestCase, SuiteError> {
        let input = self.input.ok_or(SuiteError::MissingField {
            case,
            field: "input",
        })?;
        let output = self.output.ok_or(SuiteError::MissingField {
            case,
            field: "output",
        })?;
        Ok(TestCase::new(input, output))
    }
}

/// Parses a suite document. Every `<case>` yields one [`TestCase`], in document order.
pub fn parse(xml: &str) -> Result<TestSuite, SuiteError> {
    let mut reader = Reader::from_str(xml);

    let mut url: Option<String> = None;
    let mut cases = Vec::new();
    let mut current: Option<PartialCase> = None;
    let mut field: Option<(Field, String)> = None;

    loop {
        let event = reader.read_event().map_err(|e| SuiteError::Xml {
            position: reader.buffer_position(),
            source: e,
        })?;
        let xml_err = |e: quick_xml::Error| SuiteError::Xml {
            position: reader.buffer_position(),
            source: e,
        };

        match event {
            Event::Start(tag) => match tag.local_name().as_ref() {
                b"case" => current = Some(PartialCase::default()),
                name => {
                    field = Field::from_tag(name).map(|f| (f, String::new()));
                }
            },

            Event::Empty(tag) => {
                if let Some(f) = Field::from_tag(tag.local_name().as_ref()) {
                    store(f, String::new(), &mut url, &mut current);
                } else if tag.local_name().as_ref() == b"case" {
                    return Err(SuiteError::MissingField {
                        case: cases.len(),
                        field: "input",
                    });
                }
            }

            Event::Text(text) => {
                if let Some((_, buf)) = &mut field {
                    buf.push_str(&text.unescape().map_err(xml_err)?);
                }
            }

            Event::CData(data) => {
                if let Some((_, buf)) = &mut field {
                    buf.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }

            Event::End(tag) => match tag.local_name().as_ref() {
                b"case" => {
                    if let Some(partial) = current.take() {
                        cases.push(partial.finish(cases.len())?);
                    }
                }
                name => {
                    if let Some((f, buf)) = field.take() {
                        if Field::from_tag(name) == Some(f) {
                            store(f, buf, &mut url, &mut current);
                        }
                    }
                }
            },

            Event::Eof => break,

            _ => (),
        }
    }

    if current.is_some() {
        return Err(SuiteError::UnexpectedEof(cases.len()));
    }

    let suite = TestSuite::new(cases);
    Ok(match url {
        Some(url) => suite.with_source_url(url.trim()),
        None => suite,
    })
}

fn store(field: Field, text: String, url: &mut Option<String>, current: &mut Option<PartialCase>) {
    match (field, current) {
        (Field::Url, None) => *url = Some(text),
        (Field::Input, Some(case)) => case.input = Some(strip_blank_lines(text.lines())),
        (Field::Output, Some(case)) => case.output = Some(strip_blank_lines(text.lines())),
        (f, _) => log::debug!("Ignoring stray <{:?}> element", f),
    }
}

/// Renders a suite document. Payloads are escaped and framed by a newline on each side.
pub fn render(suite: &TestSuite) -> String {
    let payload_len: usize = suite
        .iter()
        .map(|c| c.input.len() + c.expected_output.len())
        .sum();
    let mut xml = String::with_capacity(256 + payload_len);
    xml.push_str("<?xml version='1.0' encoding='utf-8'?>\n");
    xml.push_str(&format!("<{}>\n", ROOT_TAG));
    if let Some(url) = suite.source_url() {
        xml.push_str(&format!("<url>{}</url>\n", escape(url)));
    }
    xml.push_str("<test-cases>\n");
    for case in suite {
        xml.push_str("<case>\n");
        push_payload(&mut xml, "input", &case.input);
        push_payload(&mut xml, "output", &case.expected_output);
        xml.push_str("</case>\n");
    }
    xml.push_str("</test-cases>\n");
    xml.push_str(&format!("</{}>\n", ROOT_TAG));
    xml
}

fn push_payload(xml: &mut String, tag: &str, payload: &str) {
    let body = strip_blank_lines(payload.lines());
    xml.push_str(&format!("<{}>\n{}</{}>\n", tag, escape(&body), tag));
}

#[cfg(test)]
mod test {
    use super::*;

    const DOC: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<codeforces-problem>
<url>https://codeforces.com/contest/1/problem/A</url>
<test-cases>
<case>
<input>
6 6 4
</input>
<output>
4
</output>
</case>
<case>
<input><![CDATA[
a < b && c
]]></input>
<output>

  x &amp; y

</output>
</case>
</test-cases>
</codeforces-problem>
"#;

    #[test]
    fn parse_document() {
        let suite = parse(DOC).unwrap();
        assert_eq!(
            suite.source_url(),
            Some("https://codeforces.com/contest/1/problem/A")
        );
        assert_eq!(
            suite.cases(),
            [
                TestCase::new("6 6 4\n", "4\n"),
                TestCase::new("a < b && c\n", "  x & y\n"),
            ]
        );
    }

    #[test]
    fn render_then_parse_keeps_cases() {
        let suite = parse(DOC).unwrap();
        let rendered = render(&suite);
        assert!(rendered
            .starts_with("<?xml version='1.0' encoding='utf-8'?>\n<codeforces-problem>\n"));
        assert!(rendered.contains("<input>\na &lt; b &amp;&amp; c\n</input>"));
        assert_eq!(parse(&rendered).unwrap(), suite);
    }

    #[test]
    fn case_without_output_is_an_error() {
        let doc = "<codeforces-problem><test-cases><case><input>1</input></case></test-cases></codeforces-problem>";
        assert!(matches!(
            parse(doc),
            Err(SuiteError::MissingField {
                case: 0,
                field: "output"
            })
        ));
    }

    #[test]
    fn truncated_document_is_an_error() {
        let doc = "<codeforces-problem><test-cases><case><input>1</input>";
        assert!(parse(doc).is_err());
    }

    #[test]
    fn empty_suite() {
        let suite = parse("<codeforces-problem><test-cases/></codeforces-problem>").unwrap();
        assert!(suite.is_empty());
        assert_eq!(suite.source_url(), None);
    }

    #[test]
    fn payloads_lose_blank_edge_lines_only() {
        let doc = "<codeforces-problem><test-cases><case>\
            <input>\n\n1 2\n\n3\n\n</input><output>x</output>\
            </case></test-cases></codeforces-problem>";
        let suite = parse(doc).unwrap();
        assert_eq!(suite.cases()[0].input, "1 2\n\n3\n");
        assert_eq!(suite.cases()[0].expected_output, "x\n");
        assert!(render(&suite).contains("<input>\n1 2\n\n3\n</input>"));
    }
}
