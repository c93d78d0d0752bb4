//! CSV export

use super::HEADER;
use crate::error::EncodingError;
use crate::results::SearchResult;

/// UTF-8 byte-order mark, so spreadsheet importers detect the encoding
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header row plus one row per result, BOM-prefixed
pub fn encode(results: &[SearchResult]) -> Result<Vec<u8>, EncodingError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(HEADER)?;
    for r in results {
        writer.write_record([
            r.rank.to_string().as_str(),
            r.title.as_str(),
            r.url.as_str(),
            r.description.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| EncodingError::Buffer(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(rank: u32, title: &str, url: &str, description: &str) -> SearchResult {
        SearchResult {
            rank,
            title: title.to_string(),
            description: description.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        let bytes = encode(&[]).unwrap();
        assert_eq!(bytes, b"\xEF\xBB\xBFRank,Title,URL,Description\n");
    }

    #[test]
    fn test_rows_in_rank_order() {
        let bytes = encode(&[
            result(1, "First", "https://a.example", "one"),
            result(2, "Second", "https://b.example", "two"),
        ])
        .unwrap();
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        assert_eq!(
            text,
            "Rank,Title,URL,Description\n\
             1,First,https://a.example,one\n\
             2,Second,https://b.example,two\n"
        );
    }

    #[test]
    fn test_special_characters_are_quoted() {
        let bytes = encode(&[result(
            1,
            "Comma, \"quoted\"",
            "https://a.example/?a=1,2",
            "line one\nline two",
        )])
        .unwrap();
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        assert_eq!(
            text,
            "Rank,Title,URL,Description\n\
             1,\"Comma, \"\"quoted\"\"\",\"https://a.example/?a=1,2\",\"line one\nline two\"\n"
        );
    }

    #[test]
    fn test_multibyte_text_survives() {
        let bytes = encode(&[result(1, "東京の天気", "", "晴れ")]).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.contains("1,東京の天気,,晴れ\n"));
    }

    #[test]
    fn test_output_is_parseable() {
        let input = vec![
            result(1, "a,b", "u1", "x\"y"),
            result(2, "", "", ""),
        ];
        let bytes = encode(&input).unwrap();
        let mut reader = csv::Reader::from_reader(&bytes[3..]);
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, csv::StringRecord::from(HEADER.to_vec()));

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "a,b");
        assert_eq!(&rows[0][3], "x\"y");
        assert_eq!(&rows[1][0], "2");
    }

    #[test]
    fn test_repeat_encoding_is_identical() {
        let input = vec![result(1, "t", "u", "d")];
        assert_eq!(encode(&input).unwrap(), encode(&input).unwrap());
    }
}
