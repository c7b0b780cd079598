//! Input and output helpers shared by the subcommands.

use anyhow::{Context, Result, bail, ensure};
use phylovec::parser::ByteParser;
use phylovec::parser::utils::{escape_label, format_branch_length};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Prefix of the line naming the taxa in CSV output.
pub const TAXA_HEADER: &str = "#taxa=";

/// Vectors with their universe, as written by `encode --json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncodedTrees {
    pub taxa: Vec<String>,
    pub sentinel: f64,
    pub vectors: Vec<Vec<f64>>,
}

/// Vectors read from CSV input, with the taxa of an optional header line.
#[derive(Debug, Default)]
pub struct CsvVectors {
    pub taxa: Option<Vec<String>>,
    pub vectors: Vec<Vec<f64>>,
}

/// Reads the whole input file, or stdin if no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Opens the output file, or stdout if no path is given.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Delimiters ending an unquoted label in the taxa header.
const HEADER_DELIMITERS: &[u8] = b", \t";

/// Writes the taxa header and one comma separated line per vector.
///
/// Header labels are quoted like Newick labels where needed.
pub fn write_csv<W: Write>(mut out: W, taxa: &[String], vectors: &[Vec<f64>]) -> Result<()> {
    writeln!(out, "{}{}", TAXA_HEADER, format_taxa(taxa)?)?;
    for vector in vectors {
        writeln!(out, "{}", format_vector(vector))?;
    }
    out.flush()?;
    Ok(())
}

/// Formats taxa as comma separated, escaped labels.
pub fn format_taxa(taxa: &[String]) -> Result<String> {
    let labels = taxa
        .iter()
        .map(|label| {
            ensure!(
                !label.contains(['\n', '\r']),
                "taxon label {label:?} contains a line break"
            );
            Ok(escape_label(label))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(labels.join(","))
}

/// Parses the taxa of a header line, undoing the quoting of [format_taxa].
pub fn parse_taxa(header: &str) -> Result<Vec<String>> {
    let mut parser = ByteParser::for_str(header);
    let mut taxa = Vec::new();
    loop {
        taxa.push(parser.parse_label(HEADER_DELIMITERS)?);
        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Ok(taxa);
        }
        if !parser.consume_if(b',') {
            bail!("expected ',' after taxon at position {}", parser.position());
        }
    }
}

/// Formats a vector as one comma separated line.
pub fn format_vector(vector: &[f64]) -> String {
    vector
        .iter()
        .map(|&value| format_branch_length(value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses CSV input: blank lines are skipped, a `#taxa=` line names the
/// taxa, other lines starting with `#` are comments.
pub fn parse_csv(text: &str) -> Result<CsvVectors> {
    let mut parsed = CsvVectors::default();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix(TAXA_HEADER) {
            if parsed.taxa.is_some() {
                bail!("line {}: second taxa header", i + 1);
            }
            let taxa = parse_taxa(header).with_context(|| format!("line {}", i + 1))?;
            parsed.taxa = Some(taxa);
        } else if !line.starts_with('#') {
            let vector = parse_vector(line).with_context(|| format!("line {}", i + 1))?;
            parsed.vectors.push(vector);
        }
    }
    Ok(parsed)
}

/// Parses one comma separated vector.
pub fn parse_vector(line: &str) -> Result<Vec<f64>> {
    line.split(',')
        .map(|field| {
            let field = field.trim();
            field
                .parse::<f64>()
                .with_context(|| format!("invalid number '{field}'"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_header_and_comments() {
        let text = "#taxa=A,B,C\n# a comment\n\n1,2,3\n0.5, -1 ,0.25\n";
        let parsed = parse_csv(text).unwrap();

        assert_eq!(parsed.taxa, Some(vec!["A".into(), "B".into(), "C".into()]));
        assert_eq!(parsed.vectors, vec![vec![1.0, 2.0, 3.0], vec![0.5, -1.0, 0.25]]);
    }

    #[test]
    fn test_parse_csv_rejects_garbage() {
        let err = parse_csv("1,two,3\n").unwrap_err();
        assert!(format!("{err:#}").contains("invalid number 'two'"));
        assert!(parse_csv("#taxa=A\n#taxa=B\n").is_err());
    }

    #[test]
    fn test_write_csv_parses_back() {
        let taxa = vec!["A".to_string(), "B".to_string()];
        let vectors = vec![vec![1.5, -1.0]];
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &taxa, &vectors).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "#taxa=A,B\n1.5,-1\n");
        let parsed = parse_csv(&text).unwrap();
        assert_eq!(parsed.taxa, Some(taxa));
        assert_eq!(parsed.vectors, vectors);
    }

    #[test]
    fn test_header_keeps_labels_with_spaces_and_commas() {
        let (trees, labels) =
            phylovec::newick::parse_str_all("(' A':1,'a,b':2,'Baillon''s':3,C:4);").unwrap();
        let taxa = phylovec::model::TaxonSet::from_label_map(&labels).unwrap();
        let vector = phylovec::encode(&trees[0].view(&labels), Some(&taxa)).unwrap();

        let mut buffer = Vec::new();
        write_csv(&mut buffer, taxa.labels(), &[vector]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("#taxa=' A','Baillon''s',C,'a,b'\n"));

        let parsed = parse_csv(&text).unwrap();
        let parsed_taxa = phylovec::model::TaxonSet::new(parsed.taxa.unwrap()).unwrap();
        assert_eq!(&parsed_taxa, &taxa);
        let decoded = phylovec::decode(&parsed.vectors[0], &parsed_taxa).unwrap();
        assert_eq!(
            phylovec::newick::to_sorted_newick(&decoded),
            "(' A':1,'Baillon''s':3,C:4,'a,b':2);"
        );
    }

    #[test]
    fn test_header_rejects_line_breaks() {
        let taxa = vec!["A".to_string(), "B\nC".to_string()];
        assert!(write_csv(Vec::new(), &taxa, &[]).is_err());
        assert!(parse_taxa("'A,B").is_err());
        assert!(parse_taxa("A B").is_err());
    }
}
