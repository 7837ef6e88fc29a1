//! Output formatting utilities

use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use gedgraph_core::GraphExport;
use serde::{Deserialize, Serialize};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    #[value(name = "graphml")]
    #[serde(rename = "graphml")]
    GraphML,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::GraphML => "graphml",
        }
    }
}

/// Render a graph in the requested format
pub fn render(graph: &GraphExport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(graph)?,
        OutputFormat::Csv => graph_to_csv(graph),
        OutputFormat::GraphML => graph_to_graphml(graph),
    })
}

/// Write to a file (owner-only on unix) or to stdout
pub fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        println!("{}", content);
        return Ok(());
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
    }
    #[cfg(not(unix))]
    {
        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
    }
    tracing::info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

fn graph_to_csv(graph: &GraphExport) -> String {
    let mut output = String::new();

    output.push_str("# Nodes\n");
    output.push_str("id,name,type,sex,birthYear\n");
    for node in &graph.nodes {
        let year = node.birth_year.map(|y| y.to_string()).unwrap_or_default();
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_escape(&node.id),
            csv_escape(&node.name),
            csv_escape(&node.node_type),
            csv_escape(&node.sex),
            year
        ));
    }

    output.push_str("\n# Connections\n");
    output.push_str("from_node_id,to_node_id,type\n");
    for connection in &graph.connections {
        output.push_str(&format!(
            "{},{},{}\n",
            csv_escape(&connection.from_node_id),
            csv_escape(&connection.to_node_id),
            connection.connection_type
        ));
    }

    output
}

/// Escape a string for CSV output with formula injection protection
fn csv_escape(s: &str) -> String {
    // Spreadsheets evaluate cells starting with these
    let needs_formula_protection = s
        .chars()
        .next()
        .map(|c| matches!(c, '=' | '+' | '-' | '@' | '\t' | '\r'))
        .unwrap_or(false);

    let escaped = if needs_formula_protection {
        format!("'{}", s)
    } else {
        s.to_string()
    };

    if escaped.contains(',') || escaped.contains('"') || escaped.contains('\n') {
        format!("\"{}\"", escaped.replace('"', "\"\""))
    } else {
        escaped
    }
}

fn graph_to_graphml(graph: &GraphExport) -> String {
    let mut xml = String::new();

    xml.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns
         http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">
  <key id="d0" for="node" attr.name="name" attr.type="string"/>
  <key id="d1" for="node" attr.name="type" attr.type="string"/>
  <key id="d2" for="node" attr.name="sex" attr.type="string"/>
  <key id="d3" for="node" attr.name="birthYear" attr.type="int"/>
  <key id="d4" for="edge" attr.name="type" attr.type="string"/>
  <graph id="gedgraph" edgedefault="directed">
"#,
    );

    for node in &graph.nodes {
        xml.push_str(&format!(
            "    <node id=\"{}\">\n      <data key=\"d0\">{}</data>\n      <data key=\"d1\">{}</data>\n      <data key=\"d2\">{}</data>\n",
            xml_escape(&node.id),
            xml_escape(&node.name),
            xml_escape(&node.node_type),
            xml_escape(&node.sex)
        ));
        if let Some(year) = node.birth_year {
            xml.push_str(&format!("      <data key=\"d3\">{}</data>\n", year));
        }
        xml.push_str("    </node>\n");
    }

    for (i, connection) in graph.connections.iter().enumerate() {
        xml.push_str(&format!(
            "    <edge id=\"e{}\" source=\"{}\" target=\"{}\">\n      <data key=\"d4\">{}</data>\n    </edge>\n",
            i,
            xml_escape(&connection.from_node_id),
            xml_escape(&connection.to_node_id),
            connection.connection_type
        ));
    }

    xml.push_str("  </graph>\n</graphml>");
    xml
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0 @I1@ INDI\n1 NAME John /Smith/\n1 SEX M\n1 BIRT\n2 DATE 1950\n\
                          0 @I2@ INDI\n1 NAME Mary, \"Molly\" <Jones>\n\
                          0 @F1@ FAM\n1 HUSB @I1@\n1 WIFE @I2@\n";

    fn sample() -> GraphExport {
        gedgraph_core::parse(SAMPLE.as_bytes()).unwrap().graph
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("=SUM(A1)"), "'=SUM(A1)");
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }

    #[test]
    fn test_render_csv() {
        let csv = render(&sample(), OutputFormat::Csv).unwrap();
        assert!(csv.contains("I1,John Smith,Person,M,1950\n"));
        assert!(csv.contains("I2,\"Mary, \"\"Molly\"\" <Jones>\",Person,U,\n"));
        assert!(csv.contains("I1,I2,Spouse\n"));
    }

    #[test]
    fn test_render_graphml() {
        let xml = render(&sample(), OutputFormat::GraphML).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<node id=\"I1\">"));
        assert!(xml.contains("<data key=\"d3\">1950</data>"));
        assert!(xml.contains("Mary, &quot;Molly&quot; &lt;Jones&gt;"));
        assert!(xml.contains("<edge id=\"e0\" source=\"I1\" target=\"I2\">"));
        assert!(xml.ends_with("</graphml>"));
    }

    #[test]
    fn test_render_json_field_names() {
        let json = render(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"][0]["birthYear"], 1950);
        assert_eq!(value["connections"][0]["from_node_id"], "I1");
        assert_eq!(value["connections"][0]["type"], "Spouse");
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        write_output("{}", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
