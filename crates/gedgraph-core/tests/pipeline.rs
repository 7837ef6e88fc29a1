//! End-to-end pipeline tests: bytes in, nodes and connections out

use gedgraph_core::{parse, EdgeKind, GedcomParser, GraphExport, ParserConfig};

const FAMILY_FILE: &str = "\
0 HEAD
1 SOUR TEST
1 CHAR UTF-8
0 @I1@ INDI
1 NAME John /Smith/
1 SEX M
1 BIRT
2 DATE 12 JUN 1950
2 PLAC Springfield
1 FAMS @F1@
0 @I2@ INDI
1 NAME Mary /Jones/
1 SEX F
1 FAMS @F1@
0 @I3@ INDI
1 NAME Alice /Smith/
1 SEX F
1 FAMC @F1@
0 @I4@ INDI
1 NAME Bob /Smith/
1 FAMC @F1@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
1 CHIL @I4@
0 TRLR
";

fn sorted(graph: &GraphExport) -> GraphExport {
    let mut graph = graph.clone();
    graph.nodes.sort();
    graph.connections.sort();
    graph
}

fn node<'a>(graph: &'a GraphExport, id: &str) -> &'a gedgraph_core::Node {
    graph
        .nodes
        .iter()
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("missing node {id}"))
}

#[test]
fn test_full_family() {
    let outcome = parse(FAMILY_FILE.as_bytes()).unwrap();
    let graph = &outcome.graph;

    assert!(outcome.is_clean());
    assert_eq!(graph.nodes.len(), 4);
    assert_eq!(graph.connections_of(EdgeKind::ParentChild).count(), 4);
    assert_eq!(graph.connections_of(EdgeKind::Spouse).count(), 1);

    let pairs: Vec<_> = graph
        .connections_of(EdgeKind::ParentChild)
        .map(|c| (c.from_node_id.as_str(), c.to_node_id.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("I1", "I3"), ("I1", "I4"), ("I2", "I3"), ("I2", "I4")]
    );

    let spouse = graph.connections_of(EdgeKind::Spouse).next().unwrap();
    assert_eq!((spouse.from_node_id.as_str(), spouse.to_node_id.as_str()), ("I1", "I2"));

    let john = node(graph, "I1");
    assert_eq!(john.name, "John Smith");
    assert_eq!(john.sex, "M");
    assert_eq!(john.birth_year, Some(1950));

    let bob = node(graph, "I4");
    assert_eq!(bob.sex, "U");
    assert_eq!(bob.birth_year, None);
}

#[test]
fn test_individuals_only_have_no_connections() {
    let input = "\
0 @I1@ INDI
1 NAME A
1 SEX M
0 @I2@ INDI
1 NAME B
1 SEX F
0 @I1@ INDI
1 NAME A again
";
    let outcome = parse(input.as_bytes()).unwrap();
    assert!(outcome.graph.connections.is_empty());
    assert_eq!(outcome.graph.nodes.len(), 2);
    assert_eq!(node(&outcome.graph, "I1").name, "A again");
    assert_eq!(node(&outcome.graph, "I1").sex, "U");
}

#[test]
fn test_single_parent_family() {
    let input = "\
0 @A@ INDI
0 @C@ INDI
0 @F1@ FAM
1 HUSB @A@
1 CHIL @C@
";
    let graph = parse(input.as_bytes()).unwrap().graph;
    assert_eq!(graph.connections.len(), 1);
    assert_eq!(graph.connections[0].connection_type, EdgeKind::ParentChild);
    assert_eq!(graph.connections[0].from_node_id, "A");
    assert_eq!(graph.connections[0].to_node_id, "C");
}

#[test]
fn test_family_before_individuals_still_derives() {
    let input = "\
0 @F1@ FAM
1 WIFE @I2@
1 HUSB @I1@
1 CHIL @I3@
0 @I1@ INDI
0 @I2@ INDI
0 @I3@ INDI
";
    let graph = parse(input.as_bytes()).unwrap().graph;
    assert_eq!(graph.connections.len(), 3);
    let spouse = graph.connections_of(EdgeKind::Spouse).next().unwrap();
    assert_eq!(spouse.from_node_id, "I2");
    assert_eq!(spouse.to_node_id, "I1");
}

#[test]
fn test_dangling_reference_is_kept() {
    let input = "\
0 @I1@ INDI
0 @F1@ FAM
1 HUSB @I1@
1 CHIL @I404@
";
    let graph = parse(input.as_bytes()).unwrap().graph;
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.connections.len(), 1);
    assert_eq!(graph.connections[0].to_node_id, "I404");
    assert_eq!(graph.dangling_references(), vec!["I404"]);
}

#[test]
fn test_birth_without_date() {
    let input = "0 @I1@ INDI\n1 BIRT\n0 TRLR\n";
    let graph = parse(input.as_bytes()).unwrap().graph;
    assert_eq!(graph.nodes[0].birth_year, None);
}

#[test]
fn test_latin1_fallback_matches_utf8() {
    let utf8 = "0 @I1@ INDI\n1 NAME Jos\u{e9} /Garc\u{ed}a/\n0 @I2@ INDI\n1 NAME Ren\u{e9}e\n";
    let latin1: Vec<u8> = utf8.chars().map(|c| c as u32 as u8).collect();
    assert!(std::str::from_utf8(&latin1).is_err());

    let from_utf8 = parse(utf8.as_bytes()).unwrap();
    let from_latin1 = parse(&latin1).unwrap();
    assert_eq!(from_utf8.graph.nodes.len(), from_latin1.graph.nodes.len());
    assert_eq!(from_utf8.stats.encoding, "UTF-8");

    let fallback_only = GedcomParser::new(ParserConfig::default().with_detection(false));
    let outcome = fallback_only.parse(&latin1).unwrap();
    assert_eq!(outcome.stats.encoding, "ISO-8859-1");
    assert_eq!(sorted(&outcome.graph), sorted(&from_utf8.graph));
}

#[test]
fn test_utf8_bom_and_crlf() {
    let input = "\u{feff}0 @I1@ INDI\r\n1 NAME Zo\u{eb} /Bront\u{eb}/\r\n0 TRLR\r\n";
    let outcome = parse(input.as_bytes()).unwrap();
    assert!(outcome.is_clean());
    assert_eq!(outcome.stats.encoding, "UTF-8");
    assert_eq!(outcome.graph.nodes[0].name, "Zo\u{eb} Bront\u{eb}");
}

#[test]
fn test_utf16_with_bom() {
    let text = "0 @I1@ INDI\n1 NAME Ann\n";
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let outcome = parse(&bytes).unwrap();
    assert_eq!(outcome.stats.encoding, "UTF-16LE");
    assert_eq!(outcome.graph.nodes[0].name, "Ann");
}

#[test]
fn test_output_json_shape() {
    let outcome = parse(FAMILY_FILE.as_bytes()).unwrap();
    let json = serde_json::to_value(&outcome.graph).unwrap();
    assert_eq!(json["nodes"][0]["type"], "Person");
    assert_eq!(json["nodes"][0]["birthYear"], 1950);
    assert!(json["nodes"][1].get("birthYear").is_none());
    assert_eq!(json["connections"][4]["type"], "Spouse");
    assert_eq!(json["connections"][0]["type"], "Parent-Child");
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct FamilySpec {
        spouses: Vec<usize>,
        children: Vec<usize>,
    }

    fn family_spec(people: usize) -> impl Strategy<Value = FamilySpec> {
        (
            prop::collection::vec(0..people, 0..4),
            prop::collection::vec(0..people, 0..5),
        )
            .prop_map(|(spouses, children)| FamilySpec { spouses, children })
    }

    fn document() -> impl Strategy<Value = (Vec<(String, Option<u16>)>, Vec<FamilySpec>)> {
        (1usize..12).prop_flat_map(|people| {
            (
                prop::collection::vec(("[A-Z][a-z]{0,8}", prop::option::of(1000u16..2100)), people),
                prop::collection::vec(family_spec(people), 0..6),
            )
        })
    }

    fn render(people: &[(String, Option<u16>)], families: &[FamilySpec]) -> String {
        let mut out = String::from("0 HEAD\n");
        for (i, (name, year)) in people.iter().enumerate() {
            out.push_str(&format!("0 @I{i}@ INDI\n1 NAME {name} /Test/\n"));
            if let Some(year) = year {
                out.push_str(&format!("1 BIRT\n2 DATE 1 JAN {year:04}\n"));
            }
        }
        for (i, family) in families.iter().enumerate() {
            out.push_str(&format!("0 @F{i}@ FAM\n"));
            for spouse in &family.spouses {
                out.push_str(&format!("1 HUSB @I{spouse}@\n"));
            }
            for child in &family.children {
                out.push_str(&format!("1 CHIL @I{child}@\n"));
            }
        }
        out.push_str("0 TRLR\n");
        out
    }

    proptest! {
        /// Property: identical bytes always yield the identical graph
        #[test]
        fn prop_parse_is_idempotent((people, families) in document()) {
            let input = render(&people, &families);
            let first = parse(input.as_bytes()).unwrap();
            let second = parse(input.as_bytes()).unwrap();
            prop_assert_eq!(sorted(&first.graph), sorted(&second.graph));
        }

        /// Property: edge counts follow the spouse x children product rule
        #[test]
        fn prop_edge_counts((people, families) in document()) {
            let input = render(&people, &families);
            let graph = parse(input.as_bytes()).unwrap().graph;

            let parent_child: usize = families
                .iter()
                .map(|f| f.spouses.len() * f.children.len())
                .sum();
            let spouse = families.iter().filter(|f| f.spouses.len() == 2).count();

            prop_assert_eq!(graph.nodes.len(), people.len());
            prop_assert_eq!(graph.connections_of(EdgeKind::ParentChild).count(), parent_child);
            prop_assert_eq!(graph.connections_of(EdgeKind::Spouse).count(), spouse);
        }

        /// Property: every rendered birth year is recovered
        #[test]
        fn prop_birth_years_recovered((people, families) in document()) {
            let input = render(&people, &families);
            let graph = parse(input.as_bytes()).unwrap().graph;
            for (i, (_, year)) in people.iter().enumerate() {
                let id = format!("I{i}");
                let node = graph.nodes.iter().find(|n| n.id == id).unwrap();
                prop_assert_eq!(node.birth_year, year.map(i32::from));
            }
        }
    }
}
