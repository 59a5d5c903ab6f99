//! End-to-end scenarios parsing full documents and asserting on the resulting triple/term shape.

use oxrdfa::RdfaParser;
use oxrdf::{BlankNode, Literal, NamedNode, Subject, Term, Triple};

fn parse(doc: &str) -> Vec<Triple> {
    RdfaParser::new("http://example.org/")
        .unwrap()
        .parse_read(doc.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn simple_property() {
    let triples = parse(
        r#"<html><body><p about="#a" property="http://xmlns.com/foaf/0.1/name">Alice</p></body></html>"#,
    );
    assert_eq!(
        triples,
        vec![Triple::new(
            NamedNode::new_unchecked("http://example.org/#a"),
            NamedNode::new_unchecked("http://xmlns.com/foaf/0.1/name"),
            Literal::new_simple_literal("Alice"),
        )]
    );
}

#[test]
fn typeof_generates_a_type_triple() {
    let triples = parse(
        r#"<html><body><div about="#b" typeof="http://schema.org/Person"/></body></html>"#,
    );
    assert_eq!(
        triples,
        vec![Triple::new(
            NamedNode::new_unchecked("http://example.org/#b"),
            NamedNode::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
            NamedNode::new_unchecked("http://schema.org/Person"),
        )]
    );
}

#[test]
fn incomplete_triple_completes_against_descendant_subject() {
    let triples = parse(
        r#"<html><body><div about="#x" rel="http://xmlns.com/foaf/0.1/knows"><span about="#y"/></div></body></html>"#,
    );
    assert_eq!(
        triples,
        vec![Triple::new(
            NamedNode::new_unchecked("http://example.org/#x"),
            NamedNode::new_unchecked("http://xmlns.com/foaf/0.1/knows"),
            NamedNode::new_unchecked("http://example.org/#y"),
        )]
    );
}

#[test]
fn typeof_without_about_mints_shared_blank_node() {
    let triples = parse(
        r#"<html><body><div typeof="http://schema.org/Thing" property="http://schema.org/name">X</div></body></html>"#,
    );
    assert_eq!(triples.len(), 2);
    let Subject::BlankNode(subject) = triples[0].subject.clone() else {
        panic!("expected a blank node subject");
    };
    for triple in &triples {
        assert_eq!(triple.subject, Subject::BlankNode(subject.clone()));
    }
    assert!(triples
        .iter()
        .any(|t| t.predicate.as_str() == "http://www.w3.org/1999/02/22-rdf-syntax-ns#type"
            && t.object == Term::NamedNode(NamedNode::new_unchecked("http://schema.org/Thing"))));
    assert!(triples.iter().any(|t| t.predicate.as_str() == "http://schema.org/name"
        && t.object == Term::Literal(Literal::new_simple_literal("X"))));
}

#[test]
fn inlist_with_three_items_builds_rdf_list() {
    let triples = parse(
        r#"<html><body><div about="#l">
<span property="http://example.org/p" inlist="">a</span>
<span property="http://example.org/p" inlist="">b</span>
<span property="http://example.org/p" inlist="">c</span>
</div></body></html>"#,
    );
    // head triple + 3 first + 3 rest = 7
    assert_eq!(triples.len(), 7);

    let head = triples
        .iter()
        .find(|t| t.subject == Subject::NamedNode(NamedNode::new_unchecked("http://example.org/#l")))
        .expect("head triple");
    assert_eq!(head.predicate.as_str(), "http://example.org/p");
    let Term::BlankNode(mut cell) = head.object.clone() else {
        panic!("expected a blank-node list head");
    };

    let rdf_first = NamedNode::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#first");
    let rdf_rest = NamedNode::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#rest");
    let mut values = Vec::new();
    loop {
        let first = triples
            .iter()
            .find(|t| t.subject == Subject::BlankNode(cell.clone()) && t.predicate == rdf_first)
            .expect("rdf:first for this cell");
        let Term::Literal(literal) = &first.object else {
            panic!("expected a literal list member");
        };
        values.push(literal.value().to_string());

        let rest = triples
            .iter()
            .find(|t| t.subject == Subject::BlankNode(cell.clone()) && t.predicate == rdf_rest)
            .expect("rdf:rest for this cell");
        match &rest.object {
            Term::NamedNode(nil) if nil.as_str() == "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil" => break,
            Term::BlankNode(next) => cell = next.clone(),
            _ => panic!("unexpected rdf:rest object"),
        }
    }
    assert_eq!(values, vec!["a", "b", "c"]);
}

#[test]
fn prefix_attribute_resolves_curies() {
    let triples = parse(
        r#"<html><body><p prefix="ex: http://e.example/" about="ex:a" property="ex:p" content="v"/></body></html>"#,
    );
    assert_eq!(
        triples,
        vec![Triple::new(
            NamedNode::new_unchecked("http://e.example/a"),
            NamedNode::new_unchecked("http://e.example/p"),
            Literal::new_simple_literal("v"),
        )]
    );
}

#[test]
fn rdfa_free_element_emits_nothing() {
    let triples = parse(r#"<html><body><div><span>plain text</span></div></body></html>"#);
    assert!(triples.is_empty());
}

#[test]
fn anonymous_blank_node_is_shared_across_references() {
    let triples = parse(
        r#"<html><body>
<div about="_:" typeof="http://schema.org/Thing"/>
<div about="_:" property="http://schema.org/name">X</div>
</body></html>"#,
    );
    assert_eq!(triples.len(), 2);
    assert_eq!(triples[0].subject, triples[1].subject);
}

#[test]
fn newly_declared_prefix_surfaces_as_a_processor_message() {
    let mut reader = RdfaParser::new("http://example.org/")
        .unwrap()
        .parse_read(br#"<html xmlns:ex="http://e.example/"><body/></html>"#.as_ref());
    for triple in &mut reader {
        triple.unwrap();
    }
    let messages = reader.drain_processor_messages();
    assert!(messages
        .iter()
        .any(|m| matches!(m, oxrdfa::ProcessorMessage::Prefix { prefix, iri }
            if prefix == "ex" && iri == "http://e.example/")));
}

#[test]
fn unrecognized_prefix_surfaces_as_a_warning_and_drops_the_triple() {
    let mut reader = RdfaParser::new("http://example.org/")
        .unwrap()
        .parse_read(br#"<html><body><p about="#a" rel="nope:related"><span about="#b"/></p></body></html>"#.as_ref());
    let triples: Vec<_> = (&mut reader).collect::<Result<Vec<_>, _>>().unwrap();
    assert!(triples.is_empty());
    let messages = reader.drain_processor_messages();
    assert!(messages
        .iter()
        .any(|m| matches!(m, oxrdfa::ProcessorMessage::Warning { description, .. }
            if description.contains("nope"))));
}

#[test]
fn xml_base_changes_relative_resolution_for_the_subtree() {
    let triples = parse(
        r#"<html><body xml:base="http://other.example/sub/"><p about="rel" property="http://example.org/p" content="v"/></body></html>"#,
    );
    assert_eq!(triples.len(), 1);
    assert_eq!(
        triples[0].subject,
        Subject::NamedNode(NamedNode::new_unchecked("http://other.example/sub/rel"))
    );
}

#[test]
fn vocab_expands_bare_property_terms() {
    let triples = parse(
        r#"<html><body vocab="http://example.org/vocab#"><p about="#a" property="name" content="Alice"/></body></html>"#,
    );
    assert_eq!(
        triples,
        vec![Triple::new(
            NamedNode::new_unchecked("http://example.org/#a"),
            NamedNode::new_unchecked("http://example.org/vocab#name"),
            Literal::new_simple_literal("Alice"),
        )]
    );
}

#[test]
fn xml_literal_reconstructs_descendant_markup() {
    let triples = parse(
        r#"<html><body><p about="#a" property="http://example.org/body" datatype="http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral">hello <b>world</b></p></body></html>"#,
    );
    assert_eq!(triples.len(), 1);
    let Term::Literal(literal) = &triples[0].object else {
        panic!("expected a literal");
    };
    assert_eq!(
        literal.datatype().as_str(),
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral"
    );
    assert_eq!(literal.value(), "hello <b>world</b>");
}

#[test]
fn multiple_typeof_values_are_delivered_in_document_order() {
    let triples = parse(
        r#"<html><body><div about="#a" typeof="http://example.org/One http://example.org/Two http://example.org/Three"/></body></html>"#,
    );
    let rdf_type = NamedNode::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
    assert_eq!(
        triples,
        vec![
            Triple::new(
                NamedNode::new_unchecked("http://example.org/#a"),
                rdf_type.clone(),
                NamedNode::new_unchecked("http://example.org/One"),
            ),
            Triple::new(
                NamedNode::new_unchecked("http://example.org/#a"),
                rdf_type.clone(),
                NamedNode::new_unchecked("http://example.org/Two"),
            ),
            Triple::new(
                NamedNode::new_unchecked("http://example.org/#a"),
                rdf_type,
                NamedNode::new_unchecked("http://example.org/Three"),
            ),
        ]
    );
}

#[test]
fn blank_node_value_for_property_is_dropped_with_a_processor_error() {
    let mut reader = RdfaParser::new("http://example.org/")
        .unwrap()
        .parse_read(br#"<html><body><p about="#a" property="_:foo" content="v"/></body></html>"#.as_ref());
    let triples: Vec<_> = (&mut reader).collect::<Result<Vec<_>, _>>().unwrap();
    assert!(triples.is_empty());
    let messages = reader.drain_processor_messages();
    assert!(messages
        .iter()
        .any(|m| matches!(m, oxrdfa::ProcessorMessage::Error { description, .. }
            if description.contains("predicate"))));
}

#[test]
fn xml1_document_head_element_with_typeof_gets_a_blank_node_not_the_document_base() {
    let triples = parse(r#"<root xmlns="http://example.org/ns"><head typeof="http://example.org/Thing"/></root>"#);
    assert_eq!(triples.len(), 1);
    assert!(matches!(triples[0].subject, Subject::BlankNode(_)));
}

#[test]
fn blank_node_ref_from_bare_underscore_curie() {
    let triples = parse(
        r#"<html><body><p about="_:local" property="http://example.org/p" content="v"/></body></html>"#,
    );
    assert_eq!(triples.len(), 1);
    assert_eq!(triples[0].subject, Subject::BlankNode(BlankNode::new_unchecked("local")));
}
