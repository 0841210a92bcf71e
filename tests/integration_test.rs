use std::fs;
use std::io::Write;

use tempfile::tempdir;
use wsdl_ir::ingest;
use wsdl_ir::ir::{MaxOccurs, TypeKind};
use wsdl_ir::qname::QName;
use wsdl_ir::IngestConfig;

const CALCULATOR_WSDL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<wsdl:definitions name="Calculator"
    targetNamespace="http://tempuri.org/"
    xmlns:tns="http://tempuri.org/"
    xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    xmlns:xsd="http://www.w3.org/2001/XMLSchema">
  <wsdl:types>
    <xsd:schema targetNamespace="http://tempuri.org/">
      <xsd:element name="Add">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="intA" type="xsd:int"/>
            <xsd:element name="intB" type="xsd:int"/>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
      <xsd:element name="AddResponse">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="AddResult" type="xsd:int"/>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
      <xsd:element name="Subtract">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="intA" type="xsd:int"/>
            <xsd:element name="intB" type="xsd:int"/>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
      <xsd:element name="SubtractResponse">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="SubtractResult" type="xsd:int"/>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
      <xsd:element name="Multiply">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="intA" type="xsd:int"/>
            <xsd:element name="intB" type="xsd:int"/>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
      <xsd:element name="MultiplyResponse">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="MultiplyResult" type="xsd:int"/>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
      <xsd:element name="Divide">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="intA" type="xsd:int"/>
            <xsd:element name="intB" type="xsd:int"/>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
      <xsd:element name="DivideResponse">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="DivideResult" type="xsd:int"/>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
    </xsd:schema>
  </wsdl:types>
  <wsdl:message name="AddSoapIn"><wsdl:part name="parameters" element="tns:Add"/></wsdl:message>
  <wsdl:message name="AddSoapOut"><wsdl:part name="parameters" element="tns:AddResponse"/></wsdl:message>
  <wsdl:message name="SubtractSoapIn"><wsdl:part name="parameters" element="tns:Subtract"/></wsdl:message>
  <wsdl:message name="SubtractSoapOut"><wsdl:part name="parameters" element="tns:SubtractResponse"/></wsdl:message>
  <wsdl:message name="MultiplySoapIn"><wsdl:part name="parameters" element="tns:Multiply"/></wsdl:message>
  <wsdl:message name="MultiplySoapOut"><wsdl:part name="parameters" element="tns:MultiplyResponse"/></wsdl:message>
  <wsdl:message name="DivideSoapIn"><wsdl:part name="parameters" element="tns:Divide"/></wsdl:message>
  <wsdl:message name="DivideSoapOut"><wsdl:part name="parameters" element="tns:DivideResponse"/></wsdl:message>
  <wsdl:portType name="CalculatorSoap">
    <wsdl:operation name="Add">
      <wsdl:input message="tns:AddSoapIn"/>
      <wsdl:output message="tns:AddSoapOut"/>
    </wsdl:operation>
    <wsdl:operation name="Subtract">
      <wsdl:input message="tns:SubtractSoapIn"/>
      <wsdl:output message="tns:SubtractSoapOut"/>
    </wsdl:operation>
    <wsdl:operation name="Multiply">
      <wsdl:input message="tns:MultiplySoapIn"/>
      <wsdl:output message="tns:MultiplySoapOut"/>
    </wsdl:operation>
    <wsdl:operation name="Divide">
      <wsdl:input message="tns:DivideSoapIn"/>
      <wsdl:output message="tns:DivideSoapOut"/>
    </wsdl:operation>
  </wsdl:portType>
  <wsdl:binding name="CalculatorSoap" type="tns:CalculatorSoap">
    <soap:binding transport="http://schemas.xmlsoap.org/soap/http"/>
    <wsdl:operation name="Add">
      <soap:operation soapAction="http://tempuri.org/Add" style="document"/>
      <wsdl:input><soap:body use="literal"/></wsdl:input>
      <wsdl:output><soap:body use="literal"/></wsdl:output>
    </wsdl:operation>
    <wsdl:operation name="Subtract">
      <soap:operation soapAction="http://tempuri.org/Subtract" style="document"/>
      <wsdl:input><soap:body use="literal"/></wsdl:input>
      <wsdl:output><soap:body use="literal"/></wsdl:output>
    </wsdl:operation>
    <wsdl:operation name="Multiply">
      <soap:operation soapAction="http://tempuri.org/Multiply" style="document"/>
      <wsdl:input><soap:body use="literal"/></wsdl:input>
      <wsdl:output><soap:body use="literal"/></wsdl:output>
    </wsdl:operation>
    <wsdl:operation name="Divide">
      <soap:operation soapAction="http://tempuri.org/Divide" style="document"/>
      <wsdl:input><soap:body use="literal"/></wsdl:input>
      <wsdl:output><soap:body use="literal"/></wsdl:output>
    </wsdl:operation>
  </wsdl:binding>
  <wsdl:service name="Calculator">
    <wsdl:port name="CalculatorSoap" binding="tns:CalculatorSoap">
      <soap:address location="http://www.dneonline.com/calculator.asmx"/>
    </wsdl:port>
  </wsdl:service>
</wsdl:definitions>
"#;

fn write_fixture(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn calculator_wsdl_yields_four_document_literal_operations() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "calculator.wsdl", CALCULATOR_WSDL);

    let (service, tables) = ingest(path.to_str().unwrap(), IngestConfig::default()).expect("ingest succeeds");

    assert_eq!(service.name, "Calculator");
    assert_eq!(service.target_namespace_uri.as_deref(), Some("http://tempuri.org/"));
    assert_eq!(service.operations.len(), 4);

    let names: Vec<&str> = service
        .operations
        .iter()
        .map(|id| tables.operations.get(id.0).name.as_str())
        .collect();
    assert_eq!(names, vec!["Add", "Subtract", "Multiply", "Divide"]);

    for op_id in &service.operations {
        let op = tables.operations.get(op_id.0);
        assert!(op.soap_action.as_deref().unwrap().starts_with("http://tempuri.org/"));
        let input_msg = tables.messages.get(op.input.unwrap().0);
        let param = input_msg.parameter.expect("wrapper element wired");
        let rre = tables.request_response_elements.get(param.0);
        let TypeKind::Complex(ct) = tables.type_kind(rre.type_) else { panic!("wrapper is a complex type") };
        assert_eq!(ct.elements.len(), 2, "each request wraps two int arguments");
        for el_id in &ct.elements {
            let el = tables.elements.get(el_id.0);
            let TypeKind::Simple(_) = tables.type_kind(el.type_.unwrap()) else { panic!("xsd:int is primitive") };
        }
    }

    assert_eq!(service.endpoints.len(), 1);
    assert_eq!(service.endpoints[0].address.as_deref(), Some("http://www.dneonline.com/calculator.asmx"));
}

#[test]
fn forward_referenced_element_type_resolves() {
    let schema = r#"<xsd:schema targetNamespace="http://tempuri.org/"
      xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:tns="http://tempuri.org/">
  <xsd:element name="e" type="tns:T"/>
  <xsd:complexType name="T">
    <xsd:sequence>
      <xsd:element name="value" type="xsd:string"/>
    </xsd:sequence>
  </xsd:complexType>
</xsd:schema>"#;
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "forward.xsd", schema);

    let (_service, tables) = ingest(path.to_str().unwrap(), IngestConfig::default()).expect("ingest succeeds");

    let rre = tables.find_rre(&QName::new("http://tempuri.org/", "e")).expect("element registered");
    let type_id = tables.request_response_elements.get(rre.0).type_;
    assert!(!tables.is_unknown(type_id), "T resolves, not left Unknown");
    assert_eq!(tables.type_qname(type_id), &QName::new("http://tempuri.org/", "T"));
}

#[test]
fn self_referential_type_marks_is_indirect() {
    let schema = r#"<xsd:schema targetNamespace="http://tempuri.org/"
      xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:tns="http://tempuri.org/">
  <xsd:complexType name="Node">
    <xsd:sequence>
      <xsd:element name="value" type="xsd:int"/>
      <xsd:element name="next" type="tns:Node" minOccurs="0"/>
    </xsd:sequence>
  </xsd:complexType>
  <xsd:element name="root" type="tns:Node"/>
</xsd:schema>"#;
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "node.xsd", schema);

    let (_service, tables) = ingest(path.to_str().unwrap(), IngestConfig::default()).expect("ingest succeeds");

    let node_id = tables.find_type(&QName::new("http://tempuri.org/", "Node"), &Default::default()).unwrap();
    let TypeKind::Complex(ct) = tables.type_kind(node_id) else { panic!("expected complex") };
    let next = ct.elements.iter().map(|id| tables.elements.get(id.0)).find(|e| e.qname.as_ref().unwrap().local_name == "next").unwrap();
    assert_eq!(next.max_occurs, MaxOccurs::Bounded(1));
    assert!(next.is_indirect, "A -> A cycle through a single-cardinality element must break somewhere");
}

#[test]
fn complex_content_extension_attaches_own_particles_onto_derived_type() {
    let schema = r#"<xsd:schema targetNamespace="http://tempuri.org/"
      xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:tns="http://tempuri.org/">
  <xsd:complexType name="Base">
    <xsd:sequence>
      <xsd:element name="id" type="xsd:int"/>
    </xsd:sequence>
  </xsd:complexType>
  <xsd:complexType name="Derived">
    <xsd:complexContent>
      <xsd:extension base="tns:Base">
        <xsd:sequence>
          <xsd:element name="extra" type="xsd:string"/>
        </xsd:sequence>
        <xsd:attribute name="tag" type="xsd:string"/>
      </xsd:extension>
    </xsd:complexContent>
  </xsd:complexType>
  <xsd:element name="root" type="tns:Derived"/>
</xsd:schema>"#;
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "derived.xsd", schema);

    let (_service, tables) = ingest(path.to_str().unwrap(), IngestConfig::default()).expect("ingest succeeds");

    let derived_id = tables.find_type(&QName::new("http://tempuri.org/", "Derived"), &Default::default()).unwrap();
    let TypeKind::Complex(ct) = tables.type_kind(derived_id) else { panic!("expected complex") };

    assert!(ct.extension_base.is_some(), "extension base still recorded");

    let extra = ct
        .elements
        .iter()
        .map(|id| tables.elements.get(id.0))
        .find(|e| e.qname.as_ref().map(|q| q.local_name == "extra").unwrap_or(false));
    assert!(extra.is_some(), "extension's own sequence particle must attach onto the derived type, not be discarded");

    let tag = ct
        .attributes
        .iter()
        .map(|id| tables.attributes.get(id.0))
        .find(|a| a.qname.as_ref().map(|q| q.local_name == "tag").unwrap_or(false));
    assert!(tag.is_some(), "extension's own attribute particle must attach onto the derived type, not be discarded");
}

#[test]
fn mutually_recursive_types_mark_at_least_one_edge_indirect() {
    let schema = r#"<xsd:schema targetNamespace="http://tempuri.org/"
      xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:tns="http://tempuri.org/">
  <xsd:complexType name="A">
    <xsd:sequence>
      <xsd:element name="b" type="tns:B"/>
    </xsd:sequence>
  </xsd:complexType>
  <xsd:complexType name="B">
    <xsd:sequence>
      <xsd:element name="a" type="tns:A"/>
    </xsd:sequence>
  </xsd:complexType>
  <xsd:element name="root" type="tns:A"/>
</xsd:schema>"#;
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "mutual.xsd", schema);

    let (_service, tables) = ingest(path.to_str().unwrap(), IngestConfig::default()).expect("ingest succeeds");

    let a_id = tables.find_type(&QName::new("http://tempuri.org/", "A"), &Default::default()).unwrap();
    let b_id = tables.find_type(&QName::new("http://tempuri.org/", "B"), &Default::default()).unwrap();
    let TypeKind::Complex(a_ct) = tables.type_kind(a_id) else { panic!() };
    let TypeKind::Complex(b_ct) = tables.type_kind(b_id) else { panic!() };
    let a_to_b_indirect = tables.elements.get(a_ct.elements[0].0).is_indirect;
    let b_to_a_indirect = tables.elements.get(b_ct.elements[0].0).is_indirect;
    assert!(a_to_b_indirect || b_to_a_indirect);
}

#[test]
fn soap_envelope_fault_wires_onto_every_operation() {
    let wsdl = r#"<?xml version="1.0"?>
<wsdl:definitions name="FaultSvc" targetNamespace="http://tempuri.org/"
    xmlns:tns="http://tempuri.org/"
    xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    xmlns:xsd="http://www.w3.org/2001/XMLSchema">
  <wsdl:types>
    <xsd:schema targetNamespace="http://www.w3.org/2003/05/soap-envelope"
        xmlns:xsd="http://www.w3.org/2001/XMLSchema">
      <xsd:complexType name="Fault">
        <xsd:sequence>
          <xsd:element name="faultcode" type="xsd:string"/>
        </xsd:sequence>
      </xsd:complexType>
    </xsd:schema>
    <xsd:schema targetNamespace="http://tempuri.org/">
      <xsd:element name="Ping"><xsd:complexType/></xsd:element>
      <xsd:element name="PingResponse"><xsd:complexType/></xsd:element>
    </xsd:schema>
  </wsdl:types>
  <wsdl:message name="PingIn"><wsdl:part name="parameters" element="tns:Ping"/></wsdl:message>
  <wsdl:message name="PingOut"><wsdl:part name="parameters" element="tns:PingResponse"/></wsdl:message>
  <wsdl:portType name="PingSoap">
    <wsdl:operation name="Ping">
      <wsdl:input message="tns:PingIn"/>
      <wsdl:output message="tns:PingOut"/>
    </wsdl:operation>
  </wsdl:portType>
  <wsdl:binding name="PingSoap" type="tns:PingSoap">
    <soap:binding transport="http://schemas.xmlsoap.org/soap/http"/>
    <wsdl:operation name="Ping">
      <soap:operation soapAction="http://tempuri.org/Ping"/>
      <wsdl:input><soap:body use="literal"/></wsdl:input>
      <wsdl:output><soap:body use="literal"/></wsdl:output>
    </wsdl:operation>
  </wsdl:binding>
  <wsdl:service name="FaultSvc">
    <wsdl:port name="PingSoap" binding="tns:PingSoap">
      <soap:address location="http://example.org/ping"/>
    </wsdl:port>
  </wsdl:service>
</wsdl:definitions>
"#;
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "fault.wsdl", wsdl);

    let (service, tables) = ingest(path.to_str().unwrap(), IngestConfig::default()).expect("ingest succeeds");

    let fault_id = tables
        .find_type(&QName::new("http://www.w3.org/2003/05/soap-envelope", "Fault"), &Default::default())
        .unwrap();
    for op_id in &service.operations {
        let op = tables.operations.get(op_id.0);
        assert_eq!(op.fault_type, Some(fault_id));
    }
}

#[test]
fn import_cycle_between_two_schemas_terminates_and_unions_types() {
    let dir = tempdir().unwrap();

    let schema_a = r#"<xsd:schema targetNamespace="http://example.org/a"
      xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:a="http://example.org/a" xmlns:b="http://example.org/b">
  <xsd:import namespace="http://example.org/b" schemaLocation="b.xsd"/>
  <xsd:complexType name="A">
    <xsd:sequence>
      <xsd:element name="b" type="b:B" minOccurs="0"/>
    </xsd:sequence>
  </xsd:complexType>
  <xsd:element name="root" type="a:A"/>
</xsd:schema>"#;
    let schema_b = r#"<xsd:schema targetNamespace="http://example.org/b"
      xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:a="http://example.org/a" xmlns:b="http://example.org/b">
  <xsd:import namespace="http://example.org/a" schemaLocation="a.xsd"/>
  <xsd:complexType name="B">
    <xsd:sequence>
      <xsd:element name="value" type="xsd:string"/>
    </xsd:sequence>
  </xsd:complexType>
</xsd:schema>"#;

    write_fixture(dir.path(), "a.xsd", schema_a);
    write_fixture(dir.path(), "b.xsd", schema_b);

    let config = IngestConfig {
        loader: wsdl_ir::loader::LoaderConfig { local_schema_dir: Some(dir.path().to_path_buf()), http_client: None },
        strict: true,
    };
    let (_service, tables) = ingest("a.xsd", config).expect("import cycle terminates");

    let a_id = tables.find_type(&QName::new("http://example.org/a", "A"), &Default::default()).unwrap();
    let b_id = tables.find_type(&QName::new("http://example.org/b", "B"), &Default::default()).unwrap();
    assert!(!tables.is_unknown(a_id));
    assert!(!tables.is_unknown(b_id));

    let TypeKind::Complex(a_ct) = tables.type_kind(a_id) else { panic!("expected complex") };
    let b_field = tables.elements.get(a_ct.elements[0].0);
    assert_eq!(b_field.type_, Some(b_id), "A's b field must point at the real, merged B - not an aliased type id");
}
