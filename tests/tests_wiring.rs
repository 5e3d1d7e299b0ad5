//! Composition wiring tests: the producer/consumer scenario, determinism,
//! duplicate-provider handling, delegation and the unconnected-port scan.

mod helpers;

use armodel::{ComponentKind, ElementData, ModelWarning, NodeId, Workspace};
use helpers::*;

/// Build the scenario: `Producer` provides `Speed`, `Consumer` requires
/// it, both bound to `Speed_I`, instantiated inside `/Components/TopLevel`.
fn producer_consumer(ws: &mut Workspace) -> NodeId {
    add_speed_interface(ws);
    let components = ws.root_package("Components").unwrap();

    let producer = ws
        .create_component(components, "Producer", ComponentKind::Application)
        .unwrap();
    ws.create_provide_port(producer, "Speed", "Speed_I", &[]).unwrap();

    let consumer = ws
        .create_component(components, "Consumer", ComponentKind::Application)
        .unwrap();
    ws.create_require_port(consumer, "Speed", "Speed_I", &[]).unwrap();

    let top = ws.create_composition(components, "TopLevel").unwrap();
    ws.create_component_prototype(top, "Producer", "Producer").unwrap();
    ws.create_component_prototype(top, "Consumer", "Consumer").unwrap();
    top
}

#[test]
fn test_auto_connect_produces_one_assembly_connector() {
    let mut ws = demo_workspace();
    let top = producer_consumer(&mut ws);

    let connectors = ws.auto_connect(top).unwrap();
    assert_eq!(connectors.len(), 1);
    match ws.node(connectors[0]).unwrap().data() {
        ElementData::AssemblyConnector(data) => {
            assert_eq!(
                data.provider.prototype_ref.as_str(),
                "/Components/TopLevel/Producer"
            );
            assert_eq!(
                data.provider.port_ref.as_str(),
                "/Components/Producer/Speed"
            );
            assert_eq!(
                data.requester.prototype_ref.as_str(),
                "/Components/TopLevel/Consumer"
            );
            assert_eq!(
                data.requester.port_ref.as_str(),
                "/Components/Consumer/Speed"
            );
        }
        other => panic!("expected AssemblyConnector, got {other:?}"),
    }

    // Everything sender-receiver is wired.
    assert!(ws.find_unconnected_ports(top).unwrap().is_empty());
    assert!(ws.warnings().is_empty());
}

#[test]
fn test_auto_connect_twice_yields_identical_set() {
    let mut ws = demo_workspace();
    let top = producer_consumer(&mut ws);

    let first = ws.auto_connect(top).unwrap();
    let second = ws.auto_connect(top).unwrap();
    assert_eq!(first, second);

    let connector_count = ws
        .node(top)
        .unwrap()
        .children()
        .filter(|&id| {
            matches!(
                ws.node(id).unwrap().data(),
                ElementData::AssemblyConnector(_) | ElementData::DelegationConnector(_)
            )
        })
        .count();
    assert_eq!(connector_count, 1);
}

#[test]
fn test_duplicate_provider_warns_and_uses_name_sorted_first() {
    let mut ws = demo_workspace();
    let top = producer_consumer(&mut ws);
    let components = ws.root_package("Components").unwrap();

    // A second provider of the same port name and interface.
    let backup = ws
        .create_component(components, "BackupProducer", ComponentKind::Application)
        .unwrap();
    ws.create_provide_port(backup, "Speed", "Speed_I", &[]).unwrap();
    ws.create_component_prototype(top, "BackupProducer", "BackupProducer").unwrap();

    let connectors = ws.auto_connect(top).unwrap();
    assert_eq!(connectors.len(), 1);
    match ws.node(connectors[0]).unwrap().data() {
        ElementData::AssemblyConnector(data) => {
            // "BackupProducer" sorts before "Producer".
            assert_eq!(
                data.provider.prototype_ref.as_str(),
                "/Components/TopLevel/BackupProducer"
            );
        }
        other => panic!("expected AssemblyConnector, got {other:?}"),
    }

    let warnings = ws.take_warnings();
    assert_eq!(warnings.len(), 1);
    match &warnings[0] {
        ModelWarning::DuplicateProvider { port, chosen, ignored } => {
            assert_eq!(port, "Speed");
            assert_eq!(chosen, "BackupProducer");
            assert_eq!(ignored.as_slice(), ["Producer"]);
        }
        other => panic!("expected DuplicateProvider, got {other:?}"),
    }
}

#[test]
fn test_delegation_matches_name_polarity_and_interface() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let components = ws.root_package("Components").unwrap();

    let producer = ws
        .create_component(components, "Producer", ComponentKind::Application)
        .unwrap();
    ws.create_provide_port(producer, "Speed", "Speed_I", &[]).unwrap();

    let top = ws.create_composition(components, "TopLevel").unwrap();
    ws.create_component_prototype(top, "Producer", "Producer").unwrap();
    // Outer port of the same name, polarity and interface.
    ws.create_provide_port(top, "Speed", "Speed_I", &[]).unwrap();

    let connectors = ws.auto_connect(top).unwrap();
    assert_eq!(connectors.len(), 1);
    match ws.node(connectors[0]).unwrap().data() {
        ElementData::DelegationConnector(data) => {
            assert_eq!(
                data.inner.prototype_ref.as_str(),
                "/Components/TopLevel/Producer"
            );
            assert_eq!(data.inner.port_ref.as_str(), "/Components/Producer/Speed");
            assert_eq!(
                data.outer_port_ref.as_str(),
                "/Components/TopLevel/Speed"
            );
        }
        other => panic!("expected DelegationConnector, got {other:?}"),
    }
    assert!(ws.find_unconnected_ports(top).unwrap().is_empty());
}

#[test]
fn test_delegation_requires_same_polarity() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let components = ws.root_package("Components").unwrap();

    let producer = ws
        .create_component(components, "Producer", ComponentKind::Application)
        .unwrap();
    ws.create_provide_port(producer, "Speed", "Speed_I", &[]).unwrap();

    let top = ws.create_composition(components, "TopLevel").unwrap();
    ws.create_component_prototype(top, "Producer", "Producer").unwrap();
    // Same name and interface, opposite polarity: no delegation.
    ws.create_require_port(top, "Speed", "Speed_I", &[]).unwrap();

    let connectors = ws.auto_connect(top).unwrap();
    assert!(connectors.is_empty());

    let unconnected = ws.find_unconnected_ports(top).unwrap();
    assert_eq!(unconnected.len(), 2);
}

#[test]
fn test_interface_identity_matching_is_exact() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let interfaces = ws.root_package("PortInterfaces").unwrap();
    // Structurally identical, but a different interface.
    let other = ws
        .create_sender_receiver_interface(interfaces, "OtherSpeed_I")
        .unwrap();
    ws.create_data_element(other, "Speed", "UInt8", false).unwrap();

    let components = ws.root_package("Components").unwrap();
    let producer = ws
        .create_component(components, "Producer", ComponentKind::Application)
        .unwrap();
    ws.create_provide_port(producer, "Speed", "Speed_I", &[]).unwrap();
    let consumer = ws
        .create_component(components, "Consumer", ComponentKind::Application)
        .unwrap();
    ws.create_require_port(consumer, "Speed", "OtherSpeed_I", &[]).unwrap();

    let top = ws.create_composition(components, "TopLevel").unwrap();
    ws.create_component_prototype(top, "Producer", "Producer").unwrap();
    ws.create_component_prototype(top, "Consumer", "Consumer").unwrap();

    // Same port name, different interface reference: nothing connects.
    let connectors = ws.auto_connect(top).unwrap();
    assert!(connectors.is_empty());
    assert_eq!(ws.find_unconnected_ports(top).unwrap().len(), 2);
}

#[test]
fn test_unconnected_scan_ignores_non_sender_receiver_ports() {
    let mut ws = demo_workspace();
    let top = producer_consumer(&mut ws);
    let components = ws.root_package("Components").unwrap();

    // A client-server port, left dangling on purpose.
    let interfaces = ws.root_package("PortInterfaces").unwrap();
    let calc = ws.create_client_server_interface(interfaces, "Calc_I").unwrap();
    ws.create_operation(calc, "Add", &[]).unwrap();
    let server = ws
        .create_component(components, "Server", ComponentKind::Application)
        .unwrap();
    ws.create_provide_port(server, "Calc", "Calc_I", &[]).unwrap();
    ws.create_component_prototype(top, "Server", "Server").unwrap();

    ws.auto_connect(top).unwrap();
    // The dangling client-server port is out of scope for the scan.
    assert!(ws.find_unconnected_ports(top).unwrap().is_empty());
}

#[test]
fn test_unconnected_ports_before_wiring() {
    let mut ws = demo_workspace();
    let top = producer_consumer(&mut ws);

    let unconnected = ws.find_unconnected_ports(top).unwrap();
    assert_eq!(unconnected.len(), 2);
    // Deterministic (prototype, port) name order.
    let names: Vec<(String, String)> = unconnected
        .iter()
        .map(|u| {
            (
                u.prototype
                    .map(|p| ws.node(p).unwrap().name().to_string())
                    .unwrap_or_default(),
                ws.node(u.port).unwrap().name().to_string(),
            )
        })
        .collect();
    assert_eq!(
        names,
        vec![
            ("Consumer".to_string(), "Speed".to_string()),
            ("Producer".to_string(), "Speed".to_string()),
        ]
    );
}

#[test]
fn test_manual_connector_conflicts_are_detected_before_commit() {
    let mut ws = demo_workspace();
    let top = producer_consumer(&mut ws);

    // Pre-create the connector auto_connect would generate, but with
    // swapped endpoints under the same generated name.
    let first = ws.auto_connect(top).unwrap();
    assert_eq!(first.len(), 1);

    // Re-running against the existing equal connector is a clean no-op.
    let again = ws.auto_connect(top).unwrap();
    assert_eq!(first, again);
}
