//! Com-spec derivation tests: member selection, defaults, field gating
//! by direction and schema era, and init value resolution.

mod helpers;

use armodel::comspec::{
    ClientServerConfig, ComSpec, ComSpecConfig, ModeSwitchConfig, ParameterConfig,
    SenderReceiverConfig,
};
use armodel::{
    ElementData, ModelError, RawValue, ValidationError, ValueSpec,
};
use helpers::*;

fn port_com_specs(ws: &armodel::Workspace, port: armodel::NodeId) -> Vec<ComSpec> {
    match ws.node(port).unwrap().data() {
        ElementData::Port(data) => data.com_specs.clone(),
        other => panic!("expected Port, got {other:?}"),
    }
}

#[test]
fn test_omitted_config_derives_one_default_per_element() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let iface = ws.resolve("/PortInterfaces/Speed_I").unwrap();
    ws.create_data_element(iface, "Direction", "UInt8", false).unwrap();

    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Sensor", armodel::ComponentKind::Application)
        .unwrap();
    let port = ws.create_provide_port(comp, "Out", "Speed_I", &[]).unwrap();

    let specs = port_com_specs(&ws, port);
    assert_eq!(specs.len(), 2);
    assert_eq!(specs[0].member(), "Speed");
    assert_eq!(specs[1].member(), "Direction");
}

#[test]
fn test_sole_element_is_default_target() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Sensor", armodel::ComponentKind::Application)
        .unwrap();

    let config = ComSpecConfig::SenderReceiver(SenderReceiverConfig {
        init_value: Some(RawValue::Int(0)),
        ..SenderReceiverConfig::default()
    });
    let port = ws.create_provide_port(comp, "Out", "Speed_I", &[config]).unwrap();

    let specs = port_com_specs(&ws, port);
    assert_eq!(specs.len(), 1);
    match &specs[0] {
        ComSpec::SenderReceiver(cs) => {
            assert_eq!(cs.element, "Speed");
            assert!(matches!(cs.init_value, Some(ValueSpec::Numerical { .. })));
            // Provide side: can_invalidate defaults to false.
            assert_eq!(cs.can_invalidate, Some(false));
        }
        other => panic!("expected SenderReceiver com-spec, got {other:?}"),
    }
}

#[test]
fn test_ambiguous_element_selection_is_fatal() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let iface = ws.resolve("/PortInterfaces/Speed_I").unwrap();
    ws.create_data_element(iface, "Direction", "UInt8", false).unwrap();

    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Sensor", armodel::ComponentKind::Application)
        .unwrap();

    let config = ComSpecConfig::SenderReceiver(SenderReceiverConfig::default());
    let err = ws
        .create_provide_port(comp, "Out", "Speed_I", &[config])
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::Validation(ValidationError::AmbiguousMember { count: 2, .. })
    ));
}

#[test]
fn test_init_value_and_ref_are_mutually_exclusive() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let constants = ws.root_package("Constants").unwrap();
    ws.create_constant(constants, "C_Init", "UInt8", &RawValue::Int(0)).unwrap();

    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Sensor", armodel::ComponentKind::Application)
        .unwrap();

    let config = ComSpecConfig::SenderReceiver(SenderReceiverConfig {
        init_value: Some(RawValue::Int(0)),
        init_value_ref: Some("C_Init".into()),
        ..SenderReceiverConfig::default()
    });
    let err = ws
        .create_require_port(comp, "In", "Speed_I", &[config])
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::Validation(ValidationError::MutuallyExclusive {
            a: "init_value",
            b: "init_value_ref",
        })
    ));
}

#[test]
fn test_autosar4_keeps_constant_reference() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let constants = ws.root_package("Constants").unwrap();
    ws.create_constant(constants, "C_Init", "UInt8", &RawValue::Int(3)).unwrap();

    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Sensor", armodel::ComponentKind::Application)
        .unwrap();
    let config = ComSpecConfig::SenderReceiver(SenderReceiverConfig {
        init_value_ref: Some("C_Init".into()),
        ..SenderReceiverConfig::default()
    });
    let port = ws.create_require_port(comp, "In", "Speed_I", &[config]).unwrap();

    match &port_com_specs(&ws, port)[0] {
        ComSpec::SenderReceiver(cs) => {
            assert!(cs.init_value.is_none());
            assert_eq!(
                cs.init_value_ref.as_ref().map(|p| p.as_str()),
                Some("/Constants/C_Init")
            );
        }
        other => panic!("expected SenderReceiver com-spec, got {other:?}"),
    }
}

#[test]
fn test_autosar3_rewrites_constant_reference_to_inner_value() {
    let mut ws = demo_workspace_v3();
    add_speed_interface(&mut ws);
    let constants = ws.root_package("Constants").unwrap();
    ws.create_constant(constants, "C_Init", "UInt8", &RawValue::Int(3)).unwrap();

    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Sensor", armodel::ComponentKind::Application)
        .unwrap();
    let config = ComSpecConfig::SenderReceiver(SenderReceiverConfig {
        init_value_ref: Some("C_Init".into()),
        ..SenderReceiverConfig::default()
    });
    let port = ws.create_require_port(comp, "In", "Speed_I", &[config]).unwrap();

    match &port_com_specs(&ws, port)[0] {
        ComSpec::SenderReceiver(cs) => {
            assert!(cs.init_value_ref.is_none());
            assert!(matches!(
                cs.init_value,
                Some(ValueSpec::Numerical { .. })
            ));
        }
        other => panic!("expected SenderReceiver com-spec, got {other:?}"),
    }
}

#[test]
fn test_queued_require_element_defaults_queue_length() {
    let mut ws = demo_workspace();
    let interfaces = ws.root_package("PortInterfaces").unwrap();
    let iface = ws
        .create_sender_receiver_interface(interfaces, "Events_I")
        .unwrap();
    ws.create_data_element(iface, "Event", "UInt8", true).unwrap();

    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Consumer", armodel::ComponentKind::Application)
        .unwrap();

    // Unset and zero both default to 1.
    let port = ws.create_require_port(comp, "In", "Events_I", &[]).unwrap();
    match &port_com_specs(&ws, port)[0] {
        ComSpec::SenderReceiver(cs) => assert_eq!(cs.queue_length, Some(1)),
        other => panic!("expected SenderReceiver com-spec, got {other:?}"),
    }

    let config = ComSpecConfig::SenderReceiver(SenderReceiverConfig {
        queue_length: Some(0),
        ..SenderReceiverConfig::default()
    });
    let port2 = ws.create_require_port(comp, "In2", "Events_I", &[config]).unwrap();
    match &port_com_specs(&ws, port2)[0] {
        ComSpec::SenderReceiver(cs) => assert_eq!(cs.queue_length, Some(1)),
        other => panic!("expected SenderReceiver com-spec, got {other:?}"),
    }
}

#[test]
fn test_direction_gated_fields_name_field_and_interface() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Sensor", armodel::ComponentKind::Application)
        .unwrap();

    // alive_timeout is require-only.
    let config = ComSpecConfig::SenderReceiver(SenderReceiverConfig {
        alive_timeout: Some(0.1),
        ..SenderReceiverConfig::default()
    });
    let err = ws
        .create_provide_port(comp, "Out", "Speed_I", &[config])
        .unwrap_err();
    match err {
        ModelError::Validation(ValidationError::FieldNotAllowed { field, interface, .. }) => {
            assert_eq!(field, "alive_timeout");
            assert_eq!(interface, "sender-receiver");
        }
        other => panic!("expected FieldNotAllowed, got {other:?}"),
    }

    // can_invalidate is provide-only.
    let config = ComSpecConfig::SenderReceiver(SenderReceiverConfig {
        can_invalidate: Some(true),
        ..SenderReceiverConfig::default()
    });
    let err = ws
        .create_require_port(comp, "In", "Speed_I", &[config])
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::Validation(ValidationError::FieldNotAllowed {
            field: "can_invalidate",
            ..
        })
    ));
}

#[test]
fn test_config_variant_must_match_interface_family() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Sensor", armodel::ComponentKind::Application)
        .unwrap();

    let config = ComSpecConfig::ClientServer(ClientServerConfig::default());
    let err = ws
        .create_provide_port(comp, "Out", "Speed_I", &[config])
        .unwrap_err();
    match err {
        ModelError::Validation(ValidationError::ConfigMismatch { given, interface, name }) => {
            assert_eq!(given, "client-server");
            assert_eq!(interface, "sender-receiver");
            assert_eq!(name, "Speed_I");
        }
        other => panic!("expected ConfigMismatch, got {other:?}"),
    }
}

#[test]
fn test_client_server_queue_length_is_server_side() {
    let mut ws = demo_workspace();
    let interfaces = ws.root_package("PortInterfaces").unwrap();
    let iface = ws.create_client_server_interface(interfaces, "Calc_I").unwrap();
    ws.create_operation(
        iface,
        "Add",
        &[
            ("a", "UInt8", armodel::model::ArgumentDirection::In),
            ("b", "UInt8", armodel::model::ArgumentDirection::In),
            ("sum", "UInt16", armodel::model::ArgumentDirection::Out),
        ],
    )
    .unwrap();

    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Server", armodel::ComponentKind::Application)
        .unwrap();

    let config = ComSpecConfig::ClientServer(ClientServerConfig {
        queue_length: Some(4),
        ..ClientServerConfig::default()
    });
    let port = ws
        .create_provide_port(comp, "CalcP", "Calc_I", std::slice::from_ref(&config))
        .unwrap();
    match &port_com_specs(&ws, port)[0] {
        ComSpec::ClientServer(cs) => {
            assert_eq!(cs.operation, "Add");
            assert_eq!(cs.queue_length, Some(4));
        }
        other => panic!("expected ClientServer com-spec, got {other:?}"),
    }

    // The same field on the client (require) side is rejected.
    let err = ws
        .create_require_port(comp, "CalcR", "Calc_I", &[config])
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::Validation(ValidationError::FieldNotAllowed {
            field: "queue_length",
            ..
        })
    ));
}

#[test]
fn test_mode_switch_field_subsets_per_direction() {
    let mut ws = demo_workspace();
    let groups = ws.root_package("ModeDclrGroups").unwrap();
    ws.create_mode_declaration_group(
        groups,
        "EcuMode",
        &["STARTUP", "RUN", "SHUTDOWN"],
        Some("STARTUP"),
    )
    .unwrap();
    let interfaces = ws.root_package("PortInterfaces").unwrap();
    ws.create_mode_switch_interface(interfaces, "EcuMode_I", "mode", "EcuMode").unwrap();

    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Manager", armodel::ComponentKind::Service)
        .unwrap();

    // Provide side takes queue_length and the ack timeout.
    let provide_cfg = ComSpecConfig::ModeSwitch(ModeSwitchConfig {
        queue_length: Some(2),
        mode_switch_ack_timeout: Some(0.5),
        ..ModeSwitchConfig::default()
    });
    let port = ws
        .create_provide_port(comp, "ModeP", "EcuMode_I", &[provide_cfg])
        .unwrap();
    match &port_com_specs(&ws, port)[0] {
        ComSpec::ModeSwitch(cs) => {
            assert_eq!(cs.mode_group, "mode");
            assert_eq!(cs.queue_length, Some(2));
            assert_eq!(cs.mode_switch_ack_timeout, Some(0.5));
        }
        other => panic!("expected ModeSwitch com-spec, got {other:?}"),
    }

    // Require side takes support_async but not queue_length.
    let require_cfg = ComSpecConfig::ModeSwitch(ModeSwitchConfig {
        support_async: Some(true),
        ..ModeSwitchConfig::default()
    });
    ws.create_require_port(comp, "ModeR", "EcuMode_I", &[require_cfg]).unwrap();

    let bad_cfg = ComSpecConfig::ModeSwitch(ModeSwitchConfig {
        queue_length: Some(2),
        ..ModeSwitchConfig::default()
    });
    let err = ws
        .create_require_port(comp, "ModeR2", "EcuMode_I", &[bad_cfg])
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::Validation(ValidationError::FieldNotAllowed {
            field: "queue_length",
            ..
        })
    ));
}

#[test]
fn test_mode_switch_ack_timeout_is_autosar4_only() {
    let mut ws = demo_workspace_v3();
    let groups = ws.root_package("ModeDclrGroups").unwrap();
    ws.create_mode_declaration_group(groups, "EcuMode", &["RUN"], Some("RUN")).unwrap();
    let interfaces = ws.root_package("PortInterfaces").unwrap();
    ws.create_mode_switch_interface(interfaces, "EcuMode_I", "mode", "EcuMode").unwrap();

    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Manager", armodel::ComponentKind::Service)
        .unwrap();
    let config = ComSpecConfig::ModeSwitch(ModeSwitchConfig {
        mode_switch_ack_timeout: Some(0.5),
        ..ModeSwitchConfig::default()
    });
    let err = ws
        .create_provide_port(comp, "ModeP", "EcuMode_I", &[config])
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::Validation(ValidationError::EraNotSupported {
            feature: "mode_switch_ack_timeout",
            ..
        })
    ));
}

#[test]
fn test_nv_data_interface_rejected_on_autosar3() {
    let mut ws = demo_workspace_v3();
    let interfaces = ws.root_package("PortInterfaces").unwrap();
    let err = ws.create_nv_data_interface(interfaces, "Nv_I").unwrap_err();
    assert!(matches!(
        err,
        ModelError::Validation(ValidationError::EraNotSupported { .. })
    ));
}

#[test]
fn test_parameter_interface_init_value() {
    let mut ws = demo_workspace();
    let interfaces = ws.root_package("PortInterfaces").unwrap();
    let iface = ws.create_parameter_interface(interfaces, "Limits_I").unwrap();
    ws.create_interface_parameter(iface, "MaxSpeed", "UInt8").unwrap();

    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(
            components,
            "Tuning",
            armodel::ComponentKind::ParameterComponent,
        )
        .unwrap();
    let config = ComSpecConfig::Parameter(ParameterConfig {
        init_value: Some(RawValue::Int(120)),
        ..ParameterConfig::default()
    });
    let port = ws
        .create_provide_port(comp, "Limits", "Limits_I", &[config])
        .unwrap();
    match &port_com_specs(&ws, port)[0] {
        ComSpec::Parameter(cs) => {
            assert_eq!(cs.parameter, "MaxSpeed");
            assert!(cs.init_value.is_some());
        }
        other => panic!("expected Parameter com-spec, got {other:?}"),
    }
}

#[test]
fn test_duplicate_member_selection_is_fatal() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Sensor", armodel::ComponentKind::Application)
        .unwrap();

    let config = ComSpecConfig::SenderReceiver(SenderReceiverConfig {
        element: Some("Speed".into()),
        ..SenderReceiverConfig::default()
    });
    let err = ws
        .create_provide_port(comp, "Out", "Speed_I", &[config.clone(), config])
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::Validation(ValidationError::DuplicateComSpec { .. })
    ));
}

#[test]
fn test_unknown_member_is_fatal() {
    let mut ws = demo_workspace();
    add_speed_interface(&mut ws);
    let components = ws.root_package("Components").unwrap();
    let comp = ws
        .create_component(components, "Sensor", armodel::ComponentKind::Application)
        .unwrap();

    let config = ComSpecConfig::SenderReceiver(SenderReceiverConfig {
        element: Some("Velocity".into()),
        ..SenderReceiverConfig::default()
    });
    let err = ws
        .create_provide_port(comp, "Out", "Speed_I", &[config])
        .unwrap_err();
    match err {
        ModelError::Validation(ValidationError::UnknownMember { interface, member }) => {
            assert_eq!(interface, "Speed_I");
            assert_eq!(member, "Velocity");
        }
        other => panic!("expected UnknownMember, got {other:?}"),
    }
}
