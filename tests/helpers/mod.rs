//! Shared fixtures for the integration tests.

use armodel::{PackageRole, SchemaVersion, Workspace};

/// An empty AUTOSAR 4 workspace.
pub fn workspace_v4() -> Workspace {
    Workspace::new(SchemaVersion::AUTOSAR_4_2)
}

/// An empty AUTOSAR 3 workspace.
pub fn workspace_v3() -> Workspace {
    Workspace::new(SchemaVersion::AUTOSAR_3_0)
}

/// A workspace with the standard package layout, all roles bound, and a
/// couple of primitive data types.
pub fn demo_workspace() -> Workspace {
    let mut ws = workspace_v4();
    seed_packages(&mut ws);
    ws
}

/// Same layout on an AUTOSAR 3 workspace.
pub fn demo_workspace_v3() -> Workspace {
    let mut ws = workspace_v3();
    seed_packages(&mut ws);
    ws
}

fn seed_packages(ws: &mut Workspace) {
    for (name, role) in [
        ("DataTypes", PackageRole::DataType),
        ("CompuMethods", PackageRole::CompuMethod),
        ("DataConstraints", PackageRole::DataConstraint),
        ("Constants", PackageRole::Constant),
        ("PortInterfaces", PackageRole::PortInterface),
        ("ModeDclrGroups", PackageRole::ModeDclrGroup),
        ("Components", PackageRole::ComponentType),
    ] {
        ws.create_package(name).expect("fresh workspace");
        ws.set_role(role, &format!("/{name}")).expect("package exists");
    }

    let datatypes = ws.root_package("DataTypes").expect("just created");
    ws.create_integer_type(datatypes, "UInt8", 0, 255).expect("fresh");
    ws.create_integer_type(datatypes, "UInt16", 0, 65535).expect("fresh");
    ws.create_boolean_type(datatypes, "Boolean").expect("fresh");
}

/// The speed sender-receiver interface used across the scenario tests:
/// one UInt8 data element named `Speed`.
pub fn add_speed_interface(ws: &mut Workspace) -> armodel::NodeId {
    let interfaces = ws.root_package("PortInterfaces").expect("seeded");
    let iface = ws
        .create_sender_receiver_interface(interfaces, "Speed_I")
        .expect("fresh");
    ws.create_data_element(iface, "Speed", "UInt8", false)
        .expect("fresh");
    iface
}
