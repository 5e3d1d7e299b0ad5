use super::*;
use crate::base::SchemaVersion;

fn workspace() -> Workspace {
    Workspace::new(SchemaVersion::AUTOSAR_4_2)
}

#[test]
fn test_factory_path_resolves_to_same_node() {
    let mut ws = workspace();
    let pkg = ws.create_package("DataTypes").unwrap();
    let ty = ws.create_integer_type(pkg, "UInt8", 0, 255).unwrap();

    let path = ws.path_of(ty);
    assert_eq!(path.as_str(), "/DataTypes/UInt8");
    assert_eq!(ws.resolve(path.as_str()).unwrap(), ty);
}

#[test]
fn test_append_is_idempotent() {
    let mut ws = workspace();
    let pkg = ws.create_package("DataTypes").unwrap();
    let first = ws.create_integer_type(pkg, "UInt8", 0, 255).unwrap();
    let second = ws.create_integer_type(pkg, "UInt8", 0, 255).unwrap();

    assert_eq!(first, second);
    let node = ws.node(pkg).unwrap();
    assert_eq!(node.children().count(), 1);
}

#[test]
fn test_append_same_name_different_kind_is_conflict() {
    let mut ws = workspace();
    let pkg = ws.create_package("Mixed").unwrap();
    ws.create_integer_type(pkg, "Thing", 0, 255).unwrap();
    let err = ws.create_boolean_type(pkg, "Thing").unwrap_err();

    match err {
        ModelError::Conflict(ConflictError::KindMismatch {
            existing_kind,
            incoming_kind,
            ..
        }) => {
            assert_eq!(existing_kind, "IntegerType");
            assert_eq!(incoming_kind, "BooleanType");
        }
        other => panic!("expected KindMismatch, got {other:?}"),
    }
    // The failed append left the tree untouched.
    assert_eq!(ws.node(pkg).unwrap().children().count(), 1);
}

#[test]
fn test_append_same_name_different_definition_is_conflict() {
    let mut ws = workspace();
    let pkg = ws.create_package("DataTypes").unwrap();
    ws.create_integer_type(pkg, "UInt8", 0, 255).unwrap();
    let err = ws.create_integer_type(pkg, "UInt8", 0, 127).unwrap_err();

    assert!(matches!(
        err,
        ModelError::Conflict(ConflictError::Redefinition { .. })
    ));
}

#[test]
fn test_sibling_names_pairwise_distinct_after_appends() {
    let mut ws = workspace();
    let pkg = ws.create_package("DataTypes").unwrap();
    for name in ["A", "B", "C", "A", "B"] {
        let _ = ws.create_integer_type(pkg, name, 0, 255);
    }
    let names: Vec<&str> = ws
        .node(pkg)
        .unwrap()
        .children()
        .map(|id| ws.node(id).unwrap().name())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn test_packages_and_elements_are_separate_namespaces() {
    let mut ws = workspace();
    let root = ws.create_package("Root").unwrap();
    let sub = ws.create_sub_package(root, "Shared").unwrap();
    let elem = ws.create_boolean_type(root, "Shared").unwrap();

    assert_ne!(sub, elem);
    assert_eq!(ws.path_of(sub).as_str(), "/Root/Shared");
    // Package namespace wins for path descent.
    assert_eq!(ws.resolve("/Root/Shared").unwrap(), sub);
}

#[test]
fn test_find_unique_name_is_pure() {
    let mut ws = workspace();
    let pkg = ws.create_package("Components").unwrap();
    ws.create_boolean_type(pkg, "Swc").unwrap();

    assert_eq!(ws.find_unique_name(pkg, "Swc"), "Swc_1");
    assert_eq!(ws.find_unique_name(pkg, "Other"), "Other");
    // No side effect: the bare name is still there.
    assert!(ws.resolve("/Components/Swc").is_ok());
}

#[test]
fn test_reserve_and_demote_renames_bare_sibling() {
    let mut ws = workspace();
    let pkg = ws.create_package("Components").unwrap();
    let original = ws.create_boolean_type(pkg, "Swc").unwrap();

    let reserved = ws.reserve_and_demote(pkg, "Swc").unwrap();
    assert_eq!(reserved, "Swc_1");
    // The bare sibling now answers to the demoted name, at the same
    // position in the ordered namespace.
    assert_eq!(ws.node(original).unwrap().name(), "Swc_0");
    assert_eq!(ws.resolve("/Components/Swc_0").unwrap(), original);
    assert!(ws.resolve("/Components/Swc").is_err());
}

#[test]
fn test_reserve_and_demote_without_collision() {
    let mut ws = workspace();
    let pkg = ws.create_package("Components").unwrap();
    let reserved = ws.reserve_and_demote(pkg, "Swc").unwrap();
    assert_eq!(reserved, "Swc_1");
}

#[test]
fn test_delete_frees_name_and_breaks_resolution() {
    let mut ws = workspace();
    let pkg = ws.create_package("DataTypes").unwrap();
    let ty = ws.create_integer_type(pkg, "UInt8", 0, 255).unwrap();

    ws.delete(ty).unwrap();
    assert!(ws.node(ty).is_none());
    assert!(ws.resolve("/DataTypes/UInt8").is_err());

    // The name is free again, for a different kind even.
    ws.create_boolean_type(pkg, "UInt8").unwrap();
}

#[test]
fn test_delete_tombstones_whole_subtree() {
    let mut ws = workspace();
    let root = ws.create_package("A").unwrap();
    let sub = ws.create_sub_package(root, "B").unwrap();
    let ty = ws.create_integer_type(sub, "C", 0, 1).unwrap();

    ws.delete(root).unwrap();
    assert!(ws.node(root).is_none());
    assert!(ws.node(sub).is_none());
    assert!(ws.node(ty).is_none());
    assert!(ws.root_package("A").is_none());
}

#[test]
fn test_unknown_role_name_is_fatal() {
    let err = "NotARole".parse::<PackageRole>().unwrap_err();
    assert!(matches!(err, ValidationError::UnknownRole(name) if name == "NotARole"));
    assert_eq!("DataType".parse::<PackageRole>().unwrap(), PackageRole::DataType);
}

#[test]
fn test_set_role_requires_existing_package() {
    let mut ws = workspace();
    assert!(ws.set_role(PackageRole::DataType, "/Missing").is_err());

    ws.create_package("DataTypes").unwrap();
    ws.set_role(PackageRole::DataType, "/DataTypes").unwrap();
    assert_eq!(
        ws.role(PackageRole::DataType).map(|p| p.as_str()),
        Some("/DataTypes")
    );
}
