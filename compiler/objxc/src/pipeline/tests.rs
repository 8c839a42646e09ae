#![allow(clippy::unwrap_used, reason = "test code uses unwrap for concise assertions")]

use pretty_assertions::assert_eq;

use objx_diagnostic::ErrorCode;
use objx_ir::{
    Annotations, ClassDecl, DeclId, DeclInfo, DeclarationGraph, DeprecationLevel, ExportConfig, Function, GraphBuilder,
    InterfaceDecl, Member, Modality, Module, ModuleId, Property, TypeRef, Visibility,
};

use super::*;

const JOB: DeclId = DeclId::new(1);
const HIDDEN: DeclId = DeclId::new(2);
const TASK: DeclId = DeclId::new(3);
const WORKER: DeclId = DeclId::new(4);

fn info(id: DeclId, name: &str) -> DeclInfo {
    DeclInfo::new(id, ModuleId::new(0), name)
}

fn graph() -> DeclarationGraph {
    let mut builder = GraphBuilder::new();
    builder.add_module(Module::new("work"));
    builder
        .add(InterfaceDecl::new(info(JOB, "Job")))
        .add(ClassDecl::new(info(HIDDEN, "Hidden").with_visibility(Visibility::Private)))
        .add(ClassDecl::new(info(TASK, "Task")).with_modality(Modality::Open))
        .add(
            ClassDecl::new(info(WORKER, "Worker"))
                .extends(TypeRef::reference(TASK))
                .extends(TypeRef::reference(JOB))
                .member(Member::Function(Function::new("run", TypeRef::UNIT)))
                .member(Member::Function(
                    Function::new("leak", TypeRef::UNIT).param("h", TypeRef::reference(HIDDEN)),
                )),
        );
    builder.finish().unwrap()
}

#[test]
fn unsupported_members_are_omitted_with_a_warning() {
    let export = export_header(&graph(), &ExportConfig::default()).unwrap();

    assert!(export.header.contains("@interface Worker : Task <Job>\n"));
    assert!(export.header.contains("- (void)run "));
    assert!(!export.header.contains("leak"));
    assert!(!export.header.contains("Hidden"));

    assert_eq!(export.warnings.len(), 1);
    let warning = &export.warnings[0];
    assert_eq!(warning.member.as_deref(), Some("leak"));
    assert_eq!(warning.origin.decl(), Some(WORKER));
    assert!(warning.to_string().starts_with("warning["));
}

#[test]
fn parallel_rendering_matches_sequential() {
    let graph = graph();
    let config = ExportConfig::with_framework_prefix("Shared");
    let sequential = export_header(&graph, &config).unwrap();
    let parallel = export_header(&graph, &config.clone().parallel(true)).unwrap();
    assert_eq!(parallel.header, sequential.header);
    assert_eq!(parallel.warnings, sequential.warnings);
}

#[test]
fn unresolvable_collisions_abort_the_export() {
    let mut builder = GraphBuilder::new();
    builder.add_module(Module::new("work"));
    builder
        .add(ClassDecl::new(info(DeclId::new(1), "Job")))
        .add(ClassDecl::new(info(DeclId::new(2), "Job")));
    let graph = builder.finish().unwrap();

    let err = export_header(&graph, &ExportConfig::with_suffix_budget(0)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2001);
    assert!(err.is_fatal());

    let export = export_header(&graph, &ExportConfig::default()).unwrap();
    assert!(export.header.contains("@interface Job_ : Base\n"));
}

#[test]
fn property_setters_never_share_a_selector_with_methods() {
    let mut builder = GraphBuilder::new();
    builder.add_module(Module::new("work"));
    builder.add(
        ClassDecl::new(info(DeclId::new(1), "Counter"))
            .member(Member::Property(Property::new("count", TypeRef::INT).mutable()))
            .member(Member::Function(
                Function::new("set", TypeRef::UNIT).param("count", TypeRef::INT),
            )),
    );
    let export = export_header(&builder.finish().unwrap(), &ExportConfig::default()).unwrap();

    assert!(export.header.contains("- (void)setCount:(int32_t)count "));
    assert!(export
        .header
        .contains("@property (getter=count_, setter=setCount_:) int32_t count "));
    assert_eq!(export.header.matches("setCount:").count(), 1);
}

#[test]
fn hidden_members_vanish_and_hidden_classes_are_unavailable() {
    let hidden = || Annotations::default().with_deprecation(DeprecationLevel::Hidden, "gone");
    let mut builder = GraphBuilder::new();
    builder.add_module(Module::new("work"));
    builder
        .add(
            ClassDecl::new(info(DeclId::new(1), "Session"))
                .member(Member::Function(
                    Function::new("restart", TypeRef::UNIT).with_annotations(hidden()),
                ))
                .member(Member::Property(
                    Property::new("token", TypeRef::STRING).with_annotations(hidden()),
                ))
                .member(Member::Function(Function::new("close", TypeRef::UNIT))),
        )
        .add(ClassDecl::new(info(DeclId::new(2), "Legacy").with_annotations(hidden())));
    let export = export_header(&builder.finish().unwrap(), &ExportConfig::default()).unwrap();

    assert!(!export.header.contains("restart"));
    assert!(!export.header.contains("token"));
    assert!(export.header.contains("- (void)close "));
    assert!(export.header.contains("__attribute__((unavailable(\"gone\")))\n@interface Legacy "));
    assert!(export.warnings.is_empty());
}
