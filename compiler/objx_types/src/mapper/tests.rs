#![allow(clippy::unwrap_used, reason = "test code uses unwrap for concise assertions")]

use pretty_assertions::assert_eq;

use objx_diagnostic::{ErrorCode, Origin};
use objx_ir::{
    ClassDecl, ContainerKind, DeclId, DeclInfo, DeclarationGraph, EnumDecl, ExportConfig,
    Function, GraphBuilder, InterfaceDecl, Modality, Module, ModuleId, PrimitiveKind, TopLevelDecl,
    TypeParam, TypeRef, Variance, Visibility,
};
use objx_mangle::{resolve, SymbolTable};

use super::*;

const THROWABLE: DeclId = DeclId::new(1);
const JOB: DeclId = DeclId::new(2);
const BOX: DeclId = DeclId::new(3);
const START: DeclId = DeclId::new(4);
const HIDDEN: DeclId = DeclId::new(5);
const LAUNCH: DeclId = DeclId::new(6);
const FLOW: DeclId = DeclId::new(7);

fn info(id: DeclId, name: &str) -> DeclInfo {
    DeclInfo::new(id, ModuleId::new(0), name)
}

struct Fixture {
    graph: DeclarationGraph,
    symbols: SymbolTable,
    config: ExportConfig,
}

impl Fixture {
    fn new(config: ExportConfig) -> Self {
        let mut builder = GraphBuilder::new();
        builder.add_module(Module::new("core"));
        builder
            .add(ClassDecl::new(info(THROWABLE, "Throwable")).with_modality(Modality::Open))
            .add(InterfaceDecl::new(info(JOB, "Job")))
            .add(
                ClassDecl::new(info(BOX, "Box"))
                    .generic(TypeParam::new("T").with_variance(Variance::Out))
                    .generic(TypeParam::new("U").with_bound(TypeRef::STRING)),
            )
            .add(EnumDecl::new(info(START, "Start")))
            .add(ClassDecl::new(info(HIDDEN, "Hidden").with_visibility(Visibility::Private)))
            .add(TopLevelDecl::function(
                info(LAUNCH, "launch"),
                "Builders.kt",
                Function::new("launch", TypeRef::UNIT),
            ))
            .add(InterfaceDecl::new(info(FLOW, "Flow")).generic(TypeParam::new("T")));
        let graph = builder.finish().unwrap();
        let symbols = resolve(&graph, &config).unwrap();
        Fixture {
            graph,
            symbols,
            config,
        }
    }

    fn mapper(&self) -> TypeMapper<'_> {
        TypeMapper::new(&self.graph, &self.symbols, &self.config)
    }

    fn render(&self, ty: &TypeRef, position: Position) -> String {
        self.mapper().map(ty, position, &Scope::empty()).unwrap().render()
    }
}

fn fixture() -> Fixture {
    Fixture::new(ExportConfig::with_framework_prefix("Kxc"))
}

#[test]
fn primitives_are_scalars_until_boxed() {
    let f = fixture();
    assert_eq!(f.render(&TypeRef::INT, Position::Parameter), "int32_t");
    assert_eq!(f.render(&TypeRef::BOOLEAN, Position::Return), "BOOL");
    assert_eq!(
        f.render(&TypeRef::Primitive(PrimitiveKind::Char), Position::Property),
        "unichar"
    );
    assert_eq!(f.render(&TypeRef::INT, Position::GenericArgument), "KxcInt *");
    assert_eq!(
        f.render(&TypeRef::nullable(TypeRef::LONG), Position::Parameter),
        "KxcLong * _Nullable"
    );
    assert_eq!(
        f.render(&TypeRef::Primitive(PrimitiveKind::Char), Position::BlockParameter),
        "id"
    );
    assert_eq!(
        f.render(&TypeRef::Primitive(PrimitiveKind::UByte), Position::BlockReturn),
        "KxcUByte *"
    );
}

#[test]
fn unit_and_nothing_collapse_only_in_return_position() {
    let f = fixture();
    assert_eq!(f.render(&TypeRef::UNIT, Position::Return), "void");
    assert_eq!(f.render(&TypeRef::UNIT, Position::Parameter), "KxcKotlinUnit *");
    assert_eq!(
        f.render(&TypeRef::nullable(TypeRef::UNIT), Position::Return),
        "KxcKotlinUnit * _Nullable"
    );
    assert_eq!(f.render(&TypeRef::NOTHING, Position::Return), "void");
    assert_eq!(
        f.render(&TypeRef::NOTHING, Position::GenericArgument),
        "KxcKotlinNothing *"
    );
}

#[test]
fn containers_keep_element_nullability() {
    let f = fixture();
    let strings = TypeRef::nullable(TypeRef::list(TypeRef::nullable(TypeRef::STRING)));
    assert_eq!(
        f.render(&strings, Position::Return),
        "NSArray<NSString * _Nullable> * _Nullable"
    );
    assert_eq!(
        f.render(
            &TypeRef::container(ContainerKind::MutableSet, TypeRef::INT),
            Position::Parameter
        ),
        "KxcMutableSet<KxcInt *> *"
    );
    assert_eq!(
        f.render(
            &TypeRef::container(ContainerKind::Array, TypeRef::LONG),
            Position::Property
        ),
        "KxcKotlinArray<KxcLong *> *"
    );
    assert_eq!(
        f.render(
            &TypeRef::map(true, TypeRef::STRING, TypeRef::nullable(TypeRef::ANY)),
            Position::Parameter
        ),
        "KxcMutableDictionary<NSString *, id _Nullable> *"
    );
}

#[test]
fn declared_types() {
    let f = fixture();
    assert_eq!(f.render(&TypeRef::reference(JOB), Position::Parameter), "id<KxcJob>");
    assert_eq!(
        f.render(&TypeRef::nullable(TypeRef::reference(THROWABLE)), Position::Return),
        "KxcThrowable * _Nullable"
    );
    assert_eq!(f.render(&TypeRef::reference(START), Position::Property), "KxcStart *");
    assert_eq!(
        f.render(
            &TypeRef::generic(BOX, vec![TypeRef::STRING, TypeRef::STRING]),
            Position::Return
        ),
        "KxcBox<NSString *, NSString *> *"
    );
    // Protocols cannot take type arguments.
    assert_eq!(
        f.render(&TypeRef::generic(FLOW, vec![TypeRef::INT]), Position::Parameter),
        "id<KxcFlow>"
    );

    let erased = Fixture::new(ExportConfig::with_framework_prefix("Kxc").generics(false));
    assert_eq!(
        erased.render(
            &TypeRef::generic(BOX, vec![TypeRef::STRING, TypeRef::STRING]),
            Position::Return
        ),
        "KxcBox *"
    );
}

#[test]
fn function_types_become_blocks() {
    let f = fixture();
    let handler = TypeRef::function(
        vec![TypeRef::nullable(TypeRef::reference(THROWABLE))],
        TypeRef::UNIT,
    );
    assert_eq!(
        f.render(&handler, Position::Parameter),
        "void (^)(KxcThrowable * _Nullable)"
    );
    let transform = TypeRef::function(
        vec![TypeRef::nullable(TypeRef::ANY), TypeRef::reference(JOB)],
        TypeRef::nullable(TypeRef::ANY),
    );
    assert_eq!(
        f.render(&transform, Position::Parameter),
        "id _Nullable (^)(id _Nullable, id<KxcJob>)"
    );
    let suspending = TypeRef::suspend_function(vec![TypeRef::INT], TypeRef::STRING);
    assert_eq!(
        f.render(&suspending, Position::Parameter),
        "void (^)(KxcInt *, void (^)(NSString * _Nullable, NSError * _Nullable))"
    );
}

#[test]
fn completion_handlers() {
    let f = fixture();
    let render = |ty: &TypeRef| {
        f.mapper()
            .completion_handler(ty, &Scope::empty())
            .unwrap()
            .render()
    };
    assert_eq!(render(&TypeRef::UNIT), "void (^)(NSError * _Nullable)");
    assert_eq!(
        render(&TypeRef::nullable(TypeRef::STRING)),
        "void (^)(NSString * _Nullable_result, NSError * _Nullable)"
    );
    assert_eq!(
        render(&TypeRef::list(TypeRef::INT)),
        "void (^)(NSArray<KxcInt *> * _Nullable, NSError * _Nullable)"
    );
    assert_eq!(
        render(&TypeRef::INT),
        "void (^)(KxcInt * _Nullable, NSError * _Nullable)"
    );
}

#[test]
fn legacy_completion_handlers_pass_unit() {
    let f = Fixture::new(ExportConfig::with_framework_prefix("Kxc").legacy_suspend_unit(true));
    let render = |ty: &TypeRef| {
        f.mapper()
            .completion_handler(ty, &Scope::empty())
            .unwrap()
            .render()
    };
    assert_eq!(
        render(&TypeRef::UNIT),
        "void (^)(KxcKotlinUnit * _Nullable, NSError * _Nullable)"
    );
    assert_eq!(
        render(&TypeRef::INT),
        "void (^)(KxcInt * _Nullable, NSError * _Nullable)"
    );
}

#[test]
fn class_parameters_stay_generic_and_member_parameters_erase() {
    let f = fixture();
    let mapper = f.mapper();
    let class = f.graph.get(BOX).unwrap().generics();
    let member = [
        TypeParam::new("R").with_bound(TypeRef::reference(THROWABLE)),
        TypeParam::new("S"),
    ];
    let scope = Scope::of_class(class).erasing(&member);
    let render = |name: &str| {
        mapper
            .map(&TypeRef::param(name), Position::Return, &scope)
            .unwrap()
            .render()
    };
    assert_eq!(render("T"), "T _Nullable");
    assert_eq!(render("U"), "U");
    assert_eq!(render("R"), "KxcThrowable *");
    assert_eq!(render("S"), "id _Nullable");
    assert!(mapper.map(&TypeRef::param("V"), Position::Return, &scope).is_err());

    let erased = Fixture::new(ExportConfig::with_framework_prefix("Kxc").generics(false));
    let scope = Scope::of_class(class);
    let mapper = erased.mapper();
    let render = |name: &str| {
        mapper
            .map(&TypeRef::param(name), Position::Return, &scope)
            .unwrap()
            .render()
    };
    assert_eq!(render("T"), "id _Nullable");
    assert_eq!(render("U"), "NSString *");
}

#[test]
fn self_referential_bounds_terminate() {
    let f = fixture();
    let member = [TypeParam::new("F")
        .with_bound(TypeRef::generic(BOX, vec![TypeRef::param("F"), TypeRef::STRING]))];
    let scope = Scope::empty().erasing(&member);
    let mapped = f
        .mapper()
        .map(&TypeRef::param("F"), Position::Parameter, &scope)
        .unwrap();
    assert_eq!(mapped.render(), "KxcBox<id, NSString *> *");
}

#[test]
fn unsupported_types() {
    let f = fixture();
    let mapper = f.mapper();
    let reason = |ty: TypeRef| {
        mapper
            .map(&ty, Position::Parameter, &Scope::empty())
            .unwrap_err()
            .reason
    };
    assert!(reason(TypeRef::reference(HIDDEN)).contains("not exported"));
    assert!(reason(TypeRef::reference(LAUNCH)).contains("not a type"));
    assert!(reason(TypeRef::generic(BOX, vec![TypeRef::STRING])).contains("takes 2 type arguments"));
    assert!(reason(TypeRef::generic(START, vec![TypeRef::INT])).contains("not a class or interface"));

    let err = mapper
        .map(&TypeRef::reference(HIDDEN), Position::Parameter, &Scope::empty())
        .unwrap_err()
        .at(Origin::of(&f.graph, BOX));
    assert_eq!(err.code(), ErrorCode::E3001);
    assert_eq!(err.in_member("get").code(), ErrorCode::E4001);
}

#[test]
fn supertypes() {
    let f = fixture();
    let mapper = f.mapper();
    let scope = Scope::empty();
    assert_eq!(
        mapper.supertype(&TypeRef::reference(THROWABLE), &scope).unwrap(),
        Supertype::Class {
            name: "KxcThrowable".to_string(),
            args: Vec::new()
        }
    );
    assert_eq!(
        mapper.supertype(&TypeRef::reference(JOB), &scope).unwrap(),
        Supertype::Protocol("KxcJob".to_string())
    );
    let boxed = mapper
        .supertype(
            &TypeRef::generic(BOX, vec![TypeRef::STRING, TypeRef::INT]),
            &scope,
        )
        .unwrap();
    assert_eq!(
        boxed,
        Supertype::Class {
            name: "KxcBox".to_string(),
            args: vec![
                ForeignType::class("NSString"),
                ForeignType::class("KxcInt")
            ]
        }
    );
    assert!(mapper.supertype(&TypeRef::STRING, &scope).is_err());
}
