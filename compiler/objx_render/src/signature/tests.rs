#![allow(clippy::unwrap_used, reason = "test code uses unwrap for concise assertions")]

use pretty_assertions::assert_eq;

use objx_diagnostic::{ErrorCode, Origin};
use objx_ir::{
    Annotations, ClassDecl, Constructor, DeclId, DeclInfo, DeclarationGraph, DeprecationLevel,
    ExportConfig, FailureKind, Function, GraphBuilder, Member, Module, ModuleId, Parameter,
    Property, TypeParam, TypeRef, Variance, Visibility,
};
use objx_mangle::{resolve, SymbolTable};
use objx_types::Scope;

use super::*;

const THROWABLE: DeclId = DeclId::new(1);
const CHANNEL: DeclId = DeclId::new(2);
const SOURCE: DeclId = DeclId::new(3);
const SINK: DeclId = DeclId::new(4);
const HIDDEN: DeclId = DeclId::new(5);

fn info(id: DeclId, name: &str) -> DeclInfo {
    DeclInfo::new(id, ModuleId::new(0), name)
}

fn function(func: Function) -> Member {
    Member::Function(func)
}

struct Fixture {
    graph: DeclarationGraph,
    symbols: SymbolTable,
    config: ExportConfig,
}

impl Fixture {
    fn new() -> Self {
        let throwable = TypeRef::reference(THROWABLE);
        let mut builder = GraphBuilder::new();
        builder.add_module(Module::new("core"));
        builder
            .add(ClassDecl::new(info(THROWABLE, "Throwable")))
            .add(
                ClassDecl::new(info(CHANNEL, "Channel"))
                    .member(Member::Constructor(
                        Constructor::new()
                            .param("path", TypeRef::STRING)
                            .throwing(FailureKind::Any),
                    ))
                    .member(function(
                        Function::new("close", TypeRef::UNIT)
                            .param("cause", TypeRef::nullable(throwable.clone()))
                            .throwing(FailureKind::Class(THROWABLE)),
                    ))
                    .member(function(
                        Function::new("parse", TypeRef::INT)
                            .param("text", TypeRef::STRING)
                            .throwing(FailureKind::Any),
                    ))
                    .member(function(
                        Function::new("read", TypeRef::STRING).throwing(FailureKind::Any),
                    ))
                    .member(function(
                        Function::new("peek", TypeRef::nullable(TypeRef::STRING))
                            .throwing(FailureKind::Any),
                    ))
                    .member(function(Function::new("join", TypeRef::UNIT).suspending()))
                    .member(function(
                        Function::new("receive", TypeRef::nullable(TypeRef::STRING))
                            .param("timeout", TypeRef::LONG)
                            .suspending()
                            .throwing(FailureKind::Class(THROWABLE)),
                    ))
                    .member(function(Function::new("toString", TypeRef::STRING)))
                    .member(function(Function::new("hashCode", TypeRef::INT)))
                    .member(function(
                        Function::new("equals", TypeRef::BOOLEAN)
                            .param("other", TypeRef::nullable(TypeRef::ANY)),
                    ))
                    .member(function(
                        Function::new("legacy", TypeRef::UNIT)
                            .with_visibility(Visibility::Protected)
                            .with_annotations(
                                Annotations::default()
                                    .with_deprecation(DeprecationLevel::Warning, "use modern"),
                            ),
                    ))
                    .member(function(
                        Function::new("leak", TypeRef::UNIT)
                            .param("secret", TypeRef::reference(HIDDEN)),
                    ))
                    .member(Member::Property(Property::new(
                        "float",
                        TypeRef::Primitive(objx_ir::PrimitiveKind::Float),
                    )))
                    .member(Member::Property(Property::new("goto", TypeRef::BOOLEAN).mutable())),
            )
            .add(
                ClassDecl::new(info(SOURCE, "Source"))
                    .generic(TypeParam::new("T").with_variance(Variance::Out))
                    .member(function(Function::new("put", TypeRef::UNIT).param("value", TypeRef::param("T"))))
                    .member(function(Function::new("contains", TypeRef::BOOLEAN).with_param(
                        Parameter {
                            unsafe_variance: true,
                            ..Parameter::new("value", TypeRef::param("T"))
                        },
                    )))
                    .member(function(
                        Function::new("replace", TypeRef::UNIT)
                            .generic(TypeParam::new("T"))
                            .param("value", TypeRef::param("T")),
                    ))
                    .member(function(Function::new("next", TypeRef::param("T"))))
                    .member(Member::Property(Property::new("current", TypeRef::param("T")).mutable())),
            )
            .add(
                ClassDecl::new(info(SINK, "Sink"))
                    .generic(TypeParam::new("T").with_variance(Variance::In))
                    .member(function(Function::new("send", TypeRef::UNIT).param("value", TypeRef::param("T"))))
                    .member(function(Function::new("last", TypeRef::nullable(TypeRef::param("T"))))),
            )
            .add(ClassDecl::new(info(HIDDEN, "Hidden").with_visibility(Visibility::Private)));
        let graph = builder.finish().unwrap();
        let config = ExportConfig::with_framework_prefix("Kxc");
        let symbols = resolve(&graph, &config).unwrap();
        Fixture {
            graph,
            symbols,
            config,
        }
    }

    fn render(&self, owner: DeclId, name: &str) -> Result<String, Omitted> {
        let decl = self.graph.get(owner).unwrap();
        let (id, member) = self
            .symbols
            .members_of(owner)
            .iter()
            .map(|&id| (id, self.graph.member(id).unwrap()))
            .find(|(_, member)| member.name() == name)
            .unwrap();
        let symbol = self.symbols.member(id).unwrap();
        let cx = MemberContext::new(Origin::of(&self.graph, owner), Scope::of_class(decl.generics()))
            .checking_variance(decl.generics());
        let renderer = SignatureRenderer::new(&self.graph, &self.symbols, &self.config);
        let rendered = renderer.member(&cx, member, symbol, false)?;
        let mut out = String::new();
        rendered.render(&mut out);
        Ok(out)
    }
}

#[test]
fn throwing_unit_method_returns_bool() {
    let f = Fixture::new();
    assert_eq!(
        f.render(CHANNEL, "close").unwrap(),
        "\n/**\n \
         * @note This method converts instances of Throwable to errors.\n \
         * Other uncaught Kotlin exceptions are fatal.\n\
         */\n\
         - (BOOL)closeCause:(KxcThrowable * _Nullable)cause \
         error:(NSError * _Nullable * _Nullable)error \
         __attribute__((swift_name(\"close(cause:)\")));\n"
    );
}

#[test]
fn throwing_return_types() {
    let f = Fixture::new();
    let parse = f.render(CHANNEL, "parse").unwrap();
    assert!(parse.contains("@note This method converts all Kotlin exceptions to errors."));
    assert!(parse.ends_with(
        "- (int32_t)parseText:(NSString *)text error:(NSError * _Nullable * _Nullable)error \
         __attribute__((swift_name(\"parse(text:)\"))) __attribute__((swift_error(nonnull_error)));\n"
    ));
    assert!(f.render(CHANNEL, "read").unwrap().ends_with(
        "- (NSString * _Nullable)readAndReturnError:(NSError * _Nullable * _Nullable)error \
         __attribute__((swift_name(\"read()\")));\n"
    ));
    assert!(f
        .render(CHANNEL, "peek")
        .unwrap()
        .contains("__attribute__((swift_error(nonnull_error)))"));
}

#[test]
fn throwing_initializer_is_nullable() {
    let f = Fixture::new();
    assert!(f.render(CHANNEL, "<init>").unwrap().ends_with(
        "- (instancetype _Nullable)initWithPath:(NSString *)path \
         error:(NSError * _Nullable * _Nullable)error \
         __attribute__((swift_name(\"init(path:)\")));\n"
    ));
}

#[test]
fn suspend_methods_take_completion_handlers() {
    let f = Fixture::new();
    assert_eq!(
        f.render(CHANNEL, "join").unwrap(),
        "\n/**\n \
         * @note This method converts instances of CancellationException to errors.\n \
         * Other uncaught Kotlin exceptions are fatal.\n\
         */\n\
         - (void)joinWithCompletionHandler:(void (^)(NSError * _Nullable))completionHandler \
         __attribute__((swift_name(\"join(completionHandler:)\")));\n"
    );
    let receive = f.render(CHANNEL, "receive").unwrap();
    assert!(receive
        .contains("@note This method converts instances of CancellationException, Throwable to errors."));
    assert!(receive.ends_with(
        "- (void)receiveTimeout:(int64_t)timeout \
         completionHandler:(void (^)(NSString * _Nullable_result, NSError * _Nullable))completionHandler \
         __attribute__((swift_name(\"receive(timeout:completionHandler:)\")));\n"
    ));
}

#[test]
fn legacy_suspend_unit_keeps_the_unit_result() {
    let mut f = Fixture::new();
    f.config = f.config.legacy_suspend_unit(true);
    assert!(f.render(CHANNEL, "join").unwrap().ends_with(
        "- (void)joinWithCompletionHandler:\
         (void (^)(KxcKotlinUnit * _Nullable, NSError * _Nullable))completionHandler \
         __attribute__((swift_name(\"join(completionHandler:)\")));\n"
    ));
}

#[test]
fn object_bridges() {
    let f = Fixture::new();
    assert_eq!(
        f.render(CHANNEL, "toString").unwrap(),
        "- (NSString *)description __attribute__((swift_name(\"description()\")));\n"
    );
    assert_eq!(
        f.render(CHANNEL, "hashCode").unwrap(),
        "- (NSUInteger)hash __attribute__((swift_name(\"hash()\")));\n"
    );
    assert_eq!(
        f.render(CHANNEL, "equals").unwrap(),
        "- (BOOL)isEqual:(id _Nullable)other __attribute__((swift_name(\"isEqual(_:)\")));\n"
    );
}

#[test]
fn doc_and_attributes_agree_on_deprecation() {
    let f = Fixture::new();
    assert_eq!(
        f.render(CHANNEL, "legacy").unwrap(),
        "\n/**\n \
         * @note This method has protected visibility in Kotlin source and is intended only for use by subclasses.\n \
         * @deprecated use modern\n\
         */\n\
         - (void)legacy __attribute__((swift_name(\"legacy()\"))) \
         __attribute__((deprecated(\"use modern\")));\n"
    );
}

#[test]
fn keyword_properties_keep_raw_accessors() {
    let f = Fixture::new();
    assert_eq!(
        f.render(CHANNEL, "float").unwrap(),
        "@property (readonly, getter=float) float float_ __attribute__((swift_name(\"float_\")));\n"
    );
    assert_eq!(
        f.render(CHANNEL, "goto").unwrap(),
        "@property (getter=goto, setter=setGoto:) BOOL goto_ __attribute__((swift_name(\"goto_\")));\n"
    );
}

#[test]
fn unsupported_parameter_type_omits_member() {
    let f = Fixture::new();
    let omitted = f.render(CHANNEL, "leak").unwrap_err();
    assert_eq!(omitted.code, ErrorCode::E4001);
    let warning = omitted.warning();
    assert_eq!(warning.member.as_deref(), Some("leak"));
    assert!(warning.message.contains("not exported"));
}

#[test]
fn variance_violations() {
    let f = Fixture::new();
    assert_eq!(f.render(SOURCE, "put").unwrap_err().code, ErrorCode::E4002);
    assert_eq!(f.render(SOURCE, "current").unwrap_err().code, ErrorCode::E4002);
    assert_eq!(f.render(SINK, "last").unwrap_err().code, ErrorCode::E4002);
    assert_eq!(
        f.render(SOURCE, "contains").unwrap(),
        "- (BOOL)containsValue:(T _Nullable)value __attribute__((swift_name(\"contains(value:)\")));\n"
    );
    assert_eq!(
        f.render(SOURCE, "replace").unwrap(),
        "- (void)replaceValue:(id _Nullable)value __attribute__((swift_name(\"replace(value:)\")));\n"
    );
    assert_eq!(
        f.render(SOURCE, "next").unwrap(),
        "- (T _Nullable)next __attribute__((swift_name(\"next()\")));\n"
    );
    assert_eq!(
        f.render(SINK, "send").unwrap(),
        "- (void)sendValue:(T _Nullable)value __attribute__((swift_name(\"send(value:)\")));\n"
    );
}
