#![allow(clippy::unwrap_used, reason = "test code uses unwrap for concise assertions")]

use pretty_assertions::assert_eq;

use objx_diagnostic::ErrorCode;
use objx_ir::{
    Annotations, ClassDecl, CompanionDecl, Constructor, DeclId, DeclInfo, DeclarationGraph,
    DeprecationLevel, EnumDecl, EnumEntryDecl, ExportConfig, ExtensionDecl, Function, GraphBuilder,
    InterfaceDecl, Member, Modality, Module, ModuleId, Property, TopLevelDecl, TypeParam, TypeRef,
    Variance, Visibility,
};
use objx_mangle::{resolve, FacadeKey, SymbolTable, TypeKey};

use super::*;

const THROWABLE: DeclId = DeclId::new(1);
const CANCELLATION: DeclId = DeclId::new(2);
const JOB: DeclId = DeclId::new(3);
const OVERFLOW: DeclId = DeclId::new(4);
const SUSPEND: DeclId = DeclId::new(5);
const BOX: DeclId = DeclId::new(6);
const COMPANION: DeclId = DeclId::new(7);
const JOB_EXT: DeclId = DeclId::new(8);
const THROWABLE_EXT: DeclId = DeclId::new(9);
const HIDDEN: DeclId = DeclId::new(10);
const DELAY: DeclId = DeclId::new(11);
const OLD_API: DeclId = DeclId::new(12);

fn info(id: DeclId, name: &str) -> DeclInfo {
    DeclInfo::new(id, ModuleId::new(0), name)
}

struct Fixture {
    graph: DeclarationGraph,
    symbols: SymbolTable,
    config: ExportConfig,
}

impl Fixture {
    fn new() -> Self {
        let message = TypeRef::nullable(TypeRef::STRING);
        let mut builder = GraphBuilder::new();
        builder.add_module(Module::new("core"));
        builder
            .add(
                ClassDecl::new(info(THROWABLE, "Throwable"))
                    .with_modality(Modality::Open)
                    .member(Member::Constructor(Constructor::new().primary()))
                    .member(Member::Constructor(Constructor::new().param("message", message.clone()))),
            )
            .add(
                ClassDecl::new(info(CANCELLATION, "CancellationException"))
                    .extends(TypeRef::reference(THROWABLE))
                    .member(Member::Constructor(
                        Constructor::new().param("message", message).primary(),
                    )),
            )
            .add(
                InterfaceDecl::new(info(JOB, "Job"))
                    .member(Member::Function(Function::new("cancel", TypeRef::UNIT).abstract_()))
                    .member(Member::Function(Function::new("start", TypeRef::BOOLEAN))),
            )
            .add(EnumDecl::new(info(OVERFLOW, "BufferOverflow")))
            .add(EnumEntryDecl::new(info(SUSPEND, "SUSPEND"), OVERFLOW, 0))
            .add(
                ClassDecl::new(info(BOX, "Box"))
                    .generic(TypeParam::new("T").with_variance(Variance::Out))
                    .generic(TypeParam::new("R").with_variance(Variance::In))
                    .extends(TypeRef::reference(JOB))
                    .extends(TypeRef::reference(HIDDEN))
                    .member(Member::Function(Function::new("get", TypeRef::param("T")))),
            )
            .add(
                CompanionDecl::new(info(COMPANION, "Companion"), BOX)
                    .member(Member::Property(Property::new("DEFAULT_CAPACITY", TypeRef::INT))),
            )
            .add(
                ExtensionDecl::new(info(JOB_EXT, "Job"), TypeRef::reference(JOB), "Job.kt")
                    .member(Member::Property(Property::new("isBusy", TypeRef::BOOLEAN))),
            )
            .add(
                ExtensionDecl::new(
                    info(THROWABLE_EXT, "Throwable"),
                    TypeRef::reference(THROWABLE),
                    "Throwables.kt",
                )
                .member(Member::Function(Function::new("describe", TypeRef::STRING))),
            )
            .add(ClassDecl::new(info(HIDDEN, "Hidden").with_visibility(Visibility::Private)))
            .add(TopLevelDecl::function(
                info(DELAY, "delay"),
                "Delay.kt",
                Function::new("delay", TypeRef::UNIT)
                    .param("time", TypeRef::LONG)
                    .suspending(),
            ))
            .add(ClassDecl::new(info(OLD_API, "OldApi").with_annotations(
                Annotations::default()
                    .with_deprecation(DeprecationLevel::Error, "gone")
                    .with_opt_in("ExperimentalApi"),
            )));
        let graph = builder.finish().unwrap();
        let config = ExportConfig::default();
        let symbols = resolve(&graph, &config).unwrap();
        Fixture {
            graph,
            symbols,
            config,
        }
    }

    fn render(&self, item: RenderItem) -> Rendered {
        DeclRenderer::new(&self.graph, &self.symbols, &self.config)
            .render(&item)
            .unwrap()
    }

    fn text(&self, key: TypeKey) -> String {
        self.render(RenderItem::Type(key)).decl.text
    }
}

#[test]
fn open_class_with_designated_initializer() {
    let f = Fixture::new();
    assert_eq!(
        f.text(TypeKey::Decl(THROWABLE)),
        "@interface Throwable : Base\n\
         - (instancetype)init __attribute__((swift_name(\"init()\"))) \
         __attribute__((objc_designated_initializer));\n\
         + (instancetype)new __attribute__((availability(swift, unavailable, \
         message=\"use object initializers instead\")));\n\
         - (instancetype)initWithMessage:(NSString * _Nullable)message \
         __attribute__((swift_name(\"init(message:)\")));\n\
         @end\n"
    );
}

#[test]
fn inherited_designated_initializer_becomes_unavailable() {
    let f = Fixture::new();
    let rendered = f.render(RenderItem::Type(TypeKey::Decl(CANCELLATION)));
    assert_eq!(
        rendered.decl.text,
        "__attribute__((objc_subclassing_restricted))\n\
         @interface CancellationException : Throwable\n\
         - (instancetype)initWithMessage:(NSString * _Nullable)message \
         __attribute__((swift_name(\"init(message:)\"))) \
         __attribute__((objc_designated_initializer));\n\
         - (instancetype)init __attribute__((swift_name(\"init()\"))) \
         __attribute__((objc_designated_initializer)) __attribute__((unavailable));\n\
         @end\n"
    );
    assert_eq!(rendered.decl.requires, vec!["Throwable".to_string()]);
    assert_eq!(
        rendered.decl.forward,
        Forward::Class("CancellationException".to_string())
    );
}

#[test]
fn enums_and_entries() {
    let f = Fixture::new();
    assert_eq!(
        f.text(TypeKey::Decl(OVERFLOW)),
        "@interface BufferOverflow : Base\n\
         + (instancetype)alloc __attribute__((unavailable));\n\
         + (instancetype)allocWithZone:(struct _NSZone *)zone __attribute__((unavailable));\n\
         + (KotlinArray<BufferOverflow *> *)values __attribute__((swift_name(\"values()\")));\n\
         @property (class, readonly) NSArray<BufferOverflow *> *entries \
         __attribute__((swift_name(\"entries\")));\n\
         @property (readonly) NSString *name __attribute__((swift_name(\"name\")));\n\
         @property (readonly) int32_t ordinal __attribute__((swift_name(\"ordinal\")));\n\
         @end\n"
    );
    let entry = f.render(RenderItem::Type(TypeKey::Decl(SUSPEND)));
    assert_eq!(
        entry.decl.text,
        "__attribute__((objc_subclassing_restricted))\n\
         __attribute__((swift_name(\"BufferOverflow.Suspend\")))\n\
         @interface BufferOverflowSuspend : BufferOverflow\n\
         + (instancetype)alloc __attribute__((unavailable));\n\
         + (instancetype)allocWithZone:(struct _NSZone *)zone __attribute__((unavailable));\n\
         + (instancetype)new __attribute__((unavailable));\n\
         @property (class, readonly, getter=shared) BufferOverflowSuspend *shared \
         __attribute__((swift_name(\"shared\")));\n\
         @end\n"
    );
    assert_eq!(entry.decl.requires, vec!["BufferOverflow".to_string()]);
}

#[test]
fn generic_class_with_companion_and_dropped_supertype() {
    let f = Fixture::new();
    let rendered = f.render(RenderItem::Type(TypeKey::Decl(BOX)));
    assert_eq!(
        rendered.decl.text,
        "__attribute__((objc_subclassing_restricted))\n\
         @interface Box<__covariant T, __contravariant R> : Base <Job>\n\
         @property (class, readonly, getter=companion) BoxCompanion *companion \
         __attribute__((swift_name(\"companion\")));\n\
         - (T _Nullable)get __attribute__((swift_name(\"get()\")));\n\
         @end\n"
    );
    assert_eq!(
        rendered.decl.forward,
        Forward::Class("Box<__covariant T, __contravariant R>".to_string())
    );
    assert_eq!(rendered.decl.requires, vec!["Job".to_string()]);
    assert_eq!(rendered.warnings.len(), 1);
    assert_eq!(rendered.warnings[0].code, ErrorCode::E4003);
    assert!(rendered.warnings[0].message.contains("not exported"));

    assert_eq!(
        f.text(TypeKey::Decl(COMPANION)),
        "__attribute__((objc_subclassing_restricted))\n\
         __attribute__((swift_name(\"Box.Companion\")))\n\
         @interface BoxCompanion : Base\n\
         + (instancetype)alloc __attribute__((unavailable));\n\
         + (instancetype)allocWithZone:(struct _NSZone *)zone __attribute__((unavailable));\n\
         + (instancetype)new __attribute__((unavailable));\n\
         @property (class, readonly, getter=shared) BoxCompanion *shared \
         __attribute__((swift_name(\"shared\")));\n\
         @property (readonly) int32_t DEFAULT_CAPACITY \
         __attribute__((swift_name(\"DEFAULT_CAPACITY\")));\n\
         @end\n"
    );
}

#[test]
fn erased_generics_drop_the_parameter_list() {
    let mut f = Fixture::new();
    f.config = ExportConfig::default().generics(false);
    let rendered = f.render(RenderItem::Type(TypeKey::Decl(BOX)));
    assert!(rendered.decl.text.contains("@interface Box : Base <Job>\n"));
    assert!(rendered.decl.text.contains("- (id _Nullable)get"));
    assert_eq!(rendered.decl.forward, Forward::Class("Box".to_string()));
}

#[test]
fn protocols_and_default_implementations() {
    let f = Fixture::new();
    let protocol = f.render(RenderItem::Type(TypeKey::Decl(JOB)));
    assert_eq!(
        protocol.decl.text,
        "@protocol Job\n\
         @required\n\
         - (void)cancel __attribute__((swift_name(\"cancel()\")));\n\
         @end\n"
    );
    assert_eq!(protocol.decl.forward, Forward::Protocol("Job".to_string()));

    let holder = f.render(RenderItem::Type(TypeKey::DefaultImpls(JOB)));
    assert_eq!(
        holder.decl.text,
        "__attribute__((objc_subclassing_restricted))\n\
         @interface JobDefaultImpls : Base\n\
         + (BOOL)start:(id<Job>)receiver __attribute__((swift_name(\"start(_:)\")));\n\
         @end\n"
    );
    assert_eq!(holder.decl.requires, vec!["Job".to_string()]);
}

#[test]
fn facades_hold_class_methods() {
    let f = Fixture::new();
    let facade = |file: &str| TypeKey::Facade(FacadeKey {
        module: ModuleId::new(0),
        file: file.to_string(),
    });
    assert_eq!(
        f.text(facade("Job.kt")),
        "__attribute__((objc_subclassing_restricted))\n\
         @interface JobKt : Base\n\
         + (BOOL)isBusy:(id<Job>)receiver __attribute__((swift_name(\"isBusy(_:)\")));\n\
         @end\n"
    );
    assert_eq!(
        f.text(facade("Delay.kt")),
        "__attribute__((objc_subclassing_restricted))\n\
         @interface DelayKt : Base\n\
         \n\
         /**\n \
         * @note This method converts instances of CancellationException to errors.\n \
         * Other uncaught Kotlin exceptions are fatal.\n\
         */\n\
         + (void)delayTime:(int64_t)time \
         completionHandler:(void (^)(NSError * _Nullable))completionHandler \
         __attribute__((swift_name(\"delay(time:completionHandler:)\")));\n\
         @end\n"
    );
}

#[test]
fn extensions_render_as_categories() {
    let f = Fixture::new();
    let index = f
        .symbols
        .categories()
        .iter()
        .position(|c| c.target == THROWABLE)
        .unwrap();
    let rendered = f.render(RenderItem::Category(index));
    assert_eq!(rendered.decl.name, "Throwable (Extensions)");
    assert_eq!(rendered.decl.forward, Forward::None);
    assert_eq!(rendered.decl.requires, vec!["Throwable".to_string()]);
    assert_eq!(
        rendered.decl.text,
        "@interface Throwable (Extensions)\n\
         - (NSString *)describe __attribute__((swift_name(\"describe()\")));\n\
         @end\n"
    );
}

#[test]
fn declaration_attributes_follow_annotations() {
    let f = Fixture::new();
    assert_eq!(
        f.text(TypeKey::Decl(OLD_API)),
        "\n/**\n \
         * @note annotations\n \
         *   ExperimentalApi\n \
         * @deprecated gone\n\
         */\n\
         __attribute__((objc_subclassing_restricted))\n\
         __attribute__((unavailable(\"gone\")))\n\
         __attribute__((annotate(\"objx_opt_in:ExperimentalApi\")))\n\
         @interface OldApi : Base\n\
         @end\n"
    );
}

#[test]
fn every_item_renders() {
    let f = Fixture::new();
    let renderer = DeclRenderer::new(&f.graph, &f.symbols, &f.config);
    let items = render_items(&f.symbols);
    assert_eq!(items.len(), f.symbols.types().len() + f.symbols.categories().len());
    for item in &items {
        let rendered = renderer.render(item).unwrap();
        assert!(rendered.decl.text.ends_with("@end\n"), "{item:?}");
    }
    assert!(!items
        .iter()
        .any(|item| matches!(item, RenderItem::Type(TypeKey::Decl(id)) if *id == HIDDEN)));
}

#[test]
fn layout_flags() {
    let f = Fixture::new();
    let flags = |id: DeclId| DeclFlags::of(&f.graph, f.graph.get(id).unwrap(), &f.config);
    assert_eq!(flags(THROWABLE), DeclFlags::empty());
    assert_eq!(
        flags(BOX),
        DeclFlags::RESTRICTED | DeclFlags::HAS_COMPANION | DeclFlags::GENERIC
    );
    assert_eq!(flags(OVERFLOW), DeclFlags::ENUM);
    assert_eq!(flags(SUSPEND), DeclFlags::RESTRICTED | DeclFlags::SINGLETON);
    assert_eq!(flags(COMPANION), DeclFlags::RESTRICTED | DeclFlags::SINGLETON);
}
