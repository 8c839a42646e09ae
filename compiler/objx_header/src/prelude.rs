//! Support declarations every header starts with.
//!
//! The root class, the mutable collection subclasses, the boxed numbers
//! and the stdlib `Unit`/`Nothing`/`Array` classes. Their names are
//! reserved by the mangler, so nothing exported can collide with them.

use objx_ir::ExportConfig;
use objx_mangle::support::{
    BoxedNumber, ARRAY, BASE, BOXED_NUMBERS, MUTABLE_DICTIONARY, MUTABLE_SET, NOTHING, NUMBER,
    UNIT,
};

/// `NSNumber` initializers the boxed classes hide, as `(selector piece, C type)`.
const NUMBER_INITIALIZERS: [(&str, &str); 15] = [
    ("Char", "char"),
    ("UnsignedChar", "unsigned char"),
    ("Short", "short"),
    ("UnsignedShort", "unsigned short"),
    ("Int", "int"),
    ("UnsignedInt", "unsigned int"),
    ("Long", "long"),
    ("UnsignedLong", "unsigned long"),
    ("LongLong", "long long"),
    ("UnsignedLongLong", "unsigned long long"),
    ("Float", "float"),
    ("Double", "double"),
    ("Bool", "BOOL"),
    ("Integer", "NSInteger"),
    ("UnsignedInteger", "NSUInteger"),
];

const UNAVAILABLE: &str = " __attribute__((unavailable))";
const RESTRICTED: &str = "__attribute__((objc_subclassing_restricted))";

/// Names of the classes the prelude defines, for the `@class` block.
pub fn prelude_classes(config: &ExportConfig) -> Vec<String> {
    let mut names: Vec<String> = [BASE, MUTABLE_SET, MUTABLE_DICTIONARY, NUMBER]
        .iter()
        .map(|name| config.prefixed(name))
        .collect();
    names.extend(BOXED_NUMBERS.iter().map(|b| config.prefixed(b.name)));
    names.push(config.stdlib_name(UNIT));
    names.push(config.stdlib_name(NOTHING));
    names.push(config.stdlib_name(ARRAY));
    names
}

/// The prelude blocks in emission order, each ending in `@end`.
pub fn prelude(config: &ExportConfig) -> Vec<String> {
    let mut blocks = vec![
        base(config),
        format!(
            "@interface {base} ({base}Copying) <NSCopying>\n@end\n",
            base = config.prefixed(BASE)
        ),
        format!(
            "{}@interface {}<ObjectType> : NSMutableSet<ObjectType>\n@end\n",
            swift_name(config, MUTABLE_SET),
            config.prefixed(MUTABLE_SET)
        ),
        format!(
            "{}@interface {}<KeyType, ObjectType> : NSMutableDictionary<KeyType, ObjectType>\n@end\n",
            swift_name(config, MUTABLE_DICTIONARY),
            config.prefixed(MUTABLE_DICTIONARY)
        ),
        format!(
            "@interface NSError (NSError{}{}Exception)\n\
             @property (readonly) id _Nullable {}Exception;\n\
             @end\n",
            config.framework_prefix,
            config.source_language,
            lower_first(&config.source_language)
        ),
        number(config),
    ];
    blocks.extend(BOXED_NUMBERS.iter().map(|boxed| boxed_number(config, boxed)));
    blocks.push(unit(config));
    blocks.push(nothing(config));
    blocks.push(array(config));
    blocks
}

fn swift_name(config: &ExportConfig, name: &str) -> String {
    let objc = config.prefixed(name);
    let swift = config.stdlib_swift_name(name);
    if objc == swift {
        String::new()
    } else {
        format!("__attribute__((swift_name(\"{swift}\")))\n")
    }
}

/// Swift name attribute of a stdlib class, whose ObjC name already
/// carries the stdlib prefix.
fn stdlib_swift_name(config: &ExportConfig, name: &str) -> String {
    if config.framework_prefix.is_empty() {
        String::new()
    } else {
        format!(
            "__attribute__((swift_name(\"{}\")))\n",
            config.stdlib_swift_name(name)
        )
    }
}

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn base(config: &ExportConfig) -> String {
    format!(
        "{}@interface {} : NSObject\n\
         - (instancetype)init{UNAVAILABLE};\n\
         + (instancetype)new{UNAVAILABLE};\n\
         + (void)initialize __attribute__((objc_requires_super));\n\
         @end\n",
        swift_name(config, BASE),
        config.prefixed(BASE)
    )
}

fn number(config: &ExportConfig) -> String {
    let mut text = format!(
        "{}@interface {} : NSNumber\n",
        swift_name(config, NUMBER),
        config.prefixed(NUMBER)
    );
    for (piece, c_type) in NUMBER_INITIALIZERS {
        text.push_str(&format!(
            "- (instancetype)initWith{piece}:({c_type})value{UNAVAILABLE};\n"
        ));
    }
    for (piece, c_type) in NUMBER_INITIALIZERS {
        text.push_str(&format!(
            "+ (instancetype)numberWith{piece}:({c_type})value{UNAVAILABLE};\n"
        ));
    }
    text.push_str("@end\n");
    text
}

fn boxed_number(config: &ExportConfig, boxed: &BoxedNumber) -> String {
    format!(
        "{}@interface {} : {}\n\
         - (instancetype)initWith{piece}:({c_type})value;\n\
         + (instancetype)numberWith{piece}:({c_type})value;\n\
         @end\n",
        swift_name(config, boxed.name),
        config.prefixed(boxed.name),
        config.prefixed(NUMBER),
        piece = boxed.selector_piece,
        c_type = boxed.c_type,
    )
}

fn unit(config: &ExportConfig) -> String {
    let name = config.stdlib_name(UNIT);
    format!(
        "{RESTRICTED}\n{}@interface {name} : {}\n\
         + (instancetype)alloc{UNAVAILABLE};\n\
         + (instancetype)allocWithZone:(struct _NSZone *)zone{UNAVAILABLE};\n\
         + (instancetype)unit __attribute__((swift_name(\"init()\")));\n\
         @property (class, readonly, getter=shared) {name} *shared __attribute__((swift_name(\"shared\")));\n\
         - (NSString *)description __attribute__((swift_name(\"description()\")));\n\
         @end\n",
        stdlib_swift_name(config, UNIT),
        config.prefixed(BASE),
    )
}

fn nothing(config: &ExportConfig) -> String {
    format!(
        "{RESTRICTED}\n{}@interface {} : {}\n\
         + (instancetype)alloc{UNAVAILABLE};\n\
         + (instancetype)allocWithZone:(struct _NSZone *)zone{UNAVAILABLE};\n\
         @end\n",
        stdlib_swift_name(config, NOTHING),
        config.stdlib_name(NOTHING),
        config.prefixed(BASE),
    )
}

fn array(config: &ExportConfig) -> String {
    let (params, element) = if config.generics {
        ("<T>", "T _Nullable")
    } else {
        ("", "id _Nullable")
    };
    let int = config.prefixed("Int");
    format!(
        "{RESTRICTED}\n{swift}@interface {name}{params} : {base}\n\
         + (instancetype)arrayWithSize:(int32_t)size init:({element} (^)({int} *))init \
         __attribute__((swift_name(\"init(size:init:)\")));\n\
         + (instancetype)alloc{UNAVAILABLE};\n\
         + (instancetype)allocWithZone:(struct _NSZone *)zone{UNAVAILABLE};\n\
         - ({element})getIndex:(int32_t)index __attribute__((swift_name(\"get(index:)\")));\n\
         - (void)setIndex:(int32_t)index value:({element})value \
         __attribute__((swift_name(\"set(index:value:)\")));\n\
         @property (readonly) int32_t size __attribute__((swift_name(\"size\")));\n\
         @end\n",
        swift = stdlib_swift_name(config, ARRAY),
        name = config.stdlib_name(ARRAY),
        base = config.prefixed(BASE),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(prefix: &str) -> ExportConfig {
        ExportConfig::with_framework_prefix(prefix)
    }

    #[test]
    fn root_class_and_copying_category() {
        let blocks = prelude(&config("Kt"));
        assert_eq!(
            blocks[0],
            "__attribute__((swift_name(\"KotlinBase\")))\n\
             @interface KtBase : NSObject\n\
             - (instancetype)init __attribute__((unavailable));\n\
             + (instancetype)new __attribute__((unavailable));\n\
             + (void)initialize __attribute__((objc_requires_super));\n\
             @end\n"
        );
        assert_eq!(blocks[1], "@interface KtBase (KtBaseCopying) <NSCopying>\n@end\n");
        assert_eq!(
            blocks[4],
            "@interface NSError (NSErrorKtKotlinException)\n\
             @property (readonly) id _Nullable kotlinException;\n\
             @end\n"
        );
    }

    #[test]
    fn number_hides_every_foundation_initializer() {
        let blocks = prelude(&config("Kt"));
        let number = &blocks[5];
        assert!(number.starts_with("__attribute__((swift_name(\"KotlinNumber\")))\n@interface KtNumber : NSNumber\n"));
        assert_eq!(number.matches("__attribute__((unavailable))").count(), 30);
        assert!(number.contains("+ (instancetype)numberWithUnsignedInteger:(NSUInteger)value __attribute__((unavailable));\n"));
    }

    #[test]
    fn boxed_numbers() {
        let blocks = prelude(&config("Kt"));
        assert_eq!(
            blocks[6],
            "__attribute__((swift_name(\"KotlinByte\")))\n\
             @interface KtByte : KtNumber\n\
             - (instancetype)initWithChar:(char)value;\n\
             + (instancetype)numberWithChar:(char)value;\n\
             @end\n"
        );
        assert!(blocks[12].contains("@interface KtLong : KtNumber\n- (instancetype)initWithLongLong:(long long)value;\n"));
    }

    #[test]
    fn stdlib_classes() {
        let blocks = prelude(&config(""));
        let count = blocks.len();
        assert_eq!(count, 20);
        assert_eq!(
            blocks[count - 2],
            "__attribute__((objc_subclassing_restricted))\n\
             @interface KotlinNothing : Base\n\
             + (instancetype)alloc __attribute__((unavailable));\n\
             + (instancetype)allocWithZone:(struct _NSZone *)zone __attribute__((unavailable));\n\
             @end\n"
        );
        assert_eq!(
            blocks[count - 1],
            "__attribute__((objc_subclassing_restricted))\n\
             @interface KotlinArray<T> : Base\n\
             + (instancetype)arrayWithSize:(int32_t)size init:(T _Nullable (^)(Int *))init \
             __attribute__((swift_name(\"init(size:init:)\")));\n\
             + (instancetype)alloc __attribute__((unavailable));\n\
             + (instancetype)allocWithZone:(struct _NSZone *)zone __attribute__((unavailable));\n\
             - (T _Nullable)getIndex:(int32_t)index __attribute__((swift_name(\"get(index:)\")));\n\
             - (void)setIndex:(int32_t)index value:(T _Nullable)value \
             __attribute__((swift_name(\"set(index:value:)\")));\n\
             @property (readonly) int32_t size __attribute__((swift_name(\"size\")));\n\
             @end\n"
        );
        let unit = &blocks[count - 3];
        assert!(unit.starts_with("__attribute__((objc_subclassing_restricted))\n@interface KotlinUnit : Base\n"));
        assert_eq!(unit.matches("KotlinUnit *shared").count(), 1);
    }

    #[test]
    fn prefixed_stdlib_classes_keep_swift_names() {
        let blocks = prelude(&config("Kt"));
        let unit = &blocks[blocks.len() - 3];
        assert!(unit.contains(
            "__attribute__((swift_name(\"KotlinUnit\")))\n@interface KtKotlinUnit : KtBase\n"
        ));
    }

    #[test]
    fn erased_array_uses_id() {
        let blocks = prelude(&config("Kt").generics(false));
        let array = &blocks[blocks.len() - 1];
        assert!(array.contains("@interface KtKotlinArray : KtBase\n"));
        assert!(array.contains("- (id _Nullable)getIndex:(int32_t)index"));
        // Collection subclasses stay generic regardless.
        assert!(blocks[2].contains("@interface KtMutableSet<ObjectType>"));
    }

    #[test]
    fn prelude_classes_cover_every_interface() {
        let config = config("Kt");
        let classes = prelude_classes(&config);
        assert_eq!(classes.len(), 18);
        for class in &classes {
            let opener = format!("@interface {class} ");
            let generic = format!("@interface {class}<");
            assert!(
                prelude(&config)
                    .iter()
                    .any(|b| b.contains(&opener) || b.contains(&generic)),
                "{class}"
            );
        }
    }
}
