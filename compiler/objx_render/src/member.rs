//! Rendered member lines.

use bitflags::bitflags;

use objx_mangle::{Channel, Selector};
use objx_types::ForeignType;

use crate::doc::{quoted, Doc};

/// `-` or `+`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MethodKind {
    Instance,
    Class,
}

impl MethodKind {
    pub const fn marker(self) -> char {
        match self {
            MethodKind::Instance => '-',
            MethodKind::Class => '+',
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RenderedParam {
    pub name: String,
    pub ty: ForeignType,
}

/// One method declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RenderedSignature {
    pub kind: MethodKind,
    pub selector: Selector,
    /// One per selector piece, unless the selector is nullary.
    pub params: Vec<RenderedParam>,
    pub returns: ForeignType,
    pub channel: Channel,
    /// `None` for the allocation lines, which carry no Swift name.
    pub swift_name: Option<String>,
    pub nonnull_error: bool,
    pub designated: bool,
    /// Trailing attributes (availability, opt-in markers).
    pub attributes: Vec<String>,
    pub doc: Doc,
}

impl RenderedSignature {
    /// A parameterless method with no Swift name, such as `alloc`.
    pub fn bare(kind: MethodKind, name: &str, returns: ForeignType) -> Self {
        RenderedSignature {
            kind,
            selector: Selector::nullary(name),
            params: Vec::new(),
            returns,
            channel: Channel::None,
            swift_name: None,
            nonnull_error: false,
            designated: false,
            attributes: Vec::new(),
            doc: Doc::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn render(&self, out: &mut String) {
        if !self.doc.is_empty() {
            out.push('\n');
            self.doc.render(out);
        }
        out.push(self.kind.marker());
        out.push_str(" (");
        out.push_str(&self.returns.render());
        out.push(')');
        if self.selector.is_nullary() {
            out.push_str(self.selector.name());
        } else {
            let parts: Vec<String> = self
                .selector
                .pieces()
                .iter()
                .zip(&self.params)
                .map(|(piece, param)| format!("{piece}:({}){}", param.ty.render(), param.name))
                .collect();
            out.push_str(&parts.join(" "));
        }
        if let Some(swift_name) = &self.swift_name {
            push_attribute(out, &format!("swift_name({})", quoted(swift_name)));
        }
        if self.nonnull_error {
            push_attribute(out, "swift_error(nonnull_error)");
        }
        if self.designated {
            push_attribute(out, "objc_designated_initializer");
        }
        for attribute in &self.attributes {
            push_attribute(out, attribute);
        }
        out.push_str(";\n");
    }
}

bitflags! {
    /// Attributes of a `@property` line other than its accessors.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct PropertyAttrs: u8 {
        const CLASS = 1 << 0;
        const READONLY = 1 << 1;
    }
}

/// One `@property` declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RenderedProperty {
    pub attrs: PropertyAttrs,
    pub getter: Option<String>,
    pub setter: Option<String>,
    pub ty: ForeignType,
    pub name: String,
    pub swift_name: String,
    pub attributes: Vec<String>,
    pub doc: Doc,
}

impl RenderedProperty {
    pub fn render(&self, out: &mut String) {
        if !self.doc.is_empty() {
            out.push('\n');
            self.doc.render(out);
        }
        let mut list: Vec<String> = Vec::new();
        if self.attrs.contains(PropertyAttrs::CLASS) {
            list.push("class".to_string());
        }
        if self.attrs.contains(PropertyAttrs::READONLY) {
            list.push("readonly".to_string());
        }
        if let Some(getter) = &self.getter {
            list.push(format!("getter={getter}"));
        }
        if let Some(setter) = &self.setter {
            list.push(format!("setter={setter}"));
        }
        out.push_str("@property ");
        if !list.is_empty() {
            out.push('(');
            out.push_str(&list.join(", "));
            out.push_str(") ");
        }
        out.push_str(&self.ty.declare(&self.name));
        push_attribute(out, &format!("swift_name({})", quoted(&self.swift_name)));
        for attribute in &self.attributes {
            push_attribute(out, attribute);
        }
        out.push_str(";\n");
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum RenderedMember {
    Method(RenderedSignature),
    Property(RenderedProperty),
}

impl RenderedMember {
    pub fn render(&self, out: &mut String) {
        match self {
            RenderedMember::Method(signature) => signature.render(out),
            RenderedMember::Property(property) => property.render(out),
        }
    }

    pub fn doc(&self) -> &Doc {
        match self {
            RenderedMember::Method(signature) => &signature.doc,
            RenderedMember::Property(property) => &property.doc,
        }
    }

    pub fn attributes(&self) -> &[String] {
        match self {
            RenderedMember::Method(signature) => &signature.attributes,
            RenderedMember::Property(property) => &property.attributes,
        }
    }
}

fn push_attribute(out: &mut String, attribute: &str) {
    out.push_str(" __attribute__((");
    out.push_str(attribute);
    out.push_str("))");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(member: &RenderedMember) -> String {
        let mut out = String::new();
        member.render(&mut out);
        out
    }

    #[test]
    fn throwing_method_line() {
        let signature = RenderedSignature {
            kind: MethodKind::Instance,
            selector: Selector::keyword(["closeCause".to_string(), "error".to_string()]),
            params: vec![
                RenderedParam {
                    name: "cause".to_string(),
                    ty: ForeignType::class("KotlinThrowable").nullable(),
                },
                RenderedParam {
                    name: "error".to_string(),
                    ty: ForeignType::ERROR_OUT,
                },
            ],
            returns: ForeignType::BOOL,
            channel: Channel::ErrorOut,
            swift_name: Some("close(cause:)".to_string()),
            nonnull_error: false,
            designated: false,
            attributes: Vec::new(),
            doc: Doc::new(),
        };
        assert_eq!(
            render(&RenderedMember::Method(signature)),
            "- (BOOL)closeCause:(KotlinThrowable * _Nullable)cause \
             error:(NSError * _Nullable * _Nullable)error \
             __attribute__((swift_name(\"close(cause:)\")));\n"
        );
    }

    #[test]
    fn allocation_line() {
        let alloc = RenderedSignature::bare(MethodKind::Class, "alloc", ForeignType::INSTANCE_TYPE)
            .with_attribute("unavailable");
        assert_eq!(
            render(&RenderedMember::Method(alloc)),
            "+ (instancetype)alloc __attribute__((unavailable));\n"
        );
    }

    #[test]
    fn property_lines() {
        let float = RenderedProperty {
            attrs: PropertyAttrs::READONLY,
            getter: Some("float".to_string()),
            setter: None,
            ty: ForeignType::scalar("float"),
            name: "float_".to_string(),
            swift_name: "float_".to_string(),
            attributes: Vec::new(),
            doc: Doc::new(),
        };
        assert_eq!(
            render(&RenderedMember::Property(float)),
            "@property (readonly, getter=float) float float_ __attribute__((swift_name(\"float_\")));\n"
        );

        let mutable = RenderedProperty {
            attrs: PropertyAttrs::empty(),
            getter: None,
            setter: None,
            ty: ForeignType::class("NSString"),
            name: "label".to_string(),
            swift_name: "label".to_string(),
            attributes: vec!["deprecated(\"old\")".to_string()],
            doc: Doc::new(),
        };
        assert_eq!(
            render(&RenderedMember::Property(mutable)),
            "@property NSString *label __attribute__((swift_name(\"label\"))) \
             __attribute__((deprecated(\"old\")));\n"
        );
    }
}
