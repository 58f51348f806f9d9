//! Markdown cards for attribute docs and component links.

use serde::Serialize;

use crate::catalog::PropDoc;
use crate::config::{DocLanguage, LibraryVersion};

/// Language tag for fenced type signatures.
pub const CODE_LANGUAGE: &str = "typescriptreact";

/// One formatted block of a hover or completion document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HoverBlock {
    Markdown { value: String },
    Code { language: String, value: String },
}

impl HoverBlock {
    pub fn markdown(value: impl Into<String>) -> Self {
        Self::Markdown {
            value: value.into(),
        }
    }

    pub fn code(value: impl Into<String>) -> Self {
        Self::Code {
            language: CODE_LANGUAGE.to_string(),
            value: value.into(),
        }
    }

    pub fn to_markdown(&self) -> String {
        match self {
            Self::Markdown { value } => value.clone(),
            Self::Code { language, value } => format!("```{language}\n{value}\n```"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Description,
    Type,
    Default,
    Version,
    Documentation,
}

impl Label {
    pub fn text(self, language: DocLanguage) -> &'static str {
        match (self, language) {
            (Self::Description, DocLanguage::En) => "Description",
            (Self::Description, DocLanguage::Zh) => "描述",
            (Self::Type, DocLanguage::En) => "Type",
            (Self::Type, DocLanguage::Zh) => "类型",
            (Self::Default, DocLanguage::En) => "Default",
            (Self::Default, DocLanguage::Zh) => "默认值",
            (Self::Version, DocLanguage::En) => "Version",
            (Self::Version, DocLanguage::Zh) => "版本",
            (Self::Documentation, DocLanguage::En) => "documentation",
            (Self::Documentation, DocLanguage::Zh) => "文档",
        }
    }
}

/// How the type field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDisplay {
    /// `` `a` | `b` `` on the label line.
    Inline,
    /// A fenced code block of its own.
    Block,
}

/// Render `fields` in order, skipping empty values.
pub fn compose_card(
    fields: &[(Label, &str)],
    type_display: TypeDisplay,
    language: DocLanguage,
) -> Vec<HoverBlock> {
    let mut blocks = Vec::new();
    let mut md = String::new();

    for &(label, value) in fields {
        if value.is_empty() {
            continue;
        }
        let name = label.text(language);
        match (label, type_display) {
            (Label::Type, TypeDisplay::Block) => {
                if !md.is_empty() {
                    blocks.push(HoverBlock::markdown(std::mem::take(&mut md)));
                }
                blocks.push(HoverBlock::code(value));
            }
            (Label::Type, TypeDisplay::Inline) => {
                let alternatives: Vec<String> =
                    value.split("\\|").map(|t| format!("`{t}`")).collect();
                md.push_str(&format!("**{name}**: {}  \n", alternatives.join(" | ")));
            }
            _ => md.push_str(&format!("**{name}**: {value}  \n")),
        }
    }

    if !md.is_empty() {
        blocks.push(HoverBlock::markdown(md));
    }
    blocks
}

/// Hover card: description, type, default, version.
pub fn attribute_card(doc: &PropDoc, language: DocLanguage) -> Vec<HoverBlock> {
    compose_card(
        &[
            (Label::Description, doc.description.as_str()),
            (Label::Type, doc.type_.as_str()),
            (Label::Default, doc.default.as_str()),
            (Label::Version, doc.version.as_str()),
        ],
        TypeDisplay::Inline,
        language,
    )
}

/// Completion card: the type as code first, then the rest.
pub fn completion_card(doc: &PropDoc, language: DocLanguage) -> Vec<HoverBlock> {
    compose_card(
        &[
            (Label::Type, doc.type_.as_str()),
            (Label::Description, doc.description.as_str()),
            (Label::Default, doc.default.as_str()),
            (Label::Version, doc.version.as_str()),
        ],
        TypeDisplay::Block,
        language,
    )
}

/// Documentation page of a component.
pub fn doc_link(alias: &str, language: DocLanguage, version: LibraryVersion) -> String {
    let host = match version {
        LibraryVersion::V3 => "3x.ant.design",
        LibraryVersion::V4 => "ant.design",
    };
    let suffix = match language {
        DocLanguage::En => "",
        DocLanguage::Zh => "-cn",
    };
    format!("https://{host}/components/{alias}{suffix}/")
}

/// `**Affix** documentation \[ [en](..) | [中文](..) \]`, active language first.
pub fn component_header(
    name: &str,
    alias: &str,
    language: DocLanguage,
    version: LibraryVersion,
) -> String {
    let en = format!("[en]({})", doc_link(alias, DocLanguage::En, version));
    let zh = format!("[中文]({})", doc_link(alias, DocLanguage::Zh, version));
    let links = match language {
        DocLanguage::En => format!("{en} | {zh}"),
        DocLanguage::Zh => format!("{zh} | {en}"),
    };
    format!(
        "**{name}** {} \\[ {links} \\]",
        Label::Documentation.text(language)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> PropDoc {
        PropDoc {
            description: "D".into(),
            type_: "T".into(),
            default: "Def".into(),
            version: "V".into(),
        }
    }

    #[test]
    fn attribute_card_field_order() {
        let blocks = attribute_card(&doc(), DocLanguage::En);
        assert_eq!(
            blocks,
            vec![HoverBlock::markdown(
                "**Description**: D  \n**Type**: `T`  \n**Default**: Def  \n**Version**: V  \n"
            )]
        );
    }

    #[test]
    fn inline_type_splits_escaped_pipes() {
        let doc = PropDoc {
            type_: "Function\\|null".into(),
            ..PropDoc::default()
        };
        let blocks = attribute_card(&doc, DocLanguage::Zh);
        assert_eq!(
            blocks,
            vec![HoverBlock::markdown("**类型**: `Function` | `null`  \n")]
        );
    }

    #[test]
    fn completion_card_leads_with_code() {
        let blocks = completion_card(&doc(), DocLanguage::En);
        assert_eq!(blocks[0], HoverBlock::code("T"));
        assert_eq!(
            blocks[1],
            HoverBlock::markdown("**Description**: D  \n**Default**: Def  \n**Version**: V  \n")
        );
        assert_eq!(blocks[0].to_markdown(), "```typescriptreact\nT\n```");
    }

    #[test]
    fn empty_doc_renders_nothing() {
        assert!(attribute_card(&PropDoc::default(), DocLanguage::En).is_empty());
    }

    #[test]
    fn links_follow_language_and_version() {
        assert_eq!(
            doc_link("auto-complete", DocLanguage::Zh, LibraryVersion::V4),
            "https://ant.design/components/auto-complete-cn/"
        );
        assert_eq!(
            doc_link("affix", DocLanguage::En, LibraryVersion::V3),
            "https://3x.ant.design/components/affix/"
        );
        let header = component_header("Affix", "affix", DocLanguage::Zh, LibraryVersion::V4);
        assert_eq!(
            header,
            "**Affix** 文档 \\[ [中文](https://ant.design/components/affix-cn/) | [en](https://ant.design/components/affix/) \\]"
        );
    }
}
