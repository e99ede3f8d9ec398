//! Compilation from the parsed document tree to a render program.
//!
//! The program is a tree of [`Instr`] values that the renderer walks per
//! render. [`validate`] runs first and rejects content inside void elements
//! so that [`Engine::new`] fails fast instead of every render failing;
//! [`compile`] itself is total over a validated tree.
//!
//! [`Engine::new`]: crate::Engine::new

use std::collections::HashSet;

use once_cell::sync::Lazy;
use rhaml_parser::{
    AttrValue, ControlKind, Document, Element, EscapeMode, FilterLine, Inline, Node, Pos,
    SyntaxError, TextSegment, Trim,
};

/// Elements that never take content and render without a closing tag.
static VOID_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "meta", "img", "link", "br", "hr", "input", "area", "param", "col", "base", "isindex",
        "frame", "basefont",
    ]
    .into_iter()
    .collect()
});

/// A condition guarding a branch or `while` body. `negate` inverts the
/// truthiness of the resolved expression (`unless`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cond {
    pub expr: String,
    pub negate: bool,
    pub pos: Pos,
}

/// One arm of a branch instruction. `cond: None` is the trailing `else`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arm {
    pub cond: Option<Cond>,
    pub body: Vec<Instr>,
}

/// A compiled element. The static header parts (tag, shorthand id and
/// classes) are kept separate from the attribute list, which may still
/// contain expressions to resolve per render.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementInstr {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, AttrValue)>,
    pub void: bool,
    pub self_closing: bool,
    pub trim: Trim,
    pub inline: Option<Inline>,
    pub body: Vec<Instr>,
    pub pos: Pos,
}

/// One step of a compiled template.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    Doctype {
        variant: String,
        pos: Pos,
    },
    Text {
        segments: Vec<TextSegment>,
        escape: EscapeMode,
        pos: Pos,
    },
    Output {
        expr: String,
        escape: EscapeMode,
        preserve: bool,
        pos: Pos,
    },
    Silent {
        expr: String,
        pos: Pos,
    },
    Element(ElementInstr),
    /// `if`/`unless` with its `elsif`/`else` arms. At most the body of one
    /// arm runs per render.
    Branch {
        arms: Vec<Arm>,
        pos: Pos,
    },
    While {
        cond: Cond,
        body: Vec<Instr>,
        pos: Pos,
    },
    Loop {
        bindings: Vec<String>,
        iterable: String,
        body: Vec<Instr>,
        pos: Pos,
    },
    Comment {
        condition: Option<String>,
        inline: Option<String>,
        body: Vec<Instr>,
        pos: Pos,
    },
    Filter {
        name: String,
        body: Vec<FilterLine>,
        pos: Pos,
    },
}

/// A compiled template, ready to render any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub instrs: Vec<Instr>,
}

/// Validates structure the parser can't see, currently content inside void
/// elements. Run before [`compile`], which is total on a validated tree.
pub fn validate(doc: &Document) -> Result<(), SyntaxError> {
    fn check(nodes: &[Node]) -> Result<(), SyntaxError> {
        for node in nodes {
            match node {
                Node::Element(el) => {
                    if VOID_TAGS.contains(el.tag.as_str())
                        && (el.inline.is_some() || !el.children.is_empty())
                    {
                        return Err(SyntaxError::new(
                            el.pos,
                            format!("illegal nesting: content inside void element `{}`", el.tag),
                        ));
                    }
                    check(&el.children)?;
                }
                Node::Control(block) => {
                    check(&block.children)?;
                    for branch in &block.else_branches {
                        check(&branch.children)?;
                    }
                }
                Node::Comment { children, .. } => check(children)?,
                _ => {}
            }
        }
        Ok(())
    }
    check(&doc.nodes)
}

/// Compiles a parsed document. Total over the node sum type; run
/// [`validate`] first for the checks that can reject a tree.
pub fn compile(doc: Document) -> Program {
    Program {
        instrs: compile_nodes(doc.nodes),
    }
}

fn compile_nodes(nodes: Vec<Node>) -> Vec<Instr> {
    nodes.into_iter().map(compile_node).collect()
}

fn compile_node(node: Node) -> Instr {
    match node {
        Node::Element(el) => Instr::Element(compile_element(el)),
        Node::Text {
            segments,
            escape,
            pos,
        } => Instr::Text {
            segments,
            escape,
            pos,
        },
        Node::CodeOutput {
            expr,
            escape,
            preserve,
            pos,
        } => Instr::Output {
            expr,
            escape,
            preserve,
            pos,
        },
        Node::CodeSilent { expr, pos } => Instr::Silent { expr, pos },
        Node::Control(block) => {
            let pos = block.pos;
            match block.kind {
                ControlKind::If { cond } => compile_branch(
                    Cond {
                        expr: cond,
                        negate: false,
                        pos,
                    },
                    block.children,
                    block.else_branches,
                    pos,
                ),
                ControlKind::Unless { cond } => compile_branch(
                    Cond {
                        expr: cond,
                        negate: true,
                        pos,
                    },
                    block.children,
                    block.else_branches,
                    pos,
                ),
                ControlKind::While { cond } => Instr::While {
                    cond: Cond {
                        expr: cond,
                        negate: false,
                        pos,
                    },
                    body: compile_nodes(block.children),
                    pos,
                },
                ControlKind::For { bindings, iterable } => Instr::Loop {
                    bindings,
                    iterable,
                    body: compile_nodes(block.children),
                    pos,
                },
            }
        }
        Node::Comment {
            condition,
            inline,
            children,
            pos,
        } => Instr::Comment {
            condition,
            inline,
            body: compile_nodes(children),
            pos,
        },
        Node::Filter { name, body, pos } => Instr::Filter { name, body, pos },
        Node::Doctype { variant, pos } => Instr::Doctype { variant, pos },
    }
}

fn compile_branch(
    first: Cond,
    children: Vec<Node>,
    else_branches: Vec<rhaml_parser::ElseBranch>,
    pos: Pos,
) -> Instr {
    let mut arms = vec![Arm {
        cond: Some(first),
        body: compile_nodes(children),
    }];
    for branch in else_branches {
        arms.push(Arm {
            cond: branch.cond.map(|expr| Cond {
                expr,
                negate: false,
                pos: branch.pos,
            }),
            body: compile_nodes(branch.children),
        });
    }
    Instr::Branch { arms, pos }
}

fn compile_element(el: Element) -> ElementInstr {
    ElementInstr {
        void: VOID_TAGS.contains(el.tag.as_str()),
        tag: el.tag,
        id: el.id,
        classes: el.classes,
        attrs: el.attrs,
        self_closing: el.self_closing,
        trim: el.trim,
        inline: el.inline,
        body: compile_nodes(el.children),
        pos: el.pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhaml_parser::parse_document;

    fn compile_str(text: &str) -> Result<Program, SyntaxError> {
        let doc = parse_document(text, 2)?;
        validate(&doc)?;
        Ok(compile(doc))
    }

    #[test]
    fn void_tags_are_marked() {
        let prog = compile_str("%br\n%div").unwrap();
        match (&prog.instrs[0], &prog.instrs[1]) {
            (Instr::Element(br), Instr::Element(div)) => {
                assert!(br.void);
                assert!(!div.void);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn content_in_void_element_is_rejected() {
        let err = compile_str("%img hello").unwrap_err();
        assert!(err.message.contains("void"));
        let err = compile_str("%meta\n  %p nope").unwrap_err();
        assert!(err.message.contains("void"));
    }

    #[test]
    fn unless_becomes_negated_branch() {
        let prog = compile_str("- unless hidden\n  %p shown").unwrap();
        match &prog.instrs[0] {
            Instr::Branch { arms, .. } => {
                let cond = arms[0].cond.as_ref().unwrap();
                assert_eq!(cond.expr, "hidden");
                assert!(cond.negate);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn elsif_chain_compiles_into_arms() {
        let prog = compile_str("- if a\n  one\n- elsif b\n  two\n- else\n  three").unwrap();
        match &prog.instrs[0] {
            Instr::Branch { arms, .. } => {
                assert_eq!(arms.len(), 3);
                assert!(arms[0].cond.is_some());
                assert!(arms[1].cond.is_some());
                assert!(arms[2].cond.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
