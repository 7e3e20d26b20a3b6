//! Arena-backed constituency trees.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`], so the
//! tree tagger can rewrite a preterminal label while it is visiting one of the
//! preterminal's leaves.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    label: String,
    children: Vec<NodeId>,
    stem: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("unexpected end of tree input")]
    UnexpectedEnd,
    #[error("unexpected token {token:?} at position {position}")]
    UnexpectedToken { token: String, position: usize },
    #[error("trailing input after tree at position {0}")]
    TrailingInput(usize),
    #[error("empty tree")]
    Empty,
}

impl ParseTree {
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                label: root_label.into(),
                children: Vec::new(),
                stem: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn add_child(&mut self, parent: NodeId, label: impl Into<String>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            label: label.into(),
            children: Vec::new(),
            stem: None,
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.nodes[id].label
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) {
        self.nodes[id].label = label.into();
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id].children.is_empty()
    }

    /// A node whose children are all leaves.
    pub fn is_preterminal(&self, id: NodeId) -> bool {
        let children = self.children(id);
        !children.is_empty() && children.iter().all(|&child| self.is_leaf(child))
    }

    pub fn stem(&self, id: NodeId) -> Option<&str> {
        self.nodes[id].stem.as_deref()
    }

    pub fn set_stem(&mut self, id: NodeId, stem: impl Into<String>) {
        self.nodes[id].stem = Some(stem.into());
    }

    /// Single-line bracket form with the top bracket removed.
    pub fn to_oneline(&self, use_stem: bool) -> String {
        let root = self.root();
        let start = match self.children(root) {
            [only] if !self.is_leaf(*only) => *only,
            _ => root,
        };
        let mut out = String::new();
        self.write_node(start, use_stem, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, use_stem: bool, out: &mut String) {
        let node = &self.nodes[id];
        if node.children.is_empty() {
            match (&node.stem, use_stem) {
                (Some(stem), true) => out.push_str(stem),
                _ => out.push_str(&node.label),
            }
            return;
        }
        out.push('(');
        out.push_str(&node.label);
        for &child in &node.children {
            out.push(' ');
            self.write_node(child, use_stem, out);
        }
        out.push(')');
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_node(self.root(), false, &mut out);
        f.write_str(&out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Atom(&'a str),
}

fn tokenize(input: &str) -> Vec<(usize, Token<'_>)> {
    let mut tokens = Vec::new();
    let mut atom_start: Option<usize> = None;
    for (pos, ch) in input.char_indices() {
        if ch == '(' || ch == ')' || ch.is_whitespace() {
            if let Some(start) = atom_start.take() {
                tokens.push((start, Token::Atom(&input[start..pos])));
            }
            match ch {
                '(' => tokens.push((pos, Token::Open)),
                ')' => tokens.push((pos, Token::Close)),
                _ => {}
            }
        } else if atom_start.is_none() {
            atom_start = Some(pos);
        }
    }
    if let Some(start) = atom_start {
        tokens.push((start, Token::Atom(&input[start..])));
    }
    tokens
}

struct TreeReader<'a> {
    tokens: Vec<(usize, Token<'a>)>,
    cursor: usize,
    tree: Option<ParseTree>,
}

impl<'a> TreeReader<'a> {
    fn advance(&mut self) -> Result<(usize, Token<'a>), TreeError> {
        let token = self
            .tokens
            .get(self.cursor)
            .copied()
            .ok_or(TreeError::UnexpectedEnd)?;
        self.cursor += 1;
        Ok(token)
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.cursor).map(|&(_, token)| token)
    }

    fn attach(&mut self, parent: Option<NodeId>, label: &str) -> NodeId {
        match (parent, self.tree.as_mut()) {
            (Some(parent), Some(tree)) => tree.add_child(parent, label),
            _ => {
                self.tree = Some(ParseTree::new(label));
                0
            }
        }
    }

    /// Reads one `( LABEL child* )` group; the opening bracket is already consumed.
    fn read_group(&mut self, parent: Option<NodeId>) -> Result<(), TreeError> {
        let label = match self.peek() {
            Some(Token::Atom(label)) => {
                self.cursor += 1;
                label
            }
            Some(_) => "",
            None => return Err(TreeError::UnexpectedEnd),
        };
        let id = self.attach(parent, label);
        loop {
            match self.advance()? {
                (_, Token::Open) => self.read_group(Some(id))?,
                (_, Token::Atom(word)) => {
                    self.attach(Some(id), word);
                }
                (_, Token::Close) => return Ok(()),
            }
        }
    }
}

impl FromStr for ParseTree {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut reader = TreeReader {
            tokens: tokenize(s),
            cursor: 0,
            tree: None,
        };
        match reader.advance() {
            Ok((_, Token::Open)) => reader.read_group(None)?,
            Ok((position, Token::Close)) => {
                return Err(TreeError::UnexpectedToken {
                    token: ")".to_string(),
                    position,
                });
            }
            Ok((position, Token::Atom(atom))) => {
                return Err(TreeError::UnexpectedToken {
                    token: atom.to_string(),
                    position,
                });
            }
            Err(_) => return Err(TreeError::Empty),
        }
        if let Some(&(position, _)) = reader.tokens.get(reader.cursor) {
            return Err(TreeError::TrailingInput(position));
        }
        reader.tree.ok_or(TreeError::Empty)
    }
}
