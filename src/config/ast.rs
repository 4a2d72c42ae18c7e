use crate::config::value::Value;
use crate::position::Position;

/// Closed set of config node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Sentinel at the top of every tree
    Root,
    /// `[header]` section, value holds the header string
    Block,
    /// `key = value`, children are the key and the value node
    Assignment,
    Identifier,
    String,
    Integer,
    Boolean,
    /// `[...]` array value, children are the element nodes
    Array,
}

/// A single node: its kind, its literal payload and where it came from.
///
/// `value` holds the header for blocks, the name for identifiers and the
/// scalar for literals. Roots, assignments and arrays carry an empty
/// string; their content lives in the children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub value: Value,
    pub position: Position,
}

impl Node {
    pub fn new(kind: NodeKind, value: Value, position: Position) -> Self {
        Node {
            kind,
            value,
            position,
        }
    }

    pub(crate) fn structural(kind: NodeKind, position: Position) -> Self {
        Node::new(kind, Value::String(String::new()), position)
    }
}

/// Config syntax tree. Each node owns its children in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub node: Node,
    pub children: Vec<Ast>,
}

impl Ast {
    pub fn new(node: Node) -> Self {
        Ast {
            node,
            children: Vec::new(),
        }
    }

    pub fn with_children(node: Node, children: Vec<Ast>) -> Self {
        Ast { node, children }
    }

    pub fn root() -> Self {
        Ast::new(Node::structural(NodeKind::Root, Position::new(1, 1)))
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind
    }

    pub fn push(&mut self, child: Ast) {
        self.children.push(child);
    }

    /// Dispatches to the visitor method matching this node's kind.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self.node.kind {
            NodeKind::Root => visitor.visit_root(self),
            NodeKind::Block => visitor.visit_block(self),
            NodeKind::Assignment => visitor.visit_assignment(self),
            NodeKind::Array => visitor.visit_array(self),
            NodeKind::Identifier | NodeKind::String | NodeKind::Integer | NodeKind::Boolean => {
                visitor.visit_literal(self)
            }
        }
    }
}

/// Tree walker over a config [`Ast`].
///
/// Every node kind maps to exactly one method, so a tree can never contain
/// a node the visitor does not handle.
pub trait Visitor {
    type Output;

    fn visit_root(&mut self, ast: &Ast) -> Self::Output;
    fn visit_block(&mut self, ast: &Ast) -> Self::Output;
    fn visit_assignment(&mut self, ast: &Ast) -> Self::Output;
    fn visit_literal(&mut self, ast: &Ast) -> Self::Output;
    fn visit_array(&mut self, ast: &Ast) -> Self::Output;
}
