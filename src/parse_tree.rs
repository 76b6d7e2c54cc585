use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseSymbol {
    NonTerminal(String),
    Terminal(String),
    Epsilon,
}

impl fmt::Display for ParseSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseSymbol::NonTerminal(s) => write!(f, "{}", s),
            ParseSymbol::Terminal(s) => write!(f, "'{}'", s),
            ParseSymbol::Epsilon => write!(f, "ε"),
        }
    }
}

/// An AST node: a symbol tag, ordered owned children, and a leaf value set
/// only for consumed terminals. ε-expansions leave a childless ε node so the
/// production shape survives in the tree. Owned by the caller and never
/// mutated after the parse completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub name: ParseSymbol,
    pub children: Vec<ParseTree>,
    pub leaf: Option<String>,
}

impl ParseTree {
    pub fn new(name: ParseSymbol, children: Vec<ParseTree>) -> Self {
        ParseTree {
            name,
            children,
            leaf: None,
        }
    }

    /// A nonterminal node
    pub fn from_str(name: &str, children: Vec<ParseTree>) -> Self {
        ParseTree {
            name: ParseSymbol::NonTerminal(name.to_string()),
            children,
            leaf: None,
        }
    }

    /// A consumed-terminal node carrying its matched text
    pub fn leaf(name: &str) -> Self {
        ParseTree {
            name: ParseSymbol::Terminal(name.to_string()),
            children: Vec::new(),
            leaf: Some(name.to_string()),
        }
    }

    /// A childless ε node
    pub fn epsilon() -> Self {
        ParseTree {
            name: ParseSymbol::Epsilon,
            children: Vec::new(),
            leaf: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Leaf values in left-to-right order; ε nodes contribute nothing.
    /// For a successful parse this is exactly the consumed input.
    pub fn leaves(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<String>) {
        if let Some(value) = &self.leaf {
            out.push(value.clone());
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    /// Display tree as ASCII art with box-drawing characters
    /// Output format:
    ///
    /// ```text
    /// S
    /// ├─ A
    /// │   └─ 'a'
    /// └─ B
    ///     └─ 'b'
    /// ```
    pub fn display(&self) -> String {
        let mut lines = Vec::new();
        self.build_display(&mut lines, String::new(), true, true);
        lines.join("\n")
    }

    fn build_display(&self, lines: &mut Vec<String>, prefix: String, is_last: bool, is_root: bool) {
        if is_root {
            lines.push(self.name.to_string());
        } else {
            let connector = if is_last { "└─ " } else { "├─ " };
            lines.push(format!("{}{}{}", prefix, connector, self.name));
        }

        let child_prefix = if is_root {
            String::new()
        } else if is_last {
            format!("{}    ", prefix)
        } else {
            format!("{}│   ", prefix)
        };

        let num_children = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            let is_last_child = i == num_children - 1;
            child.build_display(lines, child_prefix.clone(), is_last_child, false);
        }
    }
}

/// Macro for convenient tree construction in tests
/// Usage: tree!("S", [tree!("a"), tree!("B", [tree!("b")])])
#[macro_export]
macro_rules! tree {
    // Leaf node
    ($name:expr) => {
        ParseTree::leaf($name)
    };
    // Node with children
    ($name:expr, [$($child:expr),* $(,)?]) => {
        ParseTree::from_str($name, vec![$($child),*])
    };
}
