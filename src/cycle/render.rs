//! Textual forms of a cycle
//!
//! `Display` renders the composition as an expression
//! (`(cycler("c", ["r", "g"]) * cycler("lw", [1, 2]))`); `to_html` renders
//! one table row per style with columns sorted by key.

use std::fmt::{self, Write as _};

use super::{Cycle, Node};

impl<K, V> fmt::Display for Cycle<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Leaf { key, values } => write!(f, "cycler({key:?}, {values:?})"),
            Node::Branch { left, right, op } => write!(f, "({left} {op} {right})"),
        }
    }
}

impl<K, V> Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
{
    /// An HTML table showing the value of each key through one full pass.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut output = String::from("<table>");
        for key in &self.keys {
            let _ = write!(output, "<th>{key:?}</th>");
        }
        for style in self.iter() {
            output.push_str("<tr>");
            for value in style.values() {
                let _ = write!(output, "<td>{value:?}</td>");
            }
            output.push_str("</tr>");
        }
        output.push_str("</table>");
        output
    }
}
