use crate::content::Encoding;
use crate::document::Document;
use crate::walk::{NodeKind, TreeNode};

/// Renders the document as Markdown. The output is a pure function of the
/// document: title, optional description and README, the indented tree,
/// then one fenced section per non-binary file.
pub fn render_markdown(doc: &Document) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", doc.project_info.name));

    if !doc.project_info.description.is_empty() {
        out.push_str(&format!("{}\n\n", doc.project_info.description));
    }

    if !doc.readme.is_empty() {
        out.push_str(&format!("## README\n\n{}\n\n", doc.readme));
    }

    out.push_str("## Project Structure\n\n");
    push_tree(&mut out, &doc.file_tree);

    out.push_str("\n## Files\n\n");
    for record in &doc.files {
        if record.encoding != Encoding::Binary {
            out.push_str(&format!("### {}\n\n", record.path));
            out.push_str(&format!("```\n{}\n```\n\n", record.content));
        }
    }

    out
}

/// One `- name` line per node, two spaces of indent per level, a trailing
/// slash on directories. Explicit stack, children pushed reversed so they
/// emit in listing order.
fn push_tree(out: &mut String, tree: &[TreeNode]) {
    let mut stack: Vec<(&TreeNode, usize)> = tree.iter().rev().map(|n| (n, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        let suffix = match node.kind {
            NodeKind::Directory => "/",
            NodeKind::File => "",
        };
        out.push_str(&format!("{}- {}{}\n", "  ".repeat(depth), node.name, suffix));

        if let Some(children) = &node.children {
            stack.extend(children.iter().rev().map(|c| (c, depth + 1)));
        }
    }
}
