use crate::binaryxml::Listener;

///Struct representing a parsed XML document.
#[derive(Debug)]
pub struct XmlDocument {
    root: Option<Node>,
}

impl XmlDocument {
    ///Returns the root [Node] of the XML document.
    pub fn get_root(&self) -> &Option<Node> {
        &self.root
    }

    ///Renders the document as XML text, prefixed with the standard
    ///declaration line. Attribute values and text are emitted verbatim;
    ///no escaping is applied.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        if let Some(root) = &self.root {
            write_node(root, 0, &mut out);
        }
        out
    }
}

///A node of the parsed document: an element or a run of text.
#[derive(Debug)]
pub enum Node {
    Element(Element),
    Text(String),
}

///Struct representing an element within the parsed XML document.
#[derive(Debug)]
pub struct Element {
    uri: String,
    local_name: String,
    q_name: String,
    prefixes: Vec<(String, String)>,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    pub(crate) fn new(
        uri: String,
        local_name: String,
        q_name: String,
        attributes: Vec<Attribute>,
    ) -> Self {
        Element {
            uri,
            local_name,
            q_name,
            prefixes: Vec::new(),
            attributes,
            children: Vec::new(),
        }
    }

    ///Returns the element's namespace URI, or the empty string for the
    ///default namespace.
    pub fn get_uri(&self) -> &str {
        &self.uri
    }

    ///Returns the element's local name.
    pub fn get_local_name(&self) -> &str {
        &self.local_name
    }

    ///Returns the element's qualified name (`prefix:local`, or the bare
    ///local name when no prefix was active).
    pub fn get_qualified_name(&self) -> &str {
        &self.q_name
    }

    ///Returns the `(prefix, uri)` namespace declarations that appeared
    ///at this element's open tag, in declaration order.
    pub fn get_prefixes(&self) -> &[(String, String)] {
        &self.prefixes
    }

    ///Returns the element's attributes, in source order.
    pub fn get_attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    ///Returns the element's child nodes, in source order.
    pub fn get_children(&self) -> &[Node] {
        &self.children
    }
}

///A decoded attribute. `namespace` and `prefix` are unset when the
///attribute carries no namespace index, or when its URI was not bound to
///an active prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub value: String,
}

///Materializes the element tree from the decoder's event stream.
///
///`stack` holds the open elements with a synthetic sentinel at the
///bottom; `pending_prefixes` is the parallel stack of namespaces
///declared while each of those elements was the innermost open node. A
///finished element snapshots the declarations that appeared immediately
///before its own start tag.
pub(crate) struct TreeBuilder {
    stack: Vec<Element>,
    pending_prefixes: Vec<Vec<(String, String)>>,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        TreeBuilder {
            stack: vec![Element::new(
                String::new(),
                String::new(),
                String::new(),
                Vec::new(),
            )],
            pending_prefixes: vec![Vec::new()],
        }
    }

    ///Consumes the builder, surfacing the first top-level node as the
    ///document root.
    pub(crate) fn into_document(self) -> XmlDocument {
        let root = self
            .stack
            .into_iter()
            .next()
            .and_then(|sentinel| sentinel.children.into_iter().next());
        XmlDocument { root }
    }
}

impl Listener for TreeBuilder {
    fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) {
        if let Some(frame) = self.pending_prefixes.last_mut() {
            frame.push((prefix.to_string(), uri.to_string()));
        }
    }

    fn end_prefix_mapping(&mut self, _prefix: &str, _uri: &str) {
        // Removal is positional; start/end pairs are well nested in the
        // chunk stream.
        if let Some(frame) = self.pending_prefixes.last_mut() {
            frame.pop();
        }
    }

    fn start_element(&mut self, uri: &str, local_name: &str, q_name: &str, attrs: &[Attribute]) {
        self.stack.push(Element::new(
            uri.to_string(),
            local_name.to_string(),
            q_name.to_string(),
            attrs.to_vec(),
        ));
        self.pending_prefixes.push(Vec::new());
    }

    fn end_element(&mut self, _uri: &str, _local_name: &str, _q_name: &str) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(mut element) = self.stack.pop() {
            self.pending_prefixes.pop();
            if let Some(frame) = self.pending_prefixes.last() {
                element.prefixes = frame.clone();
            }
            if let Some(parent) = self.stack.last_mut() {
                parent.children.push(Node::Element(element));
            }
        }
    }

    fn character_data(&mut self, data: &str) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(Node::Text(data.to_string()));
        }
    }
}

///Depth-first literal XML emission: one tab per nesting level, xmlns
///declarations before attributes, ` />` for childless elements.
pub(crate) fn write_node(node: &Node, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push('\t');
    }

    let element = match node {
        Node::Element(element) => element,
        Node::Text(text) => {
            out.push_str(text);
            out.push('\n');
            return;
        }
    };

    out.push('<');
    out.push_str(&element.q_name);

    for (prefix, uri) in &element.prefixes {
        out.push_str(" xmlns:");
        out.push_str(prefix);
        out.push_str("=\"");
        out.push_str(uri);
        out.push('"');
    }

    for attr in &element.attributes {
        out.push(' ');
        if let Some(prefix) = &attr.prefix {
            out.push_str(prefix);
            out.push(':');
        }
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&attr.value);
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str(" /");
    }
    out.push_str(">\n");

    if !element.children.is_empty() {
        for child in &element.children {
            write_node(child, depth + 1, out);
        }
        for _ in 0..depth {
            out.push('\t');
        }
        out.push_str("</");
        out.push_str(&element.q_name);
        out.push_str(">\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(q_name: &str, attributes: Vec<Attribute>) -> Element {
        Element::new(
            String::new(),
            q_name.to_string(),
            q_name.to_string(),
            attributes,
        )
    }

    fn attribute(name: &str, value: &str) -> Attribute {
        Attribute {
            name: name.to_string(),
            namespace: None,
            prefix: None,
            value: value.to_string(),
        }
    }

    #[test]
    fn childless_elements_self_close() {
        let mut out = String::new();
        write_node(
            &Node::Element(element("uses-sdk", vec![attribute("minSdkVersion", "21")])),
            0,
            &mut out,
        );

        assert_eq!(out, "<uses-sdk minSdkVersion=\"21\" />\n");
    }

    #[test]
    fn elements_with_children_close_with_a_matching_tag() {
        let mut parent = element("application", Vec::new());
        parent.children.push(Node::Element(element("activity", Vec::new())));

        let mut out = String::new();
        write_node(&Node::Element(parent), 0, &mut out);

        assert_eq!(out, "<application>\n\t<activity />\n</application>\n");
    }

    #[test]
    fn namespace_declarations_precede_attributes() {
        let mut e = element("manifest", vec![attribute("package", "com.example")]);
        e.prefixes.push((
            "android".to_string(),
            "http://schemas.android.com/apk/res/android".to_string(),
        ));

        let mut out = String::new();
        write_node(&Node::Element(e), 0, &mut out);

        assert_eq!(
            out,
            "<manifest xmlns:android=\"http://schemas.android.com/apk/res/android\" \
             package=\"com.example\" />\n"
        );
    }

    #[test]
    fn prefixed_attributes_render_with_their_prefix() {
        let mut attr = attribute("label", "Demo");
        attr.prefix = Some("android".to_string());
        attr.namespace = Some("http://schemas.android.com/apk/res/android".to_string());

        let mut out = String::new();
        write_node(&Node::Element(element("application", vec![attr])), 1, &mut out);

        assert_eq!(out, "\t<application android:label=\"Demo\" />\n");
    }

    #[test]
    fn text_children_render_as_indented_lines() {
        let mut e = element("string", Vec::new());
        e.children.push(Node::Text("hello".to_string()));

        let mut out = String::new();
        write_node(&Node::Element(e), 0, &mut out);

        assert_eq!(out, "<string>\n\thello\n</string>\n");
    }

    #[test]
    fn empty_document_renders_only_the_declaration() {
        let document = XmlDocument { root: None };
        assert_eq!(document.to_xml(), "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    }
}
