//! Content stream interpreter.
//!
//! [`Interpreter`] drives a content stream to completion: it lexes
//! operations, hands them to a [`StreamHandler`], and handles the `Do`
//! operator itself — resolving the named XObject and recursing into Form
//! XObjects with their own resource scope. The handler owns all graphics
//! semantics; the interpreter owns stream mechanics.

use std::collections::HashMap;

use textplace_core::{ExtractOptions, ExtractWarning, WarningCode};

use crate::error::BackendError;
use crate::provider::decode_stream;
use crate::tokenizer::{Operation, OperationReader};

/// The `Font` and `ExtGState` name maps of one stream's resources.
///
/// Values are unresolved `lopdf` objects (usually references); whoever
/// consumes a name resolves it against the document on first use. A
/// stack of scopes mirrors Form XObject nesting — the innermost scope is
/// consulted first.
#[derive(Debug, Clone, Default)]
pub struct ResourceScope {
    /// Font resource name → font dictionary (or reference to one).
    pub fonts: HashMap<String, lopdf::Object>,
    /// ExtGState resource name → dictionary (or reference to one).
    pub ext_g_states: HashMap<String, lopdf::Object>,
}

impl ResourceScope {
    /// Snapshot the `Font` and `ExtGState` maps of a resources dictionary.
    pub fn from_resources(doc: &lopdf::Document, resources: &lopdf::Dictionary) -> Self {
        Self {
            fonts: name_map(doc, resources, b"Font"),
            ext_g_states: name_map(doc, resources, b"ExtGState"),
        }
    }
}

/// Clone the entries of a name-keyed sub-dictionary.
fn name_map(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
    key: &[u8],
) -> HashMap<String, lopdf::Object> {
    let Some(dict) = resources
        .get(key)
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| match o {
            lopdf::Object::Dictionary(d) => Some(d),
            _ => None,
        })
    else {
        return HashMap::new();
    };
    dict.iter()
        .map(|(name, obj)| (String::from_utf8_lossy(name).into_owned(), obj.clone()))
        .collect()
}

/// Callback interface the interpreter drives.
///
/// All methods except [`on_operation`](StreamHandler::on_operation) have
/// no-op defaults.
pub trait StreamHandler {
    /// Called for every operation in stream order. Returning `false`
    /// aborts the current stream (sibling streams are unaffected).
    fn on_operation(&mut self, op: &Operation) -> bool;

    /// Called exactly once per stream, before its first operation, with
    /// the stream's resource scope. The handler is expected to push it.
    fn on_resources(&mut self, _scope: ResourceScope) {}

    /// A Form XObject invocation is starting. Delivered before the
    /// form's `on_resources`.
    fn on_xobject_begin(&mut self, _name: &str, _id: Option<lopdf::ObjectId>) {}

    /// A Form XObject invocation finished (or aborted). The handler pops
    /// the scope pushed for it; any open text object is dead — a text
    /// object cannot cross stream boundaries.
    fn on_xobject_end(&mut self, _name: &str) {}

    /// A non-fatal problem was found and skipped.
    fn on_warning(&mut self, _warning: ExtractWarning) {}
}

/// Drives content streams against a handler.
pub struct Interpreter<'a> {
    doc: &'a lopdf::Document,
    options: ExtractOptions,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter over a document.
    pub fn new(doc: &'a lopdf::Document, options: ExtractOptions) -> Self {
        Self { doc, options }
    }

    /// Interpret one page-level content stream to completion.
    ///
    /// Returns `Err` for a tokenizer failure (the stream's delivered
    /// prefix stands) or when Form XObject nesting exceeds the limit.
    pub fn interpret(
        &self,
        content: &[u8],
        resources: &lopdf::Dictionary,
        handler: &mut dyn StreamHandler,
    ) -> Result<(), BackendError> {
        self.run(content, resources, handler, 0)
    }

    fn run(
        &self,
        content: &[u8],
        resources: &lopdf::Dictionary,
        handler: &mut dyn StreamHandler,
        depth: usize,
    ) -> Result<(), BackendError> {
        if depth > self.options.max_xobject_depth {
            return Err(BackendError::RecursionLimit {
                limit: self.options.max_xobject_depth,
            });
        }

        handler.on_resources(ResourceScope::from_resources(self.doc, resources));

        let mut reader = OperationReader::new(content);
        while let Some(op) = reader.next_operation()? {
            if op.operator == "Do" {
                self.invoke_xobject(&op, resources, handler, depth)?;
                continue;
            }
            if !handler.on_operation(&op) {
                break;
            }
        }
        Ok(())
    }

    /// Handle `Do`: recurse into Form XObjects, ignore everything else.
    fn invoke_xobject(
        &self,
        op: &Operation,
        resources: &lopdf::Dictionary,
        handler: &mut dyn StreamHandler,
        depth: usize,
    ) -> Result<(), BackendError> {
        let Some(name) = op.operands.first().and_then(|o| o.as_name()) else {
            handler.on_warning(ExtractWarning::new(
                WarningCode::MalformedOperator,
                "Do without a name operand",
            ));
            return Ok(());
        };

        let entry = resources
            .get(b"XObject")
            .ok()
            .map(|o| resolve(self.doc, o))
            .and_then(|o| match o {
                lopdf::Object::Dictionary(d) => Some(d),
                _ => None,
            })
            .and_then(|xobjects| xobjects.get(name.as_bytes()).ok());
        let Some(entry) = entry else {
            handler.on_warning(ExtractWarning::new(
                WarningCode::MissingXObject,
                format!("XObject /{name} not found in resources"),
            ));
            return Ok(());
        };

        let id = match entry {
            lopdf::Object::Reference(id) => Some(*id),
            _ => None,
        };
        let stream = match resolve(self.doc, entry) {
            lopdf::Object::Stream(s) => s,
            _ => {
                handler.on_warning(ExtractWarning::new(
                    WarningCode::MissingXObject,
                    format!("XObject /{name} is not a stream"),
                ));
                return Ok(());
            }
        };

        let subtype = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| match o {
                lopdf::Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
                _ => None,
            })
            .unwrap_or_default();
        if subtype != "Form" {
            // Image and unknown XObjects carry no text.
            return Ok(());
        }

        let form_resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .map(|o| resolve(self.doc, o))
            .and_then(|o| match o {
                lopdf::Object::Dictionary(d) => Some(d),
                _ => None,
            })
            .unwrap_or(resources);

        let content = match decode_stream(stream) {
            Ok(bytes) => bytes,
            Err(err) => {
                handler.on_warning(ExtractWarning::new(
                    WarningCode::MissingXObject,
                    format!("XObject /{name} stream failed to decode: {err}"),
                ));
                return Ok(());
            }
        };

        handler.on_xobject_begin(name, id);
        let result = self.run(&content, form_resources, handler, depth + 1);
        handler.on_xobject_end(name);

        match result {
            // A broken form aborts only itself.
            Err(BackendError::Parse(msg)) => {
                handler.on_warning(ExtractWarning::new(
                    WarningCode::Other("XOBJECT_PARSE".to_string()),
                    format!("XObject /{name} content aborted: {msg}"),
                ));
                Ok(())
            }
            other => other,
        }
    }
}

fn resolve<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Document, Object, Stream};

    /// Records everything the interpreter delivers.
    #[derive(Default)]
    struct RecordingHandler {
        operators: Vec<String>,
        scopes: usize,
        xobject_events: Vec<String>,
        warnings: Vec<ExtractWarning>,
        abort_after: Option<usize>,
    }

    impl StreamHandler for RecordingHandler {
        fn on_operation(&mut self, op: &Operation) -> bool {
            self.operators.push(op.operator.clone());
            match self.abort_after {
                Some(n) => self.operators.len() < n,
                None => true,
            }
        }

        fn on_resources(&mut self, _scope: ResourceScope) {
            self.scopes += 1;
        }

        fn on_xobject_begin(&mut self, name: &str, _id: Option<lopdf::ObjectId>) {
            self.xobject_events.push(format!("begin {name}"));
        }

        fn on_xobject_end(&mut self, name: &str) {
            self.xobject_events.push(format!("end {name}"));
        }

        fn on_warning(&mut self, warning: ExtractWarning) {
            self.warnings.push(warning);
        }
    }

    fn interpret(
        doc: &Document,
        content: &[u8],
        resources: &lopdf::Dictionary,
    ) -> (RecordingHandler, Result<(), BackendError>) {
        let mut handler = RecordingHandler::default();
        let interp = Interpreter::new(doc, ExtractOptions::default());
        let result = interp.interpret(content, resources, &mut handler);
        (handler, result)
    }

    /// Document with a Form XObject `Fm1` holding `inner_content`.
    fn doc_with_form(inner_content: &[u8]) -> (Document, lopdf::Dictionary) {
        let mut doc = Document::with_version("1.5");
        let form_id = doc.add_object(Object::Stream(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "Resources" => dictionary! {},
            },
            inner_content.to_vec(),
        )));
        let resources = dictionary! {
            "XObject" => dictionary! { "Fm1" => Object::Reference(form_id) },
        };
        (doc, resources)
    }

    // --- Operator delivery ---

    #[test]
    fn operators_delivered_in_order() {
        let doc = Document::with_version("1.5");
        let (handler, result) = interpret(&doc, b"BT /F1 12 Tf (x) Tj ET", &dictionary! {});
        assert!(result.is_ok());
        assert_eq!(handler.operators, ["BT", "Tf", "Tj", "ET"]);
    }

    #[test]
    fn resources_delivered_once_before_operations() {
        let doc = Document::with_version("1.5");
        let (handler, _) = interpret(&doc, b"q Q", &dictionary! {});
        assert_eq!(handler.scopes, 1);
    }

    #[test]
    fn handler_false_aborts_stream() {
        let doc = Document::with_version("1.5");
        let mut handler = RecordingHandler {
            abort_after: Some(2),
            ..Default::default()
        };
        let interp = Interpreter::new(&doc, ExtractOptions::default());
        interp
            .interpret(b"q Q BT ET", &dictionary! {}, &mut handler)
            .unwrap();
        assert_eq!(handler.operators, ["q", "Q"]);
    }

    #[test]
    fn parse_error_surfaces_after_prefix() {
        let doc = Document::with_version("1.5");
        let (handler, result) = interpret(&doc, b"BT ET (broken", &dictionary! {});
        assert!(result.is_err());
        assert_eq!(handler.operators, ["BT", "ET"]);
    }

    // --- Resource scope content ---

    #[test]
    fn scope_snapshots_font_names() {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(Object::Dictionary(dictionary! {
            "Type" => "Font", "Subtype" => "Type1", "BaseFont" => "Helvetica",
        }));
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };
        let scope = ResourceScope::from_resources(&doc, &resources);
        assert!(scope.fonts.contains_key("F1"));
        assert!(scope.ext_g_states.is_empty());
    }

    #[test]
    fn scope_empty_for_missing_sections() {
        let doc = Document::with_version("1.5");
        let scope = ResourceScope::from_resources(&doc, &dictionary! {});
        assert!(scope.fonts.is_empty());
        assert!(scope.ext_g_states.is_empty());
    }

    // --- Form XObject recursion ---

    #[test]
    fn form_xobject_interpreted_depth_first() {
        let (doc, resources) = doc_with_form(b"BT ET");
        let (handler, result) = interpret(&doc, b"q /Fm1 Do Q", &resources);
        assert!(result.is_ok());
        // Inner operators arrive between begin/end, before the outer Q.
        assert_eq!(handler.operators, ["q", "BT", "ET", "Q"]);
        assert_eq!(handler.xobject_events, ["begin Fm1", "end Fm1"]);
        // Page scope + form scope.
        assert_eq!(handler.scopes, 2);
    }

    #[test]
    fn missing_xobject_warns_and_continues() {
        let doc = Document::with_version("1.5");
        let (handler, result) = interpret(&doc, b"/Nope Do BT ET", &dictionary! {});
        assert!(result.is_ok());
        assert_eq!(handler.operators, ["BT", "ET"]);
        assert_eq!(handler.warnings.len(), 1);
        assert_eq!(handler.warnings[0].code, WarningCode::MissingXObject);
    }

    #[test]
    fn image_xobject_ignored() {
        let mut doc = Document::with_version("1.5");
        let img_id = doc.add_object(Object::Stream(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1i64,
                "Height" => 1i64,
            },
            vec![0u8],
        )));
        let resources = dictionary! {
            "XObject" => dictionary! { "Im0" => Object::Reference(img_id) },
        };
        let (handler, result) = interpret(&doc, b"/Im0 Do BT ET", &resources);
        assert!(result.is_ok());
        assert!(handler.xobject_events.is_empty());
        assert_eq!(handler.operators, ["BT", "ET"]);
    }

    #[test]
    fn broken_form_content_aborts_only_the_form() {
        let (doc, resources) = doc_with_form(b"BT (unterminated");
        let (handler, result) = interpret(&doc, b"/Fm1 Do q Q", &resources);
        assert!(result.is_ok());
        // The form's prefix arrived, then the sibling stream continued.
        assert_eq!(handler.operators, ["BT", "q", "Q"]);
        assert!(!handler.warnings.is_empty());
    }

    // --- Recursion limit ---

    /// A form whose content invokes itself.
    fn self_referential_form() -> (Document, lopdf::Dictionary) {
        let mut doc = Document::with_version("1.5");
        let form_id = doc.new_object_id();
        doc.objects.insert(
            form_id,
            Object::Stream(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Form",
                    "Resources" => dictionary! {
                        "XObject" => dictionary! { "Fm1" => Object::Reference(form_id) },
                    },
                },
                b"q /Fm1 Do Q".to_vec(),
            )),
        );
        let resources = dictionary! {
            "XObject" => dictionary! { "Fm1" => Object::Reference(form_id) },
        };
        (doc, resources)
    }

    #[test]
    fn self_referential_form_hits_recursion_limit() {
        let (doc, resources) = self_referential_form();
        let (_, result) = interpret(&doc, b"/Fm1 Do", &resources);
        assert!(matches!(
            result,
            Err(BackendError::RecursionLimit { limit: 32 })
        ));
    }

    #[test]
    fn nesting_at_limit_is_allowed() {
        let (doc, resources) = self_referential_form();
        let mut handler = RecordingHandler::default();
        let interp = Interpreter::new(
            &doc,
            ExtractOptions {
                max_xobject_depth: 3,
            },
        );
        let result = interp.interpret(b"/Fm1 Do q Q", &resources, &mut handler);
        assert!(matches!(result, Err(BackendError::RecursionLimit { .. })));
        // Depth 1..=3 ran, each delivering its leading q before recursing.
        assert_eq!(
            handler.operators.iter().filter(|o| *o == "q").count(),
            3
        );
    }
}
