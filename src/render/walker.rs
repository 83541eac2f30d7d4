//! # Dispatch & Tree Walker
//!
//! A single depth-first, pre-order traversal of the element tree. At each
//! element:
//!
//! ```text
//! invisible?            -> prune the whole subtree
//! local transform?      -> source' = local then source   (siblings keep theirs)
//! translator for kind?  -> translate(node, source', view, pass)
//! children              -> recurse with source'
//! ```
//!
//! Kinds without a translator emit nothing, but their children are still
//! visited. The only mutable state is the [`RenderPass`]: the output
//! container and the image cache, both owned by one render call.

use std::collections::HashMap;

use super::container::Container;
use super::image_cache::ImageCache;
use crate::document::{ComputedStyle, Document, Element, ElementTag, Node, transform_list_matrix};
use crate::error::Result;
use crate::geometry::Matrix;
use crate::raster::ImageSource;

/// Everything a render pass mutates, plus the pixel collaborator.
pub struct RenderPass<'a> {
    pub container: Container,
    pub images: ImageCache,
    pub image_source: &'a dyn ImageSource,
}

impl<'a> RenderPass<'a> {
    pub fn new(image_source: &'a dyn ImageSource, images: ImageCache) -> Self {
        Self {
            container: Container::new(),
            images,
            image_source,
        }
    }
}

/// Converts one element kind into backend commands.
///
/// Implementations are stateless with respect to the tree: anything they
/// learn about a node comes from the arguments, and anything they produce
/// goes into the pass.
pub trait Translator: Send + Sync {
    fn translate(&self, node: &Node<'_>, source: &Matrix, view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()>;
}

/// Element kind to translator table, built once per backend.
#[derive(Default)]
pub struct TranslatorTable {
    translators: HashMap<ElementTag, Box<dyn Translator>>,
}

impl TranslatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the translator for `tag`.
    pub fn register(&mut self, tag: ElementTag, translator: impl Translator + 'static) -> &mut Self {
        self.translators.insert(tag, Box::new(translator));
        self
    }

    pub fn get(&self, tag: ElementTag) -> Option<&dyn Translator> {
        self.translators.get(&tag).map(|t| t.as_ref())
    }

    pub fn contains(&self, tag: ElementTag) -> bool {
        self.translators.contains_key(&tag)
    }
}

/// Walk the whole document.
///
/// The document's own transform list seeds the source matrix.
pub fn walk(document: &Document, table: &TranslatorTable, view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()> {
    let source = transform_list_matrix(&document.transforms);
    let style = ComputedStyle::default();
    for element in &document.children {
        walk_element(element, None, document, &source, &style, table, view, pass)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn walk_element(
    element: &Element,
    parent: Option<&Element>,
    document: &Document,
    source: &Matrix,
    inherited: &ComputedStyle,
    table: &TranslatorTable,
    view: &Matrix,
    pass: &mut RenderPass<'_>,
) -> Result<()> {
    if !element.visible {
        log::trace!("pruning invisible {} '{}'", element.kind.tag(), element.id);
        return Ok(());
    }

    let local;
    let source = match element.local_transform() {
        Some(matrix) => {
            local = matrix.then(source);
            &local
        }
        None => source,
    };
    let style = inherited.inherit(&element.style);

    let tag = element.kind.tag();
    match table.get(tag) {
        Some(translator) => {
            log::trace!("translating {} '{}'", tag, element.id);
            let node = Node::new(element, parent, document, style);
            translator.translate(&node, source, view, pass)?;
        }
        None => log::trace!("no translator for {} '{}'", tag, element.id),
    }

    for child in &element.children {
        walk_element(child, Some(element), document, source, &style, table, view, pass)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ElementKind, Transform};
    use crate::raster::EmbeddedImageSource;
    use pretty_assertions::assert_eq;

    /// Emits "{tag} {id} {x},{y}" with the element origin pushed through source.
    struct Recorder;

    impl Translator for Recorder {
        fn translate(&self, node: &Node<'_>, source: &Matrix, _view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()> {
            let (x, y) = source.apply(0.0, 0.0);
            pass.container
                .body
                .push(format!("{} {} {},{}", node.kind().tag(), node.id(), x, y).into());
            Ok(())
        }
    }

    fn table() -> TranslatorTable {
        let mut table = TranslatorTable::new();
        table
            .register(ElementTag::Rect, Recorder)
            .register(ElementTag::Line, Recorder)
            .register(ElementTag::Text, Recorder);
        table
    }

    fn run(document: &Document) -> String {
        let source = EmbeddedImageSource::new();
        let mut pass = RenderPass::new(&source, ImageCache::new());
        walk(document, &table(), &Matrix::IDENTITY, &mut pass).unwrap();
        pass.container.to_string()
    }

    #[test]
    fn test_pre_order() {
        let doc = Document::new(
            "d",
            vec![
                Element::rect(0.0, 0.0, 1.0, 1.0)
                    .with_id("a")
                    .with_children(vec![Element::line(0.0, 0.0, 1.0, 0.0).with_id("b")]),
                Element::text(0.0, 0.0, "t").with_id("c"),
            ],
        );
        assert_eq!(run(&doc), "rect a 0,0\nline b 0,0\ntext c 0,0\n");
    }

    #[test]
    fn test_invisible_prunes_subtree() {
        let doc = Document::new(
            "d",
            vec![
                Element::rect(0.0, 0.0, 1.0, 1.0)
                    .with_id("hidden")
                    .hidden()
                    .with_children(vec![Element::line(0.0, 0.0, 1.0, 0.0).with_id("child")]),
            ],
        );
        assert_eq!(run(&doc), "");
    }

    #[test]
    fn test_untranslated_kinds_still_walk_children() {
        let doc = Document::new(
            "d",
            vec![Element::new(ElementKind::Circle(Default::default()))
                .with_children(vec![Element::rect(0.0, 0.0, 1.0, 1.0).with_id("inner")])],
        );
        assert_eq!(run(&doc), "rect inner 0,0\n");
    }

    #[test]
    fn test_transforms_accumulate_without_leaking_to_siblings() {
        let doc = Document::new(
            "d",
            vec![
                Element::group(vec![
                    Element::rect(0.0, 0.0, 1.0, 1.0)
                        .with_id("moved")
                        .with_transform(Transform::Translate { x: 1.0, y: 2.0 }),
                    Element::rect(0.0, 0.0, 1.0, 1.0).with_id("sibling"),
                ])
                .with_transform(Transform::Translate { x: 10.0, y: 0.0 }),
                Element::rect(0.0, 0.0, 1.0, 1.0).with_id("outside"),
            ],
        );
        assert_eq!(run(&doc), "rect moved 11,2\nrect sibling 10,0\nrect outside 0,0\n");
    }

    #[test]
    fn test_child_transform_applies_before_parent() {
        // parent scales by 2, child translates by 5: origin lands on 10
        let doc = Document::new(
            "d",
            vec![Element::group(vec![
                Element::rect(0.0, 0.0, 1.0, 1.0)
                    .with_id("r")
                    .with_transform(Transform::Translate { x: 5.0, y: 0.0 }),
            ])
            .with_transform(Transform::Scale { x: 2.0, y: None })],
        );
        assert_eq!(run(&doc), "rect r 10,0\n");
    }

    #[test]
    fn test_document_transforms_seed_the_source() {
        let mut doc = Document::new("d", vec![Element::rect(0.0, 0.0, 1.0, 1.0).with_id("r")]);
        doc.transforms.push(Transform::Translate { x: 3.0, y: 4.0 });
        assert_eq!(run(&doc), "rect r 3,4\n");
    }

    #[test]
    fn test_translator_errors_abort_the_walk() {
        struct Failing;
        impl Translator for Failing {
            fn translate(&self, _: &Node<'_>, _: &Matrix, _: &Matrix, _: &mut RenderPass<'_>) -> Result<()> {
                Err(crate::error::RenderError::InvalidArgument("boom".into()))
            }
        }
        let mut table = TranslatorTable::new();
        table.register(ElementTag::Rect, Failing);
        let doc = Document::new("d", vec![Element::rect(0.0, 0.0, 1.0, 1.0)]);
        let source = EmbeddedImageSource::new();
        let mut pass = RenderPass::new(&source, ImageCache::new());
        assert!(walk(&doc, &table, &Matrix::IDENTITY, &mut pass).is_err());
    }
}
