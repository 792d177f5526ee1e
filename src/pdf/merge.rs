use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use tracing::debug;

/// Page attributes a page may inherit from its ancestors in the page tree.
/// Copied onto each page because the original tree is discarded.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Concatenates whole documents under a single, flat page tree.
///
/// Each appended document is renumbered past the objects already taken,
/// so nothing collides. Catalogs and page-tree nodes of the inputs are
/// dropped and the output gets a fresh catalog. Top-level bookmarks of
/// every input are chained under one new outline root, in append order.
#[derive(Default)]
pub struct Merger {
    max_id: u32,
    pages: Vec<(ObjectId, Dictionary)>,
    objects: BTreeMap<ObjectId, Object>,
    bookmarks: Vec<ObjectId>,
    documents: usize,
}

impl Merger {
    pub fn new() -> Self {
        Merger {
            max_id: 1,
            ..Default::default()
        }
    }

    /// Append every page of `doc`, in page order. Returns the number of
    /// pages appended.
    pub fn append(&mut self, mut doc: Document) -> Result<usize, lopdf::Error> {
        doc.renumber_objects_with(self.max_id);
        self.max_id = doc.max_id + 1;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &page_ids {
            let mut page = doc.get_dictionary(page_id)?.clone();
            inherit_attributes(&doc, &mut page);
            self.pages.push((page_id, page));
        }

        let outlines_id = outline_root(&doc);
        let bookmarks = top_level_bookmarks(&doc, outlines_id);

        for (id, object) in doc.objects {
            if Some(id) == outlines_id {
                continue;
            }
            match type_name(&object) {
                Some(b"Catalog" | b"Pages" | b"Page") => {}
                _ => {
                    self.objects.insert(id, object);
                }
            }
        }

        self.documents += 1;
        debug!(
            pages = page_ids.len(),
            bookmarks = bookmarks.len(),
            documents = self.documents,
            "appended document"
        );
        self.bookmarks.extend(bookmarks);
        Ok(page_ids.len())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn finish(self) -> Document {
        let mut document = Document::with_version("1.5");
        document.objects = self.objects;
        document.max_id = self.max_id;

        let pages_id = document.new_object_id();
        let mut kids = Vec::with_capacity(self.pages.len());
        for (id, mut page) in self.pages {
            page.set("Parent", pages_id);
            document.objects.insert(id, Object::Dictionary(page));
            kids.push(Object::Reference(id));
        }

        let count = kids.len() as i64;
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if let Some(outlines_id) = link_bookmarks(&mut document, &self.bookmarks) {
            catalog.set("Outlines", outlines_id);
        }
        let catalog_id = document.add_object(catalog);
        document.trailer.set("Root", catalog_id);

        // Drop whatever only the discarded catalogs pointed at.
        document.prune_objects();
        document.renumber_objects();
        document.compress();
        document
    }
}

fn type_name(object: &Object) -> Option<&[u8]> {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        _ => return None,
    };
    dict.get(b"Type").and_then(Object::as_name).ok()
}

fn outline_root(doc: &Document) -> Option<ObjectId> {
    doc.catalog()
        .ok()?
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .ok()
}

/// The `First`/`Next` chain directly under the outline root.
fn top_level_bookmarks(doc: &Document, root: Option<ObjectId>) -> Vec<ObjectId> {
    let mut items = Vec::new();
    let Some(root) = root else {
        return items;
    };
    let mut next = doc
        .get_dictionary(root)
        .and_then(|d| d.get(b"First"))
        .and_then(Object::as_reference)
        .ok();
    while let Some(id) = next {
        // Broken files may loop.
        if items.contains(&id) {
            break;
        }
        let Ok(item) = doc.get_dictionary(id) else {
            break;
        };
        items.push(id);
        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }
    items
}

/// Re-link `items` as siblings under a new outline root. Returns the root,
/// or `None` when no item survived.
fn link_bookmarks(document: &mut Document, items: &[ObjectId]) -> Option<ObjectId> {
    let items: Vec<ObjectId> = items
        .iter()
        .copied()
        .filter(|id| matches!(document.objects.get(id), Some(Object::Dictionary(_))))
        .collect();
    let (&first, &last) = (items.first()?, items.last()?);

    let root_id = document.new_object_id();
    let mut visible = 0;
    for (i, &id) in items.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| items[p]);
        let next = items.get(i + 1).copied();
        let Some(Object::Dictionary(item)) = document.objects.get_mut(&id) else {
            continue;
        };
        item.set("Parent", root_id);
        item.remove(b"Prev");
        item.remove(b"Next");
        if let Some(prev) = prev {
            item.set("Prev", prev);
        }
        if let Some(next) = next {
            item.set("Next", next);
        }
        // Open items count their visible descendants too.
        let open_children = item.get(b"Count").and_then(Object::as_i64).unwrap_or(0).max(0);
        visible += 1 + open_children;
    }

    document.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => first,
            "Last" => last,
            "Count" => visible,
        }),
    );
    Some(root_id)
}

fn inherit_attributes(doc: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // Guard against cyclic Parent links in broken files.
    let mut depth = 0;
    while let Some(id) = parent {
        if depth > 64 {
            break;
        }
        let Ok(node) = doc.get_dictionary(id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
}
